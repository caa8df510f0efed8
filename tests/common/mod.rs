//! In-process fake servequery backend

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{Path, RawQuery, State},
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

use servequery_ui::api::{ApiError, HttpRequest, RawResponse, Transport};
use servequery_ui::{app_router, ApiClient, AppRouter};

/// Requests seen by the fake backend, as `METHOD /path` plus `?query` when sent
#[derive(Clone, Default)]
pub struct Backend {
    requests: Arc<Mutex<Vec<String>>>,
}

impl Backend {
    fn record(&self, line: String) {
        self.requests.lock().unwrap().push(line);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, line: &str) -> usize {
        self.requests().iter().filter(|r| *r == line).count()
    }
}

/// Serves requests through an axum router without a socket
pub struct RouterTransport {
    app: Router,
}

#[async_trait]
impl Transport for RouterTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, ApiError> {
        let mut builder = Request::builder()
            .method(request.method.as_str())
            .uri(&request.path);
        if request.body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        let request = builder
            .body(Body::from(request.body.unwrap_or_default()))
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(RawResponse {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/// Application router wired to a fresh fake backend
pub fn app() -> (AppRouter, Backend) {
    let backend = Backend::default();
    let transport = RouterTransport {
        app: fake_backend(backend.clone()),
    };
    let router = app_router(ApiClient::new(Arc::new(transport))).unwrap();
    (router, backend)
}

fn fake_backend(backend: Backend) -> Router {
    Router::new()
        .route("/api/version", get(version))
        .route("/api/projects", get(projects))
        .route("/api/projects/:project_id/info", get(project_info))
        .route("/api/v2/dashboards/:project_id", get(dashboard))
        .route(
            "/api/v2/snapshots/:project_id/data_series_batch",
            post(series_batch),
        )
        .with_state(backend)
}

fn extended_json(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn version(State(backend): State<Backend>) -> Json<Value> {
    backend.record("GET /api/version".to_string());
    Json(json!({"application": "servequery", "version": "0.4.1", "commit": "abc123"}))
}

async fn projects(State(backend): State<Backend>) -> Json<Value> {
    backend.record("GET /api/projects".to_string());
    Json(json!([
        {"id": "p1", "name": "Churn model", "description": "Production monitoring"},
        {"id": "p2", "name": "Fraud model"}
    ]))
}

async fn project_info(
    State(backend): State<Backend>,
    Path(project_id): Path<String>,
) -> Response {
    backend.record(format!("GET /api/projects/{}/info", project_id));
    match project_id.as_str() {
        "p1" => Json(json!({"id": "p1", "name": "Churn model", "description": "Production monitoring"}))
            .into_response(),
        "empty" => Json(json!({"id": "empty", "name": "Empty project"})).into_response(),
        _ => (StatusCode::NOT_FOUND, "project not found").into_response(),
    }
}

async fn dashboard(
    State(backend): State<Backend>,
    Path(project_id): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    match query {
        Some(query) => backend.record(format!("GET /api/v2/dashboards/{}?{}", project_id, query)),
        None => backend.record(format!("GET /api/v2/dashboards/{}", project_id)),
    }
    match project_id.as_str() {
        "p1" => extended_json(
            r#"{
                "name": "Model quality",
                "panels": [
                    {
                        "id": "accuracy",
                        "title": "Accuracy",
                        "values": [{"metric": "accuracy", "legend": "Accuracy"}],
                        "plot_params": {"plot_type": "counter", "aggregation": "last"}
                    },
                    {
                        "id": "drift",
                        "title": "Drift share",
                        "values": [{"metric": "drift", "tags": ["prod"]}],
                        "plot_params": {"plot_type": "line", "threshold": Infinity}
                    },
                    {
                        "id": "broken",
                        "title": "Broken metric",
                        "values": [{"metric": "broken"}],
                        "plot_params": {"plot_type": "bar"}
                    }
                ]
            }"#
            .to_string(),
        ),
        "empty" => extended_json(r#"{"panels": []}"#.to_string()),
        _ => (StatusCode::NOT_FOUND, "dashboard not found").into_response(),
    }
}

async fn series_batch(
    State(backend): State<Backend>,
    Path(project_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    backend.record(format!(
        "POST /api/v2/snapshots/{}/data_series_batch",
        project_id
    ));

    let filters = body["series_filter"].as_array().cloned().unwrap_or_default();
    if filters.iter().any(|f| f["metric"] == "broken") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "metric store unavailable").into_response();
    }

    let series: Vec<String> = filters
        .iter()
        .enumerate()
        .map(|(i, f)| {
            format!(
                r#"{{"metric_type": {}, "filter_index": {}, "params": {{}}, "values": [0.5, 0.75, Infinity]}}"#,
                f["metric"], i
            )
        })
        .collect();

    extended_json(format!(
        r#"{{"sources": [
            {{"snapshot_id": "s1", "timestamp": "2024-03-01T00:00:00"}},
            {{"snapshot_id": "s2", "timestamp": "2024-03-02T00:00:00"}},
            {{"snapshot_id": "s3", "timestamp": "2024-03-03T00:00:00"}}
        ], "series": [{}]}}"#,
        series.join(", ")
    ))
}
