//! Typed API Client

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

use super::endpoints::{Endpoint, ParseAs, PathParams};
use super::transport::{HttpRequest, HttpTransport, RawResponse, Transport};
use super::{ApiError, Query};
use crate::config::ApiConfig;
use crate::json;

/// Issues typed calls against the backend
///
/// Every call is a live request; nothing is cached.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Client talking HTTP to the configured backend
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    pub async fn get<E: Endpoint>(&self, path: &E::Path) -> Result<E::Response, ApiError> {
        self.send::<E>(path, &Query::new(), None).await
    }

    pub async fn post<E: Endpoint>(
        &self,
        path: &E::Path,
        body: &E::Body,
    ) -> Result<E::Response, ApiError> {
        self.send::<E>(path, &Query::new(), Some(body)).await
    }

    /// Send a request to `E` and decode its response
    pub async fn send<E: Endpoint>(
        &self,
        path: &E::Path,
        query: &Query,
        body: Option<&E::Body>,
    ) -> Result<E::Response, ApiError> {
        let request = build_request::<E>(path, query, body)?;
        let method = request.method;
        let target = request.path.clone();

        let raw = self.transport.send(request).await?;
        let result = parse_response(raw, E::PARSE_AS);
        match &result {
            Ok(_) => debug!(%method, path = %target, "Request succeeded"),
            Err(e) => warn!(%method, path = %target, error = %e, "Request failed"),
        }
        result
    }
}

fn build_request<E: Endpoint>(
    path: &E::Path,
    query: &Query,
    body: Option<&E::Body>,
) -> Result<HttpRequest, ApiError> {
    let mut target = path.fill(E::PATH);
    if !query.is_empty() {
        target.push('?');
        target.push_str(&query.encode());
    }

    let body = body
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| ApiError::Encode(e.to_string()))?;

    Ok(HttpRequest {
        method: E::METHOD,
        path: target,
        body,
    })
}

/// Response parser stage shared by every endpoint
pub fn parse_response<T: DeserializeOwned>(
    raw: RawResponse,
    parse_as: ParseAs,
) -> Result<T, ApiError> {
    if !raw.is_success() {
        return Err(ApiError::Status {
            status: raw.status,
            body: raw.body,
        });
    }

    match parse_as {
        ParseAs::Json => Ok(serde_json::from_str(&raw.body)?),
        ParseAs::ExtendedJson => Ok(json::from_str(&raw.body)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::endpoints::{GetDashboard, GetVersion, LoadSeriesBatch, ProjectPath};
    use crate::api::models::{BatchMetricDataModel, SeriesFilter, SeriesRef};
    use crate::api::transport::Method;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays one canned response and records requests
    struct CannedTransport {
        response: RawResponse,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl CannedTransport {
        fn new(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                response: RawResponse {
                    status,
                    body: body.to_string(),
                },
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn send(&self, request: HttpRequest) -> Result<RawResponse, ApiError> {
            self.seen.lock().unwrap().push(request);
            Ok(self.response.clone())
        }
    }

    #[tokio::test]
    async fn test_get_version() {
        let transport = CannedTransport::new(
            200,
            r#"{"application": "servequery", "version": "0.4.1", "commit": "abc123"}"#,
        );
        let client = ApiClient::new(transport.clone());

        let version = client.get::<GetVersion>(&Default::default()).await.unwrap();
        assert_eq!(version.version, "0.4.1");

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].method, Method::Get);
        assert_eq!(seen[0].path, "/api/version");
        assert!(seen[0].body.is_none());
    }

    #[tokio::test]
    async fn test_dashboard_decoded_as_extended_json() {
        let transport = CannedTransport::new(
            200,
            r#"{"panels": [{"id": "a", "title": "A", "plot_params": {"plot_type": "counter", "max": Infinity}}]}"#,
        );
        let client = ApiClient::new(transport);

        let dashboard = client
            .get::<GetDashboard>(&ProjectPath::new("p1"))
            .await
            .unwrap();
        let max = dashboard.panels[0].plot_params.extra["max"].as_f64().unwrap();
        assert!(max.is_infinite());
    }

    #[tokio::test]
    async fn test_json_endpoint_rejects_non_finite() {
        let transport = CannedTransport::new(
            200,
            r#"{"application": "x", "version": Infinity, "commit": "c"}"#,
        );
        let client = ApiClient::new(transport);

        let err = client.get::<GetVersion>(&Default::default()).await.unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let transport = CannedTransport::new(404, "project not found");
        let client = ApiClient::new(transport);

        let err = client
            .get::<GetDashboard>(&ProjectPath::new("nope"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("project not found"));
    }

    #[tokio::test]
    async fn test_post_sends_json_body_and_query() {
        let transport = CannedTransport::new(200, r#"{"sources": [], "series": []}"#);
        let client = ApiClient::new(transport.clone());
        let body = BatchMetricDataModel {
            series_filter: vec![SeriesFilter::from(&SeriesRef::new("drift"))],
        };

        client
            .send::<LoadSeriesBatch>(
                &ProjectPath::new("p1"),
                &Query::new().with("limit", "10"),
                Some(&body),
            )
            .await
            .unwrap();

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].method, Method::Post);
        assert_eq!(
            seen[0].path,
            "/api/v2/snapshots/p1/data_series_batch?limit=10"
        );
        let sent: BatchMetricDataModel =
            serde_json::from_str(seen[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, body);
    }
}
