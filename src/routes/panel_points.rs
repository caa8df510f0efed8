//! Panel points route
//!
//! Fetcher-only route: the series batch arrives JSON-encoded in the `body`
//! search parameter and is posted to the snapshot batch endpoint.

use async_trait::async_trait;
use std::sync::Arc;

use super::RouteData;
use crate::api::endpoints::LoadSeriesBatch;
use crate::api::models::BatchMetricDataModel;
use crate::api::{ApiClient, ProjectPath};
use crate::router::{LoadArgs, LoadError, Loader};

pub struct PanelPointsLoader {
    client: ApiClient,
}

impl PanelPointsLoader {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

/// Decode the batch carried by the `body` search parameter
pub(crate) fn batch_from_args(args: &LoadArgs) -> Result<BatchMetricDataModel, LoadError> {
    let body = args
        .query
        .get("body")
        .ok_or_else(|| LoadError::InvalidArgs("missing 'body' search parameter".to_string()))?;
    serde_json::from_str(body).map_err(|e| LoadError::InvalidArgs(format!("invalid body: {}", e)))
}

#[async_trait]
impl Loader<RouteData> for PanelPointsLoader {
    async fn load(&self, args: LoadArgs) -> Result<RouteData, LoadError> {
        let path = ProjectPath::new(args.param("projectId")?);
        let batch = batch_from_args(&args)?;
        let points = self.client.post::<LoadSeriesBatch>(&path, &batch).await?;
        Ok(RouteData::PanelPoints(Arc::new(points)))
    }
}
