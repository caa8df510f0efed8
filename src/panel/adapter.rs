//! Panel Data Fetch Adapter
//!
//! Builds the series query for one panel and runs it through the
//! project-scoped panel-points fetcher.

use tokio::sync::watch;

use super::renderer::{PanelPoints, PanelRenderer};
use crate::api::models::{BatchMetricDataModel, Panel, SeriesFilter};
use crate::api::Query;
use crate::context::ProjectContext;
use crate::router::{
    FetchRequest, FetchState, Fetcher, LoaderData, LoaderRegistry, Params, PendingLoad,
    RouterError,
};

/// Route whose loader returns the points of a series batch
pub const PANEL_POINTS_ROUTE: &str = "/projects/:projectId/load-panel-points";

/// Batch query for every series a panel plots, in legend order
pub fn series_filter(panel: &Panel) -> BatchMetricDataModel {
    BatchMetricDataModel {
        series_filter: panel.values.iter().map(SeriesFilter::from).collect(),
    }
}

pub struct PanelDataFetchAdapter<D> {
    panel: Panel,
    project_id: String,
    body: String,
    fetcher: Fetcher<D>,
}

impl<D: LoaderData> PanelDataFetchAdapter<D> {
    /// Bind a panel to the active project's points fetcher
    ///
    /// # Panics
    ///
    /// Panics if `project` is empty; panels only mount beneath a project
    /// route.
    #[track_caller]
    pub fn new(
        panel: &Panel,
        project: &ProjectContext,
        registry: &LoaderRegistry<D>,
    ) -> Result<Self, RouterError> {
        let project_id = project.expect_project().id.clone();
        let body = serde_json::to_string(&series_filter(panel))
            .map_err(|e| RouterError::Encode(e.to_string()))?;
        let fetcher = registry.register_fetcher(PANEL_POINTS_ROUTE)?;

        Ok(Self {
            panel: panel.clone(),
            project_id,
            body,
            fetcher,
        })
    }

    /// Parameters of every load this adapter issues
    pub fn request(&self) -> FetchRequest {
        let mut params = Params::new();
        params.insert("projectId".to_string(), self.project_id.clone());
        FetchRequest {
            params,
            query: Query::new().with("body", self.body.clone()),
        }
    }

    pub fn load(&self) -> PendingLoad {
        self.fetcher.load(self.request())
    }

    /// Reactive fetch state of this panel
    pub fn data(&self) -> watch::Receiver<FetchState<D>> {
        self.fetcher.subscribe()
    }

    pub fn fetcher(&self) -> &Fetcher<D> {
        &self.fetcher
    }

    /// Mount a renderer driven by this adapter; unmounting cancels its fetches
    pub fn into_renderer(self) -> PanelRenderer<D>
    where
        D: PanelPoints,
    {
        let state = self.data();
        let request = self.request();
        let loader = self.fetcher.clone();
        let cancel = self.fetcher;

        PanelRenderer::mount(
            self.panel,
            move || {
                loader.load(request.clone());
            },
            state,
            move || cancel.cancel(),
        )
    }
}
