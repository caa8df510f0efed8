//! Project dashboard

use async_trait::async_trait;
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::debug;

use super::{route_data, unexpected_data, RouteData};
use crate::api::endpoints::GetDashboard;
use crate::api::{ApiClient, ProjectPath};
use crate::panel::{PanelDataFetchAdapter, PanelRenderer};
use crate::router::{Component, LoadArgs, LoadError, Loader, MountContext, RouterError, View};
use crate::view::Node;

/// Fetches the dashboard definition, decoded as extended JSON
///
/// Search parameters of the navigation (time range and the like) are
/// forwarded to the backend.
pub struct DashboardLoader {
    client: ApiClient,
}

impl DashboardLoader {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Loader<RouteData> for DashboardLoader {
    async fn load(&self, args: LoadArgs) -> Result<RouteData, LoadError> {
        let path = ProjectPath::new(args.param("projectId")?);
        let dashboard = self
            .client
            .send::<GetDashboard>(&path, &args.query, None)
            .await?;
        Ok(RouteData::Dashboard(Arc::new(dashboard)))
    }
}

/// Mounts one panel renderer per dashboard panel
pub struct DashboardPage;

impl Component<RouteData> for DashboardPage {
    fn mount(&self, ctx: &MountContext<RouteData>) -> Result<Box<dyn View>, RouterError> {
        let RouteData::Dashboard(dashboard) = route_data(ctx)? else {
            return Err(unexpected_data(ctx));
        };

        let panels = dashboard
            .panels
            .iter()
            .map(|panel| {
                PanelDataFetchAdapter::new(panel, &ctx.project, &ctx.registry)
                    .map(PanelDataFetchAdapter::into_renderer)
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(panels = panels.len(), "Dashboard mounted");

        Ok(Box::new(DashboardView {
            title: dashboard
                .name
                .clone()
                .unwrap_or_else(|| "Dashboard".to_string()),
            panels,
        }))
    }
}

struct DashboardView {
    title: String,
    panels: Vec<PanelRenderer<RouteData>>,
}

#[async_trait]
impl View for DashboardView {
    fn render(&self, _outlet: Node) -> Node {
        let children = if self.panels.is_empty() {
            vec![Node::text("This dashboard has no panels")]
        } else {
            self.panels.iter().map(PanelRenderer::render).collect()
        };
        Node::Section {
            title: self.title.clone(),
            children,
        }
    }

    async fn settled(&self) {
        join_all(self.panels.iter().map(PanelRenderer::settled)).await;
    }
}
