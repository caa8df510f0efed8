//! Project layout

use async_trait::async_trait;
use std::sync::Arc;

use super::{route_data, unexpected_data, RouteData};
use crate::api::endpoints::GetProjectInfo;
use crate::api::models::Project;
use crate::api::{ApiClient, ProjectPath};
use crate::context::ProjectContext;
use crate::router::{Component, LoadArgs, LoadError, Loader, MountContext, RouterError, View};
use crate::view::Node;

pub struct ProjectLoader {
    client: ApiClient,
}

impl ProjectLoader {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Loader<RouteData> for ProjectLoader {
    async fn load(&self, args: LoadArgs) -> Result<RouteData, LoadError> {
        let path = ProjectPath::new(args.param("projectId")?);
        let project = self.client.get::<GetProjectInfo>(&path).await?;
        Ok(RouteData::Project(Arc::new(project)))
    }
}

/// Layout of every project page; scopes descendants to the project
pub struct ProjectLayout;

impl Component<RouteData> for ProjectLayout {
    fn mount(&self, ctx: &MountContext<RouteData>) -> Result<Box<dyn View>, RouterError> {
        match route_data(ctx)? {
            RouteData::Project(project) => Ok(Box::new(ProjectLayoutView(project.clone()))),
            _ => Err(unexpected_data(ctx)),
        }
    }

    fn provide(&self, ctx: &MountContext<RouteData>) -> ProjectContext {
        match &ctx.data {
            Some(RouteData::Project(project)) => ProjectContext::scoped(project.clone()),
            _ => ctx.project.clone(),
        }
    }
}

struct ProjectLayoutView(Arc<Project>);

impl View for ProjectLayoutView {
    fn render(&self, outlet: Node) -> Node {
        let mut children = Vec::with_capacity(2);
        if let Some(description) = &self.0.description {
            children.push(Node::text(description.clone()));
        }
        children.push(outlet);
        Node::Section {
            title: self.0.name.clone(),
            children,
        }
    }
}
