//! Home shell and project list

use async_trait::async_trait;
use std::sync::Arc;

use super::{route_data, unexpected_data, RouteData};
use crate::api::endpoints::{GetVersion, ListProjects};
use crate::api::models::{Project, Version};
use crate::api::{ApiClient, NoParams};
use crate::router::{Component, LoadArgs, LoadError, Loader, MountContext, RouterError, View};
use crate::view::Node;

pub struct VersionLoader {
    client: ApiClient,
}

impl VersionLoader {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Loader<RouteData> for VersionLoader {
    async fn load(&self, _args: LoadArgs) -> Result<RouteData, LoadError> {
        let version = self.client.get::<GetVersion>(&NoParams).await?;
        Ok(RouteData::Version(Arc::new(version)))
    }
}

/// Application shell with the service version header
pub struct HomeShell;

impl Component<RouteData> for HomeShell {
    fn mount(&self, ctx: &MountContext<RouteData>) -> Result<Box<dyn View>, RouterError> {
        match route_data(ctx)? {
            RouteData::Version(version) => Ok(Box::new(HomeShellView(version.clone()))),
            _ => Err(unexpected_data(ctx)),
        }
    }
}

struct HomeShellView(Arc<Version>);

impl View for HomeShellView {
    fn render(&self, outlet: Node) -> Node {
        Node::Group {
            children: vec![
                Node::Header {
                    application: self.0.application.clone(),
                    version: self.0.version.clone(),
                },
                outlet,
            ],
        }
    }
}

pub struct ProjectsLoader {
    client: ApiClient,
}

impl ProjectsLoader {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Loader<RouteData> for ProjectsLoader {
    async fn load(&self, _args: LoadArgs) -> Result<RouteData, LoadError> {
        let projects = self.client.get::<ListProjects>(&NoParams).await?;
        Ok(RouteData::Projects(Arc::new(projects)))
    }
}

pub struct ProjectList;

impl Component<RouteData> for ProjectList {
    fn mount(&self, ctx: &MountContext<RouteData>) -> Result<Box<dyn View>, RouterError> {
        match route_data(ctx)? {
            RouteData::Projects(projects) => Ok(Box::new(ProjectListView(projects.clone()))),
            _ => Err(unexpected_data(ctx)),
        }
    }
}

struct ProjectListView(Arc<Vec<Project>>);

impl View for ProjectListView {
    fn render(&self, _outlet: Node) -> Node {
        Node::Section {
            title: "Projects".to_string(),
            children: vec![Node::List {
                items: self
                    .0
                    .iter()
                    .map(|p| format!("{} ({})", p.name, p.id))
                    .collect(),
            }],
        }
    }
}
