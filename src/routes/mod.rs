//! Application routes
//!
//! The concrete route table of the servequery UI.
//!
//! ```text
//! /                                    home shell (version header)
//! ├── index                            project list
//! └── projects
//!     └── :projectId                   project layout, provides ProjectContext
//!         ├── index                    dashboard
//!         ├── test-suites
//!         ├── reports
//!         └── load-panel-points        fetcher-only series batch loader
//! ```

mod dashboard;
mod home;
mod panel_points;
mod project;
mod sections;

pub use dashboard::{DashboardLoader, DashboardPage};
pub use home::{HomeShell, ProjectList, ProjectsLoader, VersionLoader};
pub use panel_points::PanelPointsLoader;
pub use project::{ProjectLayout, ProjectLoader};
pub use sections::SectionPage;

use std::sync::Arc;

use crate::api::models::{Dashboard, Project, SeriesResponse, Version};
use crate::api::ApiClient;
use crate::panel::PanelPoints;
use crate::router::{MountContext, Route, Router, RouterError};

/// Full ids of the application routes
pub mod ids {
    pub const ROOT: &str = "/";
    pub const HOME_INDEX: &str = "/?index";
    pub const PROJECTS: &str = "/projects";
    pub const PROJECT: &str = "/projects/:projectId";
    pub const DASHBOARD: &str = "/projects/:projectId/?index";
    pub const TEST_SUITES: &str = "/projects/:projectId/test-suites";
    pub const REPORTS: &str = "/projects/:projectId/reports";
    pub const PANEL_POINTS: &str = crate::panel::PANEL_POINTS_ROUTE;
}

/// Output of every application loader
#[derive(Debug, Clone)]
pub enum RouteData {
    Version(Arc<Version>),
    Projects(Arc<Vec<Project>>),
    Project(Arc<Project>),
    Dashboard(Arc<Dashboard>),
    PanelPoints(Arc<SeriesResponse>),
}

impl PanelPoints for RouteData {
    fn series(&self) -> Option<&SeriesResponse> {
        match self {
            RouteData::PanelPoints(points) => Some(points),
            _ => None,
        }
    }
}

pub type AppRouter = Router<RouteData>;

/// The undecorated route table
pub fn routes(client: ApiClient) -> Vec<Route<RouteData>> {
    vec![Route::new("/")
        .loader(VersionLoader::new(client.clone()))
        .component(HomeShell)
        .crumb_title("Home")
        .children(vec![
            Route::index()
                .loader(ProjectsLoader::new(client.clone()))
                .component(ProjectList),
            Route::new("projects").children(vec![Route::new(":projectId")
                .loader(ProjectLoader::new(client.clone()))
                .component(ProjectLayout)
                .crumb_param("projectId")
                .children(vec![
                    Route::index()
                        .loader(DashboardLoader::new(client.clone()))
                        .component(DashboardPage)
                        .crumb_title("Dashboard"),
                    Route::new("test-suites")
                        .component(SectionPage::new("Test Suites"))
                        .crumb_title("Test Suites"),
                    Route::new("reports")
                        .component(SectionPage::new("Reports"))
                        .crumb_title("Reports"),
                    Route::new("load-panel-points").loader(PanelPointsLoader::new(client)),
                ])]),
        ])]
}

pub fn app_router(client: ApiClient) -> Result<AppRouter, RouterError> {
    Router::new(routes(client))
}

/// Loader output of the route being mounted
fn route_data<'a>(ctx: &'a MountContext<RouteData>) -> Result<&'a RouteData, RouterError> {
    ctx.data.as_ref().ok_or_else(|| unexpected_data(ctx))
}

fn unexpected_data(ctx: &MountContext<RouteData>) -> RouterError {
    RouterError::Unhandled {
        route_id: ctx.route_id.clone(),
        message: "unexpected loader data".to_string(),
    }
}
