//! Backend surface
//!
//! Every backend call is described by a zero-sized type implementing
//! [`Endpoint`]. The method, path template, response parsing and the typed
//! path/body/response shapes are fixed at compile time.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::models::{BatchMetricDataModel, Dashboard, Project, SeriesResponse, Version};
use super::transport::Method;

/// How a response body is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseAs {
    /// Standard JSON through serde_json
    Json,
    /// JSON that may contain `NaN`/`Infinity`/`-Infinity`
    ExtendedJson,
}

/// Substitutes typed values into a path template
pub trait PathParams {
    fn fill(&self, template: &str) -> String;
}

/// Endpoints without path parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct NoParams;

impl PathParams for NoParams {
    fn fill(&self, template: &str) -> String {
        template.to_string()
    }
}

/// Path parameters of project-scoped endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPath {
    pub project_id: String,
}

impl ProjectPath {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
        }
    }
}

impl PathParams for ProjectPath {
    fn fill(&self, template: &str) -> String {
        template.replace("{project_id}", &urlencoding::encode(&self.project_id))
    }
}

pub trait Endpoint {
    const METHOD: Method;
    const PATH: &'static str;
    const PARSE_AS: ParseAs;

    type Path: PathParams + Send + Sync;
    type Body: Serialize + Send + Sync;
    type Response: DeserializeOwned + Send;
}

pub struct GetVersion;

impl Endpoint for GetVersion {
    const METHOD: Method = Method::Get;
    const PATH: &'static str = "/api/version";
    const PARSE_AS: ParseAs = ParseAs::Json;

    type Path = NoParams;
    type Body = ();
    type Response = Version;
}

pub struct ListProjects;

impl Endpoint for ListProjects {
    const METHOD: Method = Method::Get;
    const PATH: &'static str = "/api/projects";
    const PARSE_AS: ParseAs = ParseAs::Json;

    type Path = NoParams;
    type Body = ();
    type Response = Vec<Project>;
}

pub struct GetProjectInfo;

impl Endpoint for GetProjectInfo {
    const METHOD: Method = Method::Get;
    const PATH: &'static str = "/api/projects/{project_id}/info";
    const PARSE_AS: ParseAs = ParseAs::Json;

    type Path = ProjectPath;
    type Body = ();
    type Response = Project;
}

/// Dashboard definitions may carry non-finite plot parameters
pub struct GetDashboard;

impl Endpoint for GetDashboard {
    const METHOD: Method = Method::Get;
    const PATH: &'static str = "/api/v2/dashboards/{project_id}";
    const PARSE_AS: ParseAs = ParseAs::ExtendedJson;

    type Path = ProjectPath;
    type Body = ();
    type Response = Dashboard;
}

pub struct LoadSeriesBatch;

impl Endpoint for LoadSeriesBatch {
    const METHOD: Method = Method::Post;
    const PATH: &'static str = "/api/v2/snapshots/{project_id}/data_series_batch";
    const PARSE_AS: ParseAs = ParseAs::ExtendedJson;

    type Path = ProjectPath;
    type Body = BatchMetricDataModel;
    type Response = SeriesResponse;
}
