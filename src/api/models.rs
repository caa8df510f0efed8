//! API Models
//!
//! Typed request and response bodies of the servequery backend.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::json::ExtValue;

// ============================================================================
// Service
// ============================================================================

/// Version descriptor shown in the home shell header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    pub application: String,
    pub version: String,
    pub commit: String,
}

/// A monitored project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ============================================================================
// Dashboards
// ============================================================================

/// A project dashboard definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub panels: Vec<Panel>,
}

/// One visualizable unit of a dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub size: PanelSize,
    /// Series this panel plots, in legend order
    #[serde(default)]
    pub values: Vec<SeriesRef>,
    pub plot_params: PlotParams,
}

impl Panel {
    pub fn kind(&self) -> PanelKind {
        self.plot_params.plot_type
    }
}

/// Plot settings; only `plot_type` is interpreted by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotParams {
    pub plot_type: PanelKind,
    #[serde(flatten)]
    pub extra: BTreeMap<String, ExtValue>,
}

impl PlotParams {
    pub fn new(plot_type: PanelKind) -> Self {
        Self {
            plot_type,
            extra: BTreeMap::new(),
        }
    }
}

/// Closed set of panel kinds the client knows how to present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelKind {
    Counter,
    Line,
    Bar,
    Pie,
    Text,
    #[serde(other)]
    Unsupported,
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PanelKind::Counter => "counter",
            PanelKind::Line => "line",
            PanelKind::Bar => "bar",
            PanelKind::Pie => "pie",
            PanelKind::Text => "text",
            PanelKind::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelSize {
    #[default]
    Full,
    Half,
}

/// Identifies one time series a panel plots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRef {
    pub metric: String,
    #[serde(default)]
    pub legend: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub metadata: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub metric_labels: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub view_params: Option<BTreeMap<String, ExtValue>>,
}

impl SeriesRef {
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            legend: None,
            tags: None,
            metadata: None,
            metric_labels: None,
            view_params: None,
        }
    }
}

// ============================================================================
// Series points
// ============================================================================

/// Batch request body for panel points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchMetricDataModel {
    pub series_filter: Vec<SeriesFilter>,
}

/// One series filter; every container is always present on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesFilter {
    pub metric: String,
    pub tags: Vec<String>,
    pub metadata: BTreeMap<String, String>,
    pub metric_labels: BTreeMap<String, String>,
}

impl From<&SeriesRef> for SeriesFilter {
    fn from(series: &SeriesRef) -> Self {
        Self {
            metric: series.metric.clone(),
            tags: series.tags.clone().unwrap_or_default(),
            metadata: series.metadata.clone().unwrap_or_default(),
            metric_labels: series.metric_labels.clone().unwrap_or_default(),
        }
    }
}

/// Points for every requested series, aligned with `sources`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesResponse {
    #[serde(default)]
    pub sources: Vec<SeriesSource>,
    #[serde(default)]
    pub series: Vec<SeriesModel>,
}

/// Snapshot a point was computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSource {
    pub snapshot_id: String,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesModel {
    pub metric_type: String,
    /// Index into the request's `series_filter`
    pub filter_index: usize,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    #[serde(default)]
    pub values: Vec<f64>,
}
