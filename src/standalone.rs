//! Standalone dashboards
//!
//! Draws a materialized dashboard into a named element of a [`Document`]
//! without any network access. Panel data comes from the caller, keyed by
//! panel id.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

use crate::api::models::{Dashboard, SeriesResponse};
use crate::panel::PanelRenderer;
use crate::view::Node;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MountError {
    #[error("Mount element not found: {0}")]
    MissingElement(String),
}

/// Named mount points and what is drawn into them
#[derive(Debug, Clone, Default, Serialize)]
pub struct Document {
    elements: BTreeMap<String, Option<Node>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(mut self, id: impl Into<String>) -> Self {
        self.add_element(id);
        self
    }

    /// Add an empty element; an existing one is cleared
    pub fn add_element(&mut self, id: impl Into<String>) {
        self.elements.insert(id.into(), None);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    /// Content drawn into the element, if any
    pub fn element(&self, id: &str) -> Option<&Node> {
        self.elements.get(id).and_then(Option::as_ref)
    }

    fn mount(&mut self, id: &str, node: Node) -> Result<(), MountError> {
        match self.elements.get_mut(id) {
            Some(slot) => {
                *slot = Some(node);
                Ok(())
            }
            None => Err(MountError::MissingElement(id.to_string())),
        }
    }
}

/// Render `dashboard` into the element `mount_id`
///
/// Panels without an entry in `additional_graphs` render as idle.
pub fn draw_dashboard(
    dashboard: &Dashboard,
    additional_graphs: &BTreeMap<String, SeriesResponse>,
    document: &mut Document,
    mount_id: &str,
) -> Result<(), MountError> {
    if !document.contains(mount_id) {
        return Err(MountError::MissingElement(mount_id.to_string()));
    }

    let children = dashboard
        .panels
        .iter()
        .map(|panel| {
            PanelRenderer::snapshot(panel.clone(), additional_graphs.get(&panel.id).cloned())
                .render()
        })
        .collect();

    debug!(mount_id, panels = dashboard.panels.len(), "Drawing dashboard");
    document.mount(
        mount_id,
        Node::Section {
            title: dashboard
                .name
                .clone()
                .unwrap_or_else(|| "Dashboard".to_string()),
            children,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json;
    use crate::view::PanelStatus;

    fn dashboard() -> Dashboard {
        json::from_str(
            r#"{
                "name": "Snapshot",
                "panels": [
                    {"id": "a", "title": "Max", "values": [{"metric": "max"}], "plot_params": {"plot_type": "counter"}},
                    {"id": "b", "title": "Missing", "values": [{"metric": "min"}], "plot_params": {"plot_type": "line"}}
                ]
            }"#,
        )
        .unwrap()
    }

    fn graphs() -> BTreeMap<String, SeriesResponse> {
        let points: SeriesResponse = json::from_str(
            r#"{"sources": [], "series": [{"metric_type": "max", "filter_index": 0, "values": [1, Infinity]}]}"#,
        )
        .unwrap();
        BTreeMap::from([("a".to_string(), points)])
    }

    #[test]
    fn test_draw_into_element() {
        let mut document = Document::new().with_element("dashboard");
        draw_dashboard(&dashboard(), &graphs(), &mut document, "dashboard").unwrap();

        let drawn = document.element("dashboard").unwrap();
        let a = drawn.panel("a").unwrap();
        assert_eq!(a.status, PanelStatus::Loaded);
        assert_eq!(a.lines, vec!["max: Infinity"]);
        assert_eq!(drawn.panel("b").unwrap().status, PanelStatus::Idle);
    }

    #[test]
    fn test_missing_element() {
        let mut document = Document::new().with_element("other");
        let err = draw_dashboard(&dashboard(), &graphs(), &mut document, "dashboard").unwrap_err();
        assert_eq!(err, MountError::MissingElement("dashboard".to_string()));
        assert!(document.element("other").is_none());
    }
}
