//! Generic Panel Renderer
//!
//! Owns the fetch lifecycle of one panel and forwards
//! `{data, error, loading}` to the presenter for the panel's kind. The
//! renderer knows nothing about a particular kind's shape.

use tokio::sync::watch;
use tracing::debug;

use super::presentation::{presenter_for, PanelInput};
use crate::api::models::{Panel, SeriesResponse};
use crate::router::{FetchState, LoaderData};
use crate::view::{Node, PanelFrame, PanelStatus};

/// Loaded data that carries panel points
pub trait PanelPoints {
    fn series(&self) -> Option<&SeriesResponse>;
}

impl PanelPoints for SeriesResponse {
    fn series(&self) -> Option<&SeriesResponse> {
        Some(self)
    }
}

type LoadHook = Box<dyn Fn() + Send + Sync>;
type UnmountHook = Box<dyn FnOnce() + Send + Sync>;

enum Source<D> {
    Live {
        load_data: LoadHook,
        state: watch::Receiver<FetchState<D>>,
    },
    /// Materialized data, no loader
    Snapshot(Option<D>),
}

pub struct PanelRenderer<D> {
    panel: Panel,
    source: Source<D>,
    on_unmount: Option<UnmountHook>,
}

impl<D: LoaderData + PanelPoints> PanelRenderer<D> {
    /// Mount a live panel and trigger its first load
    pub fn mount(
        panel: Panel,
        load_data: impl Fn() + Send + Sync + 'static,
        state: watch::Receiver<FetchState<D>>,
        on_unmount: impl FnOnce() + Send + Sync + 'static,
    ) -> Self {
        debug!(panel = %panel.id, kind = %panel.kind(), "Mounting panel");
        load_data();
        Self {
            panel,
            source: Source::Live {
                load_data: Box::new(load_data),
                state,
            },
            on_unmount: Some(Box::new(on_unmount)),
        }
    }

    /// Read-only renderer over already loaded data
    pub fn snapshot(panel: Panel, data: Option<D>) -> Self {
        Self {
            panel,
            source: Source::Snapshot(data),
            on_unmount: None,
        }
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    /// User-initiated re-fetch
    pub fn reload(&self) {
        if let Source::Live { load_data, .. } = &self.source {
            debug!(panel = %self.panel.id, "Reloading panel");
            load_data();
        }
    }

    pub fn state(&self) -> FetchState<D> {
        match &self.source {
            Source::Live { state, .. } => state.borrow().clone(),
            Source::Snapshot(Some(data)) => FetchState::Loaded(data.clone()),
            Source::Snapshot(None) => FetchState::Idle,
        }
    }

    /// Wait until the panel is no longer loading
    pub async fn settled(&self) {
        let Source::Live { state, .. } = &self.source else {
            return;
        };
        let mut state = state.clone();
        loop {
            if !state.borrow_and_update().is_loading() {
                return;
            }
            if state.changed().await.is_err() {
                return;
            }
        }
    }

    pub fn render(&self) -> Node {
        let state = self.state();
        let input = PanelInput {
            data: state.data().and_then(PanelPoints::series),
            error: state.error(),
            loading: state.is_loading(),
        };
        Node::Panel(self.frame(&input))
    }

    fn frame(&self, input: &PanelInput<'_>) -> PanelFrame {
        let status = if input.error.is_some() {
            PanelStatus::Error
        } else if input.loading {
            PanelStatus::Loading
        } else if input.data.is_some() {
            PanelStatus::Loaded
        } else {
            PanelStatus::Idle
        };

        let lines = match input.data {
            Some(series) if input.error.is_none() => {
                presenter_for(self.panel.kind()).present(&self.panel, series)
            }
            _ => Vec::new(),
        };

        PanelFrame {
            id: self.panel.id.clone(),
            title: self.panel.title.clone(),
            subtitle: self.panel.subtitle.clone(),
            kind: self.panel.kind(),
            status,
            lines,
            error: input.error.map(|e| e.to_string()),
        }
    }
}

impl<D> Drop for PanelRenderer<D> {
    fn drop(&mut self) {
        if let Some(on_unmount) = self.on_unmount.take() {
            debug!(panel = %self.panel.id, "Unmounting panel");
            on_unmount();
        }
    }
}
