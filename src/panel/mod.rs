//! Dashboard panels

pub mod adapter;
pub mod presentation;
pub mod renderer;

pub use adapter::{series_filter, PanelDataFetchAdapter, PANEL_POINTS_ROUTE};
pub use presentation::{format_value, presenter_for, PanelInput, PanelPresenter};
pub use renderer::{PanelPoints, PanelRenderer};
