//! # servequery-ui
//!
//! Headless dashboard client for the servequery monitoring service.
//!
//! Routes declare the data they need through loaders; a navigation runs them
//! once and mounts components with the results. Dashboard panels then fetch
//! their own time-series points through a project-scoped fetcher and render
//! through a presenter chosen by panel kind.
//!
//! ## Modules
//!
//! - [`api`]: Typed client for the backend surface
//! - [`json`]: Extended JSON decoding (`NaN`, `Infinity`)
//! - [`router`]: Route table, loaders, fetchers and navigation
//! - [`panel`]: Generic panel renderer and its fetch adapter
//! - [`routes`]: The application's route table
//! - [`standalone`]: Drawing materialized dashboards
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use servequery_ui::{api::ApiClient, config::Config, routes};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_default();
//!     let router = routes::app_router(ApiClient::from_config(&config.api)?)?;
//!
//!     if let Some(navigation) = router.navigate("/projects/p1").await?.committed() {
//!         let page = router.mount(&navigation)?;
//!         page.settled().await;
//!         println!("{}", page.render());
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod context;
pub mod json;
pub mod panel;
pub mod router;
pub mod routes;
pub mod standalone;
pub mod view;

pub use api::{ApiClient, ApiError};
pub use config::{Config, ConfigError};
pub use context::ProjectContext;
pub use router::{Router, RouterError};
pub use routes::{app_router, AppRouter, RouteData};
pub use standalone::{draw_dashboard, Document, MountError};
pub use view::Node;
