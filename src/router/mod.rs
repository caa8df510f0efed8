//! Route-scoped data loading
//!
//! Routes declare the data they need through loaders. Navigation matches a
//! location against the decorated route table, runs the matched loaders
//! once and mounts components with their results. Mounted components can
//! re-run a route's loader on demand through a [`Fetcher`].

mod component;
pub mod decorate;
mod error;
mod fetcher;
mod loader;
mod navigator;
mod path;
mod registry;
mod route;

pub use component::{Component, MountContext, Outlet, View};
pub use decorate::{decorate_all_routes, decorate_top_level_routes};
pub use error::RouterError;
pub use fetcher::{FetchRequest, FetchState, Fetcher, LoadOutcome, PendingLoad};
pub use loader::{loader_fn, FnLoader, LoadArgs, LoadError, Loader, LoaderData};
pub use navigator::{
    Location, MountedPage, Navigation, NavigationOutcome, NavigationState, RouteMatch,
    RouteState, Router,
};
pub use path::{Params, PathPattern, Segment};
pub use registry::{BoundLoader, LoaderRegistry};
pub use route::{Chrome, Crumb, CrumbDefinition, Route, RouteHandle};
