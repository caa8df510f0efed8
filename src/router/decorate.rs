//! Route decoration
//!
//! Decoration is a fixed chain of pure `Route -> Route` stages applied once
//! when the router is built. Top-level routes gain the shared chrome, in
//! this order: progress indicator, breadcrumb trail, error boundary. Every
//! route then gets its full id and a default component.

use std::sync::Arc;

use super::component::Outlet;
use super::path::{index_id, join_paths};
use super::route::Route;

pub fn with_progress<D>(mut route: Route<D>) -> Route<D> {
    route.chrome.progress = true;
    route
}

pub fn with_crumb_trail<D>(mut route: Route<D>) -> Route<D> {
    route.chrome.crumb_trail = true;
    route
}

pub fn with_error_boundary<D>(mut route: Route<D>) -> Route<D> {
    route.chrome.error_boundary = true;
    route
}

/// Wrap a top-level route in the shared chrome
pub fn decorate_top_level_routes<D>(route: Route<D>) -> Route<D> {
    with_error_boundary(with_crumb_trail(with_progress(route)))
}

/// Assign full ids and default components through the whole tree
pub fn decorate_all_routes<D>(route: Route<D>) -> Route<D> {
    assign(route, "")
}

fn assign<D>(mut route: Route<D>, parent_id: &str) -> Route<D> {
    let id = if route.index {
        index_id(parent_id)
    } else {
        join_paths(parent_id, &route.path)
    };

    if route.component.is_none() {
        route.component = Some(Arc::new(Outlet));
    }

    route.children = std::mem::take(&mut route.children)
        .into_iter()
        .map(|child| assign(child, &id))
        .collect();
    route.id = Some(id);
    route
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::route::Chrome;

    fn table() -> Route<()> {
        Route::new("/").children(vec![
            Route::index(),
            Route::new("projects").children(vec![Route::new(":projectId").children(vec![
                Route::index(),
                Route::new("reports"),
            ])]),
        ])
    }

    fn ids(route: &Route<()>, out: &mut Vec<String>) {
        out.push(route.id().unwrap_or("<none>").to_string());
        for child in route.child_routes() {
            ids(child, out);
        }
    }

    #[test]
    fn test_top_level_chrome() {
        let route = decorate_top_level_routes(table());
        assert_eq!(
            route.chrome(),
            Chrome {
                progress: true,
                crumb_trail: true,
                error_boundary: true
            }
        );
        assert_eq!(route.child_routes()[1].chrome(), Chrome::default());
    }

    #[test]
    fn test_full_ids_assigned() {
        let route = decorate_all_routes(decorate_top_level_routes(table()));
        let mut out = Vec::new();
        ids(&route, &mut out);
        assert_eq!(
            out,
            vec![
                "/",
                "/?index",
                "/projects",
                "/projects/:projectId",
                "/projects/:projectId/?index",
                "/projects/:projectId/reports",
            ]
        );
        assert!(route.child_routes()[1].has_component());
    }

    #[test]
    fn test_decoration_is_idempotent() {
        let once = decorate_all_routes(decorate_top_level_routes(table()));
        let twice = decorate_all_routes(decorate_top_level_routes(once.clone()));

        let (mut a, mut b) = (Vec::new(), Vec::new());
        ids(&once, &mut a);
        ids(&twice, &mut b);
        assert_eq!(a, b);
        assert_eq!(once.chrome(), twice.chrome());
        assert_eq!(
            once.child_routes().len(),
            twice.child_routes().len()
        );
    }
}
