//! Route Loader/Fetcher Registry
//!
//! Maps full route ids to their patterns and loaders. The router asks it for
//! bound loaders during navigation; components ask it for fetchers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

use super::fetcher::Fetcher;
use super::loader::{LoadArgs, LoadError, Loader, LoaderData};
use super::path::PathPattern;
use super::RouterError;

struct RegisteredRoute<D> {
    pattern: PathPattern,
    loader: Option<Arc<dyn Loader<D>>>,
}

pub struct LoaderRegistry<D> {
    routes: HashMap<String, RegisteredRoute<D>>,
    in_flight: Arc<AtomicUsize>,
}

impl<D> Default for LoaderRegistry<D> {
    fn default() -> Self {
        Self {
            routes: HashMap::new(),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl<D: LoaderData> LoaderRegistry<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route under its full id
    pub fn add_route(
        &mut self,
        route_id: impl Into<String>,
        pattern: PathPattern,
        loader: Option<Arc<dyn Loader<D>>>,
    ) -> Result<(), RouterError> {
        let route_id = route_id.into();
        if self.routes.contains_key(&route_id) {
            return Err(RouterError::DuplicateRoute(route_id));
        }
        self.routes
            .insert(route_id, RegisteredRoute { pattern, loader });
        Ok(())
    }

    pub fn contains(&self, route_id: &str) -> bool {
        self.routes.contains_key(route_id)
    }

    /// Full pattern of a registered route
    pub fn pattern(&self, route_id: &str) -> Option<&PathPattern> {
        self.routes.get(route_id).map(|r| &r.pattern)
    }

    fn loader_for(&self, route_id: &str) -> Result<(&PathPattern, Arc<dyn Loader<D>>), RouterError> {
        let route = self
            .routes
            .get(route_id)
            .ok_or_else(|| RouterError::UnknownRoute(route_id.to_string()))?;
        let loader = route
            .loader
            .clone()
            .ok_or_else(|| RouterError::NoLoader(route_id.to_string()))?;
        Ok((&route.pattern, loader))
    }

    /// Callable bound to the route's declared loader
    pub fn register_loader(&self, route_id: &str) -> Result<BoundLoader<D>, RouterError> {
        let (_, loader) = self.loader_for(route_id)?;
        Ok(BoundLoader {
            route_id: route_id.to_string(),
            loader,
        })
    }

    /// New fetcher handle onto the route's loader
    pub fn register_fetcher(&self, route_id: &str) -> Result<Fetcher<D>, RouterError> {
        let (pattern, loader) = self.loader_for(route_id)?;
        debug!(route = route_id, "Registering fetcher");
        Ok(Fetcher::new(
            route_id.to_string(),
            pattern.clone(),
            loader,
            self.in_flight.clone(),
        ))
    }

    /// Fetcher loads currently running across every handle
    pub fn fetchers_in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn in_flight_counter(&self) -> Arc<AtomicUsize> {
        self.in_flight.clone()
    }
}

/// A route's loader, ready to be called with navigation arguments
pub struct BoundLoader<D> {
    route_id: String,
    loader: Arc<dyn Loader<D>>,
}

impl<D: LoaderData> BoundLoader<D> {
    pub fn route_id(&self) -> &str {
        &self.route_id
    }

    pub async fn call(&self, args: LoadArgs) -> Result<D, LoadError> {
        debug!(route = %self.route_id, params = ?args.params, "Running loader");
        self.loader.load(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::fetcher::{FetchRequest, LoadOutcome};
    use crate::router::loader::loader_fn;
    use crate::router::Params;

    fn registry() -> LoaderRegistry<String> {
        let mut registry = LoaderRegistry::new();
        registry
            .add_route(
                "/projects/:projectId",
                PathPattern::parse("/projects/:projectId").unwrap(),
                Some(Arc::new(loader_fn(|args: LoadArgs| async move {
                    Ok::<_, LoadError>(args.param("projectId")?.to_uppercase())
                }))),
            )
            .unwrap();
        registry
            .add_route("/projects", PathPattern::parse("/projects").unwrap(), None)
            .unwrap();
        registry
    }

    #[test]
    fn test_duplicate_route_rejected() {
        let mut registry = registry();
        let err = registry
            .add_route("/projects", PathPattern::parse("/projects").unwrap(), None)
            .unwrap_err();
        assert_eq!(err, RouterError::DuplicateRoute("/projects".to_string()));
    }

    #[test]
    fn test_register_unknown_and_loaderless_routes() {
        let registry = registry();
        assert!(matches!(
            registry.register_loader("/nope"),
            Err(RouterError::UnknownRoute(_))
        ));
        assert!(matches!(
            registry.register_fetcher("/projects"),
            Err(RouterError::NoLoader(_))
        ));
    }

    #[tokio::test]
    async fn test_bound_loader_call() {
        let registry = registry();
        let bound = registry.register_loader("/projects/:projectId").unwrap();
        let mut params = Params::new();
        params.insert("projectId".to_string(), "p1".to_string());

        let data = bound.call(LoadArgs::new(params, Default::default())).await.unwrap();
        assert_eq!(data, "P1");
    }

    #[tokio::test]
    async fn test_fetchers_are_independent() {
        let registry = registry();
        let a = registry.register_fetcher("/projects/:projectId").unwrap();
        let b = registry.register_fetcher("/projects/:projectId").unwrap();

        let mut params = Params::new();
        params.insert("projectId".to_string(), "p1".to_string());
        let ok = a.load(FetchRequest {
            params,
            query: Default::default(),
        });
        let failed = b.load(FetchRequest::default());

        assert_eq!(ok.wait().await, LoadOutcome::Applied);
        assert_eq!(failed.wait().await, LoadOutcome::Failed);
        assert_eq!(a.data().as_deref(), Some("P1"));
        assert!(b.data().is_none());
        assert_eq!(registry.fetchers_in_flight(), 0);
    }
}
