//! Router
//!
//! Compiles the decorated route table, matches locations, runs loaders and
//! mounts components for committed navigations.

use futures_util::future::join_all;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::component::{Component, ErrorView, MountContext, Outlet, View};
use super::decorate::{decorate_all_routes, decorate_top_level_routes};
use super::loader::{LoadArgs, LoadError, LoaderData};
use super::path::{Params, PathPattern};
use super::registry::{BoundLoader, LoaderRegistry};
use super::route::{Chrome, Crumb, CrumbDefinition, Route};
use super::RouterError;
use crate::api::Query;
use crate::context::ProjectContext;
use crate::view::Node;

/// A parsed `pathname?query` location
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub pathname: String,
    pub query: Query,
}

impl Location {
    /// Parse an href; any `#fragment` is ignored
    pub fn parse(href: &str) -> Self {
        let href = href.split('#').next().unwrap_or_default();
        let (path, query) = href.split_once('?').unwrap_or((href, ""));
        let pathname = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        Self {
            pathname,
            query: Query::parse(query),
        }
    }

    fn segments(&self) -> Vec<&str> {
        self.pathname.split('/').filter(|s| !s.is_empty()).collect()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.query.is_empty() {
            write!(f, "{}", self.pathname)
        } else {
            write!(f, "{}?{}", self.pathname, self.query)
        }
    }
}

/// One route of a matched chain
#[derive(Debug, Clone)]
pub struct RouteMatch<D> {
    pub route_id: String,
    /// Portion of the location matched so far
    pub pathname: String,
    /// Parameters captured up to and including this route
    pub params: Params,
    /// Loader output; unset when the route has no loader or it failed
    pub data: Option<D>,
    pub crumb: Option<Crumb>,
}

#[derive(Debug, Clone)]
pub enum RouteState {
    Ready,
    /// The first failing loader of the chain, root to leaf
    Failed {
        route_id: String,
        error: Arc<LoadError>,
    },
}

/// A committed navigation
#[derive(Debug)]
pub struct Navigation<D> {
    pub location: Location,
    pub matches: Vec<RouteMatch<D>>,
    pub state: RouteState,
}

impl<D> Navigation<D> {
    /// Breadcrumbs of the matched chain, root to leaf
    pub fn crumbs(&self) -> Vec<Crumb> {
        self.matches.iter().filter_map(|m| m.crumb.clone()).collect()
    }

    pub fn leaf(&self) -> Option<&RouteMatch<D>> {
        self.matches.last()
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, RouteState::Failed { .. })
    }

    pub fn route_ids(&self) -> Vec<&str> {
        self.matches.iter().map(|m| m.route_id.as_str()).collect()
    }
}

pub enum NavigationOutcome<D> {
    Committed(Arc<Navigation<D>>),
    /// A newer navigation started before this one finished loading
    Superseded,
}

impl<D> NavigationOutcome<D> {
    pub fn committed(self) -> Option<Arc<Navigation<D>>> {
        match self {
            NavigationOutcome::Committed(nav) => Some(nav),
            NavigationOutcome::Superseded => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationState {
    Idle,
    Loading { location: Location },
}

struct RouteNode {
    id: String,
    pattern: PathPattern,
    index: bool,
    has_loader: bool,
    crumb: Option<CrumbDefinition>,
    children: Vec<RouteNode>,
}

struct MountInfo<D> {
    component: Arc<dyn Component<D>>,
    chrome: Chrome,
}

struct Matched<'a> {
    node: &'a RouteNode,
    params: Params,
    consumed: usize,
}

struct RouterState<D> {
    generation: u64,
    current: Option<Arc<Navigation<D>>>,
}

pub struct Router<D> {
    routes: Vec<RouteNode>,
    mount_info: HashMap<String, MountInfo<D>>,
    registry: Arc<LoaderRegistry<D>>,
    state: Mutex<RouterState<D>>,
    navigation: watch::Sender<NavigationState>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl<D: LoaderData> Router<D> {
    /// Decorate and compile a route table
    pub fn new(routes: Vec<Route<D>>) -> Result<Self, RouterError> {
        let mut registry = LoaderRegistry::new();
        let mut mount_info = HashMap::new();

        let compiled = routes
            .into_iter()
            .map(decorate_top_level_routes)
            .map(decorate_all_routes)
            .map(|route| compile(route, &PathPattern::root(), &mut registry, &mut mount_info))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(routes = mount_info.len(), "Route table compiled");

        let (navigation, _) = watch::channel(NavigationState::Idle);
        Ok(Self {
            routes: compiled,
            mount_info,
            registry: Arc::new(registry),
            state: Mutex::new(RouterState {
                generation: 0,
                current: None,
            }),
            navigation,
        })
    }

    pub fn registry(&self) -> &Arc<LoaderRegistry<D>> {
        &self.registry
    }

    /// The most recently committed navigation
    pub fn current(&self) -> Option<Arc<Navigation<D>>> {
        lock(&self.state).current.clone()
    }

    pub fn navigation_state(&self) -> watch::Receiver<NavigationState> {
        self.navigation.subscribe()
    }

    /// Full ids of every route, depth-first in declaration order
    pub fn route_ids(&self) -> Vec<String> {
        fn collect(nodes: &[RouteNode], out: &mut Vec<String>) {
            for node in nodes {
                out.push(node.id.clone());
                collect(&node.children, out);
            }
        }
        let mut out = Vec::new();
        collect(&self.routes, &mut out);
        out
    }

    /// Match `href` and run every matched loader
    pub async fn navigate(&self, href: &str) -> Result<NavigationOutcome<D>, RouterError> {
        let location = Location::parse(href);
        let segments = location.segments();

        let chain = self
            .routes
            .iter()
            .find_map(|node| match_node(node, &segments, 0, Params::new()))
            .ok_or_else(|| RouterError::NoMatch(location.pathname.clone()))?;

        let loaders = chain
            .iter()
            .map(|m| {
                m.node
                    .has_loader
                    .then(|| self.registry.register_loader(&m.node.id))
                    .transpose()
            })
            .collect::<Result<Vec<Option<BoundLoader<D>>>, _>>()?;

        let generation = {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.generation
        };
        self.navigation.send_replace(NavigationState::Loading {
            location: location.clone(),
        });
        debug!(%location, generation, matched = chain.len(), "Navigation started");

        let results = join_all(chain.iter().zip(&loaders).map(|(m, loader)| {
            let args = LoadArgs::new(m.params.clone(), location.query.clone());
            async move {
                match loader {
                    Some(loader) => loader.call(args).await.map(Some),
                    None => Ok(None),
                }
            }
        }))
        .await;

        let mut route_state = RouteState::Ready;
        let mut matches = Vec::with_capacity(chain.len());
        for (m, result) in chain.iter().zip(results) {
            let data = match result {
                Ok(data) => data,
                Err(e) => {
                    warn!(route = %m.node.id, error = %e, "Loader failed");
                    if let RouteState::Ready = route_state {
                        route_state = RouteState::Failed {
                            route_id: m.node.id.clone(),
                            error: Arc::new(e),
                        };
                    }
                    None
                }
            };

            let pathname = format!("/{}", segments[..m.consumed].join("/"));
            let crumb = m.node.crumb.as_ref().and_then(|def| match def {
                CrumbDefinition::Title(title) => Some(title.clone()),
                CrumbDefinition::Param(name) => m.params.get(name).cloned(),
            });

            matches.push(RouteMatch {
                route_id: m.node.id.clone(),
                crumb: crumb.map(|title| Crumb {
                    title,
                    to: pathname.clone(),
                }),
                pathname,
                params: m.params.clone(),
                data,
            });
        }

        let mut state = lock(&self.state);
        if state.generation != generation {
            debug!(%location, generation, "Navigation superseded");
            return Ok(NavigationOutcome::Superseded);
        }

        let navigation = Arc::new(Navigation {
            location,
            matches,
            state: route_state,
        });
        state.current = Some(navigation.clone());
        self.navigation.send_replace(NavigationState::Idle);
        info!(
            location = %navigation.location,
            failed = navigation.is_failed(),
            "Navigation committed"
        );

        Ok(NavigationOutcome::Committed(navigation))
    }

    /// Mount the components of a committed navigation, root to leaf
    ///
    /// A failed navigation mounts the nearest error boundary at or above the
    /// failing route, which renders the error instead of its content.
    pub fn mount(&self, navigation: &Navigation<D>) -> Result<MountedPage, RouterError> {
        let (mount_upto, failure) = match &navigation.state {
            RouteState::Ready => (navigation.matches.len(), None),
            RouteState::Failed { route_id, error } => {
                let failed_at = navigation
                    .matches
                    .iter()
                    .position(|m| &m.route_id == route_id)
                    .unwrap_or(0);
                let boundary = (0..=failed_at)
                    .rev()
                    .find(|&i| {
                        self.mount_info
                            .get(&navigation.matches[i].route_id)
                            .map(|info| info.chrome.error_boundary)
                            .unwrap_or(false)
                    })
                    .ok_or_else(|| RouterError::Unhandled {
                        route_id: route_id.clone(),
                        message: error.to_string(),
                    })?;
                (boundary, Some((boundary, route_id, error)))
            }
        };

        let mut project = ProjectContext::empty();
        let mut layers = Vec::with_capacity(mount_upto + 1);
        for m in &navigation.matches[..mount_upto] {
            let info = self.info(&m.route_id)?;
            let ctx = MountContext {
                route_id: m.route_id.clone(),
                params: m.params.clone(),
                query: navigation.location.query.clone(),
                data: m.data.clone(),
                project,
                registry: self.registry.clone(),
            };
            let view = info.component.mount(&ctx)?;
            project = info.component.provide(&ctx);
            layers.push(Layer {
                chrome: info.chrome,
                view,
            });
        }

        if let Some((boundary, route_id, error)) = failure {
            let info = self.info(&navigation.matches[boundary].route_id)?;
            layers.push(Layer {
                chrome: info.chrome,
                view: Box::new(ErrorView {
                    route_id: route_id.clone(),
                    message: error.to_string(),
                }),
            });
        }

        Ok(MountedPage {
            layers,
            crumbs: navigation.crumbs(),
            in_flight: self.registry.in_flight_counter(),
            navigation: self.navigation.subscribe(),
        })
    }

    fn info(&self, route_id: &str) -> Result<&MountInfo<D>, RouterError> {
        self.mount_info
            .get(route_id)
            .ok_or_else(|| RouterError::UnknownRoute(route_id.to_string()))
    }
}

fn compile<D: LoaderData>(
    route: Route<D>,
    parent: &PathPattern,
    registry: &mut LoaderRegistry<D>,
    mount_info: &mut HashMap<String, MountInfo<D>>,
) -> Result<RouteNode, RouterError> {
    let pattern = PathPattern::parse(&route.path)?;
    if route.index && !(pattern.is_root() && route.children.is_empty()) {
        return Err(RouterError::InvalidPattern {
            pattern: route.path.clone(),
            reason: "index routes take no path and no children".to_string(),
        });
    }

    let full = parent.join(&pattern)?;
    let id = route.id.clone().unwrap_or_else(|| full.to_string());

    registry.add_route(id.clone(), full.clone(), route.loader.clone())?;
    mount_info.insert(
        id.clone(),
        MountInfo {
            component: route.component.clone().unwrap_or_else(|| Arc::new(Outlet)),
            chrome: route.chrome,
        },
    );

    let children = route
        .children
        .into_iter()
        .map(|child| compile(child, &full, registry, mount_info))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RouteNode {
        id,
        pattern,
        index: route.index,
        has_loader: route.loader.is_some(),
        crumb: route.handle.crumb,
        children,
    })
}

/// Depth-first match in declaration order
///
/// Index routes match only once every segment is consumed. A route whose
/// children do not match is itself the leaf when nothing remains.
fn match_node<'a>(
    node: &'a RouteNode,
    segments: &[&str],
    consumed: usize,
    mut params: Params,
) -> Option<Vec<Matched<'a>>> {
    if node.index {
        return (consumed == segments.len()).then(|| {
            vec![Matched {
                node,
                params,
                consumed,
            }]
        });
    }

    let consumed = consumed + node.pattern.match_prefix(&segments[consumed..], &mut params)?;

    for child in &node.children {
        if let Some(rest) = match_node(child, segments, consumed, params.clone()) {
            let mut chain = vec![Matched {
                node,
                params,
                consumed,
            }];
            chain.extend(rest);
            return Some(chain);
        }
    }

    (consumed == segments.len()).then(|| {
        vec![Matched {
            node,
            params,
            consumed,
        }]
    })
}

struct Layer {
    chrome: Chrome,
    view: Box<dyn View>,
}

/// Components mounted for one navigation
///
/// Dropping the page unmounts every component.
pub struct MountedPage {
    layers: Vec<Layer>,
    crumbs: Vec<Crumb>,
    in_flight: Arc<AtomicUsize>,
    navigation: watch::Receiver<NavigationState>,
}

impl MountedPage {
    /// Render leaf to root, wrapping each layer in its chrome
    pub fn render(&self) -> Node {
        let mut node = Node::Empty;
        for layer in self.layers.iter().rev() {
            node = layer.view.render(node);
            node = self.wrap_chrome(layer.chrome, node);
        }
        node
    }

    fn wrap_chrome(&self, chrome: Chrome, content: Node) -> Node {
        if !chrome.progress && !chrome.crumb_trail {
            return content;
        }

        let mut children = Vec::with_capacity(3);
        if chrome.progress {
            children.push(Node::Progress {
                navigating: matches!(*self.navigation.borrow(), NavigationState::Loading { .. }),
                fetchers: self.in_flight.load(Ordering::SeqCst),
            });
        }
        if chrome.crumb_trail {
            children.push(Node::Crumbs {
                crumbs: self.crumbs.clone(),
            });
        }
        children.push(content);
        Node::Group { children }
    }

    /// Wait until every mounted component has settled its fetches
    pub async fn settled(&self) {
        join_all(self.layers.iter().map(|layer| layer.view.settled())).await;
    }

    pub fn crumbs(&self) -> &[Crumb] {
        &self.crumbs
    }
}
