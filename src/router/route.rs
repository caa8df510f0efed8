//! Route descriptors

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use super::component::Component;
use super::loader::Loader;

/// How a route contributes to the breadcrumb trail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrumbDefinition {
    /// Fixed title
    Title(String),
    /// Value of the named path parameter
    Param(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteHandle {
    pub crumb: Option<CrumbDefinition>,
}

/// One breadcrumb of a matched route chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub title: String,
    pub to: String,
}

/// Shared wrapping injected by decoration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Chrome {
    pub progress: bool,
    pub crumb_trail: bool,
    pub error_boundary: bool,
}

/// Declarative route descriptor
pub struct Route<D> {
    pub(crate) path: String,
    pub(crate) index: bool,
    pub(crate) id: Option<String>,
    pub(crate) loader: Option<Arc<dyn Loader<D>>>,
    pub(crate) component: Option<Arc<dyn Component<D>>>,
    pub(crate) handle: RouteHandle,
    pub(crate) chrome: Chrome,
    pub(crate) children: Vec<Route<D>>,
}

impl<D> Route<D> {
    /// Route matching the relative `path` pattern
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            index: false,
            id: None,
            loader: None,
            component: None,
            handle: RouteHandle::default(),
            chrome: Chrome::default(),
            children: Vec::new(),
        }
    }

    /// Route matching exactly its parent's path
    pub fn index() -> Self {
        Self {
            index: true,
            ..Self::new("")
        }
    }

    pub fn loader(mut self, loader: impl Loader<D> + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    pub fn component(mut self, component: impl Component<D> + 'static) -> Self {
        self.component = Some(Arc::new(component));
        self
    }

    pub fn crumb_title(mut self, title: impl Into<String>) -> Self {
        self.handle.crumb = Some(CrumbDefinition::Title(title.into()));
        self
    }

    pub fn crumb_param(mut self, param: impl Into<String>) -> Self {
        self.handle.crumb = Some(CrumbDefinition::Param(param.into()));
        self
    }

    pub fn children(mut self, children: Vec<Route<D>>) -> Self {
        self.children = children;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_index(&self) -> bool {
        self.index
    }

    /// Full route id, assigned by decoration
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn has_loader(&self) -> bool {
        self.loader.is_some()
    }

    pub fn has_component(&self) -> bool {
        self.component.is_some()
    }

    pub fn handle(&self) -> &RouteHandle {
        &self.handle
    }

    pub fn chrome(&self) -> Chrome {
        self.chrome
    }

    pub fn child_routes(&self) -> &[Route<D>] {
        &self.children
    }
}

impl<D> Clone for Route<D> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            index: self.index,
            id: self.id.clone(),
            loader: self.loader.clone(),
            component: self.component.clone(),
            handle: self.handle.clone(),
            chrome: self.chrome,
            children: self.children.clone(),
        }
    }
}

impl<D> fmt::Debug for Route<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("index", &self.index)
            .field("id", &self.id)
            .field("loader", &self.loader.is_some())
            .field("handle", &self.handle)
            .field("chrome", &self.chrome)
            .field("children", &self.children)
            .finish()
    }
}
