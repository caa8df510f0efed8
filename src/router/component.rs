//! Route components

use async_trait::async_trait;
use std::sync::Arc;

use super::registry::LoaderRegistry;
use super::{Params, RouterError};
use crate::api::Query;
use crate::context::ProjectContext;
use crate::view::Node;

/// Everything a component sees when it is mounted
pub struct MountContext<D> {
    pub route_id: String,
    pub params: Params,
    pub query: Query,
    /// Output of this route's loader, if it has one
    pub data: Option<D>,
    /// Context provided by the nearest ancestor
    pub project: ProjectContext,
    pub registry: Arc<LoaderRegistry<D>>,
}

/// Instantiates a route's view for a committed navigation
pub trait Component<D>: Send + Sync {
    fn mount(&self, ctx: &MountContext<D>) -> Result<Box<dyn View>, RouterError>;

    /// Project context handed to descendants
    fn provide(&self, ctx: &MountContext<D>) -> ProjectContext {
        ctx.project.clone()
    }
}

/// A mounted component
#[async_trait]
pub trait View: Send + Sync {
    /// Render around the already rendered descendants
    fn render(&self, outlet: Node) -> Node;

    /// Resolves once every fetch the view started has finished
    async fn settled(&self) {}
}

/// Default component: renders its descendants unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Outlet;

impl<D> Component<D> for Outlet {
    fn mount(&self, _ctx: &MountContext<D>) -> Result<Box<dyn View>, RouterError> {
        Ok(Box::new(Outlet))
    }
}

impl View for Outlet {
    fn render(&self, outlet: Node) -> Node {
        outlet
    }
}

/// Rendered by an error boundary in place of its content
pub(crate) struct ErrorView {
    pub route_id: String,
    pub message: String,
}

impl View for ErrorView {
    fn render(&self, _outlet: Node) -> Node {
        Node::Error {
            route_id: self.route_id.clone(),
            message: self.message.clone(),
        }
    }
}
