use crate::router::{Component, MountContext, RouterError, View};
use crate::view::Node;

/// Titled project section without data of its own
pub struct SectionPage {
    title: String,
}

impl SectionPage {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl<D> Component<D> for SectionPage {
    fn mount(&self, _ctx: &MountContext<D>) -> Result<Box<dyn View>, RouterError> {
        Ok(Box::new(SectionView(self.title.clone())))
    }
}

struct SectionView(String);

impl View for SectionView {
    fn render(&self, outlet: Node) -> Node {
        Node::Section {
            title: self.0.clone(),
            children: vec![outlet],
        }
    }
}
