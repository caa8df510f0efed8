//! Rendered output
//!
//! Components render into a small serializable tree. The CLI prints it as
//! indented text or JSON; tests inspect it directly.

use serde::Serialize;
use std::fmt;

use crate::api::models::PanelKind;
use crate::router::Crumb;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    Empty,
    Text {
        text: String,
    },
    Header {
        application: String,
        version: String,
    },
    Section {
        title: String,
        children: Vec<Node>,
    },
    Group {
        children: Vec<Node>,
    },
    List {
        items: Vec<String>,
    },
    /// Navigation and fetch activity
    Progress {
        navigating: bool,
        fetchers: usize,
    },
    Crumbs {
        crumbs: Vec<Crumb>,
    },
    Panel(PanelFrame),
    /// Rendered by an error boundary in place of the failed content
    Error {
        route_id: String,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelStatus {
    Idle,
    Loading,
    Loaded,
    Error,
}

/// Output of one panel renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelFrame {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub kind: PanelKind,
    pub status: PanelStatus,
    pub lines: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    fn children(&self) -> &[Node] {
        match self {
            Node::Section { children, .. } | Node::Group { children } => children,
            _ => &[],
        }
    }

    /// Visit this node and its descendants depth-first
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Every panel frame in the tree, in render order
    pub fn panels(&self) -> Vec<&PanelFrame> {
        let mut panels = Vec::new();
        self.walk(&mut |node| {
            if let Node::Panel(frame) = node {
                panels.push(frame);
            }
        });
        panels
    }

    pub fn panel(&self, id: &str) -> Option<&PanelFrame> {
        self.panels().into_iter().find(|p| p.id == id)
    }

    /// First error node in the tree
    pub fn error(&self) -> Option<(&str, &str)> {
        let mut found = None;
        self.walk(&mut |node| {
            if let Node::Error { route_id, message } = node {
                found.get_or_insert((route_id.as_str(), message.as_str()));
            }
        });
        found
    }

    pub fn crumbs(&self) -> Option<&[Crumb]> {
        let mut found = None;
        self.walk(&mut |node| {
            if let Node::Crumbs { crumbs } = node {
                found.get_or_insert(crumbs.as_slice());
            }
        });
        found
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            Node::Empty => Ok(()),
            Node::Text { text } => writeln!(f, "{}{}", pad, text),
            Node::Header {
                application,
                version,
            } => writeln!(f, "{}{} v{}", pad, application, version),
            Node::Section { title, children } => {
                writeln!(f, "{}# {}", pad, title)?;
                for child in children {
                    child.write_indented(f, depth + 1)?;
                }
                Ok(())
            }
            Node::Group { children } => {
                for child in children {
                    child.write_indented(f, depth)?;
                }
                Ok(())
            }
            Node::List { items } => {
                for item in items {
                    writeln!(f, "{}- {}", pad, item)?;
                }
                Ok(())
            }
            Node::Progress {
                navigating,
                fetchers,
            } => {
                if *navigating || *fetchers > 0 {
                    writeln!(f, "{}[loading: {} fetch(es) in flight]", pad, fetchers)
                } else {
                    Ok(())
                }
            }
            Node::Crumbs { crumbs } => {
                let trail: Vec<&str> = crumbs.iter().map(|c| c.title.as_str()).collect();
                writeln!(f, "{}{}", pad, trail.join(" > "))
            }
            Node::Panel(frame) => {
                writeln!(f, "{}[{}] {} ({:?})", pad, frame.kind, frame.title, frame.status)?;
                if let Some(subtitle) = &frame.subtitle {
                    writeln!(f, "{}  {}", pad, subtitle)?;
                }
                for line in &frame.lines {
                    writeln!(f, "{}  {}", pad, line)?;
                }
                if let Some(error) = &frame.error {
                    writeln!(f, "{}  error: {}", pad, error)?;
                }
                Ok(())
            }
            Node::Error { route_id, message } => {
                writeln!(f, "{}error in {}: {}", pad, route_id, message)
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
