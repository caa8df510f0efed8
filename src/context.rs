//! Project Context
//!
//! The active project is an explicit value threaded from the project layout
//! route down to its descendants while mounting. Outside a project scope the
//! context is empty.

use std::sync::Arc;

use crate::api::models::Project;

#[derive(Debug, Clone, Default)]
pub struct ProjectContext {
    project: Option<Arc<Project>>,
}

impl ProjectContext {
    /// Context outside any project scope
    pub fn empty() -> Self {
        Self::default()
    }

    /// Context scoped to `project`
    pub fn scoped(project: Arc<Project>) -> Self {
        Self {
            project: Some(project),
        }
    }

    pub fn project(&self) -> Option<&Arc<Project>> {
        self.project.as_ref()
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project.as_deref().map(|p| p.id.as_str())
    }

    /// The active project
    ///
    /// # Panics
    ///
    /// Panics if called outside a project scope. Components that need a
    /// project must only be mounted beneath the project layout route.
    #[track_caller]
    pub fn expect_project(&self) -> &Arc<Project> {
        match &self.project {
            Some(project) => project,
            None => panic!("ProjectContext not found: component mounted outside a project route"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str) -> Arc<Project> {
        Arc::new(Project {
            id: id.to_string(),
            name: format!("Project {}", id),
            description: None,
        })
    }

    #[test]
    fn test_scoped_context() {
        let ctx = ProjectContext::scoped(project("p1"));
        assert_eq!(ctx.project_id(), Some("p1"));
        assert_eq!(ctx.expect_project().name, "Project p1");
    }

    #[test]
    fn test_empty_context() {
        let ctx = ProjectContext::empty();
        assert!(ctx.project().is_none());
        assert!(ctx.project_id().is_none());
    }

    #[test]
    #[should_panic(expected = "ProjectContext not found")]
    fn test_expect_project_outside_scope_panics() {
        ProjectContext::empty().expect_project();
    }
}
