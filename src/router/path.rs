//! Path patterns
//!
//! A pattern is an ordered list of literal and `:param` segments. Empty
//! segments are ignored, so `/projects/:projectId/` and
//! `projects/:projectId` are the same pattern.

use std::collections::BTreeMap;
use std::fmt;

use super::RouterError;
use crate::api::decode_component;

/// Named path parameters
pub type Params = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    /// The empty pattern, matching without consuming anything
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(pattern: &str) -> Result<Self, RouterError> {
        let invalid = |reason: &str| RouterError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        for raw in pattern.split('/').filter(|s| !s.is_empty()) {
            match raw.strip_prefix(':') {
                Some("") => return Err(invalid("parameter segment has no name")),
                Some(name) => {
                    if segments
                        .iter()
                        .any(|s| matches!(s, Segment::Param(p) if p == name))
                    {
                        return Err(invalid(&format!("duplicate parameter '{}'", name)));
                    }
                    segments.push(Segment::Param(name.to_string()));
                }
                None => segments.push(Segment::Literal(raw.to_string())),
            }
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Parameter names in declaration order
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Append `child` to this pattern
    pub fn join(&self, child: &PathPattern) -> Result<Self, RouterError> {
        let mut joined = self.clone();
        for segment in &child.segments {
            if let Segment::Param(name) = segment {
                if self.params().any(|p| p == name) {
                    return Err(RouterError::InvalidPattern {
                        pattern: format!("{}{}", self, child),
                        reason: format!("duplicate parameter '{}'", name),
                    });
                }
            }
            joined.segments.push(segment.clone());
        }
        Ok(joined)
    }

    /// Match this pattern against the start of `segments`
    ///
    /// On success, captured parameters (percent-decoded) are added to
    /// `params` and the number of consumed segments is returned.
    pub fn match_prefix(&self, segments: &[&str], params: &mut Params) -> Option<usize> {
        if segments.len() < self.segments.len() {
            return None;
        }

        let mut captured = Vec::new();
        for (pattern, actual) in self.segments.iter().zip(segments) {
            match pattern {
                Segment::Literal(literal) if literal == actual => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => captured.push((name.clone(), decode_component(actual))),
            }
        }

        params.extend(captured);
        Some(self.segments.len())
    }

    /// Substitute `params` into the pattern, producing a concrete path
    pub fn fill(&self, params: &Params) -> Result<String, RouterError> {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Literal(literal) => path.push_str(literal),
                Segment::Param(name) => {
                    let value = params.get(name).ok_or_else(|| RouterError::MissingParam {
                        pattern: self.to_string(),
                        param: name.clone(),
                    })?;
                    path.push_str(&urlencoding::encode(value));
                }
            }
        }
        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => write!(f, "/{}", literal)?,
                Segment::Param(name) => write!(f, "/:{}", name)?,
            }
        }
        Ok(())
    }
}

/// Join a parent route id and a child path into the child's full id
pub(crate) fn join_paths(parent: &str, child: &str) -> String {
    let parent = parent.trim_end_matches('/');
    let child = child.trim_matches('/');
    match (parent.is_empty(), child.is_empty()) {
        (true, true) => "/".to_string(),
        (_, true) => parent.to_string(),
        _ => format!("{}/{}", parent, child),
    }
}

/// Full id of an index route beneath `parent`
pub(crate) fn index_id(parent: &str) -> String {
    format!("{}/?index", parent.trim_end_matches('/'))
}
