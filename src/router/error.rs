//! Router Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouterError {
    #[error("Invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Duplicate route id: {0}")]
    DuplicateRoute(String),

    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    #[error("Route has no loader: {0}")]
    NoLoader(String),

    #[error("No route matches: {0}")]
    NoMatch(String),

    #[error("Missing parameter '{param}' for pattern '{pattern}'")]
    MissingParam { pattern: String, param: String },

    /// A component failed to mount
    #[error("Route {route_id} failed: {message}")]
    Unhandled { route_id: String, message: String },

    #[error("Failed to encode request: {0}")]
    Encode(String),
}
