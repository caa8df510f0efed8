//! Typed API Client
//!
//! Single point of truth for talking to the servequery backend.

mod client;
pub mod endpoints;
mod error;
pub mod models;
mod query;
pub mod transport;

pub use client::{parse_response, ApiClient};
pub use endpoints::{Endpoint, NoParams, ParseAs, ProjectPath};
pub use error::ApiError;
pub use query::Query;
pub(crate) use query::decode_component;
pub use transport::{HttpRequest, HttpTransport, Method, RawResponse, Transport};
