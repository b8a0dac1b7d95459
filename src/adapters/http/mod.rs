//! HTTP API adapter.

pub mod api_http;

pub use api_http::{ApiHttpConfig, ApiHttpServer, ErrorResponse};
