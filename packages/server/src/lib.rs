//! Taxonomy HTTP Server Library
//!
//! Exposes the router construction so integration tests can drive the API
//! in-process without binding a socket.

pub mod http;

pub use http::{create_router, AppState};
