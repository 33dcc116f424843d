//! # HTTP Server Module
//!
//! axum server exposing the search engine.
//!
//! # Endpoints
//!
//! - `GET /search` - Paged, grouped search
//! - `GET /health` - Health check
//! - `GET /metrics` - Counters as JSON
//! - `POST /admin/materialize` - Rebuild section paths now

mod admin_routes;
mod errors;
mod observability_routes;
mod search_routes;
mod state;

pub mod config;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ErrorResponse, RestError, RestResult};
pub use search_routes::{SearchParams, SearchReply};
pub use server::HttpServer;
pub use state::AppState;
