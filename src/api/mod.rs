//! HTTP API surface.

pub mod handlers;

pub use handlers::AppState;
