//! HTTP API layer for the Menu API.
//!
//! Provides the read-only menu and location endpoints.

pub mod handlers;
mod routes;
mod site;
mod types;

pub use routes::build_router;
