//! Storage layer for the Menu API.
//!
//! Defines the content store interface and provides an SQLx/SQLite
//! implementation with a JSON fixture seeder.

mod content_store;
mod models;
mod repository;
mod seed;

pub use content_store::ContentStore;
pub use repository::MenuRepository;
pub use seed::Fixture;
