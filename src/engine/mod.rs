//! Menu engine.
//!
//! This module contains the read pipeline:
//! - Tree Builder: rebuilds parent/child hierarchy from flat items
//! - Response Shaper: maps store records to public payloads
//! - Hooks: caller-supplied payload transformations
//! - Menu Service: read-through orchestration over store and cache

mod hooks;
mod service;
mod shaper;
mod tree;

pub use hooks::*;
pub use service::*;
pub use shaper::*;
pub use tree::*;
