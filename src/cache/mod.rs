//! Read-through cache for shaped payloads.
//!
//! Entries are keyed by (site, resource kind, resource id) and expire
//! after a fixed TTL. Nothing on the read path invalidates early.

mod key;
mod store;

pub use key::*;
pub use store::*;
