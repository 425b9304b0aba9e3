//! Domain types for the Menu API.
//!
//! Raw records as returned by the content store, and the public shapes
//! served to API consumers.

mod links;
mod location;
mod menu;
mod menu_item;
mod site;

pub use links::*;
pub use location::*;
pub use menu::*;
pub use menu_item::*;
pub use site::*;
