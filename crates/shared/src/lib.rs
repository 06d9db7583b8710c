//! Wire contract shared between the travel buddy server and its clients.
//!
//! Every type here serializes to the camelCase JSON shape the mobile apps
//! consume. Storage concerns (snake_case rows, JSON-encoded columns) never
//! appear in this crate.

mod api;
mod models;

pub use api::*;
pub use models::*;
