//! Infrastructure adapters for external systems.

pub mod deck;
pub mod fetch;
pub mod http;
pub mod sqlite;
