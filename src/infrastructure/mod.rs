//! Infrastructure layer module
//!
//! Process-level concerns that sit outside the domain:
//! - Configuration management
//! - Logging infrastructure
//! - Project setup (`init`)

pub mod config;
pub mod logging;
pub mod setup;
