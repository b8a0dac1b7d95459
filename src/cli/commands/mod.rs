//! CLI command implementations.

pub mod bible;
pub mod build;
pub mod history;
pub mod init;
pub mod serve;
pub mod template;
