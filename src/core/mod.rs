//! Core building blocks shared by every command
//!
//! - **config**: release.toml parsing, defaults and validation
//! - **context**: project root plus loaded config, with resolved paths
//! - **error**: error types with help messages and exit codes

pub mod config;
pub mod context;
pub mod error;
