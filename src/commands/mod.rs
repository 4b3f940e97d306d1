//! CLI command implementations
//!
//! - **build**: cross-compile the application for the primary target, or all targets

pub mod build;

pub use build::run_build;
