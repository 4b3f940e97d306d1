//! Release building
//!
//! - **version**: read the release version from the source-of-truth file
//! - **guard**: refuse to rebuild a version that already has artifacts on disk
//! - **target**: version, target and output-directory types
//! - **compiler**: the external toolchain, behind the [`Compiler`] trait
//! - **orchestrator**: ties the above together for one run
//!
//! Output layout:
//!
//! ```text
//! dist/builds/
//!   scope_capture_0.1.arm64.linux/scope_capture.arm64.linux
//!   scope_capture_0.1.arm64.darwin/scope_capture.arm64.darwin
//! ```

pub mod compiler;
pub mod guard;
pub mod orchestrator;
pub mod target;
pub mod version;

pub use compiler::SubprocessCompiler;
pub use orchestrator::{BuildOrchestrator, BuildReport, RunOutcome};
