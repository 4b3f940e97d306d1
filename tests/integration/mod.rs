//! Integration tests for release-build
//!
//! Each test runs the real binary inside a temporary project that uses a fake
//! compiler script, so no Go toolchain is needed.

mod helpers;
mod test_build;
