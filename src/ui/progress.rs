//! Progress indicator for multi-target builds
//!
//! Uses `linya`, which draws to stderr, away from the status lines on stdout.

use linya::{Bar, Progress};

/// One bar counting finished targets
pub struct TargetProgress {
  progress: Progress,
  bar: Bar,
}

impl TargetProgress {
  /// Create a new progress bar over `total` targets
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self { progress, bar }
  }

  /// Mark one more target as built
  pub fn inc(&mut self) {
    self.progress.inc_and_draw(&self.bar, 1);
  }
}
