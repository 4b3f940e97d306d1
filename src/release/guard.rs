//! Version-level lock over the build output root
//!
//! The filesystem is the record of what shipped: if any immediate child of the
//! output root names a version, that version counts as released and must not be
//! rebuilt until the operator removes the old artifacts. This is deliberately
//! coarse. It does not know which targets were built, so a partially built
//! version blocks too.

use crate::core::error::{ReleaseResult, ResultExt};
use crate::release::target::Version;
use std::path::PathBuf;

/// Read-only existence check for released versions
pub struct ReleaseGuard {
  output_root: PathBuf,
}

impl ReleaseGuard {
  pub fn new(output_root: impl Into<PathBuf>) -> Self {
    Self {
      output_root: output_root.into(),
    }
  }

  /// True if any artifact for `version` is already present
  pub fn exists(&self, version: &Version) -> ReleaseResult<bool> {
    Ok(!self.existing(version)?.is_empty())
  }

  /// Names of entries under the output root that belong to `version`, sorted
  ///
  /// Listed fresh on every call. A missing output root means nothing was released.
  pub fn existing(&self, version: &Version) -> ReleaseResult<Vec<String>> {
    if !self.output_root.exists() {
      return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(&self.output_root)
      .with_context(|| format!("Failed to list {}", self.output_root.display()))?;

    let mut matches = Vec::new();
    for entry in entries {
      let entry = entry.context("Failed to read output root entry")?;
      let name = entry.file_name().to_string_lossy().into_owned();
      if names_version(&name, version) {
        matches.push(name);
      }
    }
    matches.sort();
    Ok(matches)
  }
}

/// Whether an output entry name belongs to `version`
///
/// Accepts `*_<version>_*` as well as the `<app>_<version>.<arch>.<platform>`
/// layout this tool writes. The layout match requires exactly two dot-free
/// segments after the version so that `app_1.0.1.arm64.linux` does not claim 1.0.
fn names_version(name: &str, version: &Version) -> bool {
  let version = version.as_str();

  if name.contains(&format!("_{}_", version)) {
    return true;
  }

  let prefix = format!("_{}.", version);
  name.match_indices(&prefix).any(|(idx, _)| {
    let tail = &name[idx + prefix.len()..];
    let segments: Vec<&str> = tail.split('.').collect();
    segments.len() == 2 && segments.iter().all(|s| !s.is_empty())
  })
}
