//! Release version discovery from the source-of-truth file
//!
//! The version lives in the application's own source (e.g. a Go constant),
//! declared on a line carrying a marker:
//!
//! ```text
//! const ModuleVersion = "0.1"
//! ```
//!
//! Every line is scanned and the LAST declaration wins. Scanning never stops at
//! the first match, so a file with several declarations resolves to the one
//! closest to the end.

use crate::core::error::{ReleaseResult, VersionError};
use crate::release::target::Version;
use std::path::PathBuf;

const QUOTE: char = '"';

/// Reads the current release version from a designated file
pub struct VersionResolver {
  path: PathBuf,
  marker: String,
}

impl VersionResolver {
  pub fn new(path: impl Into<PathBuf>, marker: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      marker: marker.into(),
    }
  }

  /// Resolve the version declared in the source file
  ///
  /// An unreadable file is reported separately from a readable file that
  /// declares nothing.
  pub fn resolve(&self) -> ReleaseResult<Version> {
    let content = std::fs::read_to_string(&self.path).map_err(|source| VersionError::SourceUnreadable {
      path: self.path.clone(),
      source,
    })?;
    self.resolve_from(&content)
  }

  /// Resolve from already-loaded file content
  pub fn resolve_from(&self, content: &str) -> ReleaseResult<Version> {
    let mut resolved = None;

    for (idx, line) in content.lines().enumerate() {
      let Some(pos) = line.find(&self.marker) else {
        continue;
      };
      let after_marker = &line[pos + self.marker.len()..];
      let version = quoted_value(after_marker)
        .and_then(Version::new)
        .ok_or_else(|| VersionError::Malformed {
          path: self.path.clone(),
          line: idx + 1,
        })?;
      // keep scanning: a later declaration overrides this one
      resolved = Some(version);
    }

    resolved.ok_or_else(|| {
      VersionError::NotFound {
        path: self.path.clone(),
        marker: self.marker.clone(),
      }
      .into()
    })
  }
}

/// Text between the first pair of quotes in `s`
fn quoted_value(s: &str) -> Option<&str> {
  let start = s.find(QUOTE)? + QUOTE.len_utf8();
  let len = s[start..].find(QUOTE)?;
  Some(&s[start..start + len])
}
