//! Release identity types: versions, targets and their output locations
//!
//! Output layout under the output root:
//!
//! ```text
//! <output_root>/<app>_<version>.<arch>.<platform>/<app>.<arch>.<platform>
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Release version token, e.g. "0.1"
///
/// Opaque: no semver parsing, compared and embedded as-is. Never empty, and
/// always a single path component once embedded in a directory name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
  /// Wrap a version token
  ///
  /// Rejects empty tokens and tokens that would escape or nest inside the
  /// output root (`/`, `\`, `..`, control characters).
  pub fn new(token: impl Into<String>) -> Option<Self> {
    let token = token.into();
    let unsafe_char = token.chars().any(|c| matches!(c, '/' | '\\') || c.is_control());
    if token.is_empty() || unsafe_char || token.contains("..") {
      None
    } else {
      Some(Self(token))
    }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Version {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// A (platform, architecture) pair a binary is compiled for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
  /// Platform identifier handed to the compiler (e.g. "linux", "darwin")
  pub platform: String,
  /// Architecture identifier handed to the compiler (e.g. "arm64", "amd64")
  pub arch: String,
}

impl Target {
  pub fn new(platform: impl Into<String>, arch: impl Into<String>) -> Self {
    Self {
      platform: platform.into(),
      arch: arch.into(),
    }
  }

  /// `<arch>.<platform>` suffix shared by directory and binary names
  pub fn suffix(&self) -> String {
    format!("{}.{}", self.arch, self.platform)
  }
}

impl fmt::Display for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.platform, self.arch)
  }
}

/// Output directory for one (app, version, target) combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDirectory {
  path: PathBuf,
  binary: PathBuf,
}

impl BuildDirectory {
  /// Compute the directory for a target under the output root
  ///
  /// Pure path arithmetic; nothing is created here.
  pub fn new(output_root: &Path, app: &str, version: &Version, target: &Target) -> Self {
    let path = output_root.join(Self::dir_name(app, version, target));
    let binary = path.join(format!("{}.{}", app, target.suffix()));
    Self { path, binary }
  }

  /// `<app>_<version>.<arch>.<platform>`
  pub fn dir_name(app: &str, version: &Version, target: &Target) -> String {
    format!("{}_{}.{}", app, version, target.suffix())
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Where the compiler is told to write the binary
  pub fn binary_path(&self) -> &Path {
    &self.binary
  }

  /// Create the directory and any missing parents
  ///
  /// Succeeds when the directory already exists; existing contents are untouched.
  pub fn ensure(&self) -> std::io::Result<()> {
    std::fs::create_dir_all(&self.path)
  }
}
