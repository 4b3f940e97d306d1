//! Project context - build once in main, pass everywhere
//!
//! Holds the project root and the loaded [`BuildConfig`], and resolves the
//! config's relative paths against the root so no other module has to.

use crate::core::config::BuildConfig;
use crate::core::error::ReleaseResult;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ProjectContext {
  /// Project root directory
  pub root: PathBuf,

  /// Release configuration (release.toml or defaults)
  pub config: BuildConfig,
}

impl ProjectContext {
  /// Load the configuration for a project root
  pub fn build(project_root: &Path) -> ReleaseResult<Self> {
    let config = BuildConfig::load(project_root)?;
    Ok(Self::with_config(project_root, config))
  }

  /// Use an already-constructed configuration
  pub fn with_config(project_root: &Path, config: BuildConfig) -> Self {
    Self {
      root: project_root.to_path_buf(),
      config,
    }
  }

  /// File the release version is read from
  pub fn version_file(&self) -> PathBuf {
    self.root.join(&self.config.version.file)
  }

  /// Directory that holds one subdirectory per built target
  pub fn output_root(&self) -> PathBuf {
    self.root.join(&self.config.output.root)
  }

  /// Compiler working directory
  pub fn source_root(&self) -> PathBuf {
    self.root.join(&self.config.app.source)
  }
}
