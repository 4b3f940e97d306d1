use crate::core::error::{ConfigError, ReleaseResult, ResultExt};
use crate::release::target::Target;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for release-build
/// Searched in order: release.toml, .release.toml, .config/release.toml
///
/// Every section is optional; the defaults describe the scope_capture project
/// layout. Loaded once per run and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
  #[serde(default)]
  pub app: AppConfig,
  #[serde(default)]
  pub version: VersionConfig,
  #[serde(default)]
  pub output: OutputConfig,
  #[serde(default)]
  pub compiler: CompilerConfig,
  /// Ordered target list; the first entry is the primary target
  #[serde(default = "default_targets")]
  pub targets: Vec<Target>,
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      app: AppConfig::default(),
      version: VersionConfig::default(),
      output: OutputConfig::default(),
      compiler: CompilerConfig::default(),
      targets: default_targets(),
    }
  }
}

/// The single application being released
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
  #[serde(default = "default_app_name")]
  pub name: String,
  /// Artifact name; falls back to `name`
  #[serde(default)]
  pub output_name: Option<String>,
  /// Compiler working directory (relative to project root)
  #[serde(default = "default_source")]
  pub source: PathBuf,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      name: default_app_name(),
      output_name: None,
      source: default_source(),
    }
  }
}

fn default_app_name() -> String {
  "scope_capture".to_string()
}

fn default_source() -> PathBuf {
  PathBuf::from("cmd").join("scope_capture")
}

/// Where the release version is declared
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionConfig {
  #[serde(default = "default_version_file")]
  pub file: PathBuf,
  #[serde(default = "default_marker")]
  pub marker: String,
}

impl Default for VersionConfig {
  fn default() -> Self {
    Self {
      file: default_version_file(),
      marker: default_marker(),
    }
  }
}

fn default_version_file() -> PathBuf {
  PathBuf::from("pkg").join("moduleconfig").join("moduleconfig.go")
}

fn default_marker() -> String {
  "ModuleVersion".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
  #[serde(default = "default_output_root")]
  pub root: PathBuf,
}

impl Default for OutputConfig {
  fn default() -> Self {
    Self {
      root: default_output_root(),
    }
  }
}

fn default_output_root() -> PathBuf {
  PathBuf::from("dist").join("builds")
}

/// Compiler program and the environment variables that select a target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
  #[serde(default = "default_program")]
  pub program: String,
  #[serde(default = "default_platform_env")]
  pub platform_env: String,
  #[serde(default = "default_arch_env")]
  pub arch_env: String,
}

impl Default for CompilerConfig {
  fn default() -> Self {
    Self {
      program: default_program(),
      platform_env: default_platform_env(),
      arch_env: default_arch_env(),
    }
  }
}

fn default_program() -> String {
  "go".to_string()
}

fn default_platform_env() -> String {
  "GOOS".to_string()
}

fn default_arch_env() -> String {
  "GOARCH".to_string()
}

fn default_targets() -> Vec<Target> {
  vec![Target::new("linux", "arm64"), Target::new("darwin", "arm64")]
}

impl BuildConfig {
  /// Find config file in search order: release.toml, .release.toml, .config/release.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("release.toml"),
      path.join(".release.toml"),
      path.join(".config").join("release.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config for a project root, falling back to defaults when no file exists
  pub fn load(path: &Path) -> ReleaseResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: BuildConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config
      .validate()
      .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    Ok(config)
  }

  /// Name embedded in directory and binary names
  pub fn artifact_name(&self) -> &str {
    self.app.output_name.as_deref().unwrap_or(&self.app.name)
  }

  /// Validate the configuration
  pub fn validate(&self) -> ReleaseResult<()> {
    require_non_empty("app.name", &self.app.name)?;
    require_name_segment("app.output_name", self.artifact_name())?;
    require_non_empty("version.marker", &self.version.marker)?;
    require_non_empty("compiler.program", &self.compiler.program)?;
    require_non_empty("compiler.platform_env", &self.compiler.platform_env)?;
    require_non_empty("compiler.arch_env", &self.compiler.arch_env)?;

    if self.compiler.platform_env == self.compiler.arch_env {
      return Err(
        ConfigError::InvalidField {
          field: "compiler.arch_env".to_string(),
          reason: format!("must differ from compiler.platform_env ('{}')", self.compiler.platform_env),
        }
        .into(),
      );
    }

    if self.targets.is_empty() {
      return Err(ConfigError::NoTargets.into());
    }

    for (i, target) in self.targets.iter().enumerate() {
      require_name_segment(&format!("targets[{}].platform", i), &target.platform)?;
      require_name_segment(&format!("targets[{}].arch", i), &target.arch)?;
    }

    Ok(())
  }
}

fn require_non_empty(field: &str, value: &str) -> ReleaseResult<()> {
  if value.trim().is_empty() {
    return Err(
      ConfigError::InvalidField {
        field: field.to_string(),
        reason: "must not be empty".to_string(),
      }
      .into(),
    );
  }
  Ok(())
}

/// Values that become part of `<app>_<version>.<arch>.<platform>`
fn require_name_segment(field: &str, value: &str) -> ReleaseResult<()> {
  require_non_empty(field, value)?;
  if let Some(c) = value
    .chars()
    .find(|c| matches!(*c, '/' | '\\' | '.') || c.is_whitespace())
  {
    return Err(
      ConfigError::InvalidField {
        field: field.to_string(),
        reason: format!("'{}' contains '{}'", value, c),
      }
      .into(),
    );
  }
  Ok(())
}
