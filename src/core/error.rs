//! Error types for release-build with contextual messages and exit codes
//!
//! Every error carries enough context to tell the operator what to fix, and maps
//! to a distinct process exit code so CI can tell a bad config from a broken build.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for release-build
///
/// A guard abort (version already built) is not an error and exits with 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, missing version declaration)
  User = 1,
  /// System error (I/O, compiler could not be launched)
  System = 2,
  /// Compiler ran and reported failure
  Build = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for release-build
#[derive(Debug)]
pub enum ReleaseError {
  /// Configuration errors (release.toml)
  Config(ConfigError),

  /// Version resolution errors
  Version(VersionError),

  /// Compiler invocation errors
  Compiler(CompilerError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ReleaseError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Add context to an existing error
  ///
  /// I/O errors stay I/O errors (and keep their exit code); other structured
  /// errors are folded into a message.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ReleaseError::Message { message, context, help } => ReleaseError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ReleaseError::Io(e) => ReleaseError::Io(io::Error::new(e.kind(), format!("{}: {}", ctx_str, e))),
      other => {
        let help = other.help_message();
        ReleaseError::Message {
          message: ctx_str,
          context: Some(other.to_string()),
          help,
        }
      }
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ReleaseError::Config(_) => ExitCode::User,
      ReleaseError::Version(VersionError::SourceUnreadable { .. }) => ExitCode::System,
      ReleaseError::Version(_) => ExitCode::User,
      ReleaseError::Compiler(CompilerError::Launch { .. }) => ExitCode::System,
      ReleaseError::Compiler(CompilerError::Failed { .. }) => ExitCode::Build,
      ReleaseError::Io(_) => ExitCode::System,
      ReleaseError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::Config(e) => e.help_message(),
      ReleaseError::Version(e) => e.help_message(),
      ReleaseError::Compiler(e) => e.help_message(),
      ReleaseError::Message { help, .. } => help.clone(),
      ReleaseError::Io(_) => None,
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::Config(e) => write!(f, "{}", e),
      ReleaseError::Version(e) => write!(f, "{}", e),
      ReleaseError::Compiler(e) => write!(f, "{}", e),
      ReleaseError::Io(e) => write!(f, "I/O error: {}", e),
      ReleaseError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ReleaseError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ReleaseError::Io(e) => Some(e),
      ReleaseError::Version(VersionError::SourceUnreadable { source, .. }) => Some(source),
      ReleaseError::Compiler(CompilerError::Launch { source, .. }) => Some(source),
      _ => None,
    }
  }
}

impl From<io::Error> for ReleaseError {
  fn from(err: io::Error) -> Self {
    ReleaseError::Io(err)
  }
}

impl From<String> for ReleaseError {
  fn from(msg: String) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<&str> for ReleaseError {
  fn from(msg: &str) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<toml_edit::de::Error> for ReleaseError {
  fn from(err: toml_edit::de::Error) -> Self {
    ReleaseError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<ConfigError> for ReleaseError {
  fn from(err: ConfigError) -> Self {
    ReleaseError::Config(err)
  }
}

impl From<VersionError> for ReleaseError {
  fn from(err: VersionError) -> Self {
    ReleaseError::Version(err)
  }
}

impl From<CompilerError> for ReleaseError {
  fn from(err: CompilerError) -> Self {
    ReleaseError::Compiler(err)
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// No targets configured
  NoTargets,

  /// A field is empty or holds a value that would break artifact naming
  InvalidField { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NoTargets => Some(
        "Add at least one target to release.toml:\n  [[targets]]\n  platform = \"linux\"\n  arch = \"arm64\"".to_string(),
      ),
      ConfigError::InvalidField { field, .. } => Some(format!("Fix `{}` in release.toml.", field)),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NoTargets => write!(f, "No build targets configured"),
      ConfigError::InvalidField { field, reason } => {
        write!(f, "Invalid config value for `{}`: {}", field, reason)
      }
    }
  }
}

/// Version resolution errors
#[derive(Debug)]
pub enum VersionError {
  /// The source-of-truth file is missing or unreadable
  SourceUnreadable { path: PathBuf, source: io::Error },

  /// File is readable but no line declares the version
  NotFound { path: PathBuf, marker: String },

  /// A declaration line carries no usable quoted value (missing, empty, or not a
  /// single path component)
  Malformed { path: PathBuf, line: usize },
}

impl VersionError {
  fn help_message(&self) -> Option<String> {
    match self {
      VersionError::SourceUnreadable { path, .. } => Some(format!(
        "Check that {} exists, or point `version.file` in release.toml at the right file.",
        path.display()
      )),
      VersionError::NotFound { marker, .. } => Some(format!(
        "Declare the version on a line containing `{}` with the value in double quotes, e.g. {} = \"0.1\"",
        marker, marker
      )),
      VersionError::Malformed { .. } => Some(
        "The version value must be a non-empty double-quoted string without `/`, `\\` or `..`.".to_string(),
      ),
    }
  }
}

impl fmt::Display for VersionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VersionError::SourceUnreadable { path, source } => {
        write!(f, "Failed to read version source {}: {}", path.display(), source)
      }
      VersionError::NotFound { path, .. } => {
        write!(f, "Version not found in \"{}\".", path.display())
      }
      VersionError::Malformed { path, line } => {
        write!(f, "Malformed version declaration at {}:{}", path.display(), line)
      }
    }
  }
}

/// Compiler invocation errors
#[derive(Debug)]
pub enum CompilerError {
  /// The compiler process could not be started
  Launch { program: String, source: io::Error },

  /// The compiler exited unsuccessfully for a target
  Failed { target: String, code: Option<i32> },
}

impl CompilerError {
  fn help_message(&self) -> Option<String> {
    match self {
      CompilerError::Launch { program, .. } => Some(format!(
        "Make sure `{}` is installed and on PATH, or set `compiler.program` in release.toml.",
        program
      )),
      CompilerError::Failed { .. } => Some(
        "Directories created so far were left in place. Remove them before re-running, the version guard will otherwise block the rebuild.".to_string(),
      ),
    }
  }
}

impl fmt::Display for CompilerError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CompilerError::Launch { program, source } => {
        write!(f, "Failed to launch compiler `{}`: {}", program, source)
      }
      CompilerError::Failed { target, code: Some(code) } => {
        write!(f, "Compiler failed for {} with exit code {}", target, code)
      }
      CompilerError::Failed { target, code: None } => {
        write!(f, "Compiler for {} was terminated by a signal", target)
      }
    }
  }
}

/// Result type alias for release-build
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ReleaseError>,
{
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ReleaseError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
