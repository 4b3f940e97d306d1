//! External compiler invocation
//!
//! The compiler is an opaque subprocess: it is launched as
//! `<program> build -o <binary> .` inside the application's source root, with the
//! target selected through two environment variables layered over the inherited
//! environment. Its stdout/stderr stream straight to the terminal.

use crate::core::error::{CompilerError, ReleaseResult};
use crate::release::target::Target;
use std::path::{Path, PathBuf};
use std::process::Command;

/// One compiler invocation for one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
  pub target: Target,
  /// Path the produced binary is written to
  pub output: PathBuf,
  /// Working directory for the compiler
  pub source_root: PathBuf,
}

/// Something that turns a [`CompileRequest`] into a binary
pub trait Compiler {
  /// Compile one target, blocking until the compiler finishes
  ///
  /// Returns an error if the compiler could not be launched or reported failure.
  fn compile(&mut self, request: &CompileRequest) -> ReleaseResult<()>;
}

/// Runs a real toolchain (e.g. `go`) as a child process
#[derive(Debug, Clone)]
pub struct SubprocessCompiler {
  program: String,
  platform_env: String,
  arch_env: String,
}

impl SubprocessCompiler {
  pub fn new(program: impl Into<String>, platform_env: impl Into<String>, arch_env: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      platform_env: platform_env.into(),
      arch_env: arch_env.into(),
    }
  }

  fn args(output: &Path) -> Vec<String> {
    vec![
      "build".to_string(),
      "-o".to_string(),
      output.display().to_string(),
      ".".to_string(),
    ]
  }

  /// Environment overrides for a target, in a stable order
  fn env_overrides<'a>(&'a self, target: &'a Target) -> [(&'a str, &'a str); 2] {
    [
      (self.platform_env.as_str(), target.platform.as_str()),
      (self.arch_env.as_str(), target.arch.as_str()),
    ]
  }

  /// Build the command without running it
  pub fn command(&self, request: &CompileRequest) -> Command {
    let mut cmd = Command::new(&self.program);
    cmd.current_dir(&request.source_root).args(Self::args(&request.output));
    for (key, value) in self.env_overrides(&request.target) {
      cmd.env(key, value);
    }
    cmd
  }

  /// Human-readable echo of what is about to run
  fn describe(&self, request: &CompileRequest) -> String {
    let mut parts = vec![self.program.clone()];
    parts.extend(Self::args(&request.output));
    let env = self
      .env_overrides(&request.target)
      .iter()
      .map(|(k, v)| format!("{}={}", k, v))
      .collect::<Vec<_>>()
      .join(" ");
    format!("RUNNING: \"{}\"\n   WITH ENVIRONMENT MODS: {}", parts.join(" "), env)
  }
}

impl Compiler for SubprocessCompiler {
  fn compile(&mut self, request: &CompileRequest) -> ReleaseResult<()> {
    println!("{}", self.describe(request));

    let status = self
      .command(request)
      .status()
      .map_err(|source| CompilerError::Launch {
        program: self.program.clone(),
        source,
      })?;

    if !status.success() {
      return Err(
        CompilerError::Failed {
          target: request.target.to_string(),
          code: status.code(),
        }
        .into(),
      );
    }

    Ok(())
  }
}
