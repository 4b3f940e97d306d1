//! Release build orchestration
//!
//! One run walks a fixed sequence:
//!
//! ```text
//! resolve version -> check guard -> { abort | build target 1 .. target N -> done }
//! ```
//!
//! Targets are built one at a time, each compiler process is waited on before the
//! next starts. The first failing target stops the run. Nothing is rolled back:
//! directories created so far stay on disk, and the guard will then block a retry
//! of the same version until they are removed by hand.

use crate::core::context::ProjectContext;
use crate::core::error::{ReleaseResult, ResultExt};
use crate::release::compiler::{CompileRequest, Compiler};
use crate::release::guard::ReleaseGuard;
use crate::release::target::{BuildDirectory, Target, Version};
use crate::release::version::VersionResolver;
use crate::ui::TargetProgress;
use std::path::PathBuf;

/// A target that compiled successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltArtifact {
  pub target: Target,
  pub directory: BuildDirectory,
}

/// Everything produced by a completed run
#[derive(Debug, Clone)]
pub struct BuildReport {
  pub version: Version,
  pub artifacts: Vec<BuiltArtifact>,
}

/// How a run ended without error
#[derive(Debug, Clone)]
pub enum RunOutcome {
  /// Artifacts for the version already exist; nothing was built
  AlreadyReleased { version: Version, existing: Vec<String> },
  /// All selected targets were built
  Built(BuildReport),
}

/// Drives version resolution, the release guard and the compiler
pub struct BuildOrchestrator<C: Compiler> {
  app: String,
  targets: Vec<Target>,
  output_root: PathBuf,
  source_root: PathBuf,
  resolver: VersionResolver,
  guard: ReleaseGuard,
  compiler: C,
}

impl<C: Compiler> BuildOrchestrator<C> {
  /// Set up an orchestrator from a loaded project
  pub fn new(ctx: &ProjectContext, compiler: C) -> Self {
    let config = &ctx.config;
    let output_root = ctx.output_root();
    Self {
      app: config.artifact_name().to_string(),
      targets: config.targets.clone(),
      resolver: VersionResolver::new(ctx.version_file(), config.version.marker.clone()),
      guard: ReleaseGuard::new(output_root.clone()),
      output_root,
      source_root: ctx.source_root(),
      compiler,
    }
  }

  #[cfg(test)]
  pub fn compiler(&self) -> &C {
    &self.compiler
  }

  /// Targets a run would build
  pub fn select_targets(&self, build_all: bool) -> &[Target] {
    if build_all {
      &self.targets
    } else {
      &self.targets[..self.targets.len().min(1)]
    }
  }

  /// Run a release build
  ///
  /// With `build_all` unset only the primary (first) target is built.
  pub fn run(&mut self, build_all: bool) -> ReleaseResult<RunOutcome> {
    let version = self.resolver.resolve()?;
    println!("📦 Building \"{}\" version \"{}\"...", self.app, version);

    if self.guard.exists(&version)? {
      let existing = self.guard.existing(&version)?;
      println!(
        "🔴 STOPPING. Builds already exist for version \"{}\". If you want to overwrite them then you must delete them first.",
        version
      );
      return Ok(RunOutcome::AlreadyReleased { version, existing });
    }

    let targets = self.select_targets(build_all).to_vec();
    let mut progress = (targets.len() > 1).then(|| TargetProgress::new(targets.len(), "Targets"));

    let mut artifacts = Vec::with_capacity(targets.len());
    for (i, target) in targets.iter().enumerate() {
      println!("\n🔨 [{}/{}] {}", i + 1, targets.len(), target);
      let artifact = self.build_target(&version, target)?;
      println!("✅ {}", artifact.directory.binary_path().display());
      artifacts.push(artifact);
      if let Some(progress) = progress.as_mut() {
        progress.inc();
      }
    }

    Ok(RunOutcome::Built(BuildReport { version, artifacts }))
  }

  /// Create the output directory for one target and compile into it
  pub fn build_target(&mut self, version: &Version, target: &Target) -> ReleaseResult<BuiltArtifact> {
    let directory = BuildDirectory::new(&self.output_root, &self.app, version, target);
    directory
      .ensure()
      .with_context(|| format!("Failed to create {}", directory.path().display()))?;

    let request = CompileRequest {
      target: target.clone(),
      output: directory.binary_path().to_path_buf(),
      source_root: self.source_root.clone(),
    };
    self.compiler.compile(&request)?;

    Ok(BuiltArtifact {
      target: target.clone(),
      directory,
    })
  }
}
