//! `release-build` - cross-compile the application for release
//!
//! Builds the primary target, or every configured target with `--all`, into
//! `dist/builds/`. Stops without building if the current version already has
//! artifacts there.

use crate::core::context::ProjectContext;
use crate::core::error::ReleaseResult;
use crate::release::{BuildOrchestrator, BuildReport, RunOutcome, SubprocessCompiler};

/// Run the build command
pub fn run_build(ctx: &ProjectContext, build_all: bool) -> ReleaseResult<()> {
  let compiler_config = &ctx.config.compiler;
  let compiler = SubprocessCompiler::new(
    compiler_config.program.clone(),
    compiler_config.platform_env.clone(),
    compiler_config.arch_env.clone(),
  );

  let mut orchestrator = BuildOrchestrator::new(ctx, compiler);
  match orchestrator.run(build_all)? {
    RunOutcome::AlreadyReleased { version, existing } => {
      let output_root = ctx.output_root();
      for name in &existing {
        println!("   {}", output_root.join(name).display());
      }
      println!("   ({} existing artifact(s) for {})", existing.len(), version);
    }
    RunOutcome::Built(report) => print_summary(&report),
  }

  Ok(())
}

fn print_summary(report: &BuildReport) {
  println!("📦 Release {} ({} target(s))", report.version, report.artifacts.len());
  println!("════════════════════════════════════════");
  println!();
  for artifact in &report.artifacts {
    println!("  {:<16} {}", artifact.target.to_string(), artifact.directory.binary_path().display());
  }
}
