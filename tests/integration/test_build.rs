//! Integration tests for the `release-build` command
#![cfg(unix)]

use crate::helpers::{TestProject, run_release_build, run_release_build_ok};
use anyhow::Result;

const TARGETS: &[(&str, &str)] = &[("linux", "arm64"), ("darwin", "arm64")];

#[test]
fn test_builds_primary_target_only_by_default() -> Result<()> {
  let project = TestProject::new("0.1")?;
  project.install_fake_compiler(TARGETS, None)?;

  let output = run_release_build_ok(&project.path, &[])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("Building \"scope_capture\" version \"0.1\""));

  let calls = project.compiler_calls()?;
  assert_eq!(calls.len(), 1, "expected one compiler call, got {:?}", calls);
  assert!(calls[0].starts_with("linux arm64 "));
  assert!(calls[0].contains("cmd/scope_capture"));

  let binary = "dist/builds/scope_capture_0.1.arm64.linux/scope_capture.arm64.linux";
  assert!(project.file_exists(binary));
  assert_eq!(project.read_file(binary)?, "stub linux/arm64\n");
  assert!(!project.file_exists("dist/builds/scope_capture_0.1.arm64.darwin"));

  Ok(())
}

#[test]
fn test_all_flag_builds_every_target() -> Result<()> {
  let project = TestProject::new("0.1")?;
  project.install_fake_compiler(TARGETS, None)?;

  let output = run_release_build_ok(&project.path, &["--all"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("📦 Release 0.1 (2 target(s))\n════"));

  let calls = project.compiler_calls()?;
  assert_eq!(calls.len(), 2);
  assert!(calls[0].starts_with("linux arm64 "));
  assert!(calls[0].ends_with("scope_capture_0.1.arm64.linux/scope_capture.arm64.linux"));
  assert!(calls[1].starts_with("darwin arm64 "));
  assert!(calls[1].ends_with("scope_capture_0.1.arm64.darwin/scope_capture.arm64.darwin"));

  assert_eq!(
    project.read_file("dist/builds/scope_capture_0.1.arm64.darwin/scope_capture.arm64.darwin")?,
    "stub darwin/arm64\n"
  );

  Ok(())
}

#[test]
fn test_short_flag_matches_long_flag() -> Result<()> {
  let project = TestProject::new("0.2")?;
  project.install_fake_compiler(TARGETS, None)?;

  run_release_build_ok(&project.path, &["-a"])?;

  assert_eq!(project.compiler_calls()?.len(), 2);
  Ok(())
}

#[test]
fn test_existing_version_is_not_rebuilt() -> Result<()> {
  let project = TestProject::new("1.0")?;
  project.install_fake_compiler(TARGETS, None)?;
  std::fs::create_dir_all(project.builds_dir().join("app_1.0.arm64.linux"))?;

  let output = run_release_build_ok(&project.path, &["--all"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("STOPPING"));
  assert!(stdout.contains("app_1.0.arm64.linux"));
  assert!(project.compiler_calls()?.is_empty());
  assert!(!project.file_exists("dist/builds/scope_capture_1.0.arm64.linux"));
  assert!(!project.file_exists("dist/builds/scope_capture_1.0.arm64.darwin"));

  Ok(())
}

#[test]
fn test_second_run_is_blocked_by_first() -> Result<()> {
  let project = TestProject::new("0.3")?;
  project.install_fake_compiler(TARGETS, None)?;

  run_release_build_ok(&project.path, &[])?;
  let output = run_release_build_ok(&project.path, &["--all"])?;

  assert!(String::from_utf8_lossy(&output.stdout).contains("STOPPING"));
  assert_eq!(project.compiler_calls()?.len(), 1);

  // bumping the version unblocks the build
  project.write_version_file("const ModuleVersion = \"0.4\"\n")?;
  run_release_build_ok(&project.path, &[])?;
  assert_eq!(project.compiler_calls()?.len(), 2);
  assert!(project.file_exists("dist/builds/scope_capture_0.4.arm64.linux"));

  Ok(())
}

#[test]
fn test_last_version_declaration_wins() -> Result<()> {
  let project = TestProject::new("0.1")?;
  project.install_fake_compiler(TARGETS, None)?;
  project.write_version_file("const ModuleVersion = \"1.2.3\"\n\nvar ModuleVersion = \"2.0.0\"\n")?;

  run_release_build_ok(&project.path, &[])?;

  assert!(project.file_exists("dist/builds/scope_capture_2.0.0.arm64.linux"));
  assert!(!project.file_exists("dist/builds/scope_capture_1.2.3.arm64.linux"));
  Ok(())
}

#[test]
fn test_missing_version_fails_without_side_effects() -> Result<()> {
  let project = TestProject::new("0.1")?;
  project.install_fake_compiler(TARGETS, None)?;
  project.write_version_file("package moduleconfig\n")?;

  let output = run_release_build(&project.path, &["--all"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Version not found"));
  assert!(!project.file_exists("dist"));
  assert!(project.compiler_calls()?.is_empty());
  Ok(())
}

#[test]
fn test_version_with_path_separator_is_rejected() -> Result<()> {
  let project = TestProject::new("0.1")?;
  project.install_fake_compiler(TARGETS, None)?;
  project.write_version_file("package moduleconfig\n\nconst ModuleVersion = \"1.0/rc\"\n")?;

  for _ in 0..2 {
    let output = run_release_build(&project.path, &[])?;
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Malformed version declaration"));
  }

  assert!(!project.file_exists("dist"));
  assert!(project.compiler_calls()?.is_empty());
  Ok(())
}

#[test]
fn test_missing_version_file_is_io_error() -> Result<()> {
  let project = TestProject::new("0.1")?;
  project.install_fake_compiler(TARGETS, None)?;
  std::fs::remove_file(project.path.join("pkg/moduleconfig/moduleconfig.go"))?;

  let output = run_release_build(&project.path, &[])?;

  assert_eq!(output.status.code(), Some(2));
  assert!(!project.file_exists("dist"));
  Ok(())
}

#[test]
fn test_compiler_failure_stops_remaining_targets() -> Result<()> {
  let project = TestProject::new("0.5")?;
  project.install_fake_compiler(&[("linux", "arm64"), ("darwin", "arm64"), ("linux", "amd64")], Some("darwin"))?;

  let output = run_release_build(&project.path, &["--all"])?;

  assert_eq!(output.status.code(), Some(3));
  assert!(String::from_utf8_lossy(&output.stderr).contains("exit code 7"));

  let calls = project.compiler_calls()?;
  assert_eq!(calls.len(), 2);
  assert!(project.file_exists("dist/builds/scope_capture_0.5.arm64.linux/scope_capture.arm64.linux"));
  // directory of the failed target is left behind
  assert!(project.file_exists("dist/builds/scope_capture_0.5.arm64.darwin"));
  assert!(!project.file_exists("dist/builds/scope_capture_0.5.amd64.linux"));

  Ok(())
}

#[test]
fn test_rerun_over_empty_directory_is_blocked() -> Result<()> {
  let project = TestProject::new("0.6")?;
  project.install_fake_compiler(TARGETS, Some("linux"))?;

  let first = run_release_build(&project.path, &[])?;
  assert_eq!(first.status.code(), Some(3));
  assert!(project.file_exists("dist/builds/scope_capture_0.6.arm64.linux"));

  // the partial version now blocks retries until cleaned up by hand
  let second = run_release_build_ok(&project.path, &[])?;
  assert!(String::from_utf8_lossy(&second.stdout).contains("STOPPING"));
  assert_eq!(project.compiler_calls()?.len(), 1);

  Ok(())
}

#[test]
fn test_invalid_config_is_user_error() -> Result<()> {
  let project = TestProject::new("0.1")?;
  std::fs::write(project.path.join("release.toml"), "targets = []\n")?;

  let output = run_release_build(&project.path, &[])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("No build targets configured"));
  Ok(())
}

#[test]
fn test_missing_compiler_is_system_error() -> Result<()> {
  let project = TestProject::new("0.1")?;
  std::fs::write(
    project.path.join("release.toml"),
    "[compiler]\nprogram = \"release-build-test-missing-compiler\"\n",
  )?;

  let output = run_release_build(&project.path, &[])?;

  assert_eq!(output.status.code(), Some(2));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to launch compiler"));
  Ok(())
}
