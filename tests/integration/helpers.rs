//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A throwaway project laid out like scope_capture
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestProject {
  /// Create a project whose version file declares `version`
  pub fn new(version: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    std::fs::create_dir_all(path.join("cmd").join("scope_capture"))?;
    std::fs::write(
      path.join("cmd").join("scope_capture").join("main.go"),
      "package main\n\nfunc main() {}\n",
    )?;

    let project = Self { _root: root, path };
    project.write_version_file(&format!(
      "package moduleconfig\n\nconst ModuleVersion = \"{}\"\n",
      version
    ))?;
    Ok(project)
  }

  /// Replace the contents of the version source-of-truth file
  pub fn write_version_file(&self, content: &str) -> Result<()> {
    let dir = self.path.join("pkg").join("moduleconfig");
    std::fs::create_dir_all(&dir)?;
    std::fs::write(dir.join("moduleconfig.go"), content)?;
    Ok(())
  }

  /// Install a fake compiler and point release.toml at it
  ///
  /// The script appends `<GOOS> <GOARCH> <cwd> <output>` to `compiler.log`,
  /// writes a stub binary to the `-o` path, and exits 7 for `fail_platform`.
  #[cfg(unix)]
  pub fn install_fake_compiler(&self, targets: &[(&str, &str)], fail_platform: Option<&str>) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let script_path = self.path.join("fake-go");
    let fail_check = match fail_platform {
      Some(platform) => format!("if [ \"$GOOS\" = \"{}\" ]; then exit 7; fi\n", platform),
      None => String::new(),
    };
    let script = format!(
      "#!/bin/sh\necho \"$GOOS $GOARCH $(pwd) $3\" >> \"{log}\"\n{fail_check}printf 'stub %s/%s\\n' \"$GOOS\" \"$GOARCH\" > \"$3\"\n",
      log = self.compiler_log().display(),
      fail_check = fail_check,
    );
    std::fs::write(&script_path, script)?;
    std::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o755))?;

    let mut config = format!(
      "[app]\nname = \"scope_capture\"\n\n[compiler]\nprogram = \"{}\"\n",
      script_path.display()
    );
    for (platform, arch) in targets {
      config.push_str(&format!(
        "\n[[targets]]\nplatform = \"{}\"\narch = \"{}\"\n",
        platform, arch
      ));
    }
    std::fs::write(self.path.join("release.toml"), config)?;
    Ok(())
  }

  pub fn compiler_log(&self) -> PathBuf {
    self.path.join("compiler.log")
  }

  /// Lines the fake compiler logged, one per invocation
  pub fn compiler_calls(&self) -> Result<Vec<String>> {
    let log = self.compiler_log();
    if !log.exists() {
      return Ok(Vec::new());
    }
    Ok(std::fs::read_to_string(log)?.lines().map(String::from).collect())
  }

  pub fn builds_dir(&self) -> PathBuf {
    self.path.join("dist").join("builds")
  }

  /// Check if a path exists relative to the project root
  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  /// Read a file relative to the project root
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }
}

/// Run release-build in a directory, returning its output whatever the exit status
pub fn run_release_build(cwd: &Path, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_release-build");

  Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run release-build")
}

/// Run release-build and fail unless it exits successfully
pub fn run_release_build_ok(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_release_build(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "release-build failed: release-build {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}
