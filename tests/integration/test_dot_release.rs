//! End-to-end tests for the ESR/Release dot-release workflow

use crate::helpers::{assert_success, commit_all, git, init_repo, run_relman};
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write the three Firefox version files
fn write_version_files(dir: &Path, version: &str, display: &str) -> Result<()> {
  fs::create_dir_all(dir.join("browser/config"))?;
  fs::create_dir_all(dir.join("config"))?;
  fs::write(dir.join("browser/config/version.txt"), format!("{}\n", version))?;
  fs::write(dir.join("browser/config/version_display.txt"), format!("{}\n", display))?;
  fs::write(
    dir.join("config/milestone.txt"),
    format!("# Holds the current milestone.\n{}\n", version),
  )?;
  Ok(())
}

/// An origin repository with an `esr140` branch at 140.2 and the
/// 140.1.0 release tag one commit back, plus a working clone
struct DotFixture {
  _root: TempDir,
  checkout: PathBuf,
}

impl DotFixture {
  fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let seed = root.path().join("seed");
    init_repo(&seed)?;

    // main: anything at all
    fs::write(seed.join("README.md"), "seed\n")?;
    commit_all(&seed, "Initial commit")?;

    // esr140 history: last shipped 140.1.0, then the live 140.2
    git(&seed, &["checkout", "-b", "esr140"])?;
    write_version_files(&seed, "140.1.0", "140.1.0esr")?;
    commit_all(&seed, "Ship 140.1.0")?;
    git(&seed, &["tag", "FIREFOX_140_1_0esr_RELEASE"])?;
    write_version_files(&seed, "140.2", "140.2esr")?;
    commit_all(&seed, "Version 140.2")?;
    git(&seed, &["checkout", "main"])?;

    git(root.path(), &["clone", "--bare", "seed", "origin.git"])?;
    let checkout = root.path().join("clone");
    git(root.path(), &["clone", root.path().join("origin.git").to_str().unwrap(), "clone"])?;
    git(&checkout, &["config", "user.name", "Test User"])?;
    git(&checkout, &["config", "user.email", "test@example.com"])?;

    Ok(Self {
      _root: root,
      checkout,
    })
  }
}

#[test]
fn test_esr_dot_release_branches_from_last_shipped_tag() -> Result<()> {
  let fx = DotFixture::new()?;

  let output = run_relman(&fx.checkout, &["dot-release", "esr140", "--quiet"])?;
  assert_success(&output);

  // the relbranch exists, based on the tagged commit
  assert_eq!(
    git(&fx.checkout, &["rev-parse", "--abbrev-ref", "HEAD"])?,
    "FIREFOX_ESR_140_1_X_RELBRANCH"
  );
  let tag_commit = git(&fx.checkout, &["rev-list", "-n", "1", "FIREFOX_140_1_0esr_RELEASE"])?;
  assert_eq!(git(&fx.checkout, &["rev-parse", "HEAD~1"])?, tag_commit);

  // versions bumped to the next patch level
  assert_eq!(
    fs::read_to_string(fx.checkout.join("browser/config/version.txt"))?,
    "140.1.1\n"
  );
  assert_eq!(
    fs::read_to_string(fx.checkout.join("browser/config/version_display.txt"))?,
    "140.1.1esr\n"
  );
  let milestone = fs::read_to_string(fx.checkout.join("config/milestone.txt"))?;
  assert_eq!(milestone, "# Holds the current milestone.\n140.1.1\n");

  assert_eq!(
    git(&fx.checkout, &["log", "-1", "--pretty=%s"])?,
    "No bug - Bump version to 140.1.1 a=me"
  );
  Ok(())
}

#[test]
fn test_esr_dot_release_prints_lando_hint() -> Result<()> {
  let fx = DotFixture::new()?;

  let output = run_relman(&fx.checkout, &["dot-release", "esr140"])?;
  assert_success(&output);

  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains(
    "lando push-commits --lando-repo firefox-esr140 --relbranch FIREFOX_ESR_140_1_X_RELBRANCH"
  ));
  Ok(())
}

#[test]
fn test_dot_release_cherry_picks_named_commits() -> Result<()> {
  let fx = DotFixture::new()?;

  // a fix commit on esr140 that the relbranch wants
  git(&fx.checkout, &["checkout", "esr140"])?;
  fs::write(fx.checkout.join("fix.txt"), "the fix\n")?;
  let fix_sha = commit_all(&fx.checkout, "Fix a thing")?;
  git(&fx.checkout, &["checkout", "main"])?;

  let output = run_relman(&fx.checkout, &["dot-release", "esr140", "--cherry-pick", &fix_sha, "--quiet"])?;
  assert_success(&output);

  assert_eq!(git(&fx.checkout, &["log", "-1", "--pretty=%s"])?, "Fix a thing");
  assert!(fx.checkout.join("fix.txt").exists());
  Ok(())
}

#[test]
fn test_dot_release_rejects_unknown_cherry_pick() -> Result<()> {
  let fx = DotFixture::new()?;

  let bogus = "0123456789abcdef0123456789abcdef01234567";
  let output = run_relman(&fx.checkout, &["dot-release", "esr140", "--cherry-pick", bogus, "--quiet"])?;
  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Commit not found"), "got: {}", stderr);
  Ok(())
}

#[test]
fn test_dot_release_missing_tag_is_ambiguous() -> Result<()> {
  let fx = DotFixture::new()?;

  // 140.3 expects FIREFOX_140_2_0esr_RELEASE, which nobody tagged
  git(&fx.checkout, &["checkout", "esr140"])?;
  write_version_files(&fx.checkout, "140.3", "140.3esr")?;
  commit_all(&fx.checkout, "Version 140.3")?;
  git(&fx.checkout, &["push", "origin", "esr140"])?;
  git(&fx.checkout, &["checkout", "main"])?;

  let output = run_relman(&fx.checkout, &["dot-release", "esr140", "--quiet"])?;
  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(
    stderr.contains("FIREFOX_140_2_0esr_RELEASE"),
    "error should name the missing tag, got: {}",
    stderr
  );
  Ok(())
}

#[test]
fn test_dot_release_rejects_bogus_channel() -> Result<()> {
  let fx = DotFixture::new()?;

  let output = run_relman(&fx.checkout, &["dot-release", "beta", "--quiet"])?;
  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("beta"), "got: {}", stderr);
  Ok(())
}
