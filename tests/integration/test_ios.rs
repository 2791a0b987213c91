//! End-to-end tests for the iOS workflows

use crate::helpers::{assert_success, commit_all, git, init_repo, run_relman};
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An origin repository whose main carries version.txt, plus a clone
struct IosFixture {
  _root: TempDir,
  checkout: PathBuf,
}

impl IosFixture {
  fn new(version: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let seed = root.path().join("seed");
    init_repo(&seed)?;
    fs::write(seed.join("version.txt"), format!("{}\n", version))?;
    commit_all(&seed, "Initial commit")?;

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

const PLIST: &str = "\
<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<plist version=\"1.0\">
<dict>
  <key>CFBundleShortVersionString</key>
  <string>142.2</string>
  <key>CFBundleVersion</key>
  <string>1</string>
</dict>
</plist>
";

const BITRISE: &str = "\
format_version: 11
app:
  envs:
  - BITRISE_RELEASE_VERSION: '142.2'
  - BITRISE_BETA_VERSION: '142.2'
trigger_map:
- push_branch: release/v142
";

#[test]
fn test_ios_merge_day_branches_and_bumps() -> Result<()> {
  let fx = IosFixture::new("142.1")?;

  let output = run_relman(&fx.checkout, &["ios", "merge-day", "--quiet"])?;
  assert_success(&output);

  // release branch carries the current version, main moves on
  assert_eq!(
    git(&fx.checkout, &["show", "release/v142.1:version.txt"])?,
    "142.1"
  );
  assert_eq!(git(&fx.checkout, &["show", "main:version.txt"])?, "142.2");
  assert_eq!(
    git(&fx.checkout, &["log", "-1", "--pretty=%s", "main"])?,
    "Bump version to 142.2"
  );

  // nothing was pushed without --push
  let heads = git(&fx.checkout, &["ls-remote", "--heads", "origin"])?;
  assert!(!heads.contains("release/v142.1"));
  Ok(())
}

#[test]
fn test_ios_merge_day_rolls_over_at_minor_three() -> Result<()> {
  let fx = IosFixture::new("142.3")?;

  let output = run_relman(&fx.checkout, &["ios", "merge-day", "--quiet"])?;
  assert_success(&output);

  assert_eq!(git(&fx.checkout, &["show", "main:version.txt"])?, "143.0");
  assert_eq!(
    git(&fx.checkout, &["show", "release/v142.3:version.txt"])?,
    "142.3"
  );
  Ok(())
}

#[test]
fn test_ios_merge_day_push_updates_origin() -> Result<()> {
  let fx = IosFixture::new("142.0")?;

  let output = run_relman(&fx.checkout, &["ios", "merge-day", "--push", "--quiet"])?;
  assert_success(&output);

  let heads = git(&fx.checkout, &["ls-remote", "--heads", "origin"])?;
  assert!(heads.contains("refs/heads/release/v142.0"));
  assert_eq!(
    git(&fx.checkout, &["show", "origin/main:version.txt"])?,
    "142.1"
  );
  Ok(())
}

#[test]
fn test_ios_merge_day_refuses_dirty_tree() -> Result<()> {
  let fx = IosFixture::new("142.1")?;
  fs::write(fx.checkout.join("scratch.txt"), "uncommitted\n")?;

  let output = run_relman(&fx.checkout, &["ios", "merge-day", "--quiet"])?;
  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("uncommitted changes"), "got: {}", stderr);
  Ok(())
}

/// Lay out a minimal iOS checkout for the set-version command
fn ios_checkout(dir: &Path) -> Result<()> {
  fs::create_dir_all(dir.join("firefox-ios/Client"))?;
  fs::write(dir.join("firefox-ios/Client/Info.plist"), PLIST)?;
  fs::write(dir.join("bitrise.yml"), BITRISE)?;
  Ok(())
}

#[test]
fn test_ios_set_version_stamps_and_commits() -> Result<()> {
  let root = TempDir::new()?;
  let repo = root.path().join("repo");
  init_repo(&repo)?;
  ios_checkout(&repo)?;
  commit_all(&repo, "Initial commit")?;

  let output = run_relman(&repo, &["ios", "set-version", "142.3", "--quiet"])?;
  assert_success(&output);

  let plist = fs::read_to_string(repo.join("firefox-ios/Client/Info.plist"))?;
  assert!(plist.contains("<string>142.3</string>"));
  // the build number key is untouched
  assert!(plist.contains("<key>CFBundleVersion</key>\n  <string>1</string>"));

  let bitrise = fs::read_to_string(repo.join("bitrise.yml"))?;
  assert!(bitrise.contains("BITRISE_RELEASE_VERSION: '142.3'"));
  assert!(bitrise.contains("BITRISE_BETA_VERSION: '142.3'"));
  assert!(bitrise.contains("push_branch: release/v142"));

  assert_eq!(
    git(&repo, &["log", "-1", "--pretty=%s"])?,
    "Bump - Set version to 142.3"
  );
  Ok(())
}

#[test]
fn test_ios_set_version_rejects_bad_version() -> Result<()> {
  let root = TempDir::new()?;
  let repo = root.path().join("repo");
  init_repo(&repo)?;
  ios_checkout(&repo)?;
  commit_all(&repo, "Initial commit")?;

  let output = run_relman(&repo, &["ios", "set-version", "142.9", "--quiet"])?;
  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("142.9"), "got: {}", stderr);

  // nothing was committed
  assert_eq!(git(&repo, &["log", "-1", "--pretty=%s"])?, "Initial commit");
  Ok(())
}
