//! End-to-end tests for the desktop merge-day workflows

use crate::helpers::{MergeDayFixture, assert_success, git, run_relman};
use anyhow::Result;

fn today() -> String {
  chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[test]
fn test_merge_day_cuts_release_and_starts_next_cycle() -> Result<()> {
  let fx = MergeDayFixture::new(5)?;

  let output = run_relman(&fx.checkout, &["merge-day", "--version", "5", "--quiet"])?;
  assert_success(&output);

  // Phase A: release branch has the marker stripped and the section dated
  assert_eq!(fx.show("release-v5", "version.txt")?, "5.0");
  let changelog = fx.show("release-v5", "CHANGELOG.md")?;
  assert!(
    changelog.contains(&format!("# v5.0 (_{}_)", today())),
    "release changelog should date the v5.0 header, got:\n{}",
    changelog
  );
  assert!(changelog.contains(
    "[Full Changelog](https://github.com/mozilla/application-services/compare/v4.0...v5.0)"
  ));
  assert_eq!(
    git(&fx.checkout, &["log", "-1", "--pretty=%s", "release-v5"])?,
    "Cut release v5.0"
  );

  // Phase B: the work branch starts v6 and closes out v5
  assert_eq!(fx.show("start-release-v6", "version.txt")?, "6.0a1");
  let changelog = fx.show("start-release-v6", "CHANGELOG.md")?;
  assert!(changelog.starts_with("# v6.0 (In progress)\n\n[Full Changelog](In progress)\n\n"));
  assert!(changelog.contains(&format!("# v5.0 (_{}_)", today())));
  assert_eq!(changelog.matches("# v6.0 (In progress)").count(), 1);
  assert_eq!(
    git(&fx.checkout, &["log", "-1", "--pretty=%s", "start-release-v6"])?,
    "Start release v6.0"
  );

  Ok(())
}

#[test]
fn test_merge_day_leaves_older_sections_untouched() -> Result<()> {
  let fx = MergeDayFixture::new(5)?;

  let output = run_relman(&fx.checkout, &["merge-day", "--version", "5", "--quiet"])?;
  assert_success(&output);

  // the v4.0 section survives both phases byte-for-byte
  for branch in ["release-v5", "start-release-v6"] {
    let changelog = fx.show(branch, "CHANGELOG.md")?;
    assert!(changelog.contains("# v4.0 (_2025-05-12_)"), "{} lost the v4.0 header", branch);
    assert!(
      changelog.contains("compare/v3.0...v4.0"),
      "{} lost the v4.0 compare link",
      branch
    );
  }
  Ok(())
}

#[test]
fn test_merge_day_pushes_both_branches_to_fork() -> Result<()> {
  let fx = MergeDayFixture::new(7)?;

  let output = run_relman(&fx.checkout, &["merge-day", "--version", "7", "--quiet"])?;
  assert_success(&output);

  // both branches landed on origin (the fork)
  let heads = git(&fx.checkout, &["ls-remote", "--heads", "origin"])?;
  assert!(heads.contains("refs/heads/release-v7"));
  assert!(heads.contains("refs/heads/start-release-v8"));

  // and origin's release branch carries the cut commit
  assert_eq!(
    git(&fx.checkout, &["log", "-1", "--pretty=%s", "origin/release-v7"])?,
    "Cut release v7.0"
  );
  Ok(())
}

#[test]
fn test_cut_alone_does_not_touch_main() -> Result<()> {
  let fx = MergeDayFixture::new(5)?;

  let output = run_relman(&fx.checkout, &["cut", "--version", "5", "--quiet"])?;
  assert_success(&output);

  assert_eq!(fx.show("release-v5", "version.txt")?, "5.0");
  let heads = git(&fx.checkout, &["ls-remote", "--heads", "origin"])?;
  assert!(!heads.contains("start-release-v6"));
  Ok(())
}

#[test]
fn test_cut_reruns_are_idempotent() -> Result<()> {
  let fx = MergeDayFixture::new(5)?;

  let output = run_relman(&fx.checkout, &["cut", "--version", "5", "--quiet"])?;
  assert_success(&output);
  let first = fx.show("release-v5", "CHANGELOG.md")?;

  // a re-run starts from upstream again and lands on the same document
  let output = run_relman(&fx.checkout, &["cut", "--version", "5", "--quiet"])?;
  assert_success(&output);

  assert_eq!(fx.show("release-v5", "CHANGELOG.md")?, first);
  Ok(())
}

#[test]
fn test_cut_without_in_progress_header_still_succeeds() -> Result<()> {
  let fx = MergeDayFixture::new(5)?;

  // upstream's release branch never had an in-progress v5 section
  let seed = fx.checkout.parent().unwrap().join("seed");
  git(&seed, &["checkout", "release-v5"])?;
  std::fs::write(
    seed.join("CHANGELOG.md"),
    "# v4.0 (_2025-05-12_)\n\n[Full Changelog](https://example.test/compare/v3.0...v4.0)\n",
  )?;
  git(&seed, &["commit", "-am", "Drop in-progress section"])?;
  git(
    &seed,
    &[
      "push",
      fx.checkout.parent().unwrap().join("upstream.git").to_str().unwrap(),
      "release-v5",
    ],
  )?;

  // missing header degrades to a warning; the version strip still lands
  let output = run_relman(&fx.checkout, &["cut", "--version", "5", "--quiet"])?;
  assert_success(&output);
  assert_eq!(fx.show("release-v5", "version.txt")?, "5.0");
  assert!(!fx.show("release-v5", "CHANGELOG.md")?.contains("v5.0"));
  Ok(())
}

#[test]
fn test_merge_day_detects_version_from_upstream_branches() -> Result<()> {
  let fx = MergeDayFixture::new(9)?;

  // no --version: the highest upstream release-vN wins
  let output = run_relman(&fx.checkout, &["merge-day", "--quiet"])?;
  assert_success(&output);

  assert_eq!(fx.show("release-v9", "version.txt")?, "9.0");
  assert_eq!(fx.show("start-release-v10", "version.txt")?, "10.0a1");
  Ok(())
}

#[test]
fn test_merge_day_rejects_malformed_version_file() -> Result<()> {
  let fx = MergeDayFixture::new(5)?;

  // corrupt version.txt on the upstream release branch
  let seed = fx.checkout.parent().unwrap().join("seed");
  git(&seed, &["checkout", "release-v5"])?;
  std::fs::write(seed.join("version.txt"), "not-a-version\n")?;
  git(&seed, &["commit", "-am", "Corrupt version file"])?;
  git(
    &seed,
    &[
      "push",
      fx.checkout.parent().unwrap().join("upstream.git").to_str().unwrap(),
      "release-v5",
    ],
  )?;

  let output = run_relman(&fx.checkout, &["cut", "--version", "5", "--quiet"])?;
  assert!(!output.status.success(), "malformed version.txt must be fatal");
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(
    stderr.contains("not-a-version"),
    "error should name the offending string, got: {}",
    stderr
  );
  Ok(())
}
