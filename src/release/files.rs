//! Version-file rewrites as pure text transforms
//!
//! Each function takes file content in and returns `(new_content,
//! changed)` out; the orchestrator owns the reads and writes. The
//! substitutions are anchored to the specific keys they rewrite so the
//! rest of each file is carried over untouched.

use crate::version::{DotVersion, IosVersion};
use regex::Regex;
use std::sync::LazyLock;

/// A line holding nothing but a two- or three-component version number
static MILESTONE_LINE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\d+\.\d+(\.\d+)?$").unwrap());

static BITRISE_RELEASE_VERSION: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(BITRISE_RELEASE_VERSION: )'(\d+\.\d+)'").unwrap());

static BITRISE_BETA_VERSION: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(BITRISE_BETA_VERSION: )'(\d+\.\d+)'").unwrap());

static BITRISE_PUSH_BRANCH: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(push_branch:\s+release/v)(\d+)").unwrap());

static PLIST_SHORT_VERSION: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(<key>CFBundleShortVersionString</key>\s*<string>)[^<]*(</string>)").unwrap()
});

/// Rewrite the first version-shaped line of milestone.txt.
///
/// The milestone file mixes comments and the version; only the first
/// line that is exactly a version number is replaced.
pub fn replace_milestone_line(content: &str, version: &DotVersion) -> (String, bool) {
  let replacement = version.to_string();
  let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
  let Some(idx) = lines.iter().position(|line| MILESTONE_LINE.is_match(line)) else {
    return (content.to_string(), false);
  };
  let changed = lines[idx] != replacement;
  lines[idx] = replacement;
  let mut out = lines.join("\n");
  out.push('\n');
  (out, changed)
}

/// Stamp CFBundleShortVersionString in an Info.plist, first occurrence only
pub fn stamp_plist_version(content: &str, version: &IosVersion) -> (String, bool) {
  let replacement = format!("${{1}}{}${{2}}", version);
  let rewritten = PLIST_SHORT_VERSION.replacen(content, 1, replacement.as_str());
  let changed = rewritten != content;
  (rewritten.into_owned(), changed)
}

/// Stamp the release/beta version keys and the push_branch major in
/// bitrise.yml. Every occurrence of each key is rewritten.
pub fn stamp_bitrise(content: &str, version: &IosVersion) -> (String, bool) {
  let versioned = format!("${{1}}'{}'", version);
  let branched = format!("${{1}}{}", version.major);

  let out = BITRISE_RELEASE_VERSION.replace_all(content, versioned.as_str());
  let out = BITRISE_BETA_VERSION.replace_all(&out, versioned.as_str());
  let out = BITRISE_PUSH_BRANCH.replace_all(&out, branched.as_str());

  let changed = out != content;
  (out.into_owned(), changed)
}
