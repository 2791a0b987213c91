//! Pure version arithmetic, exposed for scripts and sanity checks
//!
//! `relman bump 142.3 --policy ios-rolling` answers "what ships next"
//! without touching the checkout.

use crate::core::error::{RelmanError, RelmanResult};
use crate::version::{Policy, Version};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct BumpReport {
  policy: Policy,
  current: String,
  major: u32,
  next: String,
  /// Desktop only: the current version with the pre-release marker dropped
  released: Option<String>,
  /// Dot policies only: the last shipped base on this branch
  dot_release_base: Option<String>,
}

pub fn run_bump(version: String, policy: String, json: bool) -> RelmanResult<()> {
  let policy = parse_policy(&policy)?;
  let current = policy.parse(&version)?;
  let next = current.bump();

  let report = BumpReport {
    policy,
    major: current.major(),
    next: next.to_string(),
    released: match &current {
      Version::Desktop(_) => Some(current.strip_pre_release().to_string()),
      _ => None,
    },
    dot_release_base: match &current {
      Version::Dot(v) => Some(v.base_for_dot_release().to_string()),
      _ => None,
    },
    current: current.to_string(),
  };

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
    return Ok(());
  }

  println!("{} -> {}", report.current, report.next);
  if let Some(released) = &report.released {
    println!("release form: {}", released);
  }
  if let Some(base) = &report.dot_release_base {
    println!("dot-release base: {}", base);
  }
  Ok(())
}

fn parse_policy(text: &str) -> RelmanResult<Policy> {
  match text {
    "desktop" => Ok(Policy::Desktop),
    "esr-dot" | "esr" => Ok(Policy::EsrDot),
    "release-dot" | "release" => Ok(Policy::ReleaseDot),
    "ios-rolling" | "ios" => Ok(Policy::IosRolling),
    _ => Err(RelmanError::with_help(
      format!("Unknown policy '{}'", text),
      "Expected one of: desktop, esr-dot, release-dot, ios-rolling.",
    )),
  }
}
