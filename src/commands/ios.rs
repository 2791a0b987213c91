//! iOS release commands

use crate::commands::open_checkout;
use crate::core::error::RelmanResult;
use crate::release::ReleaseCycle;
use crate::ui::Logger;
use crate::version::IosVersion;

/// Create the release branch and roll the version forward on main
pub fn run_ios_merge_day(push: bool, json: bool, verbose: bool, quiet: bool) -> RelmanResult<()> {
  let log = Logger::from_flags(verbose, quiet);
  let (git, config) = open_checkout()?;
  let cycle = ReleaseCycle::new(&git, &config, log);

  let report = cycle.ios_merge_day(push)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
    return Ok(());
  }

  if !report.pushed {
    log.result("\n📌 Push skipped. To do it manually, run:");
    log.result(format!("    git push --set-upstream origin {}", report.release_branch));
    log.result("    git push origin main");
  }
  log.result("\n🎉 All done!");
  Ok(())
}

/// Stamp a version across the iOS checkout
pub fn run_ios_set_version(version: String, json: bool, verbose: bool, quiet: bool) -> RelmanResult<()> {
  let log = Logger::from_flags(verbose, quiet);
  let version = IosVersion::parse(&version)?;
  let (git, config) = open_checkout()?;
  let cycle = ReleaseCycle::new(&git, &config, log);

  let report = cycle.ios_set_version(&version)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
    return Ok(());
  }

  log.result(format!(
    "Successfully updated the version! ({} file(s) stamped)",
    report.stamped.len()
  ));
  Ok(())
}
