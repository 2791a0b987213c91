//! Desktop merge-day commands
//!
//! `merge-day` runs both phases in sequence the way the release calendar
//! does it; `cut` and `start-cycle` run a single phase for the cases
//! where one side already happened.

use crate::commands::{open_checkout, today_stamp};
use crate::core::error::RelmanResult;
use crate::release::cycle::{MergeDayReport, PhaseReport};
use crate::release::{ReleaseCycle, ReleaseEvent};
use crate::ui::Logger;

/// Run both merge-day phases
pub fn run_merge_day(version: Option<u32>, json: bool, verbose: bool, quiet: bool) -> RelmanResult<()> {
  let log = Logger::from_flags(verbose, quiet);
  let (git, config) = open_checkout()?;
  let cycle = ReleaseCycle::new(&git, &config, log);

  cycle.ensure_remotes()?;
  cycle.sync_remotes()?;

  let version = resolve_version(&cycle, &log, version)?;
  let event = ReleaseEvent::new(version, today_stamp());
  let report = cycle.merge_day(&event)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
    return Ok(());
  }
  print_summary(&log, &report);
  Ok(())
}

/// Run phase A only: cut the release branch
pub fn run_cut(version: Option<u32>, json: bool, verbose: bool, quiet: bool) -> RelmanResult<()> {
  let log = Logger::from_flags(verbose, quiet);
  let (git, config) = open_checkout()?;
  let cycle = ReleaseCycle::new(&git, &config, log);

  cycle.ensure_remotes()?;
  cycle.sync_remotes()?;

  let version = resolve_version(&cycle, &log, version)?;
  let event = ReleaseEvent::new(version, today_stamp());
  let report = cycle.cut_release(&event)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
    return Ok(());
  }
  print_phase(&log, "Release branch", &report);
  Ok(())
}

/// Run phase B only: start the next cycle on main
pub fn run_start_cycle(version: Option<u32>, json: bool, verbose: bool, quiet: bool) -> RelmanResult<()> {
  let log = Logger::from_flags(verbose, quiet);
  let (git, config) = open_checkout()?;
  let cycle = ReleaseCycle::new(&git, &config, log);

  cycle.ensure_remotes()?;
  cycle.sync_remotes()?;

  let version = resolve_version(&cycle, &log, version)?;
  let event = ReleaseEvent::new(version, today_stamp());
  let report = cycle.start_next_cycle(&event)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
    return Ok(());
  }
  print_phase(&log, "Main branch", &report);
  Ok(())
}

/// Use the explicit version or auto-detect the highest upstream release branch
fn resolve_version(cycle: &ReleaseCycle<'_>, log: &Logger, version: Option<u32>) -> RelmanResult<u32> {
  let version = match version {
    Some(version) => version,
    None => cycle.detect_release_version()?,
  };
  log.info(format!("[info] Using release branch: release-v{}", version));
  Ok(version)
}

fn print_summary(log: &Logger, report: &MergeDayReport) {
  if log.is_quiet() {
    // Quiet mode prints only the PR URLs, for scripting
    if let Some(url) = &report.release.pr_url {
      log.result(url);
    }
    if let Some(url) = &report.next_cycle.pr_url {
      log.result(url);
    }
    return;
  }

  log.result("\n=== Summary ===");
  print_phase(log, "Release branch", &report.release);
  print_phase(log, "Main branch", &report.next_cycle);
  log.result("\nDone.");
}

fn print_phase(log: &Logger, label: &str, phase: &PhaseReport) {
  if log.is_quiet() {
    if let Some(url) = &phase.pr_url {
      log.result(url);
    }
    return;
  }
  log.result(format!("✔ {}: {}", label, phase.branch));
  log.result(format!("   Commit: {}", phase.commit_message));
  log.result(format!(
    "   PR: {}",
    phase.pr_url.as_deref().unwrap_or("PR URL unavailable")
  ));
}
