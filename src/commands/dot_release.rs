//! ESR / Release dot-release command
//!
//! Cuts the relbranch from the last shipped release point and bumps the
//! patch level. Pushing goes through lando, so the command ends with the
//! exact invocation instead of pushing itself.

use crate::commands::open_checkout;
use crate::core::error::RelmanResult;
use crate::release::{DotChannel, ReleaseCycle};
use crate::ui::Logger;

pub fn run_dot_release(
  channel: String,
  cherry_picks: Vec<String>,
  json: bool,
  verbose: bool,
  quiet: bool,
) -> RelmanResult<()> {
  let log = Logger::from_flags(verbose, quiet);
  let channel = DotChannel::parse(&channel)?;
  let (git, config) = open_checkout()?;
  let cycle = ReleaseCycle::new(&git, &config, log);

  let report = cycle.dot_release(channel, &cherry_picks)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
    return Ok(());
  }

  log.result(format!("📤 To push this branch, run:\n{}", report.push_hint));
  Ok(())
}
