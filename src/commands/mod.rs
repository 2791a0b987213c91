//! CLI commands for relman
//!
//! ## Desktop (Application Services)
//! - **merge-day**: both phases — cut the release branch, start the next cycle
//! - **cut**: phase A only (release branch close-out)
//! - **start-cycle**: phase B only (version bump + changelog roll-over on main)
//!
//! ## Firefox desktop dot releases
//! - **dot-release**: branch an ESR/Release dot release from the last shipped tag
//!
//! ## iOS
//! - **ios merge-day**: rolling bump + release branch
//! - **ios set-version**: stamp a version across the checkout
//!
//! ## Utilities
//! - **bump**: pure version arithmetic under a given policy

pub mod bump;
pub mod dot_release;
pub mod ios;
pub mod merge_day;

pub use bump::run_bump;
pub use dot_release::run_dot_release;
pub use ios::{run_ios_merge_day, run_ios_set_version};
pub use merge_day::{run_cut, run_merge_day, run_start_cycle};

use crate::core::config::RelmanConfig;
use crate::core::error::RelmanResult;
use crate::core::vcs::SystemGit;

/// Today's `YYYY-MM-DD` stamp in local time; the engine only ever sees
/// the formatted string
pub(crate) fn today_stamp() -> String {
  chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Open the checkout at the current directory and load its configuration
pub(crate) fn open_checkout() -> RelmanResult<(SystemGit, RelmanConfig)> {
  let cwd = std::env::current_dir()?;
  let git = SystemGit::open(&cwd)?;
  let config = RelmanConfig::load(&git.work_tree)?;
  Ok((git, config))
}
