//! Release cycle orchestration
//!
//! # Core Invariants
//!
//! 1. **The engine is pure; only the orchestrator touches the world**
//!    - Version arithmetic and changelog edits are text-in/text-out
//!    - File reads/writes and git calls happen here, nowhere deeper
//!
//! 2. **A run either completes a step or aborts before writing**
//!    - Malformed version strings fail the step before any file write
//!    - Missing changelog structure degrades to a warning, never aborts
//!
//! 3. **Every workflow is a fixed linear sequence**
//!    - Close-out precedes the new-section prepend within one rewrite
//!    - Retries belong to the operator, not to this layer
//!
//! # Workflows
//!
//! - `merge_day` — cut `release-vN` and start the `v(N+1)` cycle on main
//! - `dot_release` — branch an ESR/Release dot release from the last
//!   shipped tag and bump the patch level
//! - `ios_merge_day` — rolling iOS bump plus `release/vX.Y` branch
//! - `ios_set_version` — stamp a version across the iOS checkout

pub mod cycle;
pub mod files;

pub use cycle::{DotChannel, ReleaseCycle, ReleaseEvent};
