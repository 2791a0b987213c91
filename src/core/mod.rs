//! Core plumbing for relman
//!
//! - **config**: relman.toml parsing and validation
//! - **error**: error types with contextual help messages and exit codes
//! - **vcs**: git operations abstraction (SystemGit)

pub mod config;
pub mod error;
pub mod vcs;
