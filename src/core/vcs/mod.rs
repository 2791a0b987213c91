pub mod system_git;

pub use system_git::{SystemGit, parse_github_remote};
