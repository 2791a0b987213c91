//! Error types for relman with contextual messages and exit codes
//!
//! Version strings and changelog headers that do not match the active
//! release line's grammar are format errors and abort the workflow step.
//! A *missing* structural element (section header, placeholder) is not an
//! error anywhere in this crate; those are `Option` returns.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for relman
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, malformed version strings)
  User = 1,
  /// System error (git, I/O)
  System = 2,
  /// Validation failure (dirty tree, ambiguous release point)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for relman
#[derive(Debug)]
pub enum RelmanError {
  /// A version string or header does not match the expected grammar
  Format(FormatError),

  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// Dot-release base derivation could not identify a unique release point
  AmbiguousTag { version: String, detail: String },

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

/// A value that failed to parse against a release line's version grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
  /// The offending input, verbatim
  pub value: String,
  /// Human-readable description of the expected grammar
  pub expected: &'static str,
}

impl fmt::Display for FormatError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Invalid version '{}': expected {}", self.value, self.expected)
  }
}

impl RelmanError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    RelmanError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    RelmanError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Create a format error
  pub fn format(value: impl Into<String>, expected: &'static str) -> Self {
    RelmanError::Format(FormatError {
      value: value.into(),
      expected,
    })
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      RelmanError::Message { message, context, help } => RelmanError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      RelmanError::Format(_) => ExitCode::User,
      RelmanError::Config(_) => ExitCode::User,
      RelmanError::Git(_) => ExitCode::System,
      RelmanError::AmbiguousTag { .. } => ExitCode::Validation,
      RelmanError::Io(_) => ExitCode::System,
      RelmanError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      RelmanError::Config(e) => e.help_message(),
      RelmanError::Git(e) => e.help_message(),
      RelmanError::AmbiguousTag { .. } => {
        Some("Pass --version to name the release point explicitly.".to_string())
      }
      RelmanError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for RelmanError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RelmanError::Format(e) => write!(f, "{}", e),
      RelmanError::Config(e) => write!(f, "{}", e),
      RelmanError::Git(e) => write!(f, "{}", e),
      RelmanError::AmbiguousTag { version, detail } => {
        write!(f, "Cannot derive a unique previous release point for {}: {}", version, detail)
      }
      RelmanError::Io(e) => write!(f, "I/O error: {}", e),
      RelmanError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for RelmanError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      RelmanError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<FormatError> for RelmanError {
  fn from(err: FormatError) -> Self {
    RelmanError::Format(err)
  }
}

impl From<io::Error> for RelmanError {
  fn from(err: io::Error) -> Self {
    RelmanError::Io(err)
  }
}

impl From<String> for RelmanError {
  fn from(msg: String) -> Self {
    RelmanError::message(msg)
  }
}

impl From<&str> for RelmanError {
  fn from(msg: &str) -> Self {
    RelmanError::message(msg)
  }
}

impl From<toml_edit::TomlError> for RelmanError {
  fn from(err: toml_edit::TomlError) -> Self {
    RelmanError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for RelmanError {
  fn from(err: toml_edit::de::Error) -> Self {
    RelmanError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for RelmanError {
  fn from(err: serde_json::Error) -> Self {
    RelmanError::message(format!("JSON error: {}", err))
  }
}

impl From<std::num::ParseIntError> for RelmanError {
  fn from(err: std::num::ParseIntError) -> Self {
    RelmanError::message(format!("Parse error: {}", err))
  }
}

impl From<std::str::Utf8Error> for RelmanError {
  fn from(err: std::str::Utf8Error) -> Self {
    RelmanError::message(format!("UTF-8 error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for RelmanError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    RelmanError::message(format!("UTF-8 conversion error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// relman.toml exists but cannot be parsed
  Invalid { path: PathBuf, reason: String },

  /// Missing required field
  MissingField { field: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::Invalid { path, .. } => Some(format!(
        "Fix or remove {} — all settings have working defaults.",
        path.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::Invalid { path, reason } => {
        write!(f, "Invalid configuration at {}: {}", path.display(), reason)
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// A required remote is missing
  RemoteMissing { name: String },

  /// Branch already exists (dot-release branches are never reused)
  BranchExists { name: String },

  /// Tag could not be resolved to a commit
  TagNotFound { tag: String },

  /// Commit not found
  CommitNotFound { sha: String },

  /// Working tree has uncommitted changes
  DirtyWorkTree,

  /// Push failed
  PushFailed {
    remote: String,
    branch: String,
    reason: String,
  },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::RemoteMissing { name } if name == "origin" => {
        Some("Run relman from a clone of your fork so 'origin' exists.".to_string())
      }
      GitError::BranchExists { name } => Some(format!(
        "Delete the branch first (git branch -D {}) or pick another release point.",
        name
      )),
      GitError::DirtyWorkTree => {
        Some("Commit or stash your changes before running relman.".to_string())
      }
      GitError::PushFailed { reason, .. } => {
        if reason.contains("non-fast-forward") {
          Some("The remote has commits you don't have. Pull first or use --force (dangerous).".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Run relman inside a git checkout; nothing found at: {}",
        path.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::RemoteMissing { name } => {
        write!(f, "Required git remote '{}' not found", name)
      }
      GitError::BranchExists { name } => {
        write!(f, "Branch '{}' already exists", name)
      }
      GitError::TagNotFound { tag } => {
        write!(f, "Tag '{}' could not be resolved to a commit", tag)
      }
      GitError::CommitNotFound { sha } => {
        write!(f, "Commit not found: {}", sha)
      }
      GitError::DirtyWorkTree => {
        write!(f, "Working tree has uncommitted changes")
      }
      GitError::PushFailed { remote, branch, reason } => {
        write!(f, "Push to {}/{} failed: {}", remote, branch, reason)
      }
    }
  }
}

/// Result type alias for relman
pub type RelmanResult<T> = Result<T, RelmanError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> RelmanResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> RelmanResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<RelmanError>,
{
  fn context(self, ctx: impl Into<String>) -> RelmanResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> RelmanResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &RelmanError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

/// Convert anyhow::Error to RelmanError (for transition period)
impl From<anyhow::Error> for RelmanError {
  fn from(err: anyhow::Error) -> Self {
    RelmanError::message(err.to_string())
  }
}
