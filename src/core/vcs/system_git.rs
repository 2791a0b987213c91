//! System git backend - zero dependencies
//!
//! Uses git plumbing commands for all operations, with a safe subprocess
//! environment (isolated env, explicit config overrides). This is the
//! only module that talks to version control; the release engine itself
//! never shells out.

use crate::core::error::{GitError, RelmanError, RelmanResult, ResultExt};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  /// Repository working directory
  repo_path: PathBuf,

  /// Working tree root
  pub work_tree: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  ///
  /// This performs ONE subprocess call to get the repository metadata.
  pub fn open(path: &Path) -> RelmanResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(RelmanError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(RelmanError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = stdout.trim();

    Ok(Self {
      repo_path: path.to_path_buf(),
      work_tree: PathBuf::from(work_tree),
    })
  }

  /// List configured remote names
  pub fn remotes(&self) -> RelmanResult<Vec<String>> {
    let out = self.run(&["remote"])?;
    Ok(out.lines().map(|l| l.trim().to_string()).collect())
  }

  /// Add a remote
  pub fn add_remote(&self, name: &str, url: &str) -> RelmanResult<()> {
    self.run(&["remote", "add", name, url]).map(drop)
  }

  /// URL of a configured remote
  pub fn remote_url(&self, name: &str) -> RelmanResult<String> {
    self.run(&["remote", "get-url", name])
  }

  /// Fetch refs (an empty refspec list means the remote's defaults)
  pub fn fetch(&self, remote: &str, refspecs: &[&str]) -> RelmanResult<()> {
    let mut args = vec!["fetch", remote];
    args.extend_from_slice(refspecs);
    self.run(&args).map(drop)
  }

  /// List `refs/heads/*` on a remote as `(sha, ref)` pairs
  pub fn ls_remote_heads(&self, remote: &str) -> RelmanResult<Vec<(String, String)>> {
    let out = self.run(&["ls-remote", "--heads", remote])?;
    Ok(
      out
        .lines()
        .filter_map(|line| {
          let (sha, reference) = line.split_once('\t')?;
          Some((sha.to_string(), reference.to_string()))
        })
        .collect(),
    )
  }

  /// Create or reset a local branch from a start point and switch to it
  /// (`git checkout -B`)
  pub fn checkout_branch_from(&self, branch: &str, start_point: &str) -> RelmanResult<()> {
    self.run(&["checkout", "-B", branch, start_point]).map(drop)
  }

  /// Switch to an existing branch
  pub fn checkout(&self, branch: &str) -> RelmanResult<()> {
    self.run(&["checkout", branch]).map(drop)
  }

  /// Create a NEW branch at a commit and switch to it; refuses to reuse
  /// an existing branch (`git checkout -b`)
  pub fn create_branch_at(&self, branch: &str, commit: &str) -> RelmanResult<()> {
    match self.run(&["checkout", "-b", branch, commit]) {
      Ok(_) => Ok(()),
      Err(RelmanError::Git(GitError::CommandFailed { stderr, .. }))
        if stderr.contains("already exists") =>
      {
        Err(RelmanError::Git(GitError::BranchExists {
          name: branch.to_string(),
        }))
      }
      Err(e) => Err(e),
    }
  }

  /// Pull the current branch
  pub fn pull(&self) -> RelmanResult<()> {
    self.run(&["pull"]).map(drop)
  }

  /// Resolve a rev to a SHA
  pub fn rev_parse(&self, rev: &str) -> RelmanResult<String> {
    self.run(&["rev-parse", rev])
  }

  /// Resolve an (annotated or lightweight) tag to the commit it names
  pub fn tag_commit(&self, tag: &str) -> RelmanResult<String> {
    match self.run(&["rev-list", "-n", "1", tag]) {
      Ok(sha) if !sha.is_empty() => Ok(sha),
      _ => Err(RelmanError::Git(GitError::TagNotFound {
        tag: tag.to_string(),
      })),
    }
  }

  /// First line of a commit's message, for operator context
  pub fn commit_subject(&self, rev: &str) -> RelmanResult<String> {
    let message = self.run(&["log", "-1", "--pretty=%B", rev])?;
    Ok(message.lines().next().unwrap_or("").to_string())
  }

  /// Whether a commit object exists in the repository
  pub fn commit_exists(&self, sha: &str) -> bool {
    self.run(&["cat-file", "-e", &format!("{}^{{commit}}", sha)]).is_ok()
  }

  /// Read a file's content at a specific ref (`git show ref:path`)
  pub fn show_file_at(&self, rev: &str, path: &str) -> RelmanResult<String> {
    self.run(&["show", &format!("{}:{}", rev, path)])
  }

  /// `git status --porcelain`; empty output means a clean tree
  pub fn status_porcelain(&self) -> RelmanResult<String> {
    self.run(&["status", "--porcelain"])
  }

  /// Stage specific paths
  pub fn stage(&self, paths: &[&str]) -> RelmanResult<()> {
    let mut args = vec!["add", "--"];
    args.extend_from_slice(paths);
    self.run(&args).map(drop)
  }

  /// Paths staged for the next commit
  pub fn staged_files(&self) -> RelmanResult<Vec<String>> {
    let out = self.run(&["diff", "--cached", "--name-only"])?;
    Ok(out.lines().map(|l| l.to_string()).collect())
  }

  /// Commit the staged changes
  pub fn commit(&self, message: &str) -> RelmanResult<()> {
    self.run(&["commit", "-m", message]).map(drop)
  }

  /// Commit all tracked modifications (`git commit -a`)
  pub fn commit_all(&self, message: &str) -> RelmanResult<()> {
    self.run(&["commit", "-a", "-m", message]).map(drop)
  }

  /// Push a refspec, optionally recording the upstream
  pub fn push(&self, remote: &str, refspec: &str, set_upstream: bool) -> RelmanResult<()> {
    let mut args = vec!["push"];
    if set_upstream {
      args.push("-u");
    }
    args.push(remote);
    args.push(refspec);
    match self.run(&args) {
      Ok(_) => Ok(()),
      Err(RelmanError::Git(GitError::CommandFailed { stderr, .. })) => {
        Err(RelmanError::Git(GitError::PushFailed {
          remote: remote.to_string(),
          branch: refspec.to_string(),
          reason: stderr,
        }))
      }
      Err(e) => Err(e),
    }
  }

  /// Cherry-pick a commit onto the current branch
  pub fn cherry_pick(&self, sha: &str) -> RelmanResult<()> {
    self.run(&["cherry-pick", sha]).map(drop)
  }

  /// Run a git command, returning trimmed stdout or a CommandFailed error
  fn run(&self, args: &[&str]) -> RelmanResult<String> {
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute git {}", args.first().unwrap_or(&"")))?;

    if !output.status.success() {
      return Err(RelmanError::Git(GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables, whitelisting only PATH and HOME
  /// - Adds safe configuration overrides
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("protocol.version=2");
    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }
}

/// Parse `(owner, repo)` out of a GitHub remote URL.
///
/// Supports SSH (`git@github.com:owner/repo.git`) and HTTPS
/// (`https://github.com/owner/repo`). Returns `None` for anything else —
/// callers degrade to skipping PR URLs rather than failing.
pub fn parse_github_remote(url: &str) -> Option<(String, String)> {
  let path = url
    .strip_prefix("git@github.com:")
    .or_else(|| url.strip_prefix("https://github.com/"))?;
  let (owner, name) = path.split_once('/')?;
  let name = name.strip_suffix(".git").unwrap_or(name);
  if owner.is_empty() || name.is_empty() {
    return None;
  }
  Some((owner.to_string(), name.to_string()))
}
