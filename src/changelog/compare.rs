//! Compare-link construction between consecutive release tags
//!
//! Pure string formatting. Whether the referenced tags actually exist is
//! the VCS layer's problem, not checked here.

/// Builds `https://<host>/compare/v<A>.0...v<B>.0` URLs for a fixed host
#[derive(Debug, Clone)]
pub struct CompareLinkBuilder {
  host: String,
}

impl CompareLinkBuilder {
  pub fn new(host: impl Into<String>) -> Self {
    Self { host: host.into() }
  }

  /// Comparison URL from the previous major release to the current one
  pub fn build(&self, previous: u32, current: u32) -> String {
    format!(
      "https://{}/compare/v{}.0...v{}.0",
      self.host, previous, current
    )
  }
}

/// GitHub pull-request URL for a branch pushed to a fork, targeting the
/// upstream base branch: `.../compare/<base>...<fork_owner>:<branch>?expand=1`
pub fn pull_request_url(
  upstream_owner: &str,
  upstream_repo: &str,
  base_branch: &str,
  fork_owner: &str,
  branch: &str,
) -> String {
  format!(
    "https://github.com/{}/{}/compare/{}...{}:{}?expand=1",
    upstream_owner, upstream_repo, base_branch, fork_owner, branch
  )
}
