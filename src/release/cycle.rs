//! The release workflows, sequenced over the pure engine plus git
//!
//! Each public method is one linear workflow. Engine calls (version
//! bumps, changelog rewrites) are pure; this module owns the file I/O
//! and the SystemGit calls and passes each stage's output into the next.
//! No state survives a run.

use crate::changelog::compare::pull_request_url;
use crate::changelog::{self, CompareLinkBuilder};
use crate::core::config::RelmanConfig;
use crate::core::error::{GitError, RelmanError, RelmanResult};
use crate::core::vcs::{SystemGit, parse_github_remote};
use crate::release::files::{replace_milestone_line, stamp_bitrise, stamp_plist_version};
use crate::ui::{FileProgress, Logger};
use crate::version::{DesktopVersion, DotVersion, IosVersion};
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::sync::LazyLock;

static RELEASE_BRANCH: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^refs/heads/release-v(\d+)$").unwrap());

/// Transient record parameterizing one desktop release run
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseEvent {
  /// Major version being released
  pub version: u32,
  /// Major version of the previous release
  pub previous: u32,
  /// Caller-supplied `YYYY-MM-DD` stamp
  pub date_stamp: String,
}

impl ReleaseEvent {
  pub fn new(version: u32, date_stamp: impl Into<String>) -> Self {
    Self {
      version,
      previous: version.saturating_sub(1),
      date_stamp: date_stamp.into(),
    }
  }
}

/// Dot-release channel: a specific ESR line, or the Release channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotChannel {
  Esr(u32),
  Release,
}

impl DotChannel {
  /// Parse a channel argument: `esr140` or `release`
  pub fn parse(arg: &str) -> RelmanResult<Self> {
    if arg.eq_ignore_ascii_case("release") {
      return Ok(DotChannel::Release);
    }
    if let Some(number) = arg.strip_prefix("esr").or_else(|| arg.strip_prefix("ESR"))
      && !number.is_empty()
      && number.bytes().all(|b| b.is_ascii_digit())
      && let Ok(number) = number.parse()
    {
      return Ok(DotChannel::Esr(number));
    }
    Err(RelmanError::format(arg, "esr<major> (e.g. esr140) or 'release'"))
  }

  /// The live git branch this channel ships from
  pub fn git_branch(&self) -> String {
    match self {
      DotChannel::Esr(number) => format!("esr{}", number),
      DotChannel::Release => "release".to_string(),
    }
  }
}

/// Outcome of one desktop phase (cut or start-next-cycle)
#[derive(Debug, Clone, Serialize)]
pub struct PhaseReport {
  pub branch: String,
  pub version: String,
  pub commit_message: String,
  pub compare_url: String,
  pub pr_url: Option<String>,
  pub committed: bool,
}

/// Outcome of a full merge day (both desktop phases)
#[derive(Debug, Clone, Serialize)]
pub struct MergeDayReport {
  pub release: PhaseReport,
  pub next_cycle: PhaseReport,
}

/// Outcome of a dot-release branch cut
#[derive(Debug, Clone, Serialize)]
pub struct DotReleaseReport {
  pub channel: String,
  pub base_version: String,
  pub new_version: String,
  pub tag: String,
  pub branch: String,
  pub base_commit: String,
  pub cherry_picked: Vec<String>,
  pub push_hint: String,
}

/// Outcome of an iOS merge day
#[derive(Debug, Clone, Serialize)]
pub struct IosMergeDayReport {
  pub current_version: String,
  pub next_version: String,
  pub release_branch: String,
  pub pushed: bool,
}

/// Outcome of iOS version stamping
#[derive(Debug, Clone, Serialize)]
pub struct IosStampReport {
  pub version: String,
  pub stamped: Vec<String>,
  pub skipped: Vec<String>,
  pub committed: bool,
}

/// Sequences the release workflows; owns no state between runs
pub struct ReleaseCycle<'a> {
  git: &'a SystemGit,
  config: &'a RelmanConfig,
  log: Logger,
}

impl<'a> ReleaseCycle<'a> {
  pub fn new(git: &'a SystemGit, config: &'a RelmanConfig, log: Logger) -> Self {
    Self { git, config, log }
  }

  fn links(&self) -> CompareLinkBuilder {
    CompareLinkBuilder::new(&self.config.remote.compare_host)
  }

  /// Require 'origin', add 'upstream' from config when missing
  pub fn ensure_remotes(&self) -> RelmanResult<()> {
    let remotes = self.git.remotes()?;
    if !remotes.iter().any(|r| r == "origin") {
      return Err(RelmanError::Git(GitError::RemoteMissing {
        name: "origin".to_string(),
      }));
    }
    if !remotes.iter().any(|r| r == "upstream") {
      let url = &self.config.remote.upstream_url;
      self.log.info(format!("[info] Adding remote 'upstream' -> {}", url));
      self.git.add_remote("upstream", url)?;
    }
    Ok(())
  }

  /// Fetch upstream (with tags) and origin
  pub fn sync_remotes(&self) -> RelmanResult<()> {
    self.log.info("[info] Fetching upstream (including tags)");
    self.git.fetch("upstream", &["--tags"])?;
    self.log.detail("[info] Fetching origin");
    self.git.fetch("origin", &[])?;
    Ok(())
  }

  /// Highest `release-v<N>` branch on upstream
  pub fn detect_release_version(&self) -> RelmanResult<u32> {
    let heads = self.git.ls_remote_heads("upstream")?;
    let mut versions: Vec<u32> = heads
      .iter()
      .filter_map(|(_, reference)| {
        RELEASE_BRANCH
          .captures(reference)
          .and_then(|c| c.get(1))
          .and_then(|m| m.as_str().parse().ok())
      })
      .collect();
    versions.sort_unstable();
    versions.pop().ok_or_else(|| {
      RelmanError::with_help(
        "No upstream release-v* branches found",
        "Create the release branch upstream first, or pass --version N.",
      )
    })
  }

  /// Both desktop phases, in order: cut the release, start the next cycle
  pub fn merge_day(&self, event: &ReleaseEvent) -> RelmanResult<MergeDayReport> {
    let release = self.cut_release(event)?;
    let next_cycle = self.start_next_cycle(event)?;
    Ok(MergeDayReport { release, next_cycle })
  }

  /// Phase A: on `release-vN`, strip the pre-release marker and close out
  /// the changelog's vN.0 section
  pub fn cut_release(&self, event: &ReleaseEvent) -> RelmanResult<PhaseReport> {
    let major = event.version;
    let branch = format!("release-v{}", major);
    let remote_branch = format!("upstream/{}", branch);

    if self.git.rev_parse(&remote_branch).is_err() {
      return Err(RelmanError::with_help(
        format!("{} does not exist", remote_branch),
        "Did you create the release branch upstream? Pass --version to override detection.",
      ));
    }

    self.log.info(format!("[info] Fetching {}", remote_branch));
    self.git.fetch("upstream", &[&branch])?;
    self.log.info(format!("[info] Checking out local branch {} from {}", branch, remote_branch));
    self.git.checkout_branch_from(&branch, &remote_branch)?;

    // version.txt: drop a trailing 'a1' so 'N.0a1' becomes 'N.0'
    let version_path = self.git.work_tree.join(&self.config.files.version_file);
    let raw = fs::read_to_string(&version_path)?;
    let parsed = DesktopVersion::parse(&raw)?;
    let released = parsed.strip_pre_release();
    if parsed.alpha {
      self.log.info(format!("[change] version.txt (release): '{}' -> '{}'", parsed, released));
      fs::write(&version_path, format!("{}\n", released))?;
    } else {
      self.log.detail("[info] version.txt (release): no trailing 'a1'; no change");
    }

    // CHANGELOG.md: date the header, resolve the compare link
    let changelog_path = self.git.work_tree.join(&self.config.files.changelog_file);
    let document = fs::read_to_string(&changelog_path)?;
    if changelog::locate_in_progress(&document, major).is_none() {
      self.log.warn(format!(
        "(release) '# v{}.0 (In progress)' not found; nothing to close out",
        major
      ));
    }
    let closed = changelog::close_section(
      &document,
      major,
      &event.date_stamp,
      event.previous,
      &self.links(),
    );
    if closed.changed {
      self.log.info(format!("[change] CHANGELOG.md (release): closed out v{}.0", major));
      self.log.detail(format!("[info] Compare link: {}", closed.compare_url));
      fs::write(&changelog_path, &closed.document)?;
    }

    let commit_message = format!("Cut release v{}.0", major);
    let committed = self.stage_and_commit(&commit_message)?;

    self.log.info(format!("[info] (release) Pushing HEAD to origin:{}", branch));
    self.git.push("origin", &format!("HEAD:{}", branch), true)?;

    Ok(PhaseReport {
      pr_url: self.pr_url(&branch, &branch),
      branch,
      version: released.to_string(),
      commit_message,
      compare_url: closed.compare_url,
      committed,
    })
  }

  /// Phase B: off upstream/main, bump to the next cycle and roll the
  /// changelog over (prepend v(N+1), close out vN) in one rewrite
  pub fn start_next_cycle(&self, event: &ReleaseEvent) -> RelmanResult<PhaseReport> {
    let next = event.version + 1;
    let work_branch = format!("start-release-v{}", next);

    self.log.info("[info] Fetching upstream/main");
    self.git.fetch("upstream", &["main"])?;
    self.log.info(format!("[info] Checking out local branch {} from upstream/main", work_branch));
    self.git.checkout_branch_from(&work_branch, "upstream/main")?;

    // version.txt moves straight to the next alpha
    let next_version = DesktopVersion {
      major: next,
      alpha: true,
    };
    let version_path = self.git.work_tree.join(&self.config.files.version_file);
    let target = format!("{}\n", next_version);
    if fs::read_to_string(&version_path)? == target {
      self.log.detail("[info] version.txt (main): already correct; no change");
    } else {
      self.log.info(format!("[change] version.txt (main): -> '{}'", next_version));
      fs::write(&version_path, target)?;
    }

    // CHANGELOG.md: close out vN and open v(N+1) from one snapshot
    let changelog_path = self.git.work_tree.join(&self.config.files.changelog_file);
    let document = fs::read_to_string(&changelog_path)?;
    if changelog::locate_in_progress(&document, event.version).is_none() {
      self.log.warn(format!(
        "(main) '# v{}.0 (In progress)' not found; will still prepend the next section",
        event.version
      ));
    }
    let cycled = changelog::start_next_cycle(&document, event.version, &event.date_stamp, &self.links());
    self.log.info(format!("[change] CHANGELOG.md (main): opened v{}.0, closed out v{}.0", next, event.version));
    fs::write(&changelog_path, &cycled.document)?;

    let commit_message = format!("Start release v{}.0", next);
    let committed = self.stage_and_commit(&commit_message)?;

    self.log.info(format!("[info] (main) Pushing HEAD to origin:{}", work_branch));
    self.git.push("origin", &format!("HEAD:{}", work_branch), true)?;

    Ok(PhaseReport {
      pr_url: self.pr_url("main", &work_branch),
      branch: work_branch,
      version: next_version.to_string(),
      commit_message,
      compare_url: cycled.compare_url,
      committed,
    })
  }

  /// Cut a dot-release branch from the last shipped release point and
  /// bump the patch level
  pub fn dot_release(&self, channel: DotChannel, cherry_picks: &[String]) -> RelmanResult<DotReleaseReport> {
    let git_branch = channel.git_branch();

    // Live branch: local checkout first, then origin
    if self.git.checkout(&git_branch).is_err() {
      self.log.info(format!("[info] Local branch {} not found, trying origin/{}", git_branch, git_branch));
      self.git.fetch("origin", &[&format!("{}:{}", git_branch, git_branch)])?;
      self.git.checkout(&git_branch)?;
    }
    self.git.pull()?;

    let version_file = &self.config.files.browser_version_file;
    let version_path = self.git.work_tree.join(version_file);
    let current = DotVersion::parse(&fs::read_to_string(&version_path)?)?;
    self.log.info(format!("🔍 Current version: {}", current));

    let (tag, relbranch, derived_base) = match channel {
      DotChannel::Esr(_) => {
        let base = current.base_for_dot_release();
        let tag = format!("FIREFOX_{}esr_RELEASE", base.tag_component());
        let relbranch = format!("FIREFOX_ESR_{}_{}_X_RELBRANCH", base.major, base.minor);
        (tag, relbranch, Some(base))
      }
      DotChannel::Release => {
        let previous_major = current.major.checked_sub(1).ok_or_else(|| RelmanError::AmbiguousTag {
          version: current.to_string(),
          detail: "no previous major to branch from".to_string(),
        })?;
        let tag = format!("FIREFOX_RELEASE_{}_END", previous_major);
        let relbranch = format!("FIREFOX_{}_0_X_RELBRANCH", previous_major);
        (tag, relbranch, None)
      }
    };

    self.git.fetch("origin", &["tag", &tag]).map_err(|_| RelmanError::AmbiguousTag {
      version: current.to_string(),
      detail: format!("tag {} not found on origin", tag),
    })?;

    // Release channel: the base version is whatever shipped at the tag
    let base = match derived_base {
      Some(base) => base,
      None => DotVersion::parse(&self.git.show_file_at(&tag, &version_file.to_string_lossy())?)?,
    };
    self.log.info(format!("⬅️  Previous version base: {}", base));

    let base_commit = self.git.tag_commit(&tag)?;
    let subject = self.git.commit_subject(&base_commit)?;
    self.log.info(format!("📌 Branch will be based on commit {}: {}", base_commit, subject));

    self.git.create_branch_at(&relbranch, &base_commit)?;
    self.log.info(format!("✅ Created branch {} from commit {}", relbranch, base_commit));

    let new_version = base.bump();
    self.log.info(format!("⬆️  New version will be: {}", new_version));
    self.write_dot_version_files(&new_version, matches!(channel, DotChannel::Esr(_)))?;

    self.git.commit_all(&format!("No bug - Bump version to {} a=me", new_version))?;
    self.log.info(format!("📝 Version bump committed: {}", new_version));

    // Validate every cherry-pick before applying any
    for sha in cherry_picks {
      if !self.git.commit_exists(sha) {
        return Err(RelmanError::Git(GitError::CommitNotFound { sha: sha.clone() }));
      }
    }
    let mut cherry_picked = Vec::new();
    for sha in cherry_picks {
      self.git.cherry_pick(sha)?;
      let subject = self.git.commit_subject(sha)?;
      self.log.info(format!("✅ Cherry-picked {}: {}", sha, subject));
      cherry_picked.push(sha.clone());
    }

    let push_hint = format!(
      "lando push-commits --lando-repo firefox-{} --relbranch {}",
      git_branch, relbranch
    );

    Ok(DotReleaseReport {
      channel: git_branch,
      base_version: base.to_string(),
      new_version: new_version.to_string(),
      tag,
      branch: relbranch,
      base_commit,
      cherry_picked,
      push_hint,
    })
  }

  /// iOS merge day: `release/vX.Y` branch off main, rolling bump on main
  pub fn ios_merge_day(&self, push: bool) -> RelmanResult<IosMergeDayReport> {
    self.log.info("🧼 Checking for uncommitted changes...");
    if !self.git.status_porcelain()?.is_empty() {
      return Err(RelmanError::Git(GitError::DirtyWorkTree));
    }

    self.log.info("📦 Checking out 'main' and pulling latest changes...");
    self.git.checkout("main")?;
    self.git.pull()?;

    let version_path = self.git.work_tree.join(&self.config.ios.version_file);
    let raw = fs::read_to_string(&version_path)?;
    let current = IosVersion::parse(raw.lines().next().unwrap_or(""))?;
    self.log.info(format!("✅ Current version found: {}", current));

    let next = current.bump();
    self.log.info(format!("🔢 Next version will be: {}", next));

    let release_branch = format!("release/v{}", current);
    self.log.info(format!("🌿 Creating branch: {} from 'main'...", release_branch));
    self.git.create_branch_at(&release_branch, "HEAD")?;

    self.log.info(format!("✏️  Bumping version in 'main' to {}...", next));
    self.git.checkout("main")?;
    fs::write(&version_path, format!("{}\n", next))?;
    self.git.stage(&[&self.config.ios.version_file.to_string_lossy()])?;
    self.git.commit(&format!("Bump version to {}", next))?;

    if push {
      self.log.info(format!("⬆️  Pushing release branch '{}'...", release_branch));
      self.git.push("origin", &release_branch, true)?;
      self.log.info("⬆️  Pushing updated 'main'...");
      self.git.push("origin", "main", false)?;
    }

    Ok(IosMergeDayReport {
      current_version: current.to_string(),
      next_version: next.to_string(),
      release_branch,
      pushed: push,
    })
  }

  /// Stamp a version across the iOS checkout's plists and bitrise.yml
  pub fn ios_set_version(&self, version: &IosVersion) -> RelmanResult<IosStampReport> {
    let mut stamped = Vec::new();
    let mut skipped = Vec::new();

    self.log.info("Updating plist files...");
    let mut progress = FileProgress::new(self.config.ios.plist_files.len(), "Stamping Info.plist");
    for relative in &self.config.ios.plist_files {
      let display = relative.display().to_string();
      let path = self.git.work_tree.join(relative);
      match fs::read_to_string(&path) {
        Ok(content) => {
          let (rewritten, changed) = stamp_plist_version(&content, version);
          if changed {
            fs::write(&path, rewritten)?;
            stamped.push(display);
          } else {
            skipped.push(display);
          }
        }
        Err(_) => {
          self.log.warn(format!("{} not found; skipping", display));
          skipped.push(display);
        }
      }
      progress.inc();
    }

    self.log.info("Updating bitrise.yml...");
    let bitrise_display = self.config.ios.bitrise_file.display().to_string();
    let bitrise_path = self.git.work_tree.join(&self.config.ios.bitrise_file);
    let content = fs::read_to_string(&bitrise_path)?;
    let (rewritten, changed) = stamp_bitrise(&content, version);
    if changed {
      fs::write(&bitrise_path, rewritten)?;
      stamped.push(bitrise_display);
    } else {
      skipped.push(bitrise_display);
    }

    let committed = if stamped.is_empty() {
      self.log.warn("No files changed; skipping commit");
      false
    } else {
      self.log.info("Creating git commit...");
      self.git.commit_all(&format!("Bump - Set version to {}", version))?;
      true
    };

    Ok(IosStampReport {
      version: version.to_string(),
      stamped,
      skipped,
      committed,
    })
  }

  /// Stage the desktop release files and commit when anything is staged
  fn stage_and_commit(&self, message: &str) -> RelmanResult<bool> {
    let version_file = self.config.files.version_file.to_string_lossy().into_owned();
    let changelog_file = self.config.files.changelog_file.to_string_lossy().into_owned();
    self.git.stage(&[&version_file, &changelog_file])?;

    if self.git.staged_files()?.is_empty() {
      self.log.detail("[info] Nothing staged; skipping commit.");
      return Ok(false);
    }
    self.log.info(format!("[info] Committing: {}", message));
    self.git.commit(message)?;
    Ok(true)
  }

  /// PR URL against upstream, if both remotes parse as GitHub
  fn pr_url(&self, base_branch: &str, head_branch: &str) -> Option<String> {
    let (up_owner, up_repo) = parse_github_remote(&self.git.remote_url("upstream").ok()?)?;
    let (fork_owner, _) = parse_github_remote(&self.git.remote_url("origin").ok()?)?;
    Some(pull_request_url(&up_owner, &up_repo, base_branch, &fork_owner, head_branch))
  }

  /// Rewrite the three Firefox version files for a dot release
  fn write_dot_version_files(&self, version: &DotVersion, esr: bool) -> RelmanResult<()> {
    let display_version = if esr {
      format!("{}esr", version)
    } else {
      version.to_string()
    };

    let files = &self.config.files;
    fs::write(self.git.work_tree.join(&files.browser_version_file), format!("{}\n", version))?;
    fs::write(self.git.work_tree.join(&files.display_version_file), format!("{}\n", display_version))?;

    let milestone_path = self.git.work_tree.join(&files.milestone_file);
    let content = fs::read_to_string(&milestone_path)?;
    let (rewritten, changed) = replace_milestone_line(&content, version);
    if changed {
      fs::write(&milestone_path, rewritten)?;
    }
    Ok(())
  }
}
