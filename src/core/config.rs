//! relman configuration (relman.toml) parsing and validation
//!
//! Everything has a working default reproducing the upstream repository
//! layouts, so the file is optional. Searched in order: relman.toml,
//! .relman.toml at the checkout root.

use crate::core::error::{ConfigError, RelmanError, RelmanResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for relman
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelmanConfig {
  #[serde(default)]
  pub remote: RemoteConfig,
  #[serde(default)]
  pub files: FilesConfig,
  #[serde(default)]
  pub ios: IosConfig,
}

/// Upstream repository and compare-link host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
  /// URL added as the 'upstream' remote when missing
  #[serde(default = "default_upstream_url")]
  pub upstream_url: String,

  /// Host path used in compare links (no scheme)
  #[serde(default = "default_compare_host")]
  pub compare_host: String,
}

fn default_upstream_url() -> String {
  "https://github.com/mozilla/application-services.git".to_string()
}

fn default_compare_host() -> String {
  "github.com/mozilla/application-services".to_string()
}

impl Default for RemoteConfig {
  fn default() -> Self {
    Self {
      upstream_url: default_upstream_url(),
      compare_host: default_compare_host(),
    }
  }
}

/// Paths of the files each workflow rewrites, relative to the checkout root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
  /// Desktop version file
  #[serde(default = "default_version_file")]
  pub version_file: PathBuf,

  /// Desktop changelog
  #[serde(default = "default_changelog_file")]
  pub changelog_file: PathBuf,

  /// Firefox version file (ESR/Release dot releases)
  #[serde(default = "default_browser_version_file")]
  pub browser_version_file: PathBuf,

  /// Firefox display-version file (gets the `esr` suffix)
  #[serde(default = "default_display_version_file")]
  pub display_version_file: PathBuf,

  /// Milestone file whose first version-shaped line is rewritten
  #[serde(default = "default_milestone_file")]
  pub milestone_file: PathBuf,
}

fn default_version_file() -> PathBuf {
  PathBuf::from("version.txt")
}

fn default_changelog_file() -> PathBuf {
  PathBuf::from("CHANGELOG.md")
}

fn default_browser_version_file() -> PathBuf {
  PathBuf::from("browser/config/version.txt")
}

fn default_display_version_file() -> PathBuf {
  PathBuf::from("browser/config/version_display.txt")
}

fn default_milestone_file() -> PathBuf {
  PathBuf::from("config/milestone.txt")
}

impl Default for FilesConfig {
  fn default() -> Self {
    Self {
      version_file: default_version_file(),
      changelog_file: default_changelog_file(),
      browser_version_file: default_browser_version_file(),
      display_version_file: default_display_version_file(),
      milestone_file: default_milestone_file(),
    }
  }
}

/// iOS checkout layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IosConfig {
  /// iOS version file
  #[serde(default = "default_version_file")]
  pub version_file: PathBuf,

  /// bitrise.yml carrying BITRISE_*_VERSION and push_branch keys
  #[serde(default = "default_bitrise_file")]
  pub bitrise_file: PathBuf,

  /// Info.plist files whose CFBundleShortVersionString is stamped
  #[serde(default = "default_plist_files")]
  pub plist_files: Vec<PathBuf>,
}

fn default_bitrise_file() -> PathBuf {
  PathBuf::from("bitrise.yml")
}

fn default_plist_files() -> Vec<PathBuf> {
  [
    "firefox-ios/Client/Info.plist",
    "firefox-ios/CredentialProvider/Info.plist",
    "firefox-ios/Extensions/NotificationService/Info.plist",
    "firefox-ios/Extensions/ShareTo/Info.plist",
    "firefox-ios/WidgetKit/Info.plist",
    "focus-ios/Blockzilla/Info.plist",
    "focus-ios/ContentBlocker/Info.plist",
    "focus-ios/FocusIntentExtension/Info.plist",
    "focus-ios/OpenInFocus/Info.plist",
    "focus-ios/Widgets/Info.plist",
  ]
  .iter()
  .map(PathBuf::from)
  .collect()
}

impl Default for IosConfig {
  fn default() -> Self {
    Self {
      version_file: default_version_file(),
      bitrise_file: default_bitrise_file(),
      plist_files: default_plist_files(),
    }
  }
}

impl RelmanConfig {
  /// Load configuration from the checkout root, or defaults when absent
  pub fn load(root: &Path) -> RelmanResult<Self> {
    for candidate in ["relman.toml", ".relman.toml"] {
      let path = root.join(candidate);
      if path.exists() {
        let content = fs::read_to_string(&path)?;
        let config: RelmanConfig = toml_edit::de::from_str(&content).map_err(|e| {
          RelmanError::Config(ConfigError::Invalid {
            path: path.clone(),
            reason: e.to_string(),
          })
        })?;
        config.validate()?;
        return Ok(config);
      }
    }
    Ok(Self::default())
  }

  /// Validate configuration values
  pub fn validate(&self) -> RelmanResult<()> {
    if self.remote.compare_host.contains("://") {
      return Err(RelmanError::message(format!(
        "compare_host must be a bare host path, not a URL: '{}'",
        self.remote.compare_host
      )));
    }
    if self.remote.upstream_url.is_empty() {
      return Err(RelmanError::Config(ConfigError::MissingField {
        field: "remote.upstream_url".to_string(),
      }));
    }
    Ok(())
  }
}
