//! Version schemes and bump rules for the supported release lines
//!
//! Firefox version numbers are not semver: desktop Application Services
//! versions are a bare major with an `a1` pre-release marker (`143.0a1`),
//! ESR/Release dot versions carry two or three components (`140.2`,
//! `140.1.1`), and iOS uses a rolling `major.minor` pair where the minor
//! cycles 0→1→2→3 before the major advances. Each scheme gets its own
//! value type; `Policy` selects which grammar a given input is parsed
//! against. Values are immutable — every bump returns a new value.

use crate::core::error::{FormatError, RelmanResult};
use serde::Serialize;
use std::fmt;

/// Release-line policy selecting the version grammar and bump rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Policy {
  /// Application Services desktop: `N.0a1` on main, `N.0` when cut
  Desktop,
  /// ESR dot release: `major.minor` or `major.minor.patch`
  EsrDot,
  /// Release-channel dot release: same grammar as ESR
  ReleaseDot,
  /// iOS rolling: `major.minor` with minor in 0..=3
  IosRolling,
}

impl Policy {
  /// Parse a version string against this policy's grammar
  pub fn parse(self, text: &str) -> RelmanResult<Version> {
    match self {
      Policy::Desktop => DesktopVersion::parse(text).map(Version::Desktop),
      Policy::EsrDot | Policy::ReleaseDot => DotVersion::parse(text).map(Version::Dot),
      Policy::IosRolling => IosVersion::parse(text).map(Version::Ios),
    }
  }
}

/// A version value under one of the supported schemes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Version {
  Desktop(DesktopVersion),
  Dot(DotVersion),
  Ios(IosVersion),
}

impl Version {
  /// Remove a trailing `a1` marker if present; no-op otherwise.
  ///
  /// Idempotent: stripping twice equals stripping once.
  pub fn strip_pre_release(&self) -> Version {
    match self {
      Version::Desktop(v) => Version::Desktop(v.strip_pre_release()),
      other => other.clone(),
    }
  }

  /// Compute the next version under this value's scheme
  pub fn bump(&self) -> Version {
    match self {
      Version::Desktop(v) => Version::Desktop(v.bump()),
      Version::Dot(v) => Version::Dot(v.bump()),
      Version::Ios(v) => Version::Ios(v.bump()),
    }
  }

  /// Major component, whatever the scheme
  pub fn major(&self) -> u32 {
    match self {
      Version::Desktop(v) => v.major,
      Version::Dot(v) => v.major,
      Version::Ios(v) => v.major,
    }
  }
}

impl fmt::Display for Version {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Version::Desktop(v) => write!(f, "{}", v),
      Version::Dot(v) => write!(f, "{}", v),
      Version::Ios(v) => write!(f, "{}", v),
    }
  }
}

/// Strict decimal parse: rejects signs, whitespace, and empty input
/// (u32::from_str would accept a leading `+`)
fn parse_component(text: &str, whole: &str, expected: &'static str) -> Result<u32, FormatError> {
  if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
    return Err(FormatError {
      value: whole.to_string(),
      expected,
    });
  }
  text.parse().map_err(|_| FormatError {
    value: whole.to_string(),
    expected,
  })
}

/// Application Services desktop version: `143.0a1` on main, `143.0` once cut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DesktopVersion {
  pub major: u32,
  /// Whether the `a1` pre-release marker is present
  pub alpha: bool,
}

impl DesktopVersion {
  const EXPECTED: &'static str = "N.0 or N.0a1";

  pub fn parse(text: &str) -> RelmanResult<Self> {
    let trimmed = text.trim();
    let (body, alpha) = match trimmed.strip_suffix("a1") {
      Some(body) => (body, true),
      None => (trimmed, false),
    };
    let Some((major, zero)) = body.split_once('.') else {
      return Err(
        FormatError {
          value: trimmed.to_string(),
          expected: Self::EXPECTED,
        }
        .into(),
      );
    };
    if zero != "0" {
      return Err(
        FormatError {
          value: trimmed.to_string(),
          expected: Self::EXPECTED,
        }
        .into(),
      );
    }
    let major = parse_component(major, trimmed, Self::EXPECTED)?;
    Ok(Self { major, alpha })
  }

  /// Next cycle: `(major+1).0a1` with the marker re-applied
  pub fn bump(&self) -> Self {
    Self {
      major: self.major + 1,
      alpha: true,
    }
  }

  /// Drop the `a1` marker if present; no-op and idempotent otherwise
  pub fn strip_pre_release(&self) -> Self {
    Self {
      major: self.major,
      alpha: false,
    }
  }
}

impl fmt::Display for DesktopVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.alpha {
      write!(f, "{}.0a1", self.major)
    } else {
      write!(f, "{}.0", self.major)
    }
  }
}

/// ESR / Release dot version: `140.2` or `140.1.1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DotVersion {
  pub major: u32,
  pub minor: u32,
  /// Absent means "0" for ordering purposes, but the rendered form keeps
  /// the component count it was parsed with
  pub patch: Option<u32>,
}

impl DotVersion {
  const EXPECTED: &'static str = "major.minor or major.minor.patch";

  pub fn parse(text: &str) -> RelmanResult<Self> {
    let trimmed = text.trim();
    let parts: Vec<&str> = trimmed.split('.').collect();
    let (major, minor, patch) = match parts.as_slice() {
      [major, minor] => (*major, *minor, None),
      [major, minor, patch] => (*major, *minor, Some(*patch)),
      _ => {
        return Err(
          FormatError {
            value: trimmed.to_string(),
            expected: Self::EXPECTED,
          }
          .into(),
        );
      }
    };
    Ok(Self {
      major: parse_component(major, trimmed, Self::EXPECTED)?,
      minor: parse_component(minor, trimmed, Self::EXPECTED)?,
      patch: patch
        .map(|p| parse_component(p, trimmed, Self::EXPECTED))
        .transpose()?,
    })
  }

  /// Increment the last present component, or append `.1` to a
  /// two-component version: `140.1` → `140.1.1`, `140.1.1` → `140.1.2`
  pub fn bump(&self) -> Self {
    match self.patch {
      None => Self {
        patch: Some(1),
        ..*self
      },
      Some(p) => Self {
        patch: Some(p + 1),
        ..*self
      },
    }
  }

  /// Version of the last shipped dot release on this branch.
  ///
  /// A version whose trailing components are all zero is itself the base
  /// (`141.0`, `141.0.0` → `141.0`; `140.1.0` → `140.1.0`); otherwise the
  /// last non-zero trailing component is decremented and the result
  /// normalized to its `.0` terminal form (`140.2` → `140.1.0`,
  /// `140.1.1` → `140.1.0`). Exactly inverts `bump` on the common path,
  /// so the derived value names the tag of the last shipped build.
  pub fn base_for_dot_release(&self) -> Self {
    match (self.minor, self.patch) {
      (0, None) => *self,
      (0, Some(0)) => Self {
        major: self.major,
        minor: 0,
        patch: None,
      },
      (_, Some(0)) => *self,
      (minor, None) => Self {
        major: self.major,
        minor: minor - 1,
        patch: Some(0),
      },
      (_, Some(patch)) => Self {
        patch: Some(patch - 1),
        ..*self
      },
    }
  }

  /// Underscore-joined form used in release tag names (`140_1_0`)
  pub fn tag_component(&self) -> String {
    self.to_string().replace('.', "_")
  }
}

impl fmt::Display for DotVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.patch {
      Some(p) => write!(f, "{}.{}.{}", self.major, self.minor, p),
      None => write!(f, "{}.{}", self.major, self.minor),
    }
  }
}

/// iOS rolling version: `142.3`, minor cycles 0→1→2→3 then the major moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IosVersion {
  pub major: u32,
  pub minor: u32,
}

impl IosVersion {
  const EXPECTED: &'static str = "major.minor with minor in 0-3";

  pub fn parse(text: &str) -> RelmanResult<Self> {
    let trimmed = text.trim();
    let Some((major, minor)) = trimmed.split_once('.') else {
      return Err(
        FormatError {
          value: trimmed.to_string(),
          expected: Self::EXPECTED,
        }
        .into(),
      );
    };
    let major = parse_component(major, trimmed, Self::EXPECTED)?;
    let minor = parse_component(minor, trimmed, Self::EXPECTED)?;
    if minor > 3 {
      return Err(
        FormatError {
          value: trimmed.to_string(),
          expected: Self::EXPECTED,
        }
        .into(),
      );
    }
    Ok(Self { major, minor })
  }

  /// Rolling bump: minor++ until 3, then major++ and minor resets
  pub fn bump(&self) -> Self {
    if self.minor < 3 {
      Self {
        major: self.major,
        minor: self.minor + 1,
      }
    } else {
      Self {
        major: self.major + 1,
        minor: 0,
      }
    }
  }
}

impl fmt::Display for IosVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}", self.major, self.minor)
  }
}
