//! Scoped changelog edits: close a section, open the next one
//!
//! Both transformations locate the target section first and substitute
//! only inside its span. Each substitution replaces the first occurrence
//! scanning forward from the section start; a malformed section with two
//! placeholders keeps its second one untouched. Everything outside the
//! span is carried over byte-identical.

use crate::changelog::compare::CompareLinkBuilder;
use crate::changelog::section::{in_progress_header, locate_in_progress};
use regex::{NoExpand, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

/// The pending compare-link placeholder, case-insensitive on the status
static PENDING_LINK: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)\[Full Changelog\]\(In progress\)").unwrap());

/// Result of closing out a section
#[derive(Debug, Clone)]
pub struct CloseOutcome {
  /// The rewritten document (identical to the input when nothing matched)
  pub document: String,
  /// Whether either substitution happened
  pub changed: bool,
  /// Compare URL for this release — computed even when the header was
  /// missing, so callers can still log it
  pub compare_url: String,
}

/// Result of the combined close-out + new-section rewrite
#[derive(Debug, Clone)]
pub struct CycleOutcome {
  pub document: String,
  /// Compare URL for the section that was closed out
  pub compare_url: String,
}

/// Close out the in-progress section for `major`: date the header and
/// resolve the pending compare link, both scoped to that section.
///
/// A missing header is not an error — the document comes back untouched
/// with `changed = false`. Re-running on an already-dated section is a
/// no-op for the same reason.
pub fn close_section(
  document: &str,
  major: u32,
  date_stamp: &str,
  previous: u32,
  links: &CompareLinkBuilder,
) -> CloseOutcome {
  let compare_url = links.build(previous, major);

  let Some(span) = locate_in_progress(document, major) else {
    return CloseOutcome {
      document: document.to_string(),
      changed: false,
      compare_url,
    };
  };

  let before = &document[..span.start];
  let section = &document[span.start..span.end];
  let after = &document[span.end..];

  let dated_header = format!("# v{}.0 (_{}_)", major, date_stamp);
  let (section, header_changed) =
    replace_first(&in_progress_header(major), section, &dated_header);

  let resolved_link = format!("[Full Changelog]({})", compare_url);
  let (section, link_changed) = replace_first(&PENDING_LINK, &section, &resolved_link);

  CloseOutcome {
    document: format!("{}{}{}", before, section, after),
    changed: header_changed || link_changed,
    compare_url,
  }
}

/// Prepend a fresh in-progress section for `major` ahead of all existing
/// content. Never fails, always mutates.
pub fn open_new_section(document: &str, major: u32) -> String {
  format!(
    "# v{}.0 (In progress)\n\n[Full Changelog](In progress)\n\n{}",
    major, document
  )
}

/// Close out `current` and open `current + 1`, computed from one document
/// snapshot and applied as a single rewrite. The close-out comes first;
/// the prepend must not run before it since it shifts every offset.
pub fn start_next_cycle(
  document: &str,
  current: u32,
  date_stamp: &str,
  links: &CompareLinkBuilder,
) -> CycleOutcome {
  let closed = close_section(document, current, date_stamp, current.saturating_sub(1), links);
  CycleOutcome {
    document: open_new_section(&closed.document, current + 1),
    compare_url: closed.compare_url,
  }
}

/// Replace the first match of `re` in `text`, reporting whether anything
/// changed. The replacement is taken literally.
fn replace_first(re: &Regex, text: &str, replacement: &str) -> (String, bool) {
  match re.replacen(text, 1, NoExpand(replacement)) {
    Cow::Borrowed(_) => (text.to_string(), false),
    Cow::Owned(rewritten) => (rewritten, true),
  }
}
