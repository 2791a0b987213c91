//! Section boundary discovery for changelog documents
//!
//! A section runs from its own header line to the next line that looks
//! like any version header, or to the end of the document. Matching is
//! case-insensitive on the "In progress" status token and exact on the
//! version number.

use regex::Regex;
use std::sync::LazyLock;

/// Any top-level version header: `# v<digits>.<digits> (...)`.
/// Marks a section boundary regardless of its status token.
static ANY_HEADER: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?m)^#\s*v\d+\.\d+\s*\(.+?\)").unwrap());

/// Byte offsets of one section within a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpan {
  /// Offset of the first character of the section's header line
  pub start: usize,
  /// Offset of the next header line, or the document length
  pub end: usize,
}

/// In-progress header pattern for a specific major version
pub(crate) fn in_progress_header(major: u32) -> Regex {
  Regex::new(&format!(r"(?im)^#\s*v{}\.0\s*\(In progress\)", major)).expect("header pattern")
}

/// Find the in-progress section for `major`.
///
/// Returns `None` when no matching header exists — callers treat that as
/// "nothing to close out", never as a failure.
pub fn locate_in_progress(document: &str, major: u32) -> Option<SectionSpan> {
  let header = in_progress_header(major).find(document)?;
  let end = ANY_HEADER
    .find_at(document, header.end())
    .map(|next| next.start())
    .unwrap_or(document.len());
  Some(SectionSpan {
    start: header.start(),
    end,
  })
}
