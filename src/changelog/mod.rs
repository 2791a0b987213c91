//! Changelog section engine
//!
//! A changelog is an ordered stack of version sections, newest first:
//!
//! ```markdown
//! # v143.0 (In progress)
//!
//! [Full Changelog](In progress)
//!
//! # v142.0 (_2025-06-10_)
//!
//! [Full Changelog](https://github.com/.../compare/v141.0...v142.0)
//! ...
//! ```
//!
//! Edits are locate-then-scope: a section's byte span is computed first
//! (**section**), then every substitution is restricted to that span
//! (**editor**), so a stray match in an older section can never be
//! touched. Compare links between consecutive tags are pure string
//! formatting (**compare**). All functions here are text-in/text-out;
//! nothing reads or writes files.

pub mod compare;
pub mod editor;
pub mod section;

pub use compare::CompareLinkBuilder;
pub use editor::{CloseOutcome, CycleOutcome, close_section, open_new_section, start_next_cycle};
pub use section::{SectionSpan, locate_in_progress};
