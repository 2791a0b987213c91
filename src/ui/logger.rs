//! Step logging with an explicit verbosity value
//!
//! The verbosity is a plain value threaded into the orchestrator, not a
//! process-wide flag. Quiet mode suppresses everything except results
//! (PR URLs, push hints) so the output stays scriptable.

/// Output verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
  /// Results only
  Quiet,
  /// Step logs
  Normal,
  /// Step logs plus detail
  Verbose,
}

/// Logger carried by value through the workflows
#[derive(Debug, Clone, Copy)]
pub struct Logger {
  verbosity: Verbosity,
}

impl Logger {
  pub fn new(verbosity: Verbosity) -> Self {
    Self { verbosity }
  }

  /// Resolve the --verbose/--quiet flag pair (--quiet wins)
  pub fn from_flags(verbose: bool, quiet: bool) -> Self {
    let verbosity = if quiet {
      Verbosity::Quiet
    } else if verbose {
      Verbosity::Verbose
    } else {
      Verbosity::Normal
    };
    Self::new(verbosity)
  }

  /// Standard step log (suppressed in quiet mode)
  pub fn info(&self, msg: impl AsRef<str>) {
    if self.verbosity > Verbosity::Quiet {
      println!("{}", msg.as_ref());
    }
  }

  /// Detail log (verbose mode only)
  pub fn detail(&self, msg: impl AsRef<str>) {
    if self.verbosity == Verbosity::Verbose {
      println!("{}", msg.as_ref());
    }
  }

  /// Warning-level notice (suppressed in quiet mode)
  pub fn warn(&self, msg: impl AsRef<str>) {
    if self.verbosity > Verbosity::Quiet {
      eprintln!("⚠️  {}", msg.as_ref());
    }
  }

  /// Result output, printed even in quiet mode
  pub fn result(&self, msg: impl AsRef<str>) {
    println!("{}", msg.as_ref());
  }

  pub fn is_quiet(&self) -> bool {
    self.verbosity == Verbosity::Quiet
  }
}
