mod changelog;
mod commands;
mod core;
mod release;
mod ui;
mod version;

use clap::{Parser, Subcommand};
use crate::core::error::{RelmanError, print_error};

/// Automate Firefox release bookkeeping: version bumps, changelog
/// roll-over, release branch cuts
#[derive(Parser)]
#[command(name = "relman")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,

  /// Stream detailed git output and step-by-step logs
  #[arg(long, global = true)]
  verbose: bool,

  /// Print only results (PR URLs, push hints)
  #[arg(long, global = true)]
  quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
  /// Run both merge-day phases: cut the release branch, start the next cycle
  MergeDay {
    /// Release version N to use (e.g. 144); auto-detects the highest
    /// upstream release-vN branch when omitted
    #[arg(long)]
    version: Option<u32>,
    /// Output the run report in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Cut the release branch only (strip pre-release marker, date the changelog)
  Cut {
    /// Release version N to use; auto-detected when omitted
    #[arg(long)]
    version: Option<u32>,
    /// Output the run report in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Start the next cycle on main only (bump version, roll the changelog over)
  StartCycle {
    /// CURRENT release version N (the next cycle becomes N+1); auto-detected when omitted
    #[arg(long)]
    version: Option<u32>,
    /// Output the run report in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Cut an ESR/Release dot-release branch from the last shipped tag
  DotRelease {
    /// Channel: esr<major> (e.g. esr140) or 'release'
    channel: String,
    /// Commit to cherry-pick onto the new branch (repeatable)
    #[arg(long = "cherry-pick", value_name = "SHA")]
    cherry_picks: Vec<String>,
    /// Output the run report in JSON format
    #[arg(long)]
    json: bool,
  },

  /// iOS release automation
  #[command(subcommand)]
  Ios(IosCommands),

  /// Compute the next version under a release-line policy (no git access)
  Bump {
    /// Current version string (e.g. 143.0a1, 140.2, 142.3)
    version: String,
    /// Release line: desktop, esr-dot, release-dot, or ios-rolling
    #[arg(long)]
    policy: String,
    /// Output the computed versions in JSON format
    #[arg(long)]
    json: bool,
  },
}

#[derive(Subcommand)]
enum IosCommands {
  /// Create the release branch and roll the version forward on main
  MergeDay {
    /// Push the release branch and updated main to origin
    #[arg(long)]
    push: bool,
    /// Output the run report in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Stamp a version across Info.plist files and bitrise.yml
  SetVersion {
    /// Version to stamp (e.g. 142.3)
    version: String,
    /// Output the run report in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();
  let (verbose, quiet) = (cli.verbose, cli.quiet);

  let result = match cli.command {
    Commands::MergeDay { version, json } => commands::run_merge_day(version, json, verbose, quiet),
    Commands::Cut { version, json } => commands::run_cut(version, json, verbose, quiet),
    Commands::StartCycle { version, json } => commands::run_start_cycle(version, json, verbose, quiet),
    Commands::DotRelease {
      channel,
      cherry_picks,
      json,
    } => commands::run_dot_release(channel, cherry_picks, json, verbose, quiet),
    Commands::Ios(ios_cmd) => match ios_cmd {
      IosCommands::MergeDay { push, json } => commands::run_ios_merge_day(push, json, verbose, quiet),
      IosCommands::SetVersion { version, json } => commands::run_ios_set_version(version, json, verbose, quiet),
    },
    Commands::Bump { version, policy, json } => commands::run_bump(version, policy, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: RelmanError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
