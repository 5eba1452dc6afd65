use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use chrono::{DateTime, FixedOffset};
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::parse_key_value;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "invite",
    version,
    about = "Wedding invitation toolkit: countdown, calendar, .ics export and links"
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Invitation config file (TOML).
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Override a config value, e.g. `--set duration_minutes=90`.
    #[arg(
        long = "set",
        value_parser = clap::builder::ValueParser::new(parse_key_value),
        action = ArgAction::Append,
        global = true
    )]
    pub overrides: Vec<(String, String)>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Time left until the ceremony.
    Countdown {
        /// Count from this instant instead of the system clock (RFC 3339).
        #[arg(long, value_parser = parse_instant)]
        now: Option<DateTime<FixedOffset>>,

        #[arg(long)]
        json: bool,
    },
    /// Month view with the ceremony day marked.
    Calendar {
        #[arg(long)]
        year: Option<i32>,

        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// `sunday` or `monday`; defaults to the config value.
        #[arg(long = "week-start")]
        week_start: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// Export the ceremony as an iCalendar file.
    Ics {
        /// Write here instead of stdout. A directory gets a generated file name.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Map and calendar links.
    Links,
    /// The text a share sheet would receive.
    ShareText,
}

fn parse_instant(raw: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map_err(|e| anyhow!("expected an RFC 3339 instant, got {raw:?}: {e}"))
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
