pub mod cli;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod countdown;
pub mod ics;
pub mod invite;
pub mod links;
pub mod month_grid;
pub mod share;

use std::ffi::OsString;

use anyhow::Context;
use clap::Parser;
use tracing::{
  debug,
  info
};

pub use clipboard::{
  ClipboardError,
  NativeClipboard,
  SelectionHost,
  copy_text,
  copy_with_fallback
};
pub use countdown::{
  CountdownParts,
  countdown_parts
};
pub use ics::{
  CalendarEvent,
  ICS_MIME_TYPE,
  build_ics
};
pub use invite::Invitation;
pub use month_grid::MonthGrid;

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli = cli::GlobalCli::parse_from(
    raw_args
  );

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting invite CLI"
  );
  debug!(overrides = ?cli.overrides, "command line overrides");

  let mut cfg = config::Config::load(
    cli.config.as_deref()
  )?;
  cfg
    .apply_overrides(cli.overrides)
    .context(
      "failed to apply config overrides"
    )?;

  let stdout = std::io::stdout();
  let mut out = stdout.lock();
  commands::dispatch(
    &cfg,
    cli.command,
    chrono::Utc::now(),
    &mut out
  )?;

  info!("done");
  Ok(())
}
