use std::fs;
use std::io::Write;
use std::path::{
  Path,
  PathBuf
};

use anyhow::Context;
use chrono::{
  DateTime,
  Utc,
  Weekday
};
use serde::Serialize;
use tracing::{
  debug,
  info
};

use crate::cli::Command;
use crate::config::Config;
use crate::countdown::countdown_parts;
use crate::ics::{
  build_ics,
  ics_file_name
};
use crate::links::{
  google_calendar_link_for,
  google_maps_search_link
};
use crate::month_grid::{
  MonthGrid,
  parse_week_start
};

const MONTH_NAMES: [&str; 12] = [
  "January",
  "February",
  "March",
  "April",
  "May",
  "June",
  "July",
  "August",
  "September",
  "October",
  "November",
  "December"
];

#[derive(Serialize)]
struct CalendarView<'a> {
  #[serde(flatten)]
  grid:      &'a MonthGrid,
  highlight: Option<u32>
}

#[tracing::instrument(skip_all)]
pub fn dispatch<W>(
  cfg: &Config,
  command: Command,
  now: DateTime<Utc>,
  out: &mut W
) -> anyhow::Result<()>
where
  W: Write
{
  debug!(?command, "dispatching");
  match command {
    | Command::Countdown { now: at, json } => {
      let now = at
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(now);
      cmd_countdown(cfg, now, json, out)
    }
    | Command::Calendar {
      year,
      month,
      week_start,
      json
    } => {
      let week_start = week_start
        .as_deref()
        .map(parse_week_start)
        .unwrap_or_else(|| cfg.week_start());
      cmd_calendar(
        cfg, year, month, week_start, json,
        out
      )
    }
    | Command::Ics { out: path } => {
      cmd_ics(cfg, path.as_deref(), out)
    }
    | Command::Links => cmd_links(cfg, out),
    | Command::ShareText => {
      let payload =
        cfg.invitation.share_payload();
      writeln!(out, "{}", payload.title)?;
      writeln!(out)?;
      writeln!(out, "{}", payload.text)?;
      Ok(())
    }
  }
}

fn cmd_countdown<W: Write>(
  cfg: &Config,
  now: DateTime<Utc>,
  json: bool,
  out: &mut W
) -> anyhow::Result<()> {
  let target =
    cfg.invitation.wedding_instant();
  let parts = countdown_parts(&target, &now);
  debug!(%target, %now, %parts, "computed countdown");

  if json {
    serde_json::to_writer_pretty(
      &mut *out, &parts
    )?;
    writeln!(out)?;
    return Ok(());
  }

  writeln!(
    out,
    "{} ({})",
    cfg.invitation.couple(),
    cfg.invitation.datetime_text
  )?;
  if parts.is_finished() {
    writeln!(out, "The day has arrived.")?;
  } else {
    writeln!(
      out,
      "{} days {} left",
      parts.days,
      parts.clock()
    )?;
  }
  Ok(())
}

fn cmd_calendar<W: Write>(
  cfg: &Config,
  year: Option<i32>,
  month: Option<u32>,
  week_start: Weekday,
  json: bool,
  out: &mut W
) -> anyhow::Result<()> {
  let (focus_year, focus_month, focus_day) =
    cfg.invitation.calendar_focus();
  let year = year.unwrap_or(focus_year);
  let month = month.unwrap_or(focus_month);

  let grid =
    MonthGrid::build_with_week_start(
      year, month, week_start
    )?;
  let highlight = (year == focus_year
    && month == focus_month)
    .then_some(focus_day);

  if json {
    serde_json::to_writer_pretty(
      &mut *out,
      &CalendarView {
        grid: &grid,
        highlight
      }
    )?;
    writeln!(out)?;
    return Ok(());
  }

  write!(out, "{}", render_month(&grid, highlight))?;
  Ok(())
}

/// Plain-text month view, four columns per
/// day; the highlighted day carries a `*`.
#[must_use]
pub fn render_month(
  grid: &MonthGrid,
  highlight: Option<u32>
) -> String {
  let name = MONTH_NAMES
    .get(grid.month.saturating_sub(1) as usize)
    .copied()
    .unwrap_or("?");
  let mut text = format!(
    "{:^28}\n",
    format!("{name} {}", grid.year)
  );

  for label in grid.labels() {
    text.push_str(&format!("{label:>3} "));
  }
  text.push('\n');

  for week in &grid.weeks {
    for cell in week {
      let rendered = match cell {
        | Some(day) if Some(*day) == highlight => {
          format!("{day:>3}*")
        }
        | Some(day) => format!("{day:>3} "),
        | None => "    ".to_string()
      };
      text.push_str(&rendered);
    }
    text.push('\n');
  }
  text
}

fn cmd_ics<W: Write>(
  cfg: &Config,
  path: Option<&Path>,
  out: &mut W
) -> anyhow::Result<()> {
  let event = cfg.invitation.calendar_event();
  event.validate().context(
    "ceremony cannot be exported"
  )?;
  let doc = build_ics(&event);

  let Some(path) = path else {
    out.write_all(doc.as_bytes())?;
    return Ok(());
  };

  let target: PathBuf = if path.is_dir() {
    path.join(ics_file_name(&event.title))
  } else {
    path.to_path_buf()
  };
  fs::write(&target, &doc).with_context(
    || {
      format!(
        "failed to write {}",
        target.display()
      )
    }
  )?;
  info!(file = %target.display(), bytes = doc.len(), "wrote ics");
  writeln!(out, "{}", target.display())?;
  Ok(())
}

fn cmd_links<W: Write>(
  cfg: &Config,
  out: &mut W
) -> anyhow::Result<()> {
  writeln!(
    out,
    "map:      {}",
    google_maps_search_link(
      &cfg.invitation.address
    )
  )?;
  writeln!(
    out,
    "calendar: {}",
    google_calendar_link_for(&cfg.invitation)
  )?;
  Ok(())
}
