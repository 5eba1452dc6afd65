use anyhow::{
  anyhow,
  bail
};
use chrono::NaiveDateTime;
use chrono_tz::Tz;
use serde::{
  Deserialize,
  Serialize
};

pub const ICS_MIME_TYPE: &str =
  "text/calendar";

const ICS_DATETIME_FORMAT: &str =
  "%Y%m%dT%H%M%S";
const CRLF: &str = "\r\n";
const MAX_LINE_OCTETS: usize = 75;

/// A single event to export. Start and end
/// are wall-clock times in `timezone_id`.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct CalendarEvent {
  pub title:       String,
  pub start_local: NaiveDateTime,
  pub end_local:   NaiveDateTime,
  pub timezone_id: String,
  pub location:    String,
  pub description: String
}

impl CalendarEvent {
  /// Check that the event can be imported:
  /// a non-empty span and a known zone id.
  pub fn validate(&self) -> anyhow::Result<()> {
    if self.start_local >= self.end_local {
      bail!(
        "event must end after it starts \
         ({} >= {})",
        self.start_local,
        self.end_local
      );
    }

    self
      .timezone_id
      .trim()
      .parse::<Tz>()
      .map_err(|err| {
        anyhow!(
          "unknown timezone id {:?}: {err}",
          self.timezone_id
        )
      })?;

    Ok(())
  }
}

/// Render `event` as an iCalendar document.
///
/// Lines are CRLF terminated and folded at 75
/// octets. Text values are escaped, so the
/// builder accepts any strings; it does not
/// check the event itself (see
/// [`CalendarEvent::validate`]).
#[tracing::instrument(skip_all, fields(title = %event.title))]
#[must_use]
pub fn build_ics(
  event: &CalendarEvent
) -> String {
  let lines = [
    "BEGIN:VCALENDAR".to_string(),
    "VERSION:2.0".to_string(),
    "CALSCALE:GREGORIAN".to_string(),
    "BEGIN:VEVENT".to_string(),
    format!(
      "DTSTART;TZID={}:{}",
      event.timezone_id,
      event
        .start_local
        .format(ICS_DATETIME_FORMAT)
    ),
    format!(
      "DTEND;TZID={}:{}",
      event.timezone_id,
      event
        .end_local
        .format(ICS_DATETIME_FORMAT)
    ),
    format!(
      "SUMMARY:{}",
      escape_text(&event.title)
    ),
    format!(
      "DESCRIPTION:{}",
      escape_text(&event.description)
    ),
    format!(
      "LOCATION:{}",
      escape_text(&event.location)
    ),
    "END:VEVENT".to_string(),
    "END:VCALENDAR".to_string()
  ];

  let mut out = String::new();
  for line in &lines {
    out.push_str(&fold_line(line));
    out.push_str(CRLF);
  }
  tracing::debug!(
    bytes = out.len(),
    "built ics document"
  );
  out
}

/// Escape a TEXT property value.
#[must_use]
pub fn escape_text(raw: &str) -> String {
  let mut out =
    String::with_capacity(raw.len());
  let mut chars = raw.chars().peekable();
  while let Some(ch) = chars.next() {
    match ch {
      | '\\' => out.push_str("\\\\"),
      | ';' => out.push_str("\\;"),
      | ',' => out.push_str("\\,"),
      | '\r' => {
        if chars.peek() == Some(&'\n') {
          chars.next();
        }
        out.push_str("\\n");
      }
      | '\n' => out.push_str("\\n"),
      | other => out.push(other)
    }
  }
  out
}

/// Split a content line into chunks of at
/// most 75 octets, continuation chunks led by
/// one space. Code points are never split.
fn fold_line(line: &str) -> String {
  if line.len() <= MAX_LINE_OCTETS {
    return line.to_string();
  }

  let mut out = String::with_capacity(
    line.len() + line.len() / 64 * 3
  );
  let mut budget = MAX_LINE_OCTETS;
  let mut used = 0;
  for ch in line.chars() {
    let width = ch.len_utf8();
    if used + width > budget {
      out.push_str(CRLF);
      out.push(' ');
      // the leading space counts
      budget = MAX_LINE_OCTETS - 1;
      used = 0;
    }
    out.push(ch);
    used += width;
  }
  out
}

/// `<slug>.ics`, keeping ASCII letters and
/// digits and collapsing everything else to
/// single dashes.
#[must_use]
pub fn ics_file_name(title: &str) -> String {
  let mut slug = String::new();
  for ch in title.chars() {
    if ch.is_ascii_alphanumeric() {
      slug.push(ch.to_ascii_lowercase());
    } else if !slug.is_empty()
      && !slug.ends_with('-')
    {
      slug.push('-');
    }
  }
  let slug = slug.trim_end_matches('-');
  if slug.is_empty() {
    "event.ics".to_string()
  } else {
    format!("{slug}.ics")
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::{
    CalendarEvent,
    build_ics,
    escape_text,
    fold_line,
    ics_file_name
  };

  fn sample_event() -> CalendarEvent {
    let day =
      NaiveDate::from_ymd_opt(2026, 2, 19)
        .expect("valid date");
    CalendarEvent {
      title:       "Test Event".to_string(),
      start_local: day
        .and_hms_opt(19, 0, 0)
        .expect("valid time"),
      end_local:   day
        .and_hms_opt(21, 0, 0)
        .expect("valid time"),
      timezone_id: "America/Toronto"
        .to_string(),
      location:    "Hall".to_string(),
      description: "Line1\nLine2".to_string()
    }
  }

  #[test]
  fn renders_the_expected_properties() {
    let doc = build_ics(&sample_event());

    for needle in [
      "DTSTART;TZID=America/Toronto:20260219T190000",
      "DTEND;TZID=America/Toronto:20260219T210000",
      "SUMMARY:Test Event",
      "DESCRIPTION:Line1\\nLine2",
      "LOCATION:Hall"
    ] {
      assert!(
        doc.contains(needle),
        "missing {needle} in {doc}"
      );
    }
  }

  #[test]
  fn keeps_the_fixed_line_order() {
    let doc = build_ics(&sample_event());
    let keys = doc
      .split("\r\n")
      .filter(|line| !line.is_empty())
      .map(|line| {
        line
          .split([':', ';'])
          .next()
          .unwrap_or_default()
      })
      .collect::<Vec<_>>();

    assert_eq!(
      keys,
      [
        "BEGIN",
        "VERSION",
        "CALSCALE",
        "BEGIN",
        "DTSTART",
        "DTEND",
        "SUMMARY",
        "DESCRIPTION",
        "LOCATION",
        "END",
        "END"
      ]
    );
    assert!(doc.ends_with("END:VCALENDAR\r\n"));
    assert!(!doc.replace("\r\n", "").contains('\n'));
  }

  #[test]
  fn escapes_structural_characters() {
    assert_eq!(
      escape_text("a,b;c\\d\r\ne\nf"),
      "a\\,b\\;c\\\\d\\ne\\nf"
    );
  }

  #[test]
  fn folds_long_lines_on_char_boundaries() {
    let long = format!(
      "DESCRIPTION:{}",
      "결혼식".repeat(20)
    );
    let folded = fold_line(&long);

    for (idx, piece) in
      folded.split("\r\n").enumerate()
    {
      assert!(piece.len() <= 75);
      if idx > 0 {
        assert!(piece.starts_with(' '));
      }
    }
    assert_eq!(
      folded.replace("\r\n ", ""),
      long
    );
  }

  #[test]
  fn validate_rejects_bad_events() {
    assert!(sample_event().validate().is_ok());

    let mut backwards = sample_event();
    backwards.end_local = backwards.start_local;
    assert!(backwards.validate().is_err());

    let mut unknown_zone = sample_event();
    unknown_zone.timezone_id =
      "Mars/Olympus_Mons".to_string();
    assert!(unknown_zone.validate().is_err());
  }

  #[test]
  fn file_names_are_slugged() {
    assert_eq!(
      ics_file_name("Hyuck ♥ Yeseul Wedding"),
      "hyuck-yeseul-wedding.ics"
    );
    assert_eq!(ics_file_name("♥"), "event.ics");
  }
}
