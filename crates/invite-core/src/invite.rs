use anyhow::{
  Context,
  anyhow
};
use chrono::{
  DateTime,
  Datelike,
  Duration,
  FixedOffset,
  NaiveDateTime,
  Offset,
  TimeZone
};
use chrono_tz::Tz;
use serde::{
  Deserialize,
  Serialize
};

use crate::ics::CalendarEvent;

pub const DEFAULT_INVITE_TOML: &str =
  include_str!("../assets/invite.toml");

const DEFAULT_TIMEZONE_ID: &str =
  "America/Toronto";

fn default_duration_minutes() -> u32 {
  120
}

fn default_timezone_id() -> String {
  DEFAULT_TIMEZONE_ID.to_string()
}

fn default_share_title_suffix() -> String {
  "Wedding Invitation".to_string()
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct Person {
  pub name:    String,
  #[serde(default)]
  pub name_en: String
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
)]
pub struct ETransfer {
  pub groom: String,
  pub bride: String
}

/// Title and body handed to a share sheet.
#[derive(
  Debug, Clone, PartialEq, Eq, Serialize,
)]
pub struct SharePayload {
  pub title: String,
  pub text:  String
}

/// Everything the invitation page shows.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct Invitation {
  pub groom:              Person,
  pub bride:              Person,
  pub datetime_text:      String,
  /// The ceremony start with the fixed UTC
  /// offset it was announced in.
  pub starts_at:
    DateTime<FixedOffset>,
  #[serde(default = "default_duration_minutes")]
  pub duration_minutes:   u32,
  #[serde(default = "default_timezone_id")]
  pub timezone_id:        String,
  pub venue_name:         String,
  pub address:            String,
  #[serde(default)]
  pub event_title:        Option<String>,
  #[serde(default = "default_share_title_suffix")]
  pub share_title_suffix: String,
  #[serde(default)]
  pub greeting_lines:     Vec<String>,
  #[serde(default)]
  pub traffic_text:       String,
  #[serde(default)]
  pub rsvp_text:          String,
  #[serde(default)]
  pub meal_lines:         Vec<String>,
  #[serde(default)]
  pub thanks_text:        String,
  #[serde(default)]
  pub etransfer:          ETransfer,
  #[serde(default)]
  pub photos:             Vec<String>,
  #[serde(default)]
  pub map_image:          Option<String>
}

impl Invitation {
  /// The built-in invitation.
  pub fn embedded() -> anyhow::Result<Self> {
    toml::from_str(DEFAULT_INVITE_TOML)
      .context(
        "failed to parse embedded \
         invite.toml"
      )
  }

  #[must_use]
  pub fn wedding_instant(
    &self
  ) -> DateTime<FixedOffset> {
    self.starts_at
  }

  /// `"<groom> ♥ <bride>"`
  #[must_use]
  pub fn couple(&self) -> String {
    format!(
      "{} ♥ {}",
      self.groom.name, self.bride.name
    )
  }

  /// `"<groom> & <bride>"` in the romanised
  /// names, falling back to the primary ones.
  #[must_use]
  pub fn couple_en(&self) -> String {
    let pick = |person: &Person| {
      if person.name_en.is_empty() {
        person.name.clone()
      } else {
        person.name_en.clone()
      }
    };
    format!(
      "{} & {}",
      pick(&self.groom),
      pick(&self.bride)
    )
  }

  /// Year, month and day of the ceremony in
  /// its own offset; the day is the one the
  /// calendar widget highlights.
  #[must_use]
  pub fn calendar_focus(
    &self
  ) -> (i32, u32, u32) {
    let date = self.starts_at.date_naive();
    (date.year(), date.month(), date.day())
  }

  #[must_use]
  pub fn start_local(&self) -> NaiveDateTime {
    self.starts_at.naive_local()
  }

  #[must_use]
  pub fn end_local(&self) -> NaiveDateTime {
    self.start_local()
      + Duration::minutes(i64::from(
        self.duration_minutes
      ))
  }

  #[must_use]
  pub fn calendar_event(
    &self
  ) -> CalendarEvent {
    CalendarEvent {
      title:       self
        .event_title
        .clone()
        .unwrap_or_else(|| self.couple()),
      start_local: self.start_local(),
      end_local:   self.end_local(),
      timezone_id: self.timezone_id.clone(),
      location:    format!(
        "{}, {}",
        self.venue_name, self.address
      ),
      description: format!(
        "{}\n{}",
        self.venue_name, self.address
      )
    }
  }

  #[must_use]
  pub fn share_payload(&self) -> SharePayload {
    let couple = self.couple();
    SharePayload {
      title: format!(
        "{couple} | {}",
        self.share_title_suffix
      ),
      text:  format!(
        "{couple}\n{}\n{}\n{}",
        self.datetime_text,
        self.venue_name,
        self.address
      )
    }
  }

  #[must_use]
  pub fn hero_photo(&self) -> Option<&str> {
    self.photos.first().map(String::as_str)
  }

  #[must_use]
  pub fn gallery_photos(&self) -> &[String] {
    self.photos.get(1..).unwrap_or_default()
  }

  /// Whether `timezone_id` really sits at the
  /// fixed offset of `starts_at` on that day.
  /// The fixed offset always wins; a mismatch
  /// only means the exported event may show a
  /// different hour than announced.
  pub fn zone_matches_offset(
    &self
  ) -> anyhow::Result<bool> {
    let tz = self
      .timezone_id
      .trim()
      .parse::<Tz>()
      .map_err(|err| {
        anyhow!(
          "unknown timezone id {:?}: {err}",
          self.timezone_id
        )
      })?;
    let zone_offset = tz
      .offset_from_utc_datetime(
        &self.starts_at.naive_utc()
      )
      .fix();
    Ok(zone_offset == *self.starts_at.offset())
  }
}
