use std::fmt;

use chrono::{
  DateTime,
  TimeZone
};
use serde::Serialize;

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_MINUTE: i64 = 60;

/// Time left until a target instant, split
/// into whole display units.
///
/// A fresh value is computed on every tick;
/// nothing here is ever updated in place.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
)]
pub struct CountdownParts {
  pub days:    i64,
  pub hours:   u32,
  pub minutes: u32,
  pub seconds: u32
}

impl CountdownParts {
  fn from_total_seconds(
    total: i64
  ) -> Self {
    let total = total.max(0);
    Self {
      days:    total / SECONDS_PER_DAY,
      hours:   ((total % SECONDS_PER_DAY)
        / SECONDS_PER_HOUR)
        as u32,
      minutes: ((total % SECONDS_PER_HOUR)
        / SECONDS_PER_MINUTE)
        as u32,
      seconds: (total % SECONDS_PER_MINUTE)
        as u32
    }
  }

  #[must_use]
  pub fn total_seconds(&self) -> i64 {
    self.days * SECONDS_PER_DAY
      + i64::from(self.hours)
        * SECONDS_PER_HOUR
      + i64::from(self.minutes)
        * SECONDS_PER_MINUTE
      + i64::from(self.seconds)
  }

  #[must_use]
  pub fn is_finished(&self) -> bool {
    self.total_seconds() == 0
  }

  /// `HH:MM:SS` with every field padded to
  /// two digits.
  #[must_use]
  pub fn clock(&self) -> String {
    format!(
      "{}:{}:{}",
      pad2(self.hours),
      pad2(self.minutes),
      pad2(self.seconds)
    )
  }
}

impl fmt::Display for CountdownParts {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(
      f,
      "{}d {}",
      self.days,
      self.clock()
    )
  }
}

#[must_use]
pub fn pad2(value: u32) -> String {
  format!("{value:02}")
}

/// Remaining time from `now` until `target`.
///
/// Both instants are compared on the epoch
/// timeline, so the offsets they carry never
/// matter. A target in the past yields all
/// zeroes.
#[must_use]
pub fn countdown_parts<A, B>(
  target: &DateTime<A>,
  now: &DateTime<B>
) -> CountdownParts
where
  A: TimeZone,
  B: TimeZone
{
  let remaining_ms = target
    .timestamp_millis()
    .saturating_sub(
      now.timestamp_millis()
    );
  let clamped = remaining_ms.max(0);

  CountdownParts::from_total_seconds(
    clamped / 1_000
  )
}
