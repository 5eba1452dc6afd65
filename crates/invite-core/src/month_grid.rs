use anyhow::anyhow;
use chrono::{
  Datelike,
  NaiveDate,
  Weekday
};
use serde::Serialize;

/// One calendar row. `None` is a padding cell.
pub type Week = [Option<u32>; 7];

/// A month laid out as rows of seven cells,
/// ready for a month view.
#[derive(
  Debug, Clone, PartialEq, Eq, Serialize,
)]
pub struct MonthGrid {
  pub year:       i32,
  pub month:      u32,
  pub week_start: Weekday,
  pub weeks:      Vec<Week>
}

impl MonthGrid {
  /// Sunday-first grid for `year`/`month`
  /// (month is 1-based).
  pub fn build(
    year: i32,
    month: u32
  ) -> anyhow::Result<Self> {
    Self::build_with_week_start(
      year,
      month,
      Weekday::Sun
    )
  }

  #[tracing::instrument(level = "debug")]
  pub fn build_with_week_start(
    year: i32,
    month: u32,
    week_start: Weekday
  ) -> anyhow::Result<Self> {
    let first = first_day_of_month(
      year, month
    )?;
    let days = days_in_month(first);
    let leading =
      column_of(first.weekday(), week_start);

    let mut cells: Vec<Option<u32>> =
      Vec::with_capacity(42);
    cells.extend(
      std::iter::repeat_n(None, leading)
    );
    cells.extend((1..=days).map(Some));
    while cells.len() % 7 != 0 {
      cells.push(None);
    }

    let weeks = cells
      .chunks_exact(7)
      .map(|chunk| {
        let mut week: Week = [None; 7];
        week.copy_from_slice(chunk);
        week
      })
      .collect::<Vec<_>>();

    tracing::debug!(
      year,
      month,
      leading,
      days,
      rows = weeks.len(),
      "built month grid"
    );

    Ok(Self {
      year,
      month,
      week_start,
      weeks
    })
  }

  pub fn cells(
    &self
  ) -> impl Iterator<Item = Option<u32>> + '_
  {
    self.weeks.iter().flatten().copied()
  }

  #[must_use]
  pub fn leading_blanks(&self) -> usize {
    self
      .cells()
      .take_while(Option::is_none)
      .count()
  }

  #[must_use]
  pub fn days_in_month(&self) -> u32 {
    self.cells().flatten().count() as u32
  }

  /// Row and column of `day`, if the month
  /// has it.
  #[must_use]
  pub fn position_of(
    &self,
    day: u32
  ) -> Option<(usize, usize)> {
    self.weeks.iter().enumerate().find_map(
      |(row, week)| {
        week
          .iter()
          .position(|cell| {
            *cell == Some(day)
          })
          .map(|col| (row, col))
      }
    )
  }

  #[must_use]
  pub fn labels(
    &self
  ) -> [&'static str; 7] {
    weekday_labels(self.week_start)
  }
}

/// Column headers for a grid starting on
/// `week_start`.
#[must_use]
pub fn weekday_labels(
  week_start: Weekday
) -> [&'static str; 7] {
  const NAMES: [&str; 7] = [
    "Sun", "Mon", "Tue", "Wed", "Thu",
    "Fri", "Sat"
  ];
  let offset = week_start
    .num_days_from_sunday()
    as usize;
  std::array::from_fn(|idx| {
    NAMES[(idx + offset) % 7]
  })
}

/// Accepts `sunday`/`monday` (any case,
/// short forms too); anything else is Sunday.
#[must_use]
pub fn parse_week_start(
  raw: &str
) -> Weekday {
  match raw
    .trim()
    .to_ascii_lowercase()
    .as_str()
  {
    | "monday" | "mon" => Weekday::Mon,
    | _ => Weekday::Sun
  }
}

fn column_of(
  day: Weekday,
  week_start: Weekday
) -> usize {
  let day_idx =
    day.num_days_from_sunday() as usize;
  let start_idx = week_start
    .num_days_from_sunday()
    as usize;
  (7 + day_idx - start_idx) % 7
}

fn first_day_of_month(
  year: i32,
  month: u32
) -> anyhow::Result<NaiveDate> {
  NaiveDate::from_ymd_opt(year, month, 1)
    .ok_or_else(|| {
      anyhow!(
        "no such month: {year}-{month:02}"
      )
    })
}

/// Longest day number the month accepts. Never
/// leaves the month, so the last month chrono
/// can represent still counts.
fn days_in_month(first: NaiveDate) -> u32 {
  (29..=31)
    .rev()
    .find(|day| first.with_day(*day).is_some())
    .unwrap_or(28)
}
