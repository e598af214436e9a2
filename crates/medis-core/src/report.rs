//! Report filtering: choosing which records a report covers.
//!
//! Weeks use a simple day-of-year scheme, not ISO-8601: the week number of a
//! date is `ceil(day_of_year / 7)`, so January 1 is always week 1 and
//! December 31 is always week 53. Existing reports depend on this numbering.

use std::{fmt, str::FromStr};

use chrono::{Datelike as _, Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumString};

use crate::{Error, Result, record::Record};

/// Highest week number the scheme produces.
pub const LAST_WEEK: u32 = 53;

/// Week number of `date` within its own year.
pub fn week_of_year(date: NaiveDate) -> u32 { date.ordinal().div_ceil(7) }

// ─── Week key ────────────────────────────────────────────────────────────────

/// A `(year, week)` pair, written `YYYY-Www` (e.g. `2024-W18`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
  pub year: i32,
  pub week: u32,
}

impl WeekKey {
  /// The week `date` falls in.
  pub fn of(date: NaiveDate) -> Self {
    Self { year: date.year(), week: week_of_year(date) }
  }

  /// The key `delta` weeks away, rolling over year boundaries.
  pub fn offset(self, delta: i32) -> Self {
    let weeks = i64::from(LAST_WEEK);
    let index = i64::from(self.year) * weeks + i64::from(self.week) - 1 + i64::from(delta);
    Self {
      year: index.div_euclid(weeks) as i32,
      week: index.rem_euclid(weeks) as u32 + 1,
    }
  }

  pub fn matches(&self, date: NaiveDate) -> bool { Self::of(date) == *self }
}

impl fmt::Display for WeekKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-W{:02}", self.year, self.week)
  }
}

impl FromStr for WeekKey {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let invalid = || Error::InvalidWeekKey(s.to_owned());
    let (year, week) = s.trim().split_once("-W").ok_or_else(invalid)?;
    Ok(Self {
      year: year.parse().map_err(|_| invalid())?,
      week: week.parse().map_err(|_| invalid())?,
    })
  }
}

impl Serialize for WeekKey {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for WeekKey {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
  }
}

// ─── Report filter ───────────────────────────────────────────────────────────

/// Which kind of period a report covers.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportMode {
  All,
  #[default]
  Daily,
  Weekly,
}

/// A resolved filter over stored records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "key", rename_all = "lowercase")]
pub enum ReportFilter {
  All,
  /// Exact match against the stored `YYYY-MM-DD` date string.
  Daily(String),
  Weekly(WeekKey),
}

impl ReportFilter {
  /// Build a filter from loosely-typed request parameters. Missing keys
  /// default to the day or week containing `today`.
  pub fn resolve(
    mode: ReportMode,
    day: Option<&str>,
    week: Option<&str>,
    today: NaiveDate,
  ) -> Result<Self> {
    Ok(match mode {
      ReportMode::All => Self::All,
      ReportMode::Daily => Self::Daily(
        day
          .map(str::to_owned)
          .unwrap_or_else(|| today.format("%Y-%m-%d").to_string()),
      ),
      ReportMode::Weekly => Self::Weekly(match week {
        Some(w) => w.parse()?,
        None => WeekKey::of(today),
      }),
    })
  }

  pub fn mode(&self) -> ReportMode {
    match self {
      Self::All => ReportMode::All,
      Self::Daily(_) => ReportMode::Daily,
      Self::Weekly(_) => ReportMode::Weekly,
    }
  }

  pub fn matches(&self, record: &Record) -> bool {
    match self {
      Self::All => true,
      Self::Daily(day) => record.date_key() == *day,
      Self::Weekly(key) => key.matches(record.date),
    }
  }

  /// Keep the records this filter selects, in their original order.
  pub fn apply<'a, I>(&self, records: I) -> Vec<&'a Record>
  where
    I: IntoIterator<Item = &'a Record>,
  {
    records.into_iter().filter(|r| self.matches(r)).collect()
  }

  /// Move to the previous (`delta < 0`) or next period. A day key that is
  /// not a valid date is left unchanged, as is `All`.
  pub fn step(&self, delta: i32) -> Self {
    match self {
      Self::All => Self::All,
      Self::Daily(day) => {
        let moved = NaiveDate::parse_from_str(day, "%Y-%m-%d").ok().and_then(|d| {
          let n = Days::new(u64::from(delta.unsigned_abs()));
          if delta < 0 { d.checked_sub_days(n) } else { d.checked_add_days(n) }
        });
        match moved {
          Some(d) => Self::Daily(d.format("%Y-%m-%d").to_string()),
          None => self.clone(),
        }
      }
      Self::Weekly(key) => Self::Weekly(key.offset(delta)),
    }
  }

  /// Human-readable report title.
  pub fn title(&self) -> String {
    match self {
      Self::All => "Employee Health Report - All Data".to_owned(),
      Self::Daily(day) => format!("Daily Health Report - {day}"),
      Self::Weekly(key) => format!("Weekly Health Report - {key}"),
    }
  }

  /// File name (without extension) for an exported report printed on
  /// `printed_on`. Characters outside `[A-Za-z0-9._-]` become `_`, so the
  /// stem is always safe in a header or a path.
  pub fn file_stem(&self, printed_on: NaiveDate) -> String {
    let stem = match self {
      Self::All => format!("report-all-{}", printed_on.format("%Y-%m-%d")),
      Self::Daily(day) => format!("report-daily-{day}"),
      Self::Weekly(key) => format!("report-weekly-{key}"),
    };
    stem
      .chars()
      .map(|c| {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' }
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::record::test_helpers::record;

  fn d(s: &str) -> NaiveDate { NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap() }

  // ── Week numbering ────────────────────────────────────────────────────────

  #[test]
  fn january_first_is_always_week_one() {
    for year in 1999..=2030 {
      let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
      assert_eq!(week_of_year(jan1), 1, "{year}");
    }
  }

  #[test]
  fn weeks_are_blocks_of_seven_days() {
    assert_eq!(week_of_year(d("2024-01-07")), 1);
    assert_eq!(week_of_year(d("2024-01-08")), 2);
    assert_eq!(week_of_year(d("2024-05-01")), 18); // day 122
    assert_eq!(week_of_year(d("2023-12-31")), 53); // day 365
    assert_eq!(week_of_year(d("2024-12-31")), 53); // day 366
  }

  #[test]
  fn not_iso_weeks() {
    // ISO puts 2021-01-01 (a Friday) in 2020-W53.
    assert_eq!(WeekKey::of(d("2021-01-01")), WeekKey { year: 2021, week: 1 });
  }

  #[test]
  fn week_key_parse_and_display() {
    let key: WeekKey = "2024-W18".parse().unwrap();
    assert_eq!(key, WeekKey { year: 2024, week: 18 });
    assert_eq!(key.to_string(), "2024-W18");
    assert_eq!("2024-W5".parse::<WeekKey>().unwrap().to_string(), "2024-W05");
    assert!("2024-18".parse::<WeekKey>().is_err());
    assert!("abcd-W01".parse::<WeekKey>().is_err());
  }

  #[test]
  fn week_key_offset_rolls_over_years() {
    let k = WeekKey { year: 2024, week: 53 };
    assert_eq!(k.offset(1), WeekKey { year: 2025, week: 1 });
    assert_eq!(WeekKey { year: 2025, week: 1 }.offset(-1), k);
    assert_eq!(WeekKey { year: 2024, week: 10 }.offset(3), WeekKey { year: 2024, week: 13 });
  }

  // ── Filtering ─────────────────────────────────────────────────────────────

  fn sample() -> Vec<Record> {
    vec![
      record("a", "2024-05-01", "FIT"),
      record("b", "2024-04-30", "FIT"),
      record("c", "2024-05-01", "TIDAK FIT"),
      record("d", "2024-05-06", "FIT WITH NOTE"),
      record("e", "2023-05-01", "FIT"),
    ]
  }

  fn names(records: &[&Record]) -> Vec<String> {
    records.iter().map(|r| r.employee.name.clone()).collect()
  }

  #[test]
  fn all_is_identity() {
    let records = sample();
    assert_eq!(ReportFilter::All.apply(&records).len(), records.len());
  }

  #[test]
  fn daily_matches_exact_date_in_order() {
    let records = sample();
    let filter = ReportFilter::Daily("2024-05-01".into());
    let once = filter.apply(&records);
    assert_eq!(names(&once), ["a", "c"]);

    let twice = filter.apply(once.iter().copied());
    assert_eq!(names(&twice), names(&once));
  }

  #[test]
  fn daily_does_not_normalise_keys() {
    let records = sample();
    assert!(ReportFilter::Daily("2024-5-1".into()).apply(&records).is_empty());
  }

  #[test]
  fn weekly_matches_year_and_week() {
    let records = sample();
    // Days 120..=126 of 2024 are week 18; 2024-05-06 is day 127 (week 19).
    let filter = ReportFilter::Weekly(WeekKey { year: 2024, week: 18 });
    assert_eq!(names(&filter.apply(&records)), ["a", "b", "c"]);

    let filter = ReportFilter::Weekly(WeekKey { year: 2024, week: 19 });
    assert_eq!(names(&filter.apply(&records)), ["d"]);
  }

  #[test]
  fn empty_and_unmatched_give_empty_output() {
    assert!(ReportFilter::All.apply(&Vec::<Record>::new()).is_empty());
    let records = sample();
    assert!(ReportFilter::Daily("1999-01-01".into()).apply(&records).is_empty());
    assert!(
      ReportFilter::Weekly(WeekKey { year: 2024, week: 60 })
        .apply(&records)
        .is_empty()
    );
  }

  // ── Resolution and navigation ─────────────────────────────────────────────

  #[test]
  fn resolve_defaults_to_today() {
    let today = d("2024-05-01");
    assert_eq!(
      ReportFilter::resolve(ReportMode::Daily, None, None, today).unwrap(),
      ReportFilter::Daily("2024-05-01".into())
    );
    assert_eq!(
      ReportFilter::resolve(ReportMode::Weekly, None, None, today).unwrap(),
      ReportFilter::Weekly(WeekKey { year: 2024, week: 18 })
    );
    assert_eq!(
      ReportFilter::resolve(ReportMode::Weekly, None, Some("2023-W02"), today).unwrap(),
      ReportFilter::Weekly(WeekKey { year: 2023, week: 2 })
    );
    assert!(ReportFilter::resolve(ReportMode::Weekly, None, Some("nope"), today).is_err());
  }

  #[test]
  fn step_moves_by_period() {
    let day = ReportFilter::Daily("2024-03-01".into());
    assert_eq!(day.step(-1), ReportFilter::Daily("2024-02-29".into()));
    assert_eq!(day.step(1), ReportFilter::Daily("2024-03-02".into()));
    let bad = ReportFilter::Daily("garbage".into());
    assert_eq!(bad.step(1), bad);
    assert_eq!(ReportFilter::All.step(1), ReportFilter::All);
  }

  #[test]
  fn titles_and_file_names() {
    let printed = d("2024-06-02");
    let weekly = ReportFilter::Weekly(WeekKey { year: 2024, week: 18 });
    assert_eq!(weekly.title(), "Weekly Health Report - 2024-W18");
    assert_eq!(weekly.file_stem(printed), "report-weekly-2024-W18");
    assert_eq!(ReportFilter::All.file_stem(printed), "report-all-2024-06-02");
    assert_eq!(
      ReportFilter::Daily("2024-05-01".into()).file_stem(printed),
      "report-daily-2024-05-01"
    );
  }

  #[test]
  fn file_stem_replaces_unsafe_characters() {
    let printed = d("2024-06-02");
    assert_eq!(
      ReportFilter::Daily("2024-05-01\r\nx".into()).file_stem(printed),
      "report-daily-2024-05-01__x"
    );
    assert_eq!(
      ReportFilter::Daily("a\"b/c d".into()).file_stem(printed),
      "report-daily-a_b_c_d"
    );
  }

  #[test]
  fn report_mode_labels() {
    assert_eq!("weekly".parse::<ReportMode>().unwrap(), ReportMode::Weekly);
    assert_eq!(ReportMode::All.to_string(), "all");
  }
}
