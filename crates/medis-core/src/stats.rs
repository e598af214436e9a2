//! Per-verdict statistics over a set of records.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{classify::Fitness, record::Record};

/// A record whose stored verdict is not one of the three tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
  pub record_id: Uuid,
  pub label:     String,
}

/// Counts and shares of each verdict.
///
/// `total` counts every record handed in, anomalies included, so
/// `fit + fit_with_note + unfit + anomalies.len() == total`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
  pub total:                    usize,
  pub fit:                      usize,
  pub fit_with_note:            usize,
  pub unfit:                    usize,
  /// Percent of `total`, one decimal place.
  pub fit_percentage:           f64,
  pub fit_with_note_percentage: f64,
  pub unfit_percentage:         f64,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub anomalies:                Vec<Anomaly>,
}

impl Statistics {
  pub fn count(&self, tier: Fitness) -> usize {
    match tier {
      Fitness::Fit => self.fit,
      Fitness::FitWithNote => self.fit_with_note,
      Fitness::Unfit => self.unfit,
    }
  }

  pub fn percentage(&self, tier: Fitness) -> f64 {
    match tier {
      Fitness::Fit => self.fit_percentage,
      Fitness::FitWithNote => self.fit_with_note_percentage,
      Fitness::Unfit => self.unfit_percentage,
    }
  }
}

/// `count / total * 100` rounded to one decimal; zero when `total` is zero.
fn percentage(count: usize, total: usize) -> f64 {
  if total == 0 {
    return 0.0;
  }
  (count as f64 * 1000.0 / total as f64).round() / 10.0
}

/// Partition `records` by verdict. Records with an unrecognised verdict are
/// reported in [`Statistics::anomalies`] and logged.
pub fn aggregate<'a, I>(records: I) -> Statistics
where
  I: IntoIterator<Item = &'a Record>,
{
  let mut stats = Statistics::default();

  for record in records {
    stats.total += 1;
    match record.fitness.tier() {
      Some(Fitness::Fit) => stats.fit += 1,
      Some(Fitness::FitWithNote) => stats.fit_with_note += 1,
      Some(Fitness::Unfit) => stats.unfit += 1,
      None => {
        tracing::warn!(
          record_id = %record.record_id,
          label = record.fitness.label(),
          "record has an unrecognised fitness verdict"
        );
        stats.anomalies.push(Anomaly {
          record_id: record.record_id,
          label:     record.fitness.label().to_owned(),
        });
      }
    }
  }

  stats.fit_percentage = percentage(stats.fit, stats.total);
  stats.fit_with_note_percentage = percentage(stats.fit_with_note, stats.total);
  stats.unfit_percentage = percentage(stats.unfit, stats.total);
  stats
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::record::test_helpers::record;

  #[test]
  fn empty_input_is_all_zero() {
    let stats = aggregate(&Vec::<Record>::new());
    assert_eq!(stats, Statistics::default());
    assert_eq!(stats.total, 0);
    assert_eq!(stats.fit_percentage, 0.0);
    assert_eq!(stats.fit_with_note_percentage, 0.0);
    assert_eq!(stats.unfit_percentage, 0.0);
  }

  #[test]
  fn counts_partition_records() {
    let records = vec![
      record("a", "2024-05-01", "FIT"),
      record("b", "2024-05-01", "FIT"),
      record("c", "2024-05-01", "FIT WITH NOTE"),
      record("d", "2024-05-01", "TIDAK FIT"),
    ];
    let stats = aggregate(&records);
    assert_eq!(stats.total, 4);
    assert_eq!((stats.fit, stats.fit_with_note, stats.unfit), (2, 1, 1));
    assert_eq!(stats.fit_percentage, 50.0);
    assert_eq!(stats.fit_with_note_percentage, 25.0);
    assert_eq!(stats.unfit_percentage, 25.0);
    assert!(stats.anomalies.is_empty());
    assert_eq!(stats.count(Fitness::Fit), 2);
    assert_eq!(stats.percentage(Fitness::Unfit), 25.0);
  }

  #[test]
  fn percentages_round_to_one_decimal() {
    let records = vec![
      record("a", "2024-05-01", "FIT"),
      record("b", "2024-05-01", "FIT"),
      record("c", "2024-05-01", "TIDAK FIT"),
    ];
    let stats = aggregate(&records);
    assert_eq!(stats.fit_percentage, 66.7);
    assert_eq!(stats.unfit_percentage, 33.3);
  }

  #[test]
  fn unknown_verdicts_are_reported_not_dropped() {
    let records = vec![
      record("a", "2024-05-01", "FIT"),
      record("b", "2024-05-01", "SEHAT"),
    ];
    let stats = aggregate(&records);
    assert_eq!(stats.total, 2);
    assert_eq!(stats.fit, 1);
    assert_eq!(stats.fit_percentage, 50.0);
    assert_eq!(stats.anomalies.len(), 1);
    assert_eq!(stats.anomalies[0].record_id, records[1].record_id);
    assert_eq!(stats.anomalies[0].label, "SEHAT");
  }

  #[test]
  fn works_over_filtered_references() {
    let records = vec![
      record("a", "2024-05-01", "FIT"),
      record("b", "2024-05-02", "TIDAK FIT"),
    ];
    let filtered = crate::report::ReportFilter::Daily("2024-05-02".into()).apply(&records);
    let stats = aggregate(filtered.iter().copied());
    assert_eq!((stats.total, stats.unfit), (1, 1));
    assert_eq!(stats.unfit_percentage, 100.0);
  }
}
