//! Plain-text report: a heading, an aligned table and a statistics summary.

use std::fmt::Write as _;

use medis_core::classify::Fitness;

use crate::{Report, Result, columns};

fn width(s: &str) -> usize { s.chars().count() }

fn push_padded(out: &mut String, cell: &str, to: usize) {
  out.push_str(cell);
  out.extend(std::iter::repeat_n(' ', to.saturating_sub(width(cell))));
}

fn push_line<'a>(out: &mut String, cells: impl IntoIterator<Item = &'a str>, widths: &[usize]) {
  let mut line = String::new();
  for (i, (cell, w)) in cells.into_iter().zip(widths).enumerate() {
    if i > 0 {
      line.push_str(" | ");
    }
    push_padded(&mut line, cell, *w);
  }
  out.push_str(line.trim_end());
  out.push('\n');
}

pub(crate) fn render(report: &Report) -> Result<String> {
  let rows: Vec<[String; 15]> = report.records.iter().map(columns::cells).collect();

  let mut widths = columns::HEADERS.map(width);
  for row in &rows {
    for (w, cell) in widths.iter_mut().zip(row) {
      *w = (*w).max(width(cell));
    }
  }

  let mut out = String::new();
  writeln!(out, "{}", report.title)?;
  writeln!(out, "Printed: {}", report.printed_on.format("%Y-%m-%d"))?;
  out.push('\n');

  if rows.is_empty() {
    out.push_str("No records.\n");
  } else {
    push_line(&mut out, columns::HEADERS, &widths);
    let rule: usize = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);
    writeln!(out, "{}", "-".repeat(rule))?;
    for row in &rows {
      push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
  }

  out.push('\n');
  let stats = &report.stats;
  writeln!(out, "Total: {}", stats.total)?;
  for tier in [Fitness::Fit, Fitness::FitWithNote, Fitness::Unfit] {
    writeln!(
      out,
      "{}: {} ({:.1}%)",
      tier.label(),
      stats.count(tier),
      stats.percentage(tier)
    )?;
  }
  for anomaly in &stats.anomalies {
    writeln!(
      out,
      "Unrecognised verdict {:?} on record {}",
      anomaly.label, anomaly.record_id
    )?;
  }

  Ok(out)
}
