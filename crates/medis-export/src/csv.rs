//! RFC 4180 CSV writer: CRLF line endings, fields quoted only when needed.

use std::fmt::Write as _;

use crate::{Report, Result, columns};

fn push_field(out: &mut String, field: &str) {
  if field.contains([',', '"', '\r', '\n']) {
    out.push('"');
    out.push_str(&field.replace('"', "\"\""));
    out.push('"');
  } else {
    out.push_str(field);
  }
}

fn push_row<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) -> Result<()> {
  for (i, field) in fields.into_iter().enumerate() {
    if i > 0 {
      out.push(',');
    }
    push_field(out, field);
  }
  write!(out, "\r\n")?;
  Ok(())
}

pub(crate) fn render(report: &Report) -> Result<String> {
  let mut out = String::new();
  push_row(&mut out, columns::HEADERS)?;
  for record in &report.records {
    let cells = columns::cells(record);
    push_row(&mut out, cells.iter().map(String::as_str))?;
  }
  Ok(out)
}
