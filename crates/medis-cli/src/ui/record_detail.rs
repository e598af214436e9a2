//! Detail pane for the record under the cursor.

use medis_core::{classify::Fitness, record::Record};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use super::rgb;
use crate::app::App;

fn field(label: &str, value: String) -> Line<'static> {
  Line::from(vec![
    Span::styled(format!("{label:<11}"), Style::default().fg(Color::DarkGray)),
    Span::raw(value),
  ])
}

fn lines(record: &Record) -> Vec<Line<'static>> {
  let e = &record.employee;
  let v = &record.vitals;
  let category = record.bp_category();

  let mut lines = vec![
    field("Badge", e.badge_number.clone()),
    field("Age", e.age.to_string()),
    field("Job title", e.job_title.clone()),
    field("Supervisor", e.supervisor.clone()),
    field("Dept", e.department.clone()),
    field("Date", format!("{} {}", record.date_key(), record.time_of_entry)),
    Line::from(""),
    Line::from(vec![
      Span::styled("BP         ", Style::default().fg(Color::DarkGray)),
      Span::raw(format!("{}/{} ", v.systolic, v.diastolic)),
      Span::styled(
        format!(" {category} "),
        Style::default().fg(Color::Black).bg(rgb(category.fill_rgb())),
      ),
    ]),
    field("Pulse", format!("{} bpm", v.pulse)),
    field("SpO2", format!("{}%", v.spo2)),
    field("Temp", format!("{}°C", v.temperature)),
    Line::from(""),
  ];

  // Per-vital grades, recomputed from the stored vitals.
  for (label, grade) in v.classify().grades.entries() {
    let style = if grade > Fitness::Fit {
      Style::default().fg(rgb(grade.fill_rgb()))
    } else {
      Style::default().fg(Color::DarkGray)
    };
    lines.push(Line::from(Span::styled(format!("{label:<15}{grade}"), style)));
  }

  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    format!("Verdict: {}", record.fitness.label()),
    Style::default().add_modifier(Modifier::BOLD),
  )));
  if let Some(note) = &record.note {
    lines.push(field("Note", note.clone()));
  }
  lines
}

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let selected = app.selected();
  let title = selected
    .map(|r| format!(" {} ", r.employee.name))
    .unwrap_or_else(|| " Detail ".to_owned());

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let body = match selected {
    Some(record) => Paragraph::new(lines(record)),
    None => Paragraph::new("No record selected.").style(Style::default().fg(Color::DarkGray)),
  };
  f.render_widget(body.block(block).wrap(Wrap { trim: false }), area);
}
