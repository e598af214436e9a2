//! Record table pane; rows tagged by blood-pressure category.

use medis_core::record::Record;
use medis_export::fills;
use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  text::Line,
  widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use super::rgb;
use crate::app::App;

const HEADERS: [&str; 8] = ["Name", "Badge", "Dept", "BP", "Pulse", "SpO2", "Temp", "Fitness"];

fn row(record: &Record) -> Row<'static> {
  let v = &record.vitals;
  let dark = Style::default().fg(Color::Black);
  let (bp_fill, fitness_fill) = fills(record);
  let bp_style = dark.bg(rgb(bp_fill));
  let fitness_style = match fitness_fill {
    Some(fill) => dark.bg(rgb(fill)),
    None => Style::default().fg(Color::Magenta).add_modifier(Modifier::ITALIC),
  };

  Row::new(vec![
    Cell::from(record.employee.name.clone()),
    Cell::from(record.employee.badge_number.clone()),
    Cell::from(record.employee.department.clone()),
    Cell::from(format!("{}/{}", v.systolic, v.diastolic)).style(bp_style),
    Cell::from(v.pulse.to_string()),
    Cell::from(format!("{}%", v.spo2)),
    Cell::from(format!("{}°C", v.temperature)),
    Cell::from(record.fitness.label().to_owned()).style(fitness_style),
  ])
}

/// Render the record table into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let visible = app.visible_records();
  let period = app.period_records().len();

  let title = if app.search_active || !app.search.is_empty() {
    format!(" Records ({}/{}) ", visible.len(), period)
  } else {
    format!(" Records ({period}) ")
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // Search bar on the last inner line while searching or filtered.
  if (app.search_active || !app.search.is_empty()) && inner_area.height > 2 {
    let search_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height -= 1;

    let text = if app.search_active {
      format!("/{}_", app.search)
    } else {
      format!("/{}", app.search)
    };
    f.render_widget(
      Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
      search_area,
    );
  }

  if visible.is_empty() {
    f.render_widget(
      Paragraph::new(Line::from("No records for this period."))
        .style(Style::default().fg(Color::DarkGray)),
      inner_area,
    );
    return;
  }

  let widths = [
    Constraint::Fill(3),
    Constraint::Length(10),
    Constraint::Fill(2),
    Constraint::Length(8),
    Constraint::Length(5),
    Constraint::Length(6),
    Constraint::Length(7),
    Constraint::Length(13),
  ];

  let mut state = TableState::default();
  state.select(Some(app.cursor));

  let table = Table::new(visible.into_iter().map(row), widths)
    .header(
      Row::new(HEADERS)
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
    )
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol("▶ ");

  f.render_stateful_widget(table, inner_area, &mut state);
}
