//! Verdict statistics for the period being browsed.

use medis_core::classify::Fitness;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use super::rgb;
use crate::app::App;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let stats = app.stats();

  let block = Block::default()
    .title(" Statistics ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut lines = vec![Line::from(format!("Total: {}", stats.total)), Line::from("")];
  for tier in [Fitness::Fit, Fitness::FitWithNote, Fitness::Unfit] {
    lines.push(Line::from(vec![
      Span::styled(
        format!(" {:<13} ", tier.label()),
        Style::default().fg(Color::Black).bg(rgb(tier.fill_rgb())),
      ),
      Span::raw(format!(
        " {:>4}  {:>5.1}%",
        stats.count(tier),
        stats.percentage(tier)
      )),
    ]));
  }
  if !stats.anomalies.is_empty() {
    lines.push(Line::from(Span::styled(
      format!("{} record(s) with an unknown verdict", stats.anomalies.len()),
      Style::default().fg(Color::Magenta),
    )));
  }

  f.render_widget(Paragraph::new(lines).block(block), area);
}
