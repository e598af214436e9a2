//! Application state machine and event dispatcher for the browser.

use std::sync::Arc;

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use medis_core::{
  record::Record,
  report::{ReportFilter, ReportMode, WeekKey},
  stats::{Statistics, aggregate},
};
use medis_export::{ExportFormat, Report};
use uuid::Uuid;

use crate::client::ApiClient;

// ─── Screen ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
  /// Browsing the record table.
  Browse,
  /// Waiting for `y` to delete the given record.
  ConfirmDelete(Uuid),
}

// ─── App ─────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  /// All records returned by the API, newest first.
  pub records: Vec<Record>,

  /// The report period being browsed.
  pub filter: ReportFilter,

  /// Date the daily and weekly views reset to.
  pub today: NaiveDate,

  /// Fuzzy name search (only typed into while `search_active`).
  pub search: String,

  pub search_active: bool,

  /// Cursor position within [`App::visible_records`].
  pub cursor: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,
}

impl App {
  /// Create an [`App`] showing today's records.
  pub fn new(client: ApiClient, today: NaiveDate) -> Self {
    Self {
      screen: Screen::Browse,
      records: Vec::new(),
      filter: ReportFilter::Daily(today.format("%Y-%m-%d").to_string()),
      today,
      search: String::new(),
      search_active: false,
      cursor: 0,
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch all records from the API.
  pub async fn load_records(&mut self) -> anyhow::Result<()> {
    self.status_msg = "Loading records…".into();
    match self.client.list_records().await {
      Ok(records) => {
        self.records = records;
        self.clamp_cursor();
        self.status_msg = String::new();
        Ok(())
      }
      Err(e) => {
        self.status_msg = format!("Error: {e}");
        Err(e)
      }
    }
  }

  // ── Views ─────────────────────────────────────────────────────────────────

  /// Records in the current period, in stored order.
  pub fn period_records(&self) -> Vec<&Record> { self.filter.apply(&self.records) }

  /// Period records that also match the name search.
  pub fn visible_records(&self) -> Vec<&Record> {
    let period = self.period_records();
    if self.search.is_empty() {
      return period;
    }
    let matcher = SkimMatcherV2::default();
    period
      .into_iter()
      .filter(|r| {
        matcher.fuzzy_match(&r.employee.name, &self.search).is_some()
          || matcher
            .fuzzy_match(&r.employee.badge_number, &self.search)
            .is_some()
      })
      .collect()
  }

  /// Statistics over the whole period, ignoring the name search.
  pub fn stats(&self) -> Statistics { aggregate(self.period_records()) }

  /// The record under the cursor, if any.
  pub fn selected(&self) -> Option<&Record> {
    self.visible_records().get(self.cursor).copied()
  }

  fn clamp_cursor(&mut self) {
    let len = self.visible_records().len();
    self.cursor = self.cursor.min(len.saturating_sub(1));
  }

  // ── Period switching ──────────────────────────────────────────────────────

  pub fn set_mode(&mut self, mode: ReportMode) {
    self.filter = match mode {
      ReportMode::All => ReportFilter::All,
      ReportMode::Daily => ReportFilter::Daily(self.today.format("%Y-%m-%d").to_string()),
      ReportMode::Weekly => ReportFilter::Weekly(WeekKey::of(self.today)),
    };
    self.cursor = 0;
  }

  pub fn step(&mut self, delta: i32) {
    self.filter = self.filter.step(delta);
    self.cursor = 0;
  }

  /// Write the current period's report to the working directory.
  fn export(&mut self, format: ExportFormat) {
    let report = Report::build(self.filter.clone(), &self.records, self.today);
    let path = report.file_name(format);
    self.status_msg = match report
      .render(format)
      .map_err(anyhow::Error::from)
      .and_then(|doc| std::fs::write(&path, doc).map_err(anyhow::Error::from))
    {
      Ok(()) => format!("Saved {path}"),
      Err(e) => format!("Error: {e}"),
    };
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if self.search_active {
      self.handle_search_key(key);
      return Ok(true);
    }

    match self.screen.clone() {
      Screen::Browse => self.handle_browse_key(key).await,
      Screen::ConfirmDelete(id) => {
        self.screen = Screen::Browse;
        if key.code == KeyCode::Char('y') {
          match self.client.delete_record(id).await {
            Ok(()) => {
              self.records.retain(|r| r.record_id != id);
              self.clamp_cursor();
              self.status_msg = "Record deleted".into();
            }
            Err(e) => self.status_msg = format!("Error: {e}"),
          }
        } else {
          self.status_msg = "Delete cancelled".into();
        }
        Ok(true)
      }
    }
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.search_active = false;
        self.search.clear();
      }
      KeyCode::Enter => self.search_active = false,
      KeyCode::Backspace => {
        self.search.pop();
      }
      KeyCode::Char(c) => self.search.push(c),
      _ => return,
    }
    self.cursor = 0;
  }

  async fn handle_browse_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      // Quit
      KeyCode::Char('q') => return Ok(false),

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        if self.cursor + 1 < self.visible_records().len() {
          self.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.cursor = self.cursor.saturating_sub(1);
      }

      // Period
      KeyCode::Char('d') => self.set_mode(ReportMode::Daily),
      KeyCode::Char('w') => self.set_mode(ReportMode::Weekly),
      KeyCode::Char('a') => self.set_mode(ReportMode::All),
      KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('[') => self.step(-1),
      KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(']') => self.step(1),

      // Search
      KeyCode::Char('/') => {
        self.search_active = true;
        self.search.clear();
        self.cursor = 0;
      }

      // Actions
      KeyCode::Char('r') => {
        // Failure is already shown in the status bar.
        let _ = self.load_records().await;
      }
      KeyCode::Char('x') => {
        if let Some(record) = self.selected() {
          let (id, name) = (record.record_id, record.employee.name.clone());
          self.screen = Screen::ConfirmDelete(id);
          self.status_msg = format!("Delete record for {name}? [y/N]");
        }
      }
      KeyCode::Char('e') => self.export(ExportFormat::Text),
      KeyCode::Char('E') => self.export(ExportFormat::Csv),

      _ => {}
    }
    Ok(true)
  }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone as _, Utc};
  use medis_core::record::{Employee, NewRecord, VitalSigns};

  use super::*;
  use crate::client::ApiConfig;

  fn date(s: &str) -> NaiveDate { NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap() }

  fn record(name: &str, day: &str, spo2: f64) -> Record {
    let employee = Employee {
      name:         name.into(),
      badge_number: format!("BN-{name}"),
      age:          30,
      job_title:    "Welder".into(),
      supervisor:   "Yusuf".into(),
      department:   "Fabrication".into(),
    };
    let vitals =
      VitalSigns { systolic: 110, diastolic: 70, pulse: 80, spo2, temperature: 36.6 };
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 6, 0, 0).unwrap();
    NewRecord::new(employee, vitals, date(day), "06:00:00", None)
      .unwrap()
      .into_record(Uuid::new_v4(), at, at)
  }

  fn app() -> App {
    let client = ApiClient::new(ApiConfig { base_url: "http://127.0.0.1:9".into() }).unwrap();
    let mut app = App::new(client, date("2024-05-01"));
    app.records = vec![
      record("Lestari", "2024-05-01", 98.0),
      record("Joko", "2024-05-01", 90.0),
      record("Lukman", "2024-04-30", 98.0),
      record("Maya", "2024-05-08", 98.0),
    ];
    app
  }

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  fn names(app: &App) -> Vec<&str> {
    app
      .visible_records()
      .into_iter()
      .map(|r| r.employee.name.as_str())
      .collect()
  }

  #[test]
  fn starts_on_today() {
    let app = app();
    assert_eq!(app.filter, ReportFilter::Daily("2024-05-01".into()));
    assert_eq!(names(&app), ["Lestari", "Joko"]);
    let stats = app.stats();
    assert_eq!((stats.total, stats.fit, stats.unfit), (2, 1, 1));
  }

  #[tokio::test]
  async fn period_keys_switch_and_step() {
    let mut app = app();

    app.handle_key(key(KeyCode::Char('h'))).await.unwrap();
    assert_eq!(names(&app), ["Lukman"]);

    app.handle_key(key(KeyCode::Char('w'))).await.unwrap();
    assert_eq!(app.filter, ReportFilter::Weekly("2024-W18".parse().unwrap()));
    assert_eq!(names(&app), ["Lestari", "Joko", "Lukman"]);

    app.handle_key(key(KeyCode::Char(']'))).await.unwrap();
    assert_eq!(names(&app), ["Maya"]);

    app.handle_key(key(KeyCode::Char('a'))).await.unwrap();
    assert_eq!(names(&app).len(), 4);
  }

  #[tokio::test]
  async fn search_narrows_rows_but_not_stats() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('a'))).await.unwrap();
    app.handle_key(key(KeyCode::Char('/'))).await.unwrap();
    for c in "luk".chars() {
      app.handle_key(key(KeyCode::Char(c))).await.unwrap();
    }
    app.handle_key(key(KeyCode::Enter)).await.unwrap();

    assert!(!app.search_active);
    assert_eq!(names(&app), ["Lukman"]);
    assert_eq!(app.stats().total, 4);

    app.handle_key(key(KeyCode::Char('/'))).await.unwrap();
    app.handle_key(key(KeyCode::Esc)).await.unwrap();
    assert_eq!(names(&app).len(), 4);
  }

  #[tokio::test]
  async fn cursor_stays_in_bounds() {
    let mut app = app();
    for _ in 0..5 {
      app.handle_key(key(KeyCode::Down)).await.unwrap();
    }
    assert_eq!(app.cursor, 1);
    assert_eq!(app.selected().unwrap().employee.name, "Joko");
    for _ in 0..5 {
      app.handle_key(key(KeyCode::Up)).await.unwrap();
    }
    assert_eq!(app.cursor, 0);
  }

  #[tokio::test]
  async fn delete_needs_confirmation() {
    let mut app = app();
    let id = app.selected().unwrap().record_id;
    app.handle_key(key(KeyCode::Char('x'))).await.unwrap();
    assert_eq!(app.screen, Screen::ConfirmDelete(id));

    app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
    assert_eq!(app.screen, Screen::Browse);
    assert_eq!(app.records.len(), 4);
  }

  #[tokio::test]
  async fn q_quits() {
    let mut app = app();
    assert!(!app.handle_key(key(KeyCode::Char('q'))).await.unwrap());
  }
}
