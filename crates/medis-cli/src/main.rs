//! `medis`: command-line client and terminal browser for Medis health
//! records.
//!
//! # Usage
//!
//! ```text
//! medis --url http://localhost:5000              # browse
//! medis classify --systolic 135 --diastolic 85 --pulse 80 --spo2 98 --temperature 36.8
//! medis report --weekly 2024-W18 --format csv --save
//! ```

mod app;
mod client;
mod ui;

use std::{
  io::{self, BufRead as _, Write as _},
  path::PathBuf,
  time::Duration,
};

use anyhow::{Context, Result, bail};
use app::App;
use chrono::{Local, NaiveDate};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use medis_core::{
  classify::Fitness,
  record::{Record, VitalSigns},
  report::{ReportFilter, ReportMode},
  submission::RecordForm,
};
use medis_export::{ExportFormat, Report};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const DEFAULT_URL: &str = "http://localhost:5000";

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "medis", about = "Employee health-check records")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE", global = true)]
  config: Option<PathBuf>,

  /// Base URL of the medis server (default: http://localhost:5000).
  #[arg(long, env = "MEDIS_URL", global = true)]
  url: Option<String>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Preview the classification of a set of vitals without saving.
  Classify(VitalArgs),
  /// Submit a new health-check record.
  Add(FormArgs),
  /// Replace a record. Flags not given keep their current value.
  Edit {
    id:   Uuid,
    #[command(flatten)]
    form: FormArgs,
  },
  /// Delete one record.
  Delete { id: Uuid },
  /// Delete every record.
  DeleteAll {
    /// Skip the confirmation prompt.
    #[arg(long)]
    yes: bool,
  },
  /// Print or save a report for a day, a week or everything.
  Report(ReportArgs),
  /// Browse records in the terminal (default).
  Browse,
}

#[derive(ClapArgs, Debug)]
struct VitalArgs {
  #[arg(long)]
  systolic:    u32,
  #[arg(long)]
  diastolic:   u32,
  #[arg(long)]
  pulse:       u32,
  #[arg(long)]
  spo2:        f64,
  #[arg(long)]
  temperature: f64,
}

#[derive(ClapArgs, Debug, Default)]
struct FormArgs {
  #[arg(long)]
  name:        Option<String>,
  #[arg(long = "badge")]
  badge:       Option<String>,
  #[arg(long)]
  age:         Option<u32>,
  #[arg(long)]
  job_title:   Option<String>,
  #[arg(long)]
  supervisor:  Option<String>,
  #[arg(long = "dept")]
  department:  Option<String>,
  #[arg(long)]
  systolic:    Option<u32>,
  #[arg(long)]
  diastolic:   Option<u32>,
  #[arg(long)]
  pulse:       Option<u32>,
  #[arg(long)]
  spo2:        Option<f64>,
  #[arg(long)]
  temperature: Option<f64>,
  /// Date of the check, YYYY-MM-DD.
  #[arg(long)]
  date:        Option<NaiveDate>,
  /// Required when the verdict is FIT WITH NOTE.
  #[arg(long)]
  note:        Option<String>,
}

impl FormArgs {
  /// Overwrite the fields of `form` that were given on the command line.
  fn apply(self, form: &mut RecordForm) {
    fn set<T>(slot: &mut T, value: Option<T>) {
      if let Some(v) = value {
        *slot = v;
      }
    }
    set(&mut form.name, self.name);
    set(&mut form.badge_number, self.badge);
    set(&mut form.job_title, self.job_title);
    set(&mut form.supervisor, self.supervisor);
    set(&mut form.department, self.department);
    set(&mut form.note, self.note);
    form.age = self.age.or(form.age);
    form.systolic = self.systolic.or(form.systolic);
    form.diastolic = self.diastolic.or(form.diastolic);
    form.pulse = self.pulse.or(form.pulse);
    form.spo2 = self.spo2.or(form.spo2);
    form.temperature = self.temperature.or(form.temperature);
    form.date = self.date.or(form.date);
  }
}

#[derive(ClapArgs, Debug)]
#[group(id = "period", multiple = false)]
struct PeriodArgs {
  /// One day (default: today).
  #[arg(long, value_name = "YYYY-MM-DD")]
  daily:  Option<Option<String>>,
  /// One week (default: this week).
  #[arg(long, value_name = "YYYY-Www")]
  weekly: Option<Option<String>>,
  /// Every record.
  #[arg(long)]
  all:    bool,
}

#[derive(ClapArgs, Debug)]
struct ReportArgs {
  #[command(flatten)]
  period: PeriodArgs,
  #[arg(long, default_value_t = ExportFormat::Text)]
  format: ExportFormat,
  /// Write the report to FILE instead of stdout.
  #[arg(long, value_name = "FILE", conflicts_with = "save")]
  out:    Option<PathBuf>,
  /// Write the report to its default file name in the current directory.
  #[arg(long)]
  save:   bool,
}

impl PeriodArgs {
  fn filter(&self, today: NaiveDate) -> Result<ReportFilter> {
    let (mode, day, week) = if self.all {
      (ReportMode::All, None, None)
    } else if let Some(week) = &self.weekly {
      (ReportMode::Weekly, None, week.as_deref())
    } else {
      (ReportMode::Daily, self.daily.as_ref().and_then(|d| d.as_deref()), None)
    };
    Ok(ReportFilter::resolve(mode, day, week, today)?)
  }
}

// ─── Config file ─────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let command = args.command.unwrap_or(Command::Browse);

  // Log lines would corrupt the terminal UI.
  if !matches!(command, Command::Browse) {
    tracing_subscriber::fmt()
      .with_writer(io::stderr)
      .with_env_filter(
        EnvFilter::builder()
          .with_default_directive(LevelFilter::INFO.into())
          .from_env_lossy(),
      )
      .init();
  }

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags and env override the config file, which overrides the default.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
  };

  let today = Local::now().date_naive();

  match command {
    Command::Classify(vitals) => {
      print_classification(&VitalSigns {
        systolic:    vitals.systolic,
        diastolic:   vitals.diastolic,
        pulse:       vitals.pulse,
        spo2:        vitals.spo2,
        temperature: vitals.temperature,
      });
      Ok(())
    }
    Command::Add(form_args) => {
      let client = ApiClient::new(api_config)?;
      let mut form = RecordForm { date: Some(today), ..RecordForm::default() };
      form_args.apply(&mut form);
      // Catch mistakes before the round trip.
      form.validate("")?;
      let record = client.create_record(&form).await?;
      print_saved("Created", &record);
      Ok(())
    }
    Command::Edit { id, form: form_args } => {
      let client = ApiClient::new(api_config)?;
      let existing = client.get_record(id).await?;
      let mut form = RecordForm::from_record(&existing);
      form_args.apply(&mut form);
      form.validate("")?;
      let record = client.update_record(id, &form).await?;
      print_saved("Updated", &record);
      Ok(())
    }
    Command::Delete { id } => {
      let client = ApiClient::new(api_config)?;
      client.delete_record(id).await?;
      println!("Deleted {id}");
      Ok(())
    }
    Command::DeleteAll { yes } => {
      let client = ApiClient::new(api_config)?;
      if !yes && !confirm("Delete ALL records? This cannot be undone. [y/N] ")? {
        bail!("aborted");
      }
      let deleted = client.delete_all_records().await?;
      println!("Deleted {deleted} record(s)");
      Ok(())
    }
    Command::Report(report_args) => {
      let client = ApiClient::new(api_config)?;
      run_report(&client, report_args, today).await
    }
    Command::Browse => {
      let client = ApiClient::new(api_config)?;
      run_browser(App::new(client, today)).await
    }
  }
}

// ─── One-shot commands ───────────────────────────────────────────────────────

fn print_classification(vitals: &VitalSigns) {
  let c = vitals.classify();
  println!(
    "Blood pressure: {}/{} mmHg, {} ({})",
    vitals.systolic, vitals.diastolic, c.category, c.color
  );
  for (label, grade) in c.grades.entries() {
    println!("  {label:<15} {grade}");
  }
  println!("Verdict: {}", c.fitness);
  if c.fitness == Fitness::FitWithNote {
    println!("A note is required before this record can be saved.");
  }
}

fn print_saved(verb: &str, record: &Record) {
  println!(
    "{verb} {}: {} on {}, {}",
    record.record_id,
    record.employee.name,
    record.date_key(),
    record.fitness.label()
  );
}

fn confirm(prompt: &str) -> Result<bool> {
  print!("{prompt}");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

async fn run_report(client: &ApiClient, args: ReportArgs, today: NaiveDate) -> Result<()> {
  let filter = args.period.filter(today)?;
  let records = client.list_records().await?;
  let report = Report::build(filter, &records, today);
  let document = report.render(args.format)?;

  let path = match (args.out, args.save) {
    (Some(path), _) => Some(path),
    (None, true) => Some(PathBuf::from(report.file_name(args.format))),
    (None, false) => None,
  };
  match path {
    Some(path) => {
      std::fs::write(&path, document)
        .with_context(|| format!("writing {}", path.display()))?;
      tracing::info!(
        path = %path.display(),
        records = report.records.len(),
        "report saved"
      );
    }
    None => print!("{document}"),
  }
  Ok(())
}

// ─── Browser ─────────────────────────────────────────────────────────────────

async fn run_browser(mut app: App) -> Result<()> {
  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Load initial data.
  let load_result = app.load_records().await;

  // Run the event loop; restore terminal even on error.
  let run_result = if load_result.is_ok() {
    run_event_loop(&mut terminal, &mut app).await
  } else {
    load_result
  };

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && !app.handle_key(key).await?
    {
      break;
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn form_flags_override_only_given_fields() {
    let mut form = RecordForm {
      name: "Rudi".into(),
      systolic: Some(120),
      pulse: Some(70),
      ..RecordForm::default()
    };
    FormArgs { systolic: Some(140), note: Some("headache".into()), ..FormArgs::default() }
      .apply(&mut form);
    assert_eq!(form.name, "Rudi");
    assert_eq!(form.systolic, Some(140));
    assert_eq!(form.pulse, Some(70));
    assert_eq!(form.note, "headache");
  }

  #[test]
  fn report_period_flags() {
    let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

    let args = Args::parse_from(["medis", "report"]);
    let Some(Command::Report(r)) = args.command else { panic!("expected report") };
    assert_eq!(r.period.filter(today).unwrap(), ReportFilter::Daily("2024-05-01".into()));
    assert_eq!(r.format, ExportFormat::Text);

    let args = Args::parse_from(["medis", "report", "--weekly", "--format", "csv"]);
    let Some(Command::Report(r)) = args.command else { panic!("expected report") };
    assert_eq!(
      r.period.filter(today).unwrap(),
      ReportFilter::Weekly("2024-W18".parse().unwrap())
    );
    assert_eq!(r.format, ExportFormat::Csv);

    let args = Args::parse_from(["medis", "report", "--daily", "2024-04-30"]);
    let Some(Command::Report(r)) = args.command else { panic!("expected report") };
    assert_eq!(r.period.filter(today).unwrap(), ReportFilter::Daily("2024-04-30".into()));

    let args = Args::parse_from(["medis", "report", "--all"]);
    let Some(Command::Report(r)) = args.command else { panic!("expected report") };
    assert_eq!(r.period.filter(today).unwrap(), ReportFilter::All);

    assert!(Args::try_parse_from(["medis", "report", "--all", "--weekly"]).is_err());
  }

  #[test]
  fn default_command_is_browse() {
    let args = Args::parse_from(["medis"]);
    assert!(args.command.is_none());
  }
}
