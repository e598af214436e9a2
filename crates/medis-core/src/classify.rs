//! Vital-sign classification.
//!
//! Two scales are applied to the same measurements. The display
//! blood-pressure category uses the 120/80 boundaries; the duty-fitness grade
//! for blood pressure uses 130/90. They answer different questions and are
//! kept apart.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::record::VitalSigns;

/// Highlight fill colours shared by the row tags and the exported documents.
const FILL_GREEN: [u8; 3] = [187, 247, 208];
const FILL_YELLOW: [u8; 3] = [254, 240, 138];
const FILL_ORANGE: [u8; 3] = [253, 186, 116];
const FILL_RED: [u8; 3] = [252, 165, 165];

// ─── Blood-pressure category ─────────────────────────────────────────────────

/// The four-tier display category for a blood-pressure reading.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
pub enum BpCategory {
  #[serde(rename = "Normal")]
  #[strum(serialize = "Normal")]
  Normal,
  #[serde(rename = "Prehypertension")]
  #[strum(serialize = "Prehypertension")]
  Prehypertension,
  #[serde(rename = "Hypertension Stage 1")]
  #[strum(serialize = "Hypertension Stage 1")]
  HypertensionStage1,
  #[serde(rename = "Hypertension Stage 2")]
  #[strum(serialize = "Hypertension Stage 2")]
  HypertensionStage2,
}

impl BpCategory {
  /// Categorise a reading. The rules are checked in order and the first
  /// match wins, so a high systolic paired with a prehypertensive diastolic
  /// is reported as prehypertension.
  pub fn from_pressure(systolic: f64, diastolic: f64) -> Self {
    if systolic < 120.0 && diastolic < 80.0 {
      Self::Normal
    } else if (120.0..=139.0).contains(&systolic) || (80.0..=89.0).contains(&diastolic) {
      Self::Prehypertension
    } else if (140.0..=159.0).contains(&systolic) || (90.0..=99.0).contains(&diastolic) {
      Self::HypertensionStage1
    } else {
      Self::HypertensionStage2
    }
  }

  /// The row-highlight tag for this category.
  pub fn color(self) -> BpColor {
    match self {
      Self::Normal => BpColor::Green,
      Self::Prehypertension => BpColor::Yellow,
      Self::HypertensionStage1 => BpColor::Orange,
      Self::HypertensionStage2 => BpColor::Red,
    }
  }

  pub fn fill_rgb(self) -> [u8; 3] { self.color().fill_rgb() }
}

// ─── Color tag ───────────────────────────────────────────────────────────────

/// Coarse highlight tag stored with each record; one per [`BpCategory`].
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BpColor {
  Green,
  Yellow,
  Orange,
  Red,
}

impl BpColor {
  pub fn fill_rgb(self) -> [u8; 3] {
    match self {
      Self::Green => FILL_GREEN,
      Self::Yellow => FILL_YELLOW,
      Self::Orange => FILL_ORANGE,
      Self::Red => FILL_RED,
    }
  }
}

// ─── Fitness ─────────────────────────────────────────────────────────────────

/// Duty-fitness tier. Variants are declared in ascending severity, so `max`
/// over a set of grades yields the overall verdict.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
pub enum Fitness {
  #[serde(rename = "FIT")]
  #[strum(serialize = "FIT")]
  Fit,
  #[serde(rename = "FIT WITH NOTE")]
  #[strum(serialize = "FIT WITH NOTE")]
  FitWithNote,
  /// Stored as `TIDAK FIT`; `UNFIT` is accepted on input.
  #[serde(rename = "TIDAK FIT", alias = "UNFIT")]
  #[strum(to_string = "TIDAK FIT", serialize = "UNFIT")]
  Unfit,
}

impl Fitness {
  pub fn label(self) -> &'static str { self.into() }

  /// Records with this verdict cannot be saved without a note.
  pub fn requires_note(self) -> bool { self == Self::FitWithNote }

  pub fn fill_rgb(self) -> [u8; 3] {
    match self {
      Self::Fit => FILL_GREEN,
      Self::FitWithNote => FILL_ORANGE,
      Self::Unfit => FILL_RED,
    }
  }
}

// ─── Per-vital graders ───────────────────────────────────────────────────────

pub fn grade_blood_pressure(systolic: f64, diastolic: f64) -> Fitness {
  if systolic >= 150.0 || diastolic >= 100.0 {
    Fitness::Unfit
  } else if systolic >= 130.0 || diastolic >= 90.0 {
    Fitness::FitWithNote
  } else {
    Fitness::Fit
  }
}

pub fn grade_pulse(pulse: f64) -> Fitness {
  if pulse > 130.0 {
    Fitness::Unfit
  } else if pulse >= 100.0 {
    Fitness::FitWithNote
  } else {
    Fitness::Fit
  }
}

pub fn grade_spo2(spo2: f64) -> Fitness {
  if spo2 < 92.0 {
    Fitness::Unfit
  } else if spo2 < 95.0 {
    Fitness::FitWithNote
  } else {
    Fitness::Fit
  }
}

pub fn grade_temperature(temperature: f64) -> Fitness {
  if temperature >= 38.0 {
    Fitness::Unfit
  } else if temperature >= 37.5 {
    Fitness::FitWithNote
  } else {
    Fitness::Fit
  }
}

/// The independent grade of each vital category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalGrades {
  pub blood_pressure: Fitness,
  pub pulse:          Fitness,
  pub spo2:           Fitness,
  pub temperature:    Fitness,
}

impl VitalGrades {
  pub fn grade(readings: &Readings) -> Self {
    Self {
      blood_pressure: grade_blood_pressure(readings.systolic, readings.diastolic),
      pulse:          grade_pulse(readings.pulse),
      spo2:           grade_spo2(readings.spo2),
      temperature:    grade_temperature(readings.temperature),
    }
  }

  /// `(label, grade)` pairs in display order.
  pub fn entries(&self) -> [(&'static str, Fitness); 4] {
    [
      ("blood pressure", self.blood_pressure),
      ("pulse", self.pulse),
      ("spo2", self.spo2),
      ("temperature", self.temperature),
    ]
  }

  /// Worst-of-four reduction.
  pub fn verdict(&self) -> Fitness {
    self
      .entries()
      .into_iter()
      .map(|(_, grade)| grade)
      .max()
      .unwrap_or(Fitness::Fit)
  }

  /// Labels of the vitals that graded worse than FIT.
  pub fn concerns(&self) -> Vec<&'static str> {
    self
      .entries()
      .into_iter()
      .filter(|(_, grade)| *grade > Fitness::Fit)
      .map(|(label, _)| label)
      .collect()
  }
}

// ─── Classification ──────────────────────────────────────────────────────────

/// The five measurements as plain numbers, before any range or integer
/// checks. Stored [`VitalSigns`] widen losslessly into this.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Readings {
  pub systolic:    f64,
  pub diastolic:   f64,
  pub pulse:       f64,
  pub spo2:        f64,
  pub temperature: f64,
}

impl From<&VitalSigns> for Readings {
  fn from(v: &VitalSigns) -> Self {
    Self {
      systolic:    f64::from(v.systolic),
      diastolic:   f64::from(v.diastolic),
      pulse:       f64::from(v.pulse),
      spo2:        v.spo2,
      temperature: v.temperature,
    }
  }
}

impl Readings {
  pub fn classify(&self) -> Classification {
    let category = BpCategory::from_pressure(self.systolic, self.diastolic);
    let grades = VitalGrades::grade(self);
    Classification {
      category,
      color: category.color(),
      fitness: grades.verdict(),
      grades,
    }
  }
}

/// Everything derived from one set of vitals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
  pub category: BpCategory,
  pub color:    BpColor,
  pub fitness:  Fitness,
  pub grades:   VitalGrades,
}

/// Classify a set of vitals. Total over its input: implausible readings are
/// classified, not rejected.
pub fn classify(vitals: &VitalSigns) -> Classification { Readings::from(vitals).classify() }
