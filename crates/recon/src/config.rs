use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ReconError;
use crate::fields::parse_date;
use crate::model::{DaySlot, ProgramFilter, ReconParams};

// ---------------------------------------------------------------------------
// Top-level job config
// ---------------------------------------------------------------------------

/// A complete run described in TOML: what to reconcile and where the
/// inputs live.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    /// Training date, any format accepted by [`parse_date`].
    pub date: String,
    /// Attendance day to write: 1 or 2.
    pub day: u8,
    pub program: Option<String>,
    /// Falls back to user settings when absent.
    pub threshold_minutes: Option<f64>,
    pub registration: RegistrationSource,
    pub zoom: ZoomSource,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Sources + column mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationSource {
    pub file: String,
    /// Explicit mapping; auto-detected from headers when absent.
    pub columns: Option<RegistrationColumns>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZoomSource {
    pub file: String,
    pub columns: Option<ZoomColumns>,
}

/// Registration header names for each field the engine reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, serde::Serialize)]
pub struct RegistrationColumns {
    pub email: String,
    pub training_date: String,
    pub attendance_day1: Option<String>,
    pub attendance_day2: Option<String>,
    pub name: Option<String>,
    pub program: Option<String>,
}

impl RegistrationColumns {
    pub fn attendance(&self, slot: DaySlot) -> Option<&str> {
        match slot {
            DaySlot::Day1 => self.attendance_day1.as_deref(),
            DaySlot::Day2 => self.attendance_day2.as_deref(),
        }
    }

    /// Every mapped header, required ones first.
    pub fn mapped(&self) -> Vec<&str> {
        let mut cols = vec![self.email.as_str(), self.training_date.as_str()];
        for c in [&self.attendance_day1, &self.attendance_day2, &self.name, &self.program] {
            if let Some(c) = c {
                cols.push(c);
            }
        }
        cols
    }
}

/// Meeting-export header names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, serde::Serialize)]
pub struct ZoomColumns {
    pub email: String,
    pub duration: String,
    pub name: Option<String>,
}

impl ZoomColumns {
    pub fn mapped(&self) -> Vec<&str> {
        let mut cols = vec![self.email.as_str(), self.duration.as_str()];
        if let Some(ref name) = self.name {
            cols.push(name);
        }
        cols
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    pub dir: Option<String>,
    /// Write only the reconciled rows instead of the whole roster.
    #[serde(default)]
    pub filtered_only: bool,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl JobConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: JobConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        self.training_date()?;
        self.slot()?;

        if let Some(t) = self.threshold_minutes {
            if !t.is_finite() || t < 0.0 {
                return Err(ReconError::ConfigValidation(format!(
                    "threshold_minutes must be a non-negative number, got {t}"
                )));
            }
        }

        if self.registration.file.trim().is_empty() {
            return Err(ReconError::ConfigValidation("registration.file is empty".into()));
        }
        if self.zoom.file.trim().is_empty() {
            return Err(ReconError::ConfigValidation("zoom.file is empty".into()));
        }

        if let Some(ref cols) = self.registration.columns {
            if cols.email.trim().is_empty() || cols.training_date.trim().is_empty() {
                return Err(ReconError::ConfigValidation(
                    "registration.columns: email and training_date must name a column".into(),
                ));
            }
        }
        if let Some(ref cols) = self.zoom.columns {
            if cols.email.trim().is_empty() || cols.duration.trim().is_empty() {
                return Err(ReconError::ConfigValidation(
                    "zoom.columns: email and duration must name a column".into(),
                ));
            }
        }

        Ok(())
    }

    pub fn training_date(&self) -> Result<NaiveDate, ReconError> {
        parse_date(&self.date).ok_or_else(|| {
            ReconError::ConfigValidation(format!("cannot parse date '{}'", self.date))
        })
    }

    pub fn slot(&self) -> Result<DaySlot, ReconError> {
        DaySlot::from_number(self.day).ok_or_else(|| {
            ReconError::ConfigValidation(format!("day must be 1 or 2, got {}", self.day))
        })
    }

    /// Engine parameters; `default_threshold` applies when the job sets none.
    pub fn params(&self, default_threshold: f64) -> Result<ReconParams, ReconError> {
        Ok(ReconParams::new(self.training_date()?, self.slot()?)
            .with_program(ProgramFilter::from_option(self.program.as_deref()))
            .with_threshold(self.threshold_minutes.unwrap_or(default_threshold)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
