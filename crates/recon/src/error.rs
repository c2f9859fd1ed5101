use std::fmt;

use chrono::NaiveDate;

/// Whole-run failures. Row-level problems never surface here; they are
/// collected as [`crate::model::RowSkipped`] in the result instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconError {
    /// The roster input has no rows at all.
    EmptyRoster,
    /// Date (and program) filter left nothing to reconcile.
    NoRegistrations { date: NaiveDate, program: Option<String> },
    /// Threshold must be a finite, non-negative number of minutes.
    InvalidThreshold(f64),
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Job config validation error (bad date, bad day, etc.).
    ConfigValidation(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRoster => write!(f, "registration data has no rows"),
            Self::NoRegistrations { date, program } => {
                write!(f, "no registrations found for date {}", date.format("%d-%m-%Y"))?;
                if let Some(program) = program {
                    write!(f, " and program '{program}'")?;
                }
                Ok(())
            }
            Self::InvalidThreshold(v) => {
                write!(f, "threshold must be a non-negative number of minutes, got {v}")
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
