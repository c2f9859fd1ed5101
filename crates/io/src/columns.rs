//! Header auto-detection and explicit mapping for both input tables.

use log::debug;
use rollcall_recon::config::{RegistrationColumns, ZoomColumns};

use crate::error::IoError;
use crate::{REGISTRATION, ZOOM};

/// Best-effort header guesses for a registration table. Any field may be
/// unresolved; [`RegistrationGuess::into_columns`] enforces the required ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationGuess {
    pub email: Option<String>,
    pub training_date: Option<String>,
    pub attendance_day1: Option<String>,
    pub attendance_day2: Option<String>,
    pub name: Option<String>,
    pub program: Option<String>,
}

impl RegistrationGuess {
    pub fn into_columns(self) -> Result<RegistrationColumns, IoError> {
        let mut missing = Vec::new();
        if self.email.is_none() {
            missing.push("Email".to_string());
        }
        if self.training_date.is_none() {
            missing.push("Training date".to_string());
        }
        match (self.email, self.training_date) {
            (Some(email), Some(training_date)) => Ok(RegistrationColumns {
                email,
                training_date,
                attendance_day1: self.attendance_day1,
                attendance_day2: self.attendance_day2,
                name: self.name,
                program: self.program,
            }),
            _ => Err(IoError::MissingColumns { table: REGISTRATION.into(), fields: missing }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoomGuess {
    pub email: Option<String>,
    pub duration: Option<String>,
    pub name: Option<String>,
}

impl ZoomGuess {
    pub fn into_columns(self) -> Result<ZoomColumns, IoError> {
        let mut missing = Vec::new();
        if self.email.is_none() {
            missing.push("Email".to_string());
        }
        if self.duration.is_none() {
            missing.push("Duration".to_string());
        }
        match (self.email, self.duration) {
            (Some(email), Some(duration)) => Ok(ZoomColumns { email, duration, name: self.name }),
            _ => Err(IoError::MissingColumns { table: ZOOM.into(), fields: missing }),
        }
    }
}

/// Keyword detection over registration headers. Each header is claimed by at
/// most one field; the first header to match a field wins it.
pub fn detect_registration_columns(headers: &[String]) -> RegistrationGuess {
    let mut g = RegistrationGuess::default();
    for col in headers {
        let lower = col.trim().to_lowercase();
        if lower.contains("email") && g.email.is_none() {
            g.email = Some(col.clone());
        } else if (lower.contains("training date") || lower.contains("training_date"))
            && g.training_date.is_none()
        {
            g.training_date = Some(col.clone());
        } else if lower.contains("attendance") && lower.contains("day 1") && g.attendance_day1.is_none() {
            g.attendance_day1 = Some(col.clone());
        } else if lower.contains("attendance") && lower.contains("day 2") && g.attendance_day2.is_none() {
            g.attendance_day2 = Some(col.clone());
        } else if (lower == "name" || lower == "participant name") && g.name.is_none() {
            g.name = Some(col.clone());
        } else if (lower.contains("version") || lower.contains("program")) && g.program.is_none() {
            g.program = Some(col.clone());
        }
    }
    debug!("registration columns detected: {g:?}");
    g
}

/// Keyword detection over meeting-export headers.
pub fn detect_zoom_columns(headers: &[String]) -> ZoomGuess {
    let mut g = ZoomGuess::default();
    for col in headers {
        let lower = col.trim().to_lowercase();
        if lower.contains("email") && g.email.is_none() {
            g.email = Some(col.clone());
        } else if lower.contains("duration") && g.duration.is_none() {
            g.duration = Some(col.clone());
        } else if lower.contains("name") && g.name.is_none() {
            g.name = Some(col.clone());
        }
    }
    debug!("zoom columns detected: {g:?}");
    g
}

fn check_known(table: &str, headers: &[String], mapped: &[&str]) -> Result<(), IoError> {
    for column in mapped {
        if !headers.iter().any(|h| h == column) {
            return Err(IoError::UnknownColumn { table: table.into(), column: column.to_string() });
        }
    }
    Ok(())
}

/// Explicit mapping when given (every named header must exist), otherwise
/// auto-detection.
pub fn resolve_registration_columns(
    headers: &[String],
    explicit: Option<&RegistrationColumns>,
) -> Result<RegistrationColumns, IoError> {
    match explicit {
        Some(cols) => {
            check_known(REGISTRATION, headers, &cols.mapped())?;
            Ok(cols.clone())
        }
        None => detect_registration_columns(headers).into_columns(),
    }
}

pub fn resolve_zoom_columns(
    headers: &[String],
    explicit: Option<&ZoomColumns>,
) -> Result<ZoomColumns, IoError> {
    match explicit {
        Some(cols) => {
            check_known(ZOOM, headers, &cols.mapped())?;
            Ok(cols.clone())
        }
        None => detect_zoom_columns(headers).into_columns(),
    }
}
