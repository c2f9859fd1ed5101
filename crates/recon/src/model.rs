use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Attendance mark written into a roster day column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    Y,
    N,
}

impl Mark {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Y => "Y",
            Self::N => "N",
        }
    }
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the two roster attendance columns a run writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DaySlot {
    Day1,
    Day2,
}

impl DaySlot {
    pub fn number(&self) -> u8 {
        match self {
            Self::Day1 => 1,
            Self::Day2 => 2,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Day1),
            2 => Some(Self::Day2),
            _ => None,
        }
    }

    /// Column header used when the roster has no column for this slot.
    pub fn default_column(&self) -> String {
        format!("Attendance - Day {}", self.number())
    }
}

impl std::fmt::Display for DaySlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Day1 => write!(f, "Day1"),
            Self::Day2 => write!(f, "Day2"),
        }
    }
}

impl std::str::FromStr for DaySlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(' ', "").as_str() {
            "1" | "day1" => Ok(Self::Day1),
            "2" | "day2" => Ok(Self::Day2),
            other => Err(format!("invalid day slot '{other}' (expected 1 or 2)")),
        }
    }
}

/// One registration record for one participant on one training date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterRow {
    /// Position in the original roster; output order follows it.
    pub index: usize,
    pub email: String,
    pub training_date: Option<NaiveDate>,
    pub program: Option<String>,
    pub attendance_day1: Option<Mark>,
    pub attendance_day2: Option<Mark>,
    /// Unmapped columns, header → raw value.
    pub passthrough: HashMap<String, String>,
}

impl RosterRow {
    pub fn new(index: usize, email: impl Into<String>, training_date: Option<NaiveDate>) -> Self {
        Self {
            index,
            email: email.into(),
            training_date,
            program: None,
            attendance_day1: None,
            attendance_day2: None,
            passthrough: HashMap::new(),
        }
    }

    pub fn mark(&self, slot: DaySlot) -> Option<Mark> {
        match slot {
            DaySlot::Day1 => self.attendance_day1,
            DaySlot::Day2 => self.attendance_day2,
        }
    }

    pub fn set_mark(&mut self, slot: DaySlot, mark: Mark) {
        match slot {
            DaySlot::Day1 => self.attendance_day1 = Some(mark),
            DaySlot::Day2 => self.attendance_day2 = Some(mark),
        }
    }
}

/// One meeting session record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRow {
    pub index: usize,
    pub email: String,
    /// Minutes connected during this session.
    pub duration: f64,
    pub name: Option<String>,
}

impl AttendanceRow {
    pub fn new(index: usize, email: impl Into<String>, duration: f64) -> Self {
        Self {
            index,
            email: email.into(),
            duration,
            name: None,
        }
    }
}

/// Pre-loaded rows for one run.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub roster: Vec<RosterRow>,
    pub attendance: Vec<AttendanceRow>,
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

pub const DEFAULT_THRESHOLD_MINUTES: f64 = 60.0;

/// Program restriction applied alongside the date filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramFilter {
    #[default]
    All,
    Exact(String),
}

impl ProgramFilter {
    /// `None`, empty, and the literal `All` mean no restriction.
    pub fn from_option(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some("All") => Self::All,
            Some(p) => Self::Exact(p.to_string()),
        }
    }

    pub fn matches(&self, program: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Exact(want) => program.map(str::trim) == Some(want.as_str()),
        }
    }

    pub fn as_option(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Exact(p) => Some(p),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconParams {
    pub date: NaiveDate,
    pub slot: DaySlot,
    pub program: ProgramFilter,
    pub threshold_minutes: f64,
}

impl ReconParams {
    pub fn new(date: NaiveDate, slot: DaySlot) -> Self {
        Self {
            date,
            slot,
            program: ProgramFilter::All,
            threshold_minutes: DEFAULT_THRESHOLD_MINUTES,
        }
    }

    pub fn with_program(mut self, program: ProgramFilter) -> Self {
        self.program = program;
        self
    }

    pub fn with_threshold(mut self, minutes: f64) -> Self {
        self.threshold_minutes = minutes;
        self
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Summed duration met the threshold.
    Present,
    /// Seen in attendance, but for less than the threshold.
    BelowThreshold,
    /// No attendance record (or no usable email).
    NotInZoom,
}

impl Outcome {
    pub fn mark(&self) -> Mark {
        match self {
            Self::Present => Mark::Y,
            Self::BelowThreshold | Self::NotInZoom => Mark::N,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
            Self::BelowThreshold => write!(f, "below_threshold"),
            Self::NotInZoom => write!(f, "not_in_zoom"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedRow {
    pub outcome: Outcome,
    /// Summed minutes, `None` when the participant never appeared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_minutes: Option<f64>,
    pub row: RosterRow,
}

// ---------------------------------------------------------------------------
// Row reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowSource {
    Roster,
    Attendance,
}

impl std::fmt::Display for RowSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Roster => write!(f, "roster"),
            Self::Attendance => write!(f, "attendance"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    MissingEmail,
    InvalidEmail { value: String },
    InvalidDuration { value: f64 },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEmail => write!(f, "missing email"),
            Self::InvalidEmail { value } => write!(f, "unusable email '{value}'"),
            Self::InvalidDuration { value } => write!(f, "invalid duration {value}, counted as 0"),
        }
    }
}

/// A per-row problem. The run continues; the row is excluded from matching.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowSkipped {
    pub source: RowSource,
    pub index: usize,
    pub reason: SkipReason,
}

impl std::fmt::Display for RowSkipped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} row {}: {}", self.source, self.index + 1, self.reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Warning {
    /// No attendance rows at all; every registration is not_in_zoom.
    EmptyAttendance,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyAttendance => {
                write!(f, "attendance data has no rows; every registration is marked N")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub total_registrations: usize,
    pub present: usize,
    pub below_threshold: usize,
    pub not_in_zoom: usize,
    pub not_registered: usize,
    /// Distinct usable emails in the attendance data.
    pub zoom_participants: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconMeta {
    pub date: NaiveDate,
    pub slot: DaySlot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    pub threshold_minutes: f64,
    pub engine_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub rows: Vec<AnnotatedRow>,
    pub unmatched_emails: Vec<String>,
    pub skipped: Vec<RowSkipped>,
    pub warnings: Vec<Warning>,
}
