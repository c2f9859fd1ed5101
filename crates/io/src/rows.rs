//! Mapped tables → engine rows.

use std::collections::HashMap;

use log::warn;
use rollcall_recon::config::{RegistrationColumns, ZoomColumns};
use rollcall_recon::fields::{parse_date, parse_duration_minutes, parse_mark};
use rollcall_recon::model::{AttendanceRow, RosterRow};
use serde::Serialize;

use crate::csv::Table;
use crate::{REGISTRATION, ZOOM};

/// A cell the loader could not interpret. Loading continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadIssue {
    pub table: &'static str,
    /// Zero-based data row (header excluded).
    pub row: usize,
    pub column: String,
    pub value: String,
    pub problem: String,
}

impl std::fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} row {}, column '{}': {} ('{}')",
            self.table,
            self.row + 1,
            self.column,
            self.problem,
            self.value
        )
    }
}

#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub rows: Vec<T>,
    pub issues: Vec<LoadIssue>,
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            issues: Vec::new(),
        }
    }
}

fn index_of(table: &Table, name: Option<&str>) -> Option<usize> {
    name.and_then(|n| table.column_index(n))
}

/// Build roster rows. Columns outside the mapping go to `passthrough`.
///
/// Rows with an unparseable training date keep `training_date = None` and are
/// reported; they can never match a date filter.
pub fn roster_rows(table: &Table, cols: &RegistrationColumns) -> Loaded<RosterRow> {
    let email_idx = index_of(table, Some(&cols.email));
    let date_idx = index_of(table, Some(&cols.training_date));
    let day1_idx = index_of(table, cols.attendance_day1.as_deref());
    let day2_idx = index_of(table, cols.attendance_day2.as_deref());
    let program_idx = index_of(table, cols.program.as_deref());

    let mapped = cols.mapped();
    let passthrough_cols: Vec<(usize, &String)> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !mapped.contains(&h.as_str()))
        .collect();

    let mut out = Loaded::default();

    for i in 0..table.len() {
        let cell = |idx: Option<usize>| idx.map(|c| table.cell(i, c)).unwrap_or("");

        let raw_date = cell(date_idx);
        let training_date = parse_date(raw_date);
        if training_date.is_none() && !raw_date.trim().is_empty() {
            out.issues.push(LoadIssue {
                table: REGISTRATION,
                row: i,
                column: cols.training_date.clone(),
                value: raw_date.to_string(),
                problem: "unparseable date".into(),
            });
        }

        let program = program_idx
            .map(|c| table.cell(i, c))
            .filter(|p| !p.trim().is_empty())
            .map(str::to_string);

        let passthrough: HashMap<String, String> = passthrough_cols
            .iter()
            .map(|(c, h)| ((*h).clone(), table.cell(i, *c).to_string()))
            .collect();

        out.rows.push(RosterRow {
            index: i,
            email: cell(email_idx).to_string(),
            training_date,
            program,
            attendance_day1: parse_mark(cell(day1_idx)),
            attendance_day2: parse_mark(cell(day2_idx)),
            passthrough,
        });
    }

    if !out.issues.is_empty() {
        warn!("{} registration rows have unparseable training dates", out.issues.len());
    }
    out
}

/// Build attendance rows. Unparseable durations become 0 minutes and are
/// reported; empty duration cells are silently 0.
pub fn attendance_rows(table: &Table, cols: &ZoomColumns) -> Loaded<AttendanceRow> {
    let email_idx = table.column_index(&cols.email);
    let duration_idx = table.column_index(&cols.duration);
    let name_idx = index_of(table, cols.name.as_deref());

    let mut out = Loaded::default();

    for i in 0..table.len() {
        let cell = |idx: Option<usize>| idx.map(|c| table.cell(i, c)).unwrap_or("");

        let raw_duration = cell(duration_idx);
        let duration = match parse_duration_minutes(raw_duration) {
            Some(minutes) => minutes,
            None => {
                if !raw_duration.trim().is_empty() {
                    out.issues.push(LoadIssue {
                        table: ZOOM,
                        row: i,
                        column: cols.duration.clone(),
                        value: raw_duration.to_string(),
                        problem: "unparseable duration, counted as 0".into(),
                    });
                }
                0.0
            }
        };

        let name = Some(cell(name_idx).trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        out.rows.push(AttendanceRow {
            index: i,
            email: cell(email_idx).to_string(),
            duration,
            name,
        });
    }

    if !out.issues.is_empty() {
        warn!("{} attendance rows have unparseable durations", out.issues.len());
    }
    out
}
