//! `rollcall inspect`: what a run would see in one CSV file.

use std::collections::BTreeMap;
use std::path::PathBuf;

use rollcall_io::columns::{detect_registration_columns, detect_zoom_columns};
use rollcall_io::csv;
use rollcall_io::discover::{unique_dates, unique_programs};
use rollcall_io::rows::{attendance_rows, roster_rows};
use rollcall_recon::aggregate::aggregate_durations;
use serde::Serialize;

use crate::CliError;

#[derive(Serialize)]
struct InspectReport {
    file: String,
    kind: &'static str,
    rows: usize,
    headers: Vec<String>,
    /// Field → detected header. Unresolved fields are absent.
    columns: BTreeMap<&'static str, String>,
    /// Required fields with no matching header.
    missing: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    training_dates: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    programs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    participants: Option<usize>,
}

pub fn cmd_inspect(file: PathBuf, zoom: bool, json: bool) -> Result<(), CliError> {
    let table = csv::load(&file)?;

    let mut report = InspectReport {
        file: file.display().to_string(),
        kind: if zoom { rollcall_io::ZOOM } else { rollcall_io::REGISTRATION },
        rows: table.len(),
        headers: table.headers.clone(),
        columns: BTreeMap::new(),
        missing: Vec::new(),
        training_dates: Vec::new(),
        programs: Vec::new(),
        participants: None,
    };

    if zoom {
        let guess = detect_zoom_columns(&table.headers);
        let fields = [("email", &guess.email), ("duration", &guess.duration), ("name", &guess.name)];
        for (field, header) in fields {
            if let Some(h) = header {
                report.columns.insert(field, h.clone());
            }
        }
        match guess.into_columns() {
            Ok(cols) => {
                let loaded = attendance_rows(&table, &cols);
                let (totals, _) = aggregate_durations(&loaded.rows);
                report.participants = Some(totals.len());
            }
            Err(rollcall_io::IoError::MissingColumns { fields, .. }) => report.missing = fields,
            Err(e) => return Err(e.into()),
        }
    } else {
        let guess = detect_registration_columns(&table.headers);
        let fields = [
            ("email", &guess.email),
            ("training_date", &guess.training_date),
            ("attendance_day1", &guess.attendance_day1),
            ("attendance_day2", &guess.attendance_day2),
            ("name", &guess.name),
            ("program", &guess.program),
        ];
        for (field, header) in fields {
            if let Some(h) = header {
                report.columns.insert(field, h.clone());
            }
        }
        match guess.into_columns() {
            Ok(cols) => {
                let loaded = roster_rows(&table, &cols);
                report.training_dates = unique_dates(&loaded.rows)
                    .iter()
                    .map(|d| d.format("%d-%m-%Y").to_string())
                    .collect();
                report.programs = unique_programs(&loaded.rows);
            }
            Err(rollcall_io::IoError::MissingColumns { fields, .. }) => report.missing = fields,
            Err(e) => return Err(e.into()),
        }
    }

    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{out}");
        return Ok(());
    }

    println!("{} ({} file, {} rows)", report.file, report.kind, report.rows);
    println!("columns:");
    for (field, header) in &report.columns {
        println!("  {field:<16} {header}");
    }
    for field in &report.missing {
        println!("  {:<16} (not found)", field);
    }
    if !report.training_dates.is_empty() {
        println!("training dates: {}", report.training_dates.join(", "));
    }
    if !report.programs.is_empty() {
        println!("programs: {}", report.programs.join(", "));
    }
    if let Some(n) = report.participants {
        println!("participants: {n}");
    }
    Ok(())
}
