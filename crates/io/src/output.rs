//! Output naming and the annotated roster writer.

use std::path::Path;

use chrono::NaiveDate;
use log::debug;
use rollcall_recon::config::RegistrationColumns;
use rollcall_recon::model::{DaySlot, ProgramFilter, ReconResult};

use crate::csv::{write_table, Table};
use crate::error::IoError;

/// `attendance_output_2025-01-15_Day1_Cohort_A.csv`. The program part is
/// omitted when every program was reconciled.
pub fn output_filename(date: NaiveDate, slot: DaySlot, program: &ProgramFilter) -> String {
    let mut name = format!("attendance_output_{}_{}", date.format("%Y-%m-%d"), slot);
    if let Some(p) = program.as_option() {
        let safe: String = p
            .trim()
            .chars()
            .map(|c| match c {
                ' ' => '_',
                '/' | '\\' => '-',
                c => c,
            })
            .collect();
        if !safe.is_empty() {
            name.push('_');
            name.push_str(&safe);
        }
    }
    name.push_str(".csv");
    name
}

/// Column that receives the day's marks: the mapped one, else an existing
/// `Attendance - Day N` header, else a new column appended at the end.
fn slot_column(table: &mut Table, cols: &RegistrationColumns, slot: DaySlot) -> usize {
    let existing = cols
        .attendance(slot)
        .and_then(|c| table.column_index(c))
        .or_else(|| table.column_index(&slot.default_column()));
    if let Some(idx) = existing {
        return idx;
    }

    debug!("adding column '{}'", slot.default_column());
    table.headers.push(slot.default_column());
    for record in &mut table.records {
        record.push(String::new());
    }
    table.headers.len() - 1
}

/// Copy of the registration table with `Y`/`N` written into the day-slot
/// column for every reconciled row. Everything else is left verbatim.
pub fn annotate_table(
    table: &Table,
    cols: &RegistrationColumns,
    result: &ReconResult,
    filtered_only: bool,
) -> Table {
    let mut out = table.clone();
    let col = slot_column(&mut out, cols, result.meta.slot);

    for annotated in &result.rows {
        if let Some(record) = out.records.get_mut(annotated.row.index) {
            if record.len() <= col {
                record.resize(col + 1, String::new());
            }
            record[col] = annotated.outcome.mark().as_str().to_string();
        }
    }

    if filtered_only {
        out.records = result
            .rows
            .iter()
            .filter_map(|a| out.records.get(a.row.index).cloned())
            .collect();
    }
    out
}

pub fn write_annotated(
    path: &Path,
    table: &Table,
    cols: &RegistrationColumns,
    result: &ReconResult,
    filtered_only: bool,
) -> Result<(), IoError> {
    let out = annotate_table(table, cols, result, filtered_only);
    write_table(&out, path)?;
    debug!("wrote {} rows to {}", out.len(), path.display());
    Ok(())
}
