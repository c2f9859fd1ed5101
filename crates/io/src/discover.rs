//! Values a user picks from before a run: training dates and programs.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rollcall_recon::model::RosterRow;

/// Distinct parseable training dates, ascending.
pub fn unique_dates(rows: &[RosterRow]) -> Vec<NaiveDate> {
    rows.iter()
        .filter_map(|r| r.training_date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct non-empty program values (trimmed), sorted.
pub fn unique_programs(rows: &[RosterRow]) -> Vec<String> {
    rows.iter()
        .filter_map(|r| r.program.as_deref())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
