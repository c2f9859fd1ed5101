use log::debug;

use crate::aggregate::aggregate_durations;
use crate::classify::{classify_roster, unmatched_emails};
use crate::error::ReconError;
use crate::evidence::compute_summary;
use crate::model::{ReconInput, ReconMeta, ReconParams, ReconResult, RosterRow, Warning};

/// Run one reconciliation pass. Returns the annotated roster + summary.
///
/// Pure: no IO, no clock. Identical input and params give identical results.
pub fn run(params: &ReconParams, input: &ReconInput) -> Result<ReconResult, ReconError> {
    let threshold = params.threshold_minutes;
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(ReconError::InvalidThreshold(threshold));
    }

    if input.roster.is_empty() {
        return Err(ReconError::EmptyRoster);
    }

    let filtered: Vec<&RosterRow> = input
        .roster
        .iter()
        .filter(|r| r.training_date == Some(params.date))
        .filter(|r| params.program.matches(r.program.as_deref()))
        .collect();

    if filtered.is_empty() {
        return Err(ReconError::NoRegistrations {
            date: params.date,
            program: params.program.as_option().map(str::to_string),
        });
    }

    let mut warnings = Vec::new();
    if input.attendance.is_empty() {
        warnings.push(Warning::EmptyAttendance);
    }

    let (totals, mut skipped) = aggregate_durations(&input.attendance);
    debug!(
        "aggregated {} attendance rows into {} participants",
        input.attendance.len(),
        totals.len()
    );

    let classified = classify_roster(&filtered, &totals, params.slot, threshold);
    let unmatched = unmatched_emails(&totals, &classified.roster_keys);

    // Roster reports first, then attendance, each in input order.
    let mut all_skipped = classified.skipped;
    all_skipped.append(&mut skipped);

    let summary = compute_summary(&classified.rows, &unmatched, totals.len());
    debug!(
        "{} registrations: {} present, {} below threshold, {} not in zoom, {} not registered",
        summary.total_registrations,
        summary.present,
        summary.below_threshold,
        summary.not_in_zoom,
        summary.not_registered,
    );

    Ok(ReconResult {
        meta: ReconMeta {
            date: params.date,
            slot: params.slot,
            program: params.program.as_option().map(str::to_string),
            threshold_minutes: threshold,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        },
        summary,
        rows: classified.rows,
        unmatched_emails: unmatched,
        skipped: all_skipped,
        warnings,
    })
}
