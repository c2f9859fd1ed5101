use crate::model::{AnnotatedRow, Outcome, ReconSummary};

/// Tally per-outcome counts. The three roster outcomes always partition
/// `total_registrations`.
pub fn compute_summary(
    rows: &[AnnotatedRow],
    unmatched: &[String],
    zoom_participants: usize,
) -> ReconSummary {
    let mut summary = ReconSummary {
        total_registrations: rows.len(),
        not_registered: unmatched.len(),
        zoom_participants,
        ..Default::default()
    };

    for r in rows {
        match r.outcome {
            Outcome::Present => summary.present += 1,
            Outcome::BelowThreshold => summary.below_threshold += 1,
            Outcome::NotInZoom => summary.not_in_zoom += 1,
        }
    }

    summary
}
