use std::collections::HashSet;

use crate::aggregate::{DurationTotals, MS_PER_MINUTE};
use crate::fields::email_key;
use crate::model::{AnnotatedRow, DaySlot, Outcome, RosterRow, RowSkipped, RowSource};

/// Presence rule. A total exactly equal to the threshold is present.
///
/// The threshold is compared unrounded; only the summed durations are whole
/// milliseconds.
pub fn outcome_for(total_ms: Option<i64>, threshold_minutes: f64) -> Outcome {
    match total_ms {
        Some(ms) if ms as f64 >= threshold_minutes * MS_PER_MINUTE => Outcome::Present,
        Some(_) => Outcome::BelowThreshold,
        None => Outcome::NotInZoom,
    }
}

/// Output of roster classification.
#[derive(Debug, Default)]
pub struct RosterClassification {
    pub rows: Vec<AnnotatedRow>,
    pub skipped: Vec<RowSkipped>,
    /// Usable keys among the classified rows, for unmatched detection.
    pub roster_keys: HashSet<String>,
}

/// Classify already-filtered roster rows against the attendance totals and
/// write the selected day slot. Input order is kept.
///
/// Duplicate rows for one participant are classified independently.
pub fn classify_roster(
    filtered: &[&RosterRow],
    totals: &DurationTotals,
    slot: DaySlot,
    threshold_minutes: f64,
) -> RosterClassification {
    let mut out = RosterClassification {
        rows: Vec::with_capacity(filtered.len()),
        ..Default::default()
    };

    for &row in filtered {
        let key = match email_key(&row.email) {
            Ok(key) => Some(key),
            Err(reason) => {
                out.skipped.push(RowSkipped { source: RowSource::Roster, index: row.index, reason });
                None
            }
        };

        let total_ms = key.as_deref().and_then(|k| totals.total_ms(k));
        let outcome = outcome_for(total_ms, threshold_minutes);

        let mut annotated = row.clone();
        annotated.set_mark(slot, outcome.mark());

        out.rows.push(AnnotatedRow {
            outcome,
            total_minutes: key.as_deref().and_then(|k| totals.total_minutes(k)),
            row: annotated,
        });

        if let Some(key) = key {
            out.roster_keys.insert(key);
        }
    }

    out
}

/// Attendance keys with no row in the filtered roster, in first-seen order.
/// Duration plays no part here.
pub fn unmatched_emails(totals: &DurationTotals, roster_keys: &HashSet<String>) -> Vec<String> {
    totals
        .keys()
        .filter(|k| !roster_keys.contains(*k))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::minutes_to_ms;
    use crate::model::Mark;

    fn totals(entries: &[(&str, f64)]) -> DurationTotals {
        let mut t = DurationTotals::default();
        for (k, m) in entries {
            t.add(k.to_string(), minutes_to_ms(*m));
        }
        t
    }

    #[test]
    fn outcome_boundaries() {
        let hour = minutes_to_ms(60.0);
        assert_eq!(outcome_for(Some(hour), 60.0), Outcome::Present);
        assert_eq!(outcome_for(Some(hour - 1), 60.0), Outcome::BelowThreshold);
        assert_eq!(outcome_for(Some(0), 60.0), Outcome::BelowThreshold);
        assert_eq!(outcome_for(None, 60.0), Outcome::NotInZoom);
    }

    #[test]
    fn sub_millisecond_threshold_is_not_rounded_away() {
        let hour = minutes_to_ms(60.0);
        assert_eq!(outcome_for(Some(hour), 60.000001), Outcome::BelowThreshold);
        assert_eq!(outcome_for(Some(hour), 59.999999), Outcome::Present);
    }

    #[test]
    fn classifies_and_marks_selected_slot_only() {
        let t = totals(&[("a@x.com", 75.0), ("b@x.com", 30.0)]);
        let mut a = RosterRow::new(0, "A@x.com", None);
        a.attendance_day1 = Some(Mark::Y);
        let b = RosterRow::new(1, "b@x.com", None);
        let c = RosterRow::new(2, "c@x.com", None);

        let out = classify_roster(&[&a, &b, &c], &t, DaySlot::Day2, 60.0);

        let outcomes: Vec<Outcome> = out.rows.iter().map(|r| r.outcome).collect();
        assert_eq!(outcomes, vec![Outcome::Present, Outcome::BelowThreshold, Outcome::NotInZoom]);
        assert_eq!(out.rows[0].row.attendance_day2, Some(Mark::Y));
        assert_eq!(out.rows[0].row.attendance_day1, Some(Mark::Y));
        assert_eq!(out.rows[1].row.attendance_day2, Some(Mark::N));
        assert_eq!(out.rows[1].row.attendance_day1, None);
        assert_eq!(out.rows[2].total_minutes, None);
    }

    #[test]
    fn empty_email_is_not_in_zoom_and_reported() {
        let t = totals(&[("a@x.com", 75.0)]);
        let blank = RosterRow::new(4, "  ", None);
        let out = classify_roster(&[&blank], &t, DaySlot::Day1, 60.0);
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].outcome, Outcome::NotInZoom);
        assert_eq!(out.rows[0].row.attendance_day1, Some(Mark::N));
        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.skipped[0].index, 4);
        assert!(out.roster_keys.is_empty());
    }

    #[test]
    fn duplicates_classified_independently() {
        let t = totals(&[("a@x.com", 75.0)]);
        let r1 = RosterRow::new(0, "a@x.com", None);
        let r2 = RosterRow::new(1, "a@x.com", None);
        let out = classify_roster(&[&r1, &r2], &t, DaySlot::Day1, 60.0);
        assert_eq!(out.rows.len(), 2);
        assert!(out.rows.iter().all(|r| r.outcome == Outcome::Present));
    }

    #[test]
    fn unmatched_ignores_duration() {
        let t = totals(&[("z@x.com", 1.0), ("a@x.com", 90.0), ("y@x.com", 200.0)]);
        let keys: HashSet<String> = ["a@x.com".to_string()].into_iter().collect();
        assert_eq!(unmatched_emails(&t, &keys), vec!["z@x.com", "y@x.com"]);
    }
}
