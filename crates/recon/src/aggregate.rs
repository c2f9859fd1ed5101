use std::collections::HashMap;

use crate::fields::email_key;
use crate::model::{AttendanceRow, RowSkipped, RowSource, SkipReason};

pub const MS_PER_MINUTE: f64 = 60_000.0;

/// Minutes → whole milliseconds. Totals are kept in integers so that summing
/// is exact regardless of row order. Values beyond `i64` clamp to its range.
pub fn minutes_to_ms(minutes: f64) -> i64 {
    (minutes * MS_PER_MINUTE).round().clamp(i64::MIN as f64, i64::MAX as f64) as i64
}

pub fn ms_to_minutes(ms: i64) -> f64 {
    ms as f64 / MS_PER_MINUTE
}

/// Summed attendance per normalized email, with first-seen key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DurationTotals {
    totals_ms: HashMap<String, i64>,
    order: Vec<String>,
}

impl DurationTotals {
    /// Totals saturate at `i64::MAX` ms instead of overflowing.
    pub fn add(&mut self, key: String, ms: i64) {
        match self.totals_ms.get_mut(&key) {
            Some(total) => *total = total.saturating_add(ms),
            None => {
                self.order.push(key.clone());
                self.totals_ms.insert(key, ms);
            }
        }
    }

    pub fn total_ms(&self, key: &str) -> Option<i64> {
        self.totals_ms.get(key).copied()
    }

    pub fn total_minutes(&self, key: &str) -> Option<f64> {
        self.total_ms(key).map(ms_to_minutes)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.totals_ms.contains_key(key)
    }

    /// Keys in order of first appearance in the attendance input.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Group attendance rows by normalized email and sum their durations.
///
/// Rows without a usable email are left out. Negative or non-finite
/// durations contribute nothing, but the email still counts as seen.
pub fn aggregate_durations(rows: &[AttendanceRow]) -> (DurationTotals, Vec<RowSkipped>) {
    let mut totals = DurationTotals::default();
    let mut skipped = Vec::new();

    for row in rows {
        let key = match email_key(&row.email) {
            Ok(key) => key,
            Err(reason) => {
                skipped.push(RowSkipped { source: RowSource::Attendance, index: row.index, reason });
                continue;
            }
        };

        let ms = if row.duration.is_finite() && row.duration >= 0.0 {
            minutes_to_ms(row.duration)
        } else {
            skipped.push(RowSkipped {
                source: RowSource::Attendance,
                index: row.index,
                reason: SkipReason::InvalidDuration { value: row.duration },
            });
            0
        };

        totals.add(key, ms);
    }

    (totals, skipped)
}
