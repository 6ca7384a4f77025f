use crate::reconcile::ResultRecord;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

/// Per-date sack totals plus the grand total appended as the final row of
/// the operator-facing summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTotals {
    pub rows: Vec<(String, u64)>,
    pub total: u64,
}

/// Group sack counts by the date column among the *full* record fields and
/// sum per calendar day. `None` when no record carries the column; the
/// summary is skipped, not an error.
pub fn daily_sack_totals(records: &[ResultRecord], date_column: &str) -> Option<DailyTotals> {
    if !records
        .iter()
        .any(|record| record.field(date_column).is_some())
    {
        return None;
    }

    let mut groups: BTreeMap<String, u64> = BTreeMap::new();
    for record in records {
        let raw = record.field(date_column).unwrap_or("");
        let day = normalize_to_calendar_date(raw);
        *groups.entry(day).or_insert(0) += record.sacks.unwrap_or(0);
    }

    let total = groups.values().sum();
    Some(DailyTotals {
        rows: groups.into_iter().collect(),
        total,
    })
}

/// Datetime cells collapse to their calendar date; anything unparseable
/// groups under its raw trimmed text.
fn normalize_to_calendar_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(stamp) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return stamp.date().format("%Y-%m-%d").to_string();
    }
    for format in ["%Y-%m-%d", "%d/%m/%Y", "%d/%m/%y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    trimmed.to_owned()
}
