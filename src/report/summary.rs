use crate::aggregate::DailyTotals;
use crate::reconcile::Reconciliation;
use crate::scan::ScanProfile;
use serde_json::{Map, Value, json};
use std::io::Write;
use std::path::Path;

/// Assemble the one-line JSON run summary emitted on stdout.
pub fn build_summary(
    outcome: &str,
    profile: &ScanProfile,
    reconciliation: &Reconciliation,
    averages: &[(String, f64)],
    daily: Option<&DailyTotals>,
    report_path: Option<&Path>,
) -> Value {
    let mut average_map = Map::new();
    for (column, mean) in averages {
        average_map.insert(column.clone(), json!(mean));
    }

    let daily_value = daily.map_or(Value::Null, |totals| {
        json!({
            "rows": totals
                .rows
                .iter()
                .map(|(date, sacks)| json!({ "date": date, "sacks": sacks }))
                .collect::<Vec<_>>(),
            "total": totals.total,
        })
    });

    json!({
        "version": "foliomatch.v0",
        "outcome": outcome,
        "container": profile.container,
        "rule": {
            "pattern": profile.pattern,
            "prefix": profile.prefix,
            "suffix": profile.suffix,
            "candidate_count": profile.candidate_count,
        },
        "folios": {
            "total": reconciliation.total,
            "found": reconciliation.found.len(),
            "missing": reconciliation.missing,
        },
        "averages": Value::Object(average_map),
        "daily_sacks": daily_value,
        "report": report_path.map(|path| path.display().to_string()),
    })
}

/// Write the summary as a single JSON line.
pub fn write_summary(out: &mut dyn Write, summary: &Value) -> Result<(), String> {
    serde_json::to_writer(&mut *out, summary)
        .map_err(|error| format!("failed to serialize run summary: {error}"))?;
    out.write_all(b"\n")
        .map_err(|error| format!("failed to write run summary newline: {error}"))?;
    out.flush()
        .map_err(|error| format!("failed to flush run summary: {error}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{build_summary, write_summary};
    use crate::aggregate::DailyTotals;
    use crate::reconcile::Reconciliation;
    use crate::scan::ScanProfile;
    use std::io::Cursor;
    use std::path::Path;

    fn profile() -> ScanProfile {
        ScanProfile {
            container: "MSDU1234567".to_owned(),
            pattern: r"(0302[\d\s]+?26)\b".to_owned(),
            prefix: "0302".to_owned(),
            suffix: "26".to_owned(),
            candidate_count: 3,
        }
    }

    #[test]
    fn summary_accounts_for_found_and_missing() {
        let reconciliation = Reconciliation {
            found: Vec::new(),
            missing: vec![40999],
            total: 1,
        };
        let summary = build_summary(
            "PARTIAL",
            &profile(),
            &reconciliation,
            &[("Humedad".to_owned(), 11.2)],
            None,
            None,
        );

        assert_eq!(summary["outcome"], "PARTIAL");
        assert_eq!(summary["folios"]["total"], 1);
        assert_eq!(summary["folios"]["found"], 0);
        assert_eq!(summary["folios"]["missing"][0], 40999);
        assert_eq!(summary["averages"]["Humedad"], 11.2);
        assert_eq!(summary["daily_sacks"], serde_json::Value::Null);
        assert_eq!(summary["report"], serde_json::Value::Null);
    }

    #[test]
    fn summary_carries_daily_totals_and_report_path() {
        let reconciliation = Reconciliation {
            found: Vec::new(),
            missing: Vec::new(),
            total: 0,
        };
        let daily = DailyTotals {
            rows: vec![("2024-03-12".to_owned(), 8), ("2024-03-13".to_owned(), 2)],
            total: 10,
        };
        let summary = build_summary(
            "ALL_FOUND",
            &profile(),
            &reconciliation,
            &[],
            Some(&daily),
            Some(Path::new("Reporte_MSDU1234567.xlsx")),
        );

        assert_eq!(summary["daily_sacks"]["total"], 10);
        assert_eq!(summary["daily_sacks"]["rows"][0]["sacks"], 8);
        assert_eq!(summary["report"], "Reporte_MSDU1234567.xlsx");
    }

    #[test]
    fn summary_writes_as_one_json_line() {
        let reconciliation = Reconciliation {
            found: Vec::new(),
            missing: Vec::new(),
            total: 0,
        };
        let summary = build_summary("ALL_FOUND", &profile(), &reconciliation, &[], None, None);
        let mut out = Cursor::new(Vec::new());

        write_summary(&mut out, &summary).expect("write summary");

        let text = String::from_utf8(out.into_inner()).expect("valid UTF-8 output");
        assert_eq!(text.lines().count(), 1);
        assert!(text.ends_with('\n'));
    }
}
