use crate::progress::reporter;
use crate::reconcile::table::{ReferenceTable, coerce_numeric};
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

/// One reconciled folio: the first matching master row, enriched with the
/// synthesized container-folio label and, in sacks mode, the captured count.
pub struct ResultRecord {
    pub folio: u64,
    pub label: String,
    pub sacks: Option<u64>,
    fields: HashMap<String, String>,
}

impl ResultRecord {
    pub fn field(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

/// Partitioned reconciliation result. `found.len() + missing.len()` always
/// equals the number of unique keys processed.
pub struct Reconciliation {
    pub found: Vec<ResultRecord>,
    pub missing: Vec<u64>,
    pub total: usize,
}

impl Reconciliation {
    pub fn all_found(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Look up each key in ascending order against the coerced key column.
///
/// Lookup is exact numeric equality; when several master rows share a key
/// only the first by table order is used. Keys are expected deduplicated and
/// sorted (the extraction layer guarantees it); order here only governs the
/// order of the emitted lists.
pub fn reconcile(
    keys: &[u64],
    sack_counts: Option<&BTreeMap<u64, u64>>,
    table: &ReferenceTable,
    key_column: usize,
    container: &str,
    emit_progress: bool,
) -> Reconciliation {
    let started = Instant::now();
    let coerced_keys: Vec<Option<f64>> = table
        .rows
        .iter()
        .map(|row| row.get(key_column).and_then(|cell| coerce_numeric(cell)))
        .collect();

    let mut found = Vec::new();
    let mut missing = Vec::new();

    for (index, key) in keys.iter().enumerate() {
        let target = *key as f64;
        match coerced_keys.iter().position(|value| *value == Some(target)) {
            Some(row_index) => {
                found.push(build_record(
                    *key,
                    container,
                    table,
                    &table.rows[row_index],
                    sack_counts,
                ));
            }
            None => missing.push(*key),
        }

        if emit_progress {
            reporter::report_progress(
                (index + 1) as u64,
                keys.len() as u64,
                started.elapsed().as_millis() as u64,
            );
        }
    }

    Reconciliation {
        found,
        missing,
        total: keys.len(),
    }
}

fn build_record(
    folio: u64,
    container: &str,
    table: &ReferenceTable,
    row: &[String],
    sack_counts: Option<&BTreeMap<u64, u64>>,
) -> ResultRecord {
    let mut fields = HashMap::new();
    for (column, cell) in table.columns.iter().zip(row.iter()) {
        fields
            .entry(column.clone())
            .or_insert_with(|| cell.clone());
    }

    ResultRecord {
        folio,
        label: format!("{container} - {folio}"),
        sacks: sack_counts.and_then(|counts| counts.get(&folio).copied()),
        fields,
    }
}
