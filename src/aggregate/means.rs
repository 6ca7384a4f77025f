use crate::reconcile::ResultRecord;
use crate::reconcile::fields::is_average_denylisted;
use crate::reconcile::table::coerce_numeric;

/// Arithmetic mean per column over the found records, ignoring non-numeric
/// cells, rounded to 2 decimals. Columns with no numeric values at all are
/// omitted rather than reported as missing.
pub fn column_means(records: &[ResultRecord], columns: &[String]) -> Vec<(String, f64)> {
    let mut means = Vec::new();

    for column in columns {
        let values: Vec<f64> = records
            .iter()
            .filter_map(|record| record.field(column))
            .filter_map(coerce_numeric)
            .collect();
        if values.is_empty() {
            continue;
        }

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        means.push((column.clone(), round_to_cents(mean)));
    }

    means
}

/// Default averaging subset: the selected report columns that carry at least
/// one numeric value, minus identifier-like columns.
pub fn default_average_columns(records: &[ResultRecord], selected: &[String]) -> Vec<String> {
    selected
        .iter()
        .filter(|column| !is_average_denylisted(column))
        .filter(|column| {
            records
                .iter()
                .filter_map(|record| record.field(column))
                .any(|cell| coerce_numeric(cell).is_some())
        })
        .cloned()
        .collect()
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
