use crate::document::TableDocument;

/// Literal name of the reconciliation key column, matched case-insensitively
/// after trimming.
pub const KEY_COLUMN: &str = "Folio";

// Master sheets carry a title banner in the first row; the second row is the
// header row.
const HEADER_ROW_OFFSET: usize = 1;

/// One loaded sheet of the QC master: trimmed header names plus raw data
/// rows, all cells stringified.
pub struct ReferenceTable {
    pub sheet: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReferenceTable {
    /// Load a sheet applying the header-row convention.
    pub fn load(document: &TableDocument, sheet: Option<&str>) -> Result<Self, String> {
        let (sheet_name, raw_rows) = document.read_rows(sheet)?;
        if raw_rows.len() <= HEADER_ROW_OFFSET {
            return Err(format!(
                "sheet '{sheet_name}' has no header row (expected headers in row {})",
                HEADER_ROW_OFFSET + 1
            ));
        }

        let columns = raw_rows[HEADER_ROW_OFFSET]
            .iter()
            .map(|cell| cell.trim().to_owned())
            .collect();
        let rows = raw_rows[HEADER_ROW_OFFSET + 1..].to_vec();

        Ok(Self {
            sheet: sheet_name,
            columns,
            rows,
        })
    }

    /// Index of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Index of the key column, located case-insensitively after trimming.
    /// `None` is a structural failure for reconciliation; callers refuse.
    pub fn locate_key_column(&self) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.trim().eq_ignore_ascii_case(KEY_COLUMN))
    }
}

/// Coerce one cell to a number; unparseable values become missing, never an
/// error.
pub fn coerce_numeric(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::{ReferenceTable, coerce_numeric};
    use crate::document::open_table;
    use std::fs;
    use tempfile::NamedTempFile;

    #[test]
    fn load_skips_banner_row_and_trims_headers() {
        let file = NamedTempFile::with_suffix(".csv").expect("create csv temp file");
        fs::write(
            file.path(),
            "REGISTRO DE CALIDAD,,\n Folio ,Humedad,Lote\n40526,11.5,L-02\n40527,10.9,L-03\n",
        )
        .expect("write csv fixture");

        let document = open_table(file.path()).expect("open table");
        let table = ReferenceTable::load(&document, None).expect("load table");

        assert_eq!(table.columns, vec!["Folio", "Humedad", "Lote"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.locate_key_column(), Some(0));
        assert_eq!(table.column_index("Lote"), Some(2));
        assert_eq!(table.column_index("Inexistente"), None);
    }

    #[test]
    fn key_column_lookup_is_case_insensitive() {
        let table = ReferenceTable {
            sheet: "Registro".to_owned(),
            columns: vec!["Lote".to_owned(), "  fOlIo ".to_owned()],
            rows: Vec::new(),
        };
        assert_eq!(table.locate_key_column(), Some(1));
    }

    #[test]
    fn load_rejects_sheet_without_header_row() {
        let file = NamedTempFile::with_suffix(".csv").expect("create csv temp file");
        fs::write(file.path(), "solo una fila\n").expect("write csv fixture");

        let document = open_table(file.path()).expect("open table");
        assert!(ReferenceTable::load(&document, None).is_err());
    }

    #[test]
    fn numeric_coercion_never_raises() {
        assert_eq!(coerce_numeric("40526"), Some(40526.0));
        assert_eq!(coerce_numeric(" 11.5 "), Some(11.5));
        assert_eq!(coerce_numeric("pendiente"), None);
        assert_eq!(coerce_numeric(""), None);
    }
}
