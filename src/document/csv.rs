use crate::document::CsvDocument;
use std::path::Path;

impl CsvDocument {
    pub fn open(path: &Path) -> Result<Self, String> {
        if !path.is_file() {
            return Err(format!("csv file '{}' not found", path.display()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// The virtual sheet name reported for a csv table.
    pub fn sheet_name(&self) -> String {
        self.path
            .file_stem()
            .and_then(|value| value.to_str())
            .unwrap_or("csv")
            .to_owned()
    }

    /// Read every record as a row of cells. Headers are not interpreted
    /// here; the reconciliation layer applies the header-row convention.
    pub fn rows(&self) -> Result<Vec<Vec<String>>, String> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|error| format!("failed opening csv '{}': {error}", self.path.display()))?;
        let mut rows = Vec::new();

        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|error| {
                format!(
                    "failed reading csv '{}' row {}: {error}",
                    self.path.display(),
                    index + 1
                )
            })?;
            rows.push(record.iter().map(ToOwned::to_owned).collect());
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::CsvDocument;
    use std::fs;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_rows_without_header_interpretation() {
        let file = NamedTempFile::with_suffix(".csv").expect("create csv temp file");
        fs::write(
            file.path(),
            "REGISTRO,,\nFolio,Humedad,Lote\n40526,11.5,L-02\n",
        )
        .expect("write csv fixture");

        let document = CsvDocument::open(file.path()).expect("open csv");
        let rows = document.rows().expect("read rows");

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][0], "Folio");
        assert_eq!(rows[2], vec!["40526", "11.5", "L-02"]);
    }

    #[test]
    fn sheet_name_falls_back_to_file_stem() {
        let file = NamedTempFile::with_suffix(".csv").expect("create csv temp file");
        fs::write(file.path(), "a,b\n").expect("write csv fixture");

        let document = CsvDocument::open(file.path()).expect("open csv");
        assert!(!document.sheet_name().is_empty());
    }

    #[test]
    fn open_rejects_missing_file() {
        let result = CsvDocument::open(std::path::Path::new("/tmp/does-not-exist.csv"));
        assert!(result.is_err());
    }
}
