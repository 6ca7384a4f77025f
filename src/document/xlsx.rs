use crate::document::XlsxDocument;
use calamine::{Data, Reader, open_workbook_auto};
use chrono::NaiveTime;
use std::path::Path;

impl XlsxDocument {
    /// Open a workbook for lazy sheet access via calamine.
    pub fn open(path: &Path) -> Result<Self, String> {
        open_workbook_auto(path)
            .map_err(|error| format!("failed to open workbook '{}': {error}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// List sheet names in workbook order.
    pub fn sheet_names(&self) -> Result<Vec<String>, String> {
        let workbook = open_workbook_auto(&self.path).map_err(|error| {
            format!("failed to open workbook '{}': {error}", self.path.display())
        })?;
        Ok(workbook.sheet_names().to_vec())
    }

    /// Read every row of a sheet as stringified cells.
    ///
    /// `sheet` of `None` selects the first sheet. Returns the resolved sheet
    /// name alongside the rows.
    pub fn read_rows(&self, sheet: Option<&str>) -> Result<(String, Vec<Vec<String>>), String> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|error| {
            format!("failed to open workbook '{}': {error}", self.path.display())
        })?;

        let sheet_name = match sheet {
            Some(name) => name.to_owned(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| format!("workbook '{}' has no sheets", self.path.display()))?,
        };

        let worksheet = workbook
            .worksheet_range(&sheet_name)
            .map_err(|error| format!("failed to read sheet '{sheet_name}': {error}"))?;

        let rows = worksheet
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();

        Ok((sheet_name, rows))
    }
}

/// Stringify one cell the way the reconciliation layer expects: floats with
/// no fraction lose the trailing `.0`, datetimes at midnight become bare
/// calendar dates.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.clone(),
        Data::Float(value) => format_float(*value),
        Data::Int(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => value
            .as_datetime()
            .map(|stamp| {
                if stamp.time() == NaiveTime::MIN {
                    stamp.date().format("%Y-%m-%d").to_string()
                } else {
                    stamp.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            })
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string(),
    }
}

fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{XlsxDocument, format_float};
    use std::path::Path;
    use tempfile::NamedTempFile;

    fn write_master_fixture(path: &Path) {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_by_name_mut("Sheet1").expect("default sheet");
        sheet.get_cell_mut("A1").set_value("REGISTRO DE CALIDAD");
        sheet.get_cell_mut("A2").set_value("Folio");
        sheet.get_cell_mut("B2").set_value("Humedad");
        sheet.get_cell_mut((1u32, 3u32)).set_value_number(40526);
        sheet.get_cell_mut((2u32, 3u32)).set_value_number(11.5);
        umya_spreadsheet::writer::xlsx::write(&book, path).expect("write xlsx fixture");
    }

    #[test]
    fn open_rejects_missing_file() {
        let result = XlsxDocument::open(Path::new("/tmp/does-not-exist.xlsx"));
        assert!(result.is_err());
    }

    #[test]
    fn reads_rows_with_default_sheet() {
        let file = NamedTempFile::with_suffix(".xlsx").expect("create xlsx temp file");
        write_master_fixture(file.path());
        let document = XlsxDocument::open(file.path()).expect("open workbook");

        let names = document.sheet_names().expect("sheet names");
        assert_eq!(names, vec!["Sheet1".to_owned()]);

        let (sheet, rows) = document.read_rows(None).expect("read rows");
        assert_eq!(sheet, "Sheet1");
        assert_eq!(rows[0][0], "REGISTRO DE CALIDAD");
        assert_eq!(rows[1], vec!["Folio".to_owned(), "Humedad".to_owned()]);
        assert_eq!(rows[2], vec!["40526".to_owned(), "11.5".to_owned()]);
    }

    #[test]
    fn read_rows_rejects_unknown_sheet() {
        let file = NamedTempFile::with_suffix(".xlsx").expect("create xlsx temp file");
        write_master_fixture(file.path());
        let document = XlsxDocument::open(file.path()).expect("open workbook");

        assert!(document.read_rows(Some("Inexistente")).is_err());
    }

    #[test]
    fn whole_floats_lose_trailing_zero() {
        assert_eq!(format_float(40526.0), "40526");
        assert_eq!(format_float(11.5), "11.5");
    }
}
