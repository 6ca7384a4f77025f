use crate::document::{CsvDocument, ManifestDocument, PdfDocument, TableDocument, TextDocument, XlsxDocument};
use std::path::Path;

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "xlt", "xltx", "xltm"];

/// Open a transport manifest using extension dispatch (pdf or plain text).
pub fn open_manifest(path: &Path) -> Result<ManifestDocument, String> {
    match extension_of(path).as_str() {
        "pdf" => Ok(ManifestDocument::Pdf(PdfDocument::open(path)?)),
        "txt" | "text" => Ok(ManifestDocument::Text(TextDocument::open(path)?)),
        other => Err(format!(
            "unsupported manifest extension '{other}' for '{}' (expected pdf|txt)",
            path.display()
        )),
    }
}

/// Open a reference table using extension dispatch (workbook or csv).
pub fn open_table(path: &Path) -> Result<TableDocument, String> {
    let extension = extension_of(path);
    if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
        return Ok(TableDocument::Xlsx(XlsxDocument::open(path)?));
    }
    if extension == "csv" {
        return Ok(TableDocument::Csv(CsvDocument::open(path)?));
    }
    Err(format!(
        "unsupported table extension '{extension}' for '{}' (expected xlsx|xls|csv)",
        path.display()
    ))
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|value| value.to_str())
        .unwrap_or("")
        .to_lowercase()
}
