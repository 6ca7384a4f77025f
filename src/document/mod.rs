pub mod cache;
pub mod csv;
pub mod dispatch;
pub mod pdf;
pub mod text;
pub mod xlsx;

pub use dispatch::{open_manifest, open_table};
use std::path::{Path, PathBuf};

/// A transport manifest: the PDF itself, or an operator-corrected text file.
pub enum ManifestDocument {
    Pdf(PdfDocument),
    Text(TextDocument),
}

impl ManifestDocument {
    pub fn path(&self) -> &Path {
        match self {
            ManifestDocument::Pdf(doc) => &doc.path,
            ManifestDocument::Text(doc) => &doc.path,
        }
    }

    /// Produce the raw manifest text downstream steps consume.
    pub fn raw_text(&self) -> Result<String, String> {
        match self {
            ManifestDocument::Pdf(doc) => doc.extract_text(),
            ManifestDocument::Text(doc) => Ok(doc.content().to_owned()),
        }
    }
}

/// A QC master table: a workbook or a csv file.
pub enum TableDocument {
    Xlsx(XlsxDocument),
    Csv(CsvDocument),
}

impl TableDocument {
    pub fn path(&self) -> &Path {
        match self {
            TableDocument::Xlsx(doc) => &doc.path,
            TableDocument::Csv(doc) => &doc.path,
        }
    }

    pub fn sheet_names(&self) -> Result<Vec<String>, String> {
        match self {
            TableDocument::Xlsx(doc) => doc.sheet_names(),
            TableDocument::Csv(doc) => Ok(vec![doc.sheet_name()]),
        }
    }

    /// Read every raw row of the selected sheet (`None` = first sheet),
    /// returning the resolved sheet name alongside the rows.
    pub fn read_rows(&self, sheet: Option<&str>) -> Result<(String, Vec<Vec<String>>), String> {
        match self {
            TableDocument::Xlsx(doc) => doc.read_rows(sheet),
            TableDocument::Csv(doc) => Ok((doc.sheet_name(), doc.rows()?)),
        }
    }
}

pub struct PdfDocument {
    pub path: PathBuf,
}

pub struct TextDocument {
    pub path: PathBuf,
    pub content: String,
}

pub struct XlsxDocument {
    pub path: PathBuf,
}

pub struct CsvDocument {
    pub path: PathBuf,
}
