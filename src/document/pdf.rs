use crate::document::PdfDocument;
use std::path::Path;

impl PdfDocument {
    /// Open a PDF manifest for structural access.
    pub fn open(path: &Path) -> Result<Self, String> {
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Extract the text of every page, in page order, newline-joined.
    ///
    /// A page whose content cannot be decoded fails the whole extraction;
    /// the caller decides whether to degrade (run mode substitutes the error
    /// text for the manifest text rather than aborting).
    pub fn extract_text(&self) -> Result<String, String> {
        let document = lopdf::Document::load(&self.path)
            .map_err(|error| format!("failed reading pdf '{}': {error}", self.path.display()))?;

        let mut full_text = String::new();
        for page_number in document.get_pages().keys() {
            let page_text = document.extract_text(&[*page_number]).map_err(|error| {
                format!(
                    "failed extracting text from page {page_number} of '{}': {error}",
                    self.path.display()
                )
            })?;
            full_text.push_str(&page_text);
            full_text.push('\n');
        }

        Ok(full_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};
    use std::fs;
    use tempfile::NamedTempFile;

    fn write_pdf_with_text(lines: &[&str]) -> NamedTempFile {
        let file = NamedTempFile::with_suffix(".pdf").expect("create pdf temp file");
        let mut document = lopdf::Document::with_version("1.5");

        let pages_id = document.new_object_id();
        let font_id = document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = document.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![50.into(), 750.into()]),
        ];
        for line in lines {
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            operations.push(Operation::new("Td", vec![0.into(), (-16).into()]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = document.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content stream"),
        ));
        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);
        document.compress();
        document.save(file.path()).expect("write pdf fixture");

        file
    }

    #[test]
    fn extracts_text_from_generated_pdf() {
        let pdf = write_pdf_with_text(&["Registro de transporte", "MSDU 1234567"]);
        let document = PdfDocument::open(pdf.path()).expect("open pdf");

        let text = document.extract_text().expect("extract text");
        assert!(text.contains("Registro de transporte"));
        assert!(text.contains("MSDU 1234567"));
    }

    #[test]
    fn extraction_fails_for_non_pdf_bytes() {
        let file = NamedTempFile::with_suffix(".pdf").expect("create temp file");
        fs::write(file.path(), "not-a-pdf").expect("write junk bytes");
        let document = PdfDocument::open(file.path()).expect("open pdf wrapper");

        assert!(document.extract_text().is_err());
    }
}
