use crate::document::TextDocument;
use std::fs;
use std::path::Path;

impl TextDocument {
    /// Read an operator-corrected manifest text file.
    pub fn open(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|error| format!("failed reading text file '{}': {error}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            content,
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}
