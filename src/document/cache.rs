use std::collections::HashMap;

/// Memoized manifest extraction, keyed by the blake3 hash of the document
/// bytes. Process lifetime, no eviction: extraction is deterministic, so a
/// byte-identical document always maps to the same result.
#[derive(Default)]
pub struct ExtractionCache {
    entries: HashMap<String, ExtractedManifest>,
}

/// The cached pair produced by one manifest extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedManifest {
    pub container: String,
    pub raw_text: String,
}

impl ExtractionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content-hash cache key for a document.
    pub fn key_for(bytes: &[u8]) -> String {
        format!("blake3:{}", blake3::hash(bytes).to_hex())
    }

    /// Return the cached extraction for `bytes`, running `extract` on a miss.
    pub fn lookup_or_extract(
        &mut self,
        bytes: &[u8],
        extract: impl FnOnce() -> ExtractedManifest,
    ) -> ExtractedManifest {
        let key = Self::key_for(bytes);
        self.entries.entry(key).or_insert_with(extract).clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
