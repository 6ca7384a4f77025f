pub mod container;
pub mod extract;
pub mod infer;

pub use container::find_container_id;
pub use extract::{ExtractionRule, SackExtraction};
pub use infer::{InferredPattern, ScanProfile, infer_pattern};
