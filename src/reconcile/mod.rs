pub mod engine;
pub mod fields;
pub mod table;

pub use engine::{Reconciliation, ResultRecord, reconcile};
pub use table::{KEY_COLUMN, ReferenceTable};
