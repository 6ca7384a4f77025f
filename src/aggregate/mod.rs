pub mod daily;
pub mod means;

pub use daily::{DailyTotals, daily_sack_totals};
pub use means::{column_means, default_average_columns};
