pub mod bulk;

pub use bulk::{classify_table, label_counts};
