//! Display formatting for terminal output
//!
//! Plain-text renderings of categories, entries, occurrences and receipt
//! fields. Reports carry their own `format_terminal`.

pub mod category;
pub mod entry;
pub mod receipt;

pub use category::{format_category_line, format_category_list};
pub use entry::{format_entry_list, format_occurrences, format_one_time, format_recurring};
pub use receipt::format_receipt_fields;
