//! Output formatting module
//!
//! Console report formats and report export.

mod export;
mod formatter;

pub use export::export_summary;
pub use formatter::{format_check_list, OutputFormat, ResultFormatter};
