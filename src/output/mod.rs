//! Output of generated configs.
//!
//! - [`files`] - one file per config plus a JSON run report
//! - [`terminal`] - coloured summary on stdout

mod files;
mod terminal;

pub use files::{config_file_name, write_configs, write_report, Report, ReportOutput};
pub use terminal::{format_field, print_summary, summary_rows};
