//! # Reporter
//!
//! Renders the `SummaryRow`s produced by the metrics engine: a booktabs
//! LaTeX `tabular` for the paper, a CSV copy of the same table, and a
//! console view for interactive runs.

pub mod console;
pub mod error;
pub mod export;
pub mod format;
pub mod latex;

pub use console::render_console;
pub use error::ReportError;
pub use export::write_summary_csv;
pub use latex::{render_latex, write_latex};

/// `table1_<startYear>_<endYear>`, without extension.
pub fn table_stem(year_tag: &str) -> String {
    format!("table1_{}", year_tag)
}
