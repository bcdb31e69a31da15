use crate::error::ReportError;
use crate::format::{HEADERS, cells};
use crate::latex::ensure_parent;
use analytics::SummaryRow;
use std::path::Path;
use tracing::info;

/// Writes the summary as CSV with the same columns and formatting as the LaTeX table.
pub fn write_summary_csv(rows: &[SummaryRow], path: &Path) -> Result<(), ReportError> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADERS)?;
    for row in rows {
        writer.write_record(cells(row))?;
    }
    writer.flush().map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Wrote summary CSV to {}", path.display());
    Ok(())
}
