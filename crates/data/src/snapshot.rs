use crate::error::DataError;
use chrono::{Datelike, NaiveDate};
use core_types::{PriceObservation, PriceTable, YearMonth};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// One row of a cleaned snapshot file.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Commodity")]
    commodity: String,
    #[serde(rename = "Contract")]
    contract: u32,
    #[serde(rename = "ClosePrice")]
    close_price: f64,
    #[serde(rename = "YearMonth")]
    year_month: YearMonth,
}

/// `clean_<startYear>_<endYear>_<input_file>`
pub fn snapshot_file_name(start: NaiveDate, end: NaiveDate, input_file: &str) -> String {
    format!("clean_{}_{}_{}", start.year(), end.year(), input_file)
}

/// Persists a cleaned table so later stages can skip loading and cleaning.
pub fn write_clean_snapshot(table: &PriceTable, path: &Path) -> Result<(), DataError> {
    let mut writer = csv::Writer::from_path(path)?;
    for obs in table {
        writer.serialize(SnapshotRow {
            date: obs.date,
            commodity: obs.commodity.clone(),
            contract: obs.contract,
            close_price: obs.close_price,
            year_month: obs.year_month,
        })?;
    }
    writer.flush().map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Stored {} cleaned rows in {}", table.len(), path.display());
    Ok(())
}

/// Reads a snapshot written by [`write_clean_snapshot`].
pub fn read_clean_snapshot(path: &Path) -> Result<PriceTable, DataError> {
    if !path.is_file() {
        return Err(DataError::FileNotFound(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize::<SnapshotRow>() {
        let row = record?;
        rows.push(PriceObservation {
            commodity: row.commodity,
            contract: row.contract,
            date: row.date,
            close_price: row.close_price,
            year_month: row.year_month,
        });
    }

    Ok(PriceTable::new(rows))
}
