use crate::error::DataError;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const COMMODITY_COLUMN: &str = "Commodity";
pub const CONTRACT_COLUMN: &str = "Contract";
pub const DATE_COLUMN: &str = "Date";

/// Sub-directory of the data directory that holds hand-supplied inputs.
pub const MANUAL_DIR: &str = "manual";

/// One row of the raw input, exactly as it appeared in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPriceRow {
    /// 1-based data row number (the header is row 0).
    pub row: usize,
    pub commodity: String,
    pub contract: String,
    pub date: String,
    pub price: String,
}

/// The raw input table. Nothing has been cast yet.
#[derive(Debug, Clone, Default)]
pub struct RawPriceFrame {
    pub source: PathBuf,
    /// Name of the column the price values were read from.
    pub price_column: String,
    pub rows: Vec<RawPriceRow>,
}

impl RawPriceFrame {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Loads `<data_dir>/manual/<input_file>`.
pub fn load_data(data_dir: &Path, input_file: &str, price_column: &str) -> Result<RawPriceFrame, DataError> {
    let path = data_dir.join(MANUAL_DIR).join(input_file);
    read_raw_file(&path, price_column)
}

/// Reads a comma-delimited price file with a header row.
///
/// The `Commodity`, `Contract` and `Date` columns plus `price_column` must be
/// present; any other columns are ignored.
pub fn read_raw_file(path: &Path, price_column: &str) -> Result<RawPriceFrame, DataError> {
    if !path.is_file() {
        return Err(DataError::FileNotFound(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers()?.clone();
    debug!(columns = ?headers.iter().collect::<Vec<_>>(), "Read header of {}", path.display());

    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))
    };
    let commodity_idx = position(COMMODITY_COLUMN)?;
    let contract_idx = position(CONTRACT_COLUMN)?;
    let date_idx = position(DATE_COLUMN)?;
    let price_idx = position(price_column)?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or_default().to_string();
        rows.push(RawPriceRow {
            row: i + 1,
            commodity: field(commodity_idx),
            contract: field(contract_idx),
            date: field(date_idx),
            price: field(price_idx),
        });
    }

    info!("Commodities data loaded successfully ({} rows from {})", rows.len(), path.display());

    Ok(RawPriceFrame {
        source: path.to_path_buf(),
        price_column: price_column.to_string(),
        rows,
    })
}
