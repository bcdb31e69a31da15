//! # Analyzer
//!
//! Diagnostic datasets for the study's charts: commodities per sector,
//! contract availability, rolling volatility and Sharpe ratio, and the roll
//! basis time series. Each dataset is a pure function of the cleaned
//! `PriceTable`; `Analyzer::write_all` persists them as CSV files that the
//! plotting tools read.

use crate::error::AnalyzerError;
use analytics::BasisRecord;
use analytics::basis::compute_basis_timeseries;
use chrono::NaiveDate;
use configuration::AnalysisParams;
use core_types::{PriceTable, YearMonth};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub mod datasets;
pub mod error;
pub mod rolling;

pub use datasets::{
    commodities_by_sector, data_availability, max_contract_availability, max_contract_number,
};
pub use rolling::{rolling_sharpe_ratio, rolling_volatility};

#[derive(Debug, Serialize)]
struct BasisRow<'a> {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "YearMonth")]
    year_month: YearMonth,
    #[serde(rename = "Commodity")]
    commodity: &'a str,
    #[serde(rename = "FirstContract")]
    first_contract: u32,
    #[serde(rename = "LastContract")]
    last_contract: Option<u32>,
    #[serde(rename = "Basis")]
    basis: f64,
}

impl<'a> From<&'a BasisRecord> for BasisRow<'a> {
    fn from(record: &'a BasisRecord) -> Self {
        Self {
            date: record.date,
            year_month: record.year_month,
            commodity: &record.commodity,
            first_contract: record.first_contract,
            last_contract: record.last_contract,
            basis: record.basis,
        }
    }
}

/// The chart dataset file names for one period tag, in the order they are written.
pub fn output_file_names(tag: &str, rolling_window: usize) -> Vec<String> {
    vec![
        format!("commodities_by_sector_{tag}.csv"),
        format!("data_availability_{tag}.csv"),
        format!("maximum_contract_number_{tag}.csv"),
        format!("max_contract_availability_{tag}.csv"),
        format!("{rolling_window}_months_rolling_volatility_{tag}.csv"),
        format!("{rolling_window}_months_rolling_sharpe_ratio_{tag}.csv"),
        format!("roll_basis_{tag}.csv"),
    ]
}

/// Builds and writes the chart datasets.
pub struct Analyzer {
    params: AnalysisParams,
    first_rank: u32,
}

impl Analyzer {
    pub fn new(params: AnalysisParams, first_rank: u32) -> Result<Self, AnalyzerError> {
        if params.rolling_window < 2 {
            return Err(AnalyzerError::InvalidParameter(format!(
                "rolling window must be at least 2, got {}",
                params.rolling_window
            )));
        }
        Ok(Self { params, first_rank })
    }

    pub fn rolling_window(&self) -> usize {
        self.params.rolling_window
    }

    /// Writes every dataset into `output_dir` and returns the written paths.
    pub fn write_all(&self, table: &PriceTable, output_dir: &Path, tag: &str) -> Result<Vec<PathBuf>, AnalyzerError> {
        if !output_dir.is_dir() {
            return Err(AnalyzerError::MissingDirectory(output_dir.to_path_buf()));
        }

        let window = self.params.rolling_window;
        let contract = self.params.contract;
        let paths: Vec<PathBuf> = output_file_names(tag, window)
            .into_iter()
            .map(|name| output_dir.join(name))
            .collect();

        write_rows(&paths[0], commodities_by_sector(table))?;
        write_rows(&paths[1], data_availability(table))?;
        write_rows(&paths[2], max_contract_number(table))?;
        write_rows(&paths[3], max_contract_availability(table))?;
        write_rows(&paths[4], rolling_volatility(table, contract, window))?;
        write_rows(&paths[5], rolling_sharpe_ratio(table, contract, window))?;

        let basis = compute_basis_timeseries(table, self.first_rank);
        write_rows(&paths[6], basis.iter().map(BasisRow::from))?;

        let single = datasets::single_series_commodities(table);
        if !single.is_empty() {
            debug!("Commodities without a roll basis (single contract): {:?}", single);
        }
        info!("Wrote {} chart datasets for {} to {}", paths.len(), tag, output_dir.display());
        Ok(paths)
    }
}

fn write_rows<I, T>(path: &Path, rows: I) -> Result<(), AnalyzerError>
where
    I: IntoIterator<Item = T>,
    T: Serialize,
{
    let mut writer = csv::Writer::from_path(path)?;
    let mut count = 0usize;
    for row in rows {
        writer.serialize(row)?;
        count += 1;
    }
    writer.flush().map_err(|source| AnalyzerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Wrote {} rows to {}", count, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::PriceObservation;
    use std::fs;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn file_names_follow_convention() {
        let names = output_file_names("1970_2008", 60);
        assert_eq!(names[4], "60_months_rolling_volatility_1970_2008.csv");
        assert_eq!(names[6], "roll_basis_1970_2008.csv");
    }

    #[test]
    fn small_window_is_rejected() {
        let params = AnalysisParams {
            rolling_window: 1,
            ..AnalysisParams::default()
        };
        assert!(matches!(Analyzer::new(params, 1), Err(AnalyzerError::InvalidParameter(_))));
    }

    #[test]
    fn writes_every_dataset() {
        let dir = std::env::temp_dir().join(format!("commodities-analyzer-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let table = PriceTable::new(vec![
            PriceObservation::new("Gold", 1, date(2020, 1, 31), 100.0),
            PriceObservation::new("Gold", 2, date(2020, 1, 31), 101.0),
            PriceObservation::new("Gold", 1, date(2020, 2, 28), 102.0),
            PriceObservation::new("Gold", 2, date(2020, 2, 28), 103.0),
        ]);
        let params = AnalysisParams {
            rolling_window: 2,
            contract: 2,
        };
        let written = Analyzer::new(params, 1).unwrap().write_all(&table, &dir, "2009_2024").unwrap();

        assert_eq!(written.len(), 7);
        assert!(written.iter().all(|p| p.is_file()));

        let basis = fs::read_to_string(dir.join("roll_basis_2009_2024.csv")).unwrap();
        assert_eq!(basis.lines().count(), 3);
        assert!(basis.starts_with("Date,YearMonth,Commodity,FirstContract,LastContract,Basis"));
    }

    #[test]
    fn missing_output_directory_fails() {
        let analyzer = Analyzer::new(AnalysisParams::default(), 1).unwrap();
        let err = analyzer
            .write_all(&PriceTable::default(), Path::new("no/such/output"), "x")
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::MissingDirectory(_)));
    }
}
