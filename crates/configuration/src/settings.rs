use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: Paths,
    pub periods: Periods,
    pub cleaning: Cleaning,
    pub metrics: MetricsParams,
    pub analysis: AnalysisParams,
    pub logging: Logging,
}

/// Where inputs are read from and outputs are written to.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Paths {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Name of the raw price file inside `<data_dir>/manual`.
    pub input_file: String,
}

impl Paths {
    /// The directory holding manually supplied data and cleaned snapshots.
    pub fn manual_dir(&self) -> PathBuf {
        self.data_dir.join("manual")
    }

    pub fn input_path(&self) -> PathBuf {
        self.manual_dir().join(&self.input_file)
    }
}

/// An inclusive calendar range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// `<startYear>_<endYear>`, the suffix shared by every per-period artifact.
    pub fn year_tag(&self) -> String {
        format!("{}_{}", self.start.year(), self.end.year())
    }
}

/// The two study periods.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Periods {
    /// The historical sample.
    pub old: DateRange,
    /// The recent, out-of-sample extension.
    pub new: DateRange,
}

impl Periods {
    pub fn get(&self, name: PeriodName) -> DateRange {
        match name {
            PeriodName::Old => self.old,
            PeriodName::New => self.new,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PeriodName, DateRange)> + '_ {
        PeriodName::ALL.into_iter().map(|name| (name, self.get(name)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum PeriodName {
    Old,
    New,
}

impl PeriodName {
    pub const ALL: [PeriodName; 2] = [PeriodName::Old, PeriodName::New];

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodName::Old => "old",
            PeriodName::New => "new",
        }
    }
}

impl std::fmt::Display for PeriodName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for the cleaning stage.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Cleaning {
    /// Name of the raw closing-price column in the input file.
    pub price_column: String,
    /// Series with known data-quality problems.
    pub excluded_commodities: Vec<String>,
}

/// Parameters for the metrics engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsParams {
    /// Return periods per year; 12 for monthly returns.
    pub annualizing_period: u32,
    /// Contract rank treated as "first to expire".
    pub first_rank: u32,
    /// Contract rank whose month-end closes drive excess returns.
    pub returns_contract: u32,
    /// Fail instead of leaving sector/symbol empty for unknown commodities.
    pub strict_mappings: bool,
}

/// Parameters for the diagnostic datasets.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// Rolling window length in months.
    pub rolling_window: usize,
    pub contract: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Logging {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// When set, logs are also written to a file in this directory.
    pub directory: Option<PathBuf>,
}

// --- Default Implementations ---
// These let a user omit any section (or the whole file) and still run
// against the conventional project layout.

impl Default for Paths {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            input_file: "commodities_data.csv".to_string(),
        }
    }
}

impl Default for Periods {
    fn default() -> Self {
        Self {
            old: DateRange::new(ymd(1970, 1, 1), ymd(2008, 12, 31)),
            new: DateRange::new(ymd(2009, 1, 1), ymd(2024, 12, 31)),
        }
    }
}

impl Default for Cleaning {
    fn default() -> Self {
        Self {
            price_column: "PX_LAST".to_string(),
            excluded_commodities: ["Barley", "Coal", "Propane", "Broilers", "Butter"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Default for MetricsParams {
    fn default() -> Self {
        Self {
            annualizing_period: 12,
            first_rank: 1,
            returns_contract: 2,
            strict_mappings: false,
        }
    }
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            rolling_window: 60,
            contract: 2,
        }
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
