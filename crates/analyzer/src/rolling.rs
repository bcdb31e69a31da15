//! Rolling risk statistics on monthly returns of one contract rank.

use analytics::returns::month_end_closes;
use analytics::stats::{nan_mean, nan_sample_std, safe_div};
use chrono::NaiveDate;
use core_types::PriceTable;
use serde::Serialize;
use std::collections::BTreeMap;

const MONTHS_PER_YEAR: f64 = 12.0;

/// Rolling statistics at the month-end date that closes a full window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingStats {
    pub date: NaiveDate,
    /// Rolling sample standard deviation × √12.
    pub volatility: f64,
    /// Rolling mean × 12.
    pub mean_return: f64,
    /// `mean_return / volatility`; NaN for a flat window.
    pub sharpe: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingVolatilityRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Commodity")]
    pub commodity: String,
    #[serde(rename = "RollingVolatility")]
    pub volatility: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingSharpeRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Commodity")]
    pub commodity: String,
    #[serde(rename = "RollingMeanReturn")]
    pub mean_return: f64,
    #[serde(rename = "RollingVolatility")]
    pub volatility: f64,
    #[serde(rename = "RollingSharpeRatio")]
    pub sharpe: f64,
}

/// Monthly returns per commodity, from consecutive finite month-end closes.
pub fn monthly_returns(table: &PriceTable, contract: u32) -> BTreeMap<String, Vec<(NaiveDate, f64)>> {
    let mut closes: BTreeMap<String, Vec<(NaiveDate, f64)>> = BTreeMap::new();
    for ((commodity, _), (date, price)) in month_end_closes(table, contract) {
        if price.is_finite() {
            closes.entry(commodity).or_default().push((date, price));
        }
    }

    closes
        .into_iter()
        .map(|(commodity, series)| {
            let returns = series
                .windows(2)
                .map(|pair| (pair[1].0, pair[1].1 / pair[0].1 - 1.0))
                .collect();
            (commodity, returns)
        })
        .collect()
}

/// Rolling statistics per commodity; a commodity with fewer than `window`
/// returns has no entries.
pub fn rolling_stats(table: &PriceTable, contract: u32, window: usize) -> BTreeMap<String, Vec<RollingStats>> {
    monthly_returns(table, contract)
        .into_iter()
        .map(|(commodity, returns)| {
            let stats = if window == 0 {
                Vec::new()
            } else {
                returns
                    .windows(window)
                    .map(|slice| {
                        let values = || slice.iter().map(|(_, r)| *r);
                        let volatility = nan_sample_std(values()) * MONTHS_PER_YEAR.sqrt();
                        let mean_return = nan_mean(values()) * MONTHS_PER_YEAR;
                        RollingStats {
                            date: slice[slice.len() - 1].0,
                            volatility,
                            mean_return,
                            sharpe: safe_div(mean_return, volatility),
                        }
                    })
                    .collect()
            };
            (commodity, stats)
        })
        .collect()
}

pub fn rolling_volatility(table: &PriceTable, contract: u32, window: usize) -> Vec<RollingVolatilityRow> {
    rolling_stats(table, contract, window)
        .into_iter()
        .flat_map(|(commodity, stats)| {
            stats.into_iter().map(move |s| RollingVolatilityRow {
                date: s.date,
                commodity: commodity.clone(),
                volatility: s.volatility,
            })
        })
        .collect()
}

pub fn rolling_sharpe_ratio(table: &PriceTable, contract: u32, window: usize) -> Vec<RollingSharpeRow> {
    rolling_stats(table, contract, window)
        .into_iter()
        .flat_map(|(commodity, stats)| {
            stats.into_iter().map(move |s| RollingSharpeRow {
                date: s.date,
                commodity: commodity.clone(),
                mean_return: s.mean_return,
                volatility: s.volatility,
                sharpe: s.sharpe,
            })
        })
        .collect()
}
