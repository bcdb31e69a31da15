use crate::returns::ReturnsMatrix;
use crate::stats::{nan_mean, nan_sample_std, safe_div};
use serde::Serialize;
use std::collections::BTreeMap;

/// Annualized performance of one commodity's excess-return series, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub ann_excess_return: f64,
    pub ann_volatility: f64,
    /// NaN when volatility is zero or undefined.
    pub ann_sharpe: f64,
}

/// Annualizes each column of the returns matrix.
///
/// Mean and sample standard deviation skip missing cells. The mean scales
/// by `annualizing_period`, the volatility by its square root, and both are
/// expressed in percent.
pub fn compute_performance_metrics(
    returns: &ReturnsMatrix,
    annualizing_period: u32,
) -> BTreeMap<String, PerformanceMetrics> {
    let period = f64::from(annualizing_period);

    returns
        .commodities()
        .iter()
        .filter_map(|commodity| {
            let column = returns.column(commodity)?;
            let values = || column.iter().flatten().copied();

            let ann_excess_return = nan_mean(values()) * period * 100.0;
            let ann_volatility = nan_sample_std(values()) * period.sqrt() * 100.0;
            let ann_sharpe = safe_div(ann_excess_return, ann_volatility);

            Some((
                commodity.clone(),
                PerformanceMetrics {
                    ann_excess_return,
                    ann_volatility,
                    ann_sharpe,
                },
            ))
        })
        .collect()
}
