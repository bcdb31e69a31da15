//! Cell formatting shared by every renderer.

use analytics::SummaryRow;

pub const HEADERS: [&str; 9] = [
    "Sector",
    "Commodity",
    "Symbol",
    "N",
    "Basis",
    "Freq. of bw.",
    "Excess returns",
    "Volatility",
    "Sharpe ratio",
];

const MISSING: &str = "NaN";

/// Two decimals; missing and undefined values print as `NaN`.
pub fn number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        _ => MISSING.to_string(),
    }
}

/// The observation count is reported as a truncated integer.
pub fn count(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{}", v.trunc() as i64),
        _ => MISSING.to_string(),
    }
}

/// The nine display cells of a row, in header order.
pub fn cells(row: &SummaryRow) -> [String; 9] {
    [
        row.sector.map(|s| s.to_string()).unwrap_or_default(),
        row.commodity.clone(),
        row.symbol.clone().unwrap_or_default(),
        count(row.n),
        number(row.basis),
        number(row.freq_backwardation),
        number(row.ann_excess_returns),
        number(row.ann_volatility),
        number(row.ann_sharpe_ratio),
    ]
}
