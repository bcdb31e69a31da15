use core_types::Sector;
use serde::Serialize;
use std::cmp::Ordering;

/// One line of the summary table.
///
/// This struct is the final output of the `MetricsEngine` and the input to
/// every renderer. Metrics a commodity has no data for are `None`; metrics
/// that were computed but are undefined (e.g. a zero-volatility Sharpe
/// ratio) are `Some(NaN)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub sector: Option<Sector>,
    pub commodity: String,
    pub symbol: Option<String>,
    /// Average number of observations per month.
    pub n: Option<f64>,
    pub basis: Option<f64>,
    /// Percentage of months in backwardation.
    pub freq_backwardation: Option<f64>,
    pub ann_excess_returns: Option<f64>,
    pub ann_volatility: Option<f64>,
    pub ann_sharpe_ratio: Option<f64>,
}

impl SummaryRow {
    /// A row with annotations but no metrics yet.
    pub fn new(commodity: impl Into<String>, sector: Option<Sector>, symbol: Option<&str>) -> Self {
        Self {
            sector,
            commodity: commodity.into(),
            symbol: symbol.map(str::to_string),
            n: None,
            basis: None,
            freq_backwardation: None,
            ann_excess_returns: None,
            ann_volatility: None,
            ann_sharpe_ratio: None,
        }
    }

    /// Table order: by sector, then commodity, with unmapped sectors last.
    pub fn table_order(&self, other: &Self) -> Ordering {
        (self.sector.is_none(), self.sector, &self.commodity).cmp(&(
            other.sector.is_none(),
            other.sector,
            &other.commodity,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_rows_sort_last() {
        let mut rows = vec![
            SummaryRow::new("Mystery", None, None),
            SummaryRow::new("Gold", Some(Sector::Metals), Some("GC")),
            SummaryRow::new("Wheat", Some(Sector::Agriculture), Some("W-")),
            SummaryRow::new("Corn", Some(Sector::Agriculture), Some("C-")),
        ];
        rows.sort_by(SummaryRow::table_order);
        let order: Vec<_> = rows.iter().map(|r| r.commodity.as_str()).collect();
        assert_eq!(order, vec!["Corn", "Wheat", "Gold", "Mystery"]);
    }
}
