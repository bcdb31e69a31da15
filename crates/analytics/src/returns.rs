use chrono::NaiveDate;
use core_types::{PriceTable, YearMonth};
use std::collections::{BTreeMap, BTreeSet};

/// Month-over-month returns in wide form: one row per month-end date, one
/// column per commodity.
///
/// A cell is `None` up to and including the commodity's first month-end
/// observation. After that every date carries a return.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReturnsMatrix {
    dates: Vec<NaiveDate>,
    commodities: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

impl ReturnsMatrix {
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn commodities(&self) -> &[String] {
        &self.commodities
    }

    pub fn get(&self, date: NaiveDate, commodity: &str) -> Option<f64> {
        let row = self.dates.binary_search(&date).ok()?;
        let col = self.commodities.iter().position(|c| c == commodity)?;
        self.cells[row][col]
    }

    /// Every cell of one commodity's column, top to bottom.
    pub fn column(&self, commodity: &str) -> Option<Vec<Option<f64>>> {
        let col = self.commodities.iter().position(|c| c == commodity)?;
        Some(self.cells.iter().map(|row| row[col]).collect())
    }

    /// Rows as `(date, cells)` pairs, cells ordered like [`Self::commodities`].
    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, &[Option<f64>])> {
        self.dates.iter().copied().zip(self.cells.iter().map(Vec::as_slice))
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// The last observed close of each month for one contract rank.
///
/// Keyed by `(commodity, month)`; the value is the latest date in that month
/// and its close. When two rows share the latest date, the first one wins.
pub fn month_end_closes(table: &PriceTable, contract: u32) -> BTreeMap<(String, YearMonth), (NaiveDate, f64)> {
    let mut closes: BTreeMap<(String, YearMonth), (NaiveDate, f64)> = BTreeMap::new();
    for obs in table.with_contract(contract) {
        let key = (obs.commodity.clone(), obs.year_month);
        if closes.get(&key).is_none_or(|(date, _)| *date < obs.date) {
            closes.insert(key, (obs.date, obs.close_price));
        }
    }
    closes
}

/// Monthly excess returns of the given contract rank (rank 2 by convention).
///
/// Month-end closes are pivoted to a date × commodity grid and each column
/// is turned into percentage changes. Once a column has its first close,
/// missing or non-finite closes are filled forward from the last known one,
/// so a gap reads as a zero return.
pub fn compute_commodity_excess_returns(table: &PriceTable, contract: u32) -> ReturnsMatrix {
    let closes = month_end_closes(table, contract);

    let dates: Vec<NaiveDate> = closes
        .values()
        .map(|(date, _)| *date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let commodities: Vec<String> = closes
        .keys()
        .map(|(commodity, _)| commodity.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut prices = vec![vec![None; commodities.len()]; dates.len()];
    for ((commodity, _), (date, price)) in &closes {
        if !price.is_finite() {
            continue;
        }
        // Both lookups succeed: the axes were built from these same keys.
        if let (Ok(row), Ok(col)) = (dates.binary_search(date), commodities.binary_search(commodity)) {
            prices[row][col] = Some(*price);
        }
    }

    let mut cells = vec![vec![None; commodities.len()]; dates.len()];
    for col in 0..commodities.len() {
        let mut previous: Option<f64> = None;
        for row in 0..dates.len() {
            let Some(price) = prices[row][col].or(previous) else {
                continue;
            };
            cells[row][col] = previous.map(|prev| price / prev - 1.0);
            previous = Some(price);
        }
    }

    ReturnsMatrix {
        dates,
        commodities,
        cells,
    }
}
