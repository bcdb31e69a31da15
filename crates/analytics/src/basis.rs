//! Roll basis between the nearest and the farthest quoted contract.
//!
//! Basis for a month is `(ln P_first - ln P_last) / (rank_last - rank_first)`
//! measured on the last trading day of the month for the first contract.
//! When the farthest contract has no quote on that day the basis is NaN.
//! A positive basis means the near contract trades above the far one, i.e.
//! the curve is in backwardation.

use crate::stats::{nan_mean, safe_div};
use chrono::NaiveDate;
use core_types::{PriceTable, YearMonth};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// The month-end row chosen for one side of the basis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractExpiryRecord {
    pub commodity: String,
    pub year_month: YearMonth,
    pub date: NaiveDate,
    pub contract: u32,
    pub close_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasisRecord {
    pub commodity: String,
    pub year_month: YearMonth,
    pub date: NaiveDate,
    pub first_contract: u32,
    /// `None` when no farther contract was quoted on `date`.
    pub last_contract: Option<u32>,
    pub first_price: f64,
    pub last_price: Option<f64>,
    pub basis: f64,
}

impl BasisRecord {
    /// Builds the record from a first and a last-to-expire row of the same day.
    pub fn from_pair(first: &ContractExpiryRecord, last: &ContractExpiryRecord) -> Self {
        let rank_spread = f64::from(last.contract) - f64::from(first.contract);
        let basis = safe_div(first.close_price.ln() - last.close_price.ln(), rank_spread);
        Self {
            commodity: first.commodity.clone(),
            year_month: first.year_month,
            date: first.date,
            first_contract: first.contract,
            last_contract: Some(last.contract),
            first_price: first.close_price,
            last_price: Some(last.close_price),
            basis,
        }
    }

    /// A month with a first-to-expire row but no farther quote on the same day.
    pub fn unmatched(first: &ContractExpiryRecord) -> Self {
        Self {
            commodity: first.commodity.clone(),
            year_month: first.year_month,
            date: first.date,
            first_contract: first.contract,
            last_contract: None,
            first_price: first.close_price,
            last_price: None,
            basis: f64::NAN,
        }
    }

    /// Strictly positive basis. Zero and NaN are not backwardation.
    pub fn is_backwardation(&self) -> bool {
        self.basis > 0.0
    }
}

/// Share of months in backwardation for one commodity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BackwardationFrequency {
    pub count: usize,
    pub positive_count: usize,
    /// `positive_count / count * 100`.
    pub frequency_pct: f64,
}

/// Commodities quoting at least two distinct contracts on some common date.
pub fn eligible_commodities(table: &PriceTable) -> BTreeSet<String> {
    let mut contracts_by_day: HashMap<(&str, NaiveDate), BTreeSet<u32>> = HashMap::new();
    for obs in table {
        contracts_by_day
            .entry((obs.commodity.as_str(), obs.date))
            .or_default()
            .insert(obs.contract);
    }

    contracts_by_day
        .into_iter()
        .filter(|(_, contracts)| contracts.len() >= 2)
        .map(|((commodity, _), _)| commodity.to_string())
        .collect()
}

/// Picks, per eligible commodity and month, the first and the last-to-expire rows.
///
/// The first-to-expire row is the latest-dated `first_rank` row of the month.
/// The last-to-expire row is the latest-dated row among ranks above
/// `first_rank`, taking the highest rank when several share that date.
pub fn get_first_last_to_expire_contract(
    table: &PriceTable,
    first_rank: u32,
) -> (Vec<ContractExpiryRecord>, Vec<ContractExpiryRecord>) {
    let eligible = eligible_commodities(table);

    let mut first: BTreeMap<(&str, YearMonth), ContractExpiryRecord> = BTreeMap::new();
    let mut last: BTreeMap<(&str, YearMonth), ContractExpiryRecord> = BTreeMap::new();

    for obs in table.iter().filter(|o| eligible.contains(&o.commodity)) {
        let key = (obs.commodity.as_str(), obs.year_month);
        let candidate = || ContractExpiryRecord {
            commodity: obs.commodity.clone(),
            year_month: obs.year_month,
            date: obs.date,
            contract: obs.contract,
            close_price: obs.close_price,
        };

        if obs.contract == first_rank {
            if first.get(&key).is_none_or(|current| current.date < obs.date) {
                first.insert(key, candidate());
            }
        } else if obs.contract > first_rank {
            if last
                .get(&key)
                .is_none_or(|current| (current.date, current.contract) < (obs.date, obs.contract))
            {
                last.insert(key, candidate());
            }
        }
    }

    (first.into_values().collect(), last.into_values().collect())
}

/// Monthly roll basis for every eligible commodity.
///
/// Every first-to-expire month yields a record. Months whose last-to-expire
/// row falls on a different day keep a NaN basis, so they still count
/// towards the number of months observed.
pub fn compute_basis_timeseries(table: &PriceTable, first_rank: u32) -> Vec<BasisRecord> {
    let (first, last) = get_first_last_to_expire_contract(table, first_rank);

    let last_by_day: HashMap<(&str, NaiveDate), &ContractExpiryRecord> = last
        .iter()
        .map(|record| ((record.commodity.as_str(), record.date), record))
        .collect();

    let mut unmatched = 0usize;
    let records: Vec<BasisRecord> = first
        .iter()
        .map(|near| match last_by_day.get(&(near.commodity.as_str(), near.date)) {
            Some(far) => BasisRecord::from_pair(near, far),
            None => {
                unmatched += 1;
                BasisRecord::unmatched(near)
            }
        })
        .collect();

    if unmatched > 0 {
        debug!("{} commodity-months had no common day for first and last contract", unmatched);
    }
    records
}

/// Mean basis per commodity over the given records; NaN bases are skipped.
pub fn basis_mean_of(records: &[BasisRecord]) -> BTreeMap<String, f64> {
    group_by_commodity(records)
        .into_iter()
        .map(|(commodity, group)| (commodity.to_string(), nan_mean(group.iter().map(|r| r.basis))))
        .collect()
}

pub fn compute_basis_mean(table: &PriceTable, first_rank: u32) -> BTreeMap<String, f64> {
    basis_mean_of(&compute_basis_timeseries(table, first_rank))
}

/// Backwardation counts per commodity over the given records.
pub fn freq_backwardation_of(records: &[BasisRecord]) -> BTreeMap<String, BackwardationFrequency> {
    group_by_commodity(records)
        .into_iter()
        .map(|(commodity, group)| {
            let count = group.len();
            let positive_count = group.iter().filter(|r| r.is_backwardation()).count();
            let frequency_pct = positive_count as f64 / count as f64 * 100.0;
            (
                commodity.to_string(),
                BackwardationFrequency {
                    count,
                    positive_count,
                    frequency_pct,
                },
            )
        })
        .collect()
}

pub fn compute_freq_backwardation(table: &PriceTable, first_rank: u32) -> BTreeMap<String, BackwardationFrequency> {
    freq_backwardation_of(&compute_basis_timeseries(table, first_rank))
}

fn group_by_commodity(records: &[BasisRecord]) -> BTreeMap<&str, Vec<&BasisRecord>> {
    let mut groups: BTreeMap<&str, Vec<&BasisRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.commodity.as_str()).or_default().push(record);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core_types::PriceObservation;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn obs(commodity: &str, contract: u32, day: NaiveDate, price: f64) -> PriceObservation {
        PriceObservation::new(commodity, contract, day, price)
    }

    #[test]
    fn single_series_commodities_are_not_eligible() {
        let table = PriceTable::new(vec![
            obs("Corn", 1, date(2020, 1, 31), 1.0),
            obs("Corn", 2, date(2020, 1, 31), 1.0),
            // Two ranks, but never on the same day.
            obs("Oats", 1, date(2020, 1, 30), 1.0),
            obs("Oats", 2, date(2020, 1, 31), 1.0),
            obs("Gold", 1, date(2020, 1, 31), 1.0),
        ]);
        let eligible = eligible_commodities(&table);
        assert_eq!(eligible.into_iter().collect::<Vec<_>>(), vec!["Corn".to_string()]);
    }

    #[test]
    fn last_to_expire_prefers_latest_date_then_highest_rank() {
        let table = PriceTable::new(vec![
            obs("Corn", 1, date(2020, 1, 15), 10.0),
            obs("Corn", 1, date(2020, 1, 31), 11.0),
            obs("Corn", 2, date(2020, 1, 31), 12.0),
            obs("Corn", 3, date(2020, 1, 31), 13.0),
            obs("Corn", 5, date(2020, 1, 30), 15.0),
        ]);
        let (first, last) = get_first_last_to_expire_contract(&table, 1);

        assert_eq!(first.len(), 1);
        assert_eq!((first[0].date, first[0].contract, first[0].close_price), (date(2020, 1, 31), 1, 11.0));
        assert_eq!(last.len(), 1);
        assert_eq!((last[0].date, last[0].contract, last[0].close_price), (date(2020, 1, 31), 3, 13.0));
    }

    #[test]
    fn basis_is_log_spread_per_rank() {
        let table = PriceTable::new(vec![
            obs("Crude Oil", 1, date(2020, 1, 31), 52.0),
            obs("Crude Oil", 3, date(2020, 1, 31), 50.0),
            obs("Crude Oil", 1, date(2020, 2, 28), 45.0),
            obs("Crude Oil", 3, date(2020, 2, 28), 46.0),
        ]);
        let records = compute_basis_timeseries(&table, 1);
        assert_eq!(records.len(), 2);

        assert_relative_eq!(records[0].basis, (52f64.ln() - 50f64.ln()) / 2.0, epsilon = 1e-12);
        assert!(records[0].is_backwardation());
        assert_relative_eq!(records[1].basis, (45f64.ln() - 46f64.ln()) / 2.0, epsilon = 1e-12);
        assert!(!records[1].is_backwardation());

        let freq = compute_freq_backwardation(&table, 1)["Crude Oil"];
        assert_eq!(freq.count, 2);
        assert_eq!(freq.positive_count, 1);
        assert_relative_eq!(freq.frequency_pct, 50.0);
    }

    #[test]
    fn months_without_a_common_day_keep_a_nan_basis() {
        let table = PriceTable::new(vec![
            obs("Corn", 1, date(2020, 1, 31), 10.0),
            obs("Corn", 2, date(2020, 1, 31), 9.0),
            obs("Corn", 1, date(2020, 2, 28), 10.0),
            obs("Corn", 2, date(2020, 2, 27), 9.0),
        ]);
        let records = compute_basis_timeseries(&table, 1);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].last_contract, Some(2));
        assert_eq!(records[1].year_month, YearMonth::new(2020, 2).unwrap());
        assert_eq!(records[1].last_contract, None);
        assert_eq!(records[1].last_price, None);
        assert!(records[1].basis.is_nan());

        let freq = compute_freq_backwardation(&table, 1)["Corn"];
        assert_eq!(freq.count, 2);
        assert_eq!(freq.positive_count, 1);
        assert_relative_eq!(freq.frequency_pct, 50.0);

        let mean = compute_basis_mean(&table, 1)["Corn"];
        assert_relative_eq!(mean, 10f64.ln() - 9f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn flat_curve_is_not_backwardation() {
        let table = PriceTable::new(vec![
            obs("Gold", 1, date(2020, 1, 31), 1500.0),
            obs("Gold", 2, date(2020, 1, 31), 1500.0),
        ]);
        let freq = compute_freq_backwardation(&table, 1)["Gold"];
        assert_eq!(freq.positive_count, 0);
        assert_eq!(freq.frequency_pct, 0.0);
    }

    #[test]
    fn equal_ranks_give_nan_basis() {
        let near = ContractExpiryRecord {
            commodity: "Corn".into(),
            year_month: YearMonth::new(2020, 1).unwrap(),
            date: date(2020, 1, 31),
            contract: 2,
            close_price: 10.0,
        };
        let record = BasisRecord::from_pair(&near, &near.clone());
        assert!(record.basis.is_nan());
        assert!(!record.is_backwardation());
    }

    #[test]
    fn mean_skips_nan_bases() {
        let table = PriceTable::new(vec![
            obs("Corn", 1, date(2020, 1, 31), 10.0),
            obs("Corn", 2, date(2020, 1, 31), 5.0),
            obs("Corn", 1, date(2020, 2, 28), f64::NAN),
            obs("Corn", 2, date(2020, 2, 28), 5.0),
        ]);
        let mean = compute_basis_mean(&table, 1)["Corn"];
        assert_relative_eq!(mean, 2f64.ln(), epsilon = 1e-12);
    }
}
