use core_types::{PriceTable, YearMonth};
use std::collections::{BTreeMap, BTreeSet};

/// Average number of observations per month, per commodity.
///
/// Total rows divided by the number of distinct months the commodity is
/// quoted in. A commodity present in the table has at least one month, so
/// the division is always defined.
pub fn compute_num_observations(table: &PriceTable) -> BTreeMap<String, f64> {
    let mut counts: BTreeMap<&str, (usize, BTreeSet<YearMonth>)> = BTreeMap::new();
    for obs in table {
        let entry = counts.entry(obs.commodity.as_str()).or_default();
        entry.0 += 1;
        entry.1.insert(obs.year_month);
    }

    counts
        .into_iter()
        .map(|(commodity, (rows, months))| (commodity.to_string(), rows as f64 / months.len() as f64))
        .collect()
}
