use crate::observation::PriceObservation;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// An immutable, date-ordered collection of price observations.
///
/// Rows are always sorted by `(date, commodity)`. The sort is stable, so rows
/// sharing both keys keep their input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    rows: Vec<PriceObservation>,
}

impl PriceTable {
    pub fn new(mut rows: Vec<PriceObservation>) -> Self {
        rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.commodity.cmp(&b.commodity)));
        Self { rows }
    }

    pub fn rows(&self) -> &[PriceObservation] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PriceObservation> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct commodity names, ascending.
    pub fn commodities(&self) -> BTreeSet<&str> {
        self.rows.iter().map(|r| r.commodity.as_str()).collect()
    }

    /// Rows quoting the given contract rank, in table order.
    pub fn with_contract(&self, contract: u32) -> impl Iterator<Item = &PriceObservation> {
        self.rows.iter().filter(move |r| r.contract == contract)
    }

    /// First and last date in the table.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.rows.first()?.date, self.rows.last()?.date))
    }

    /// A new table restricted to the inclusive date range.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            rows: self
                .rows
                .iter()
                .filter(|r| r.date >= start && r.date <= end)
                .cloned()
                .collect(),
        }
    }

    pub fn into_rows(self) -> Vec<PriceObservation> {
        self.rows
    }
}

impl<'a> IntoIterator for &'a PriceTable {
    type Item = &'a PriceObservation;
    type IntoIter = std::slice::Iter<'a, PriceObservation>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl FromIterator<PriceObservation> for PriceTable {
    fn from_iter<I: IntoIterator<Item = PriceObservation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rows_are_sorted_by_date_then_commodity() {
        let table = PriceTable::new(vec![
            PriceObservation::new("Gold", 1, date(2020, 1, 2), 1.0),
            PriceObservation::new("Corn", 1, date(2020, 1, 2), 2.0),
            PriceObservation::new("Aluminium", 1, date(2020, 1, 3), 3.0),
            PriceObservation::new("Corn", 1, date(2020, 1, 1), 4.0),
        ]);
        let keys: Vec<_> = table.iter().map(|r| (r.date.to_string(), r.commodity.as_str())).collect();
        assert_eq!(
            keys,
            vec![
                ("2020-01-01".to_string(), "Corn"),
                ("2020-01-02".to_string(), "Corn"),
                ("2020-01-02".to_string(), "Gold"),
                ("2020-01-03".to_string(), "Aluminium"),
            ]
        );
    }

    #[test]
    fn between_is_inclusive() {
        let table: PriceTable = (1..=5)
            .map(|d| PriceObservation::new("Corn", 1, date(2020, 1, d), d as f64))
            .collect();
        let sub = table.between(date(2020, 1, 2), date(2020, 1, 4));
        assert_eq!(sub.len(), 3);
        assert_eq!(sub.date_span(), Some((date(2020, 1, 2), date(2020, 1, 4))));
    }
}
