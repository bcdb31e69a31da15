use crate::error::DataError;
use crate::loader::{CONTRACT_COLUMN, DATE_COLUMN, RawPriceFrame, RawPriceRow};
use chrono::NaiveDate;
use core_types::{PriceObservation, PriceTable};
use std::collections::HashSet;
use tracing::{debug, info};

/// The canonical name of the price column after cleaning.
pub const CLOSE_PRICE_COLUMN: &str = "ClosePrice";

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Turns the raw frame into a canonical, date-ordered `PriceTable`.
///
/// Steps run in a fixed order: cast every row (failing on the first bad
/// cell), drop excluded commodities, sort by `(Date, Commodity)`, then keep
/// only `start..=end`.
pub fn clean_process_data(
    raw: &RawPriceFrame,
    start: NaiveDate,
    end: NaiveDate,
    excluded_commodities: &[String],
) -> Result<PriceTable, DataError> {
    if start > end {
        return Err(DataError::InvalidRange { start, end });
    }

    let observations = raw
        .rows
        .iter()
        .map(|row| cast_row(row, &raw.price_column))
        .collect::<Result<Vec<_>, _>>()?;

    let excluded: HashSet<&str> = excluded_commodities.iter().map(String::as_str).collect();
    let before = observations.len();
    let kept: Vec<PriceObservation> = observations
        .into_iter()
        .filter(|obs| !excluded.contains(obs.commodity.as_str()))
        .collect();
    debug!("Dropped {} rows of excluded commodities", before - kept.len());

    let table = PriceTable::new(kept).between(start, end);
    info!(
        "Cleaned data for {} to {}: {} rows across {} commodities",
        start,
        end,
        table.len(),
        table.commodities().len()
    );

    Ok(table)
}

fn cast_row(row: &RawPriceRow, price_column: &str) -> Result<PriceObservation, DataError> {
    let date = parse_date(&row.date).ok_or_else(|| cast_error(row, DATE_COLUMN, &row.date))?;
    let contract =
        parse_contract(&row.contract).ok_or_else(|| cast_error(row, CONTRACT_COLUMN, &row.contract))?;
    let price = parse_price(&row.price).ok_or_else(|| cast_error(row, price_column, &row.price))?;

    Ok(PriceObservation::new(row.commodity.clone(), contract, date, price))
}

fn cast_error(row: &RawPriceRow, column: &str, value: &str) -> DataError {
    DataError::Cast {
        row: row.row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

/// Accepts ISO dates, optionally followed by a time part.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = value
        .split_once(|c: char| c == ' ' || c == 'T')
        .map_or(value, |(date, _)| date);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Contract ranks are positive integers; integral floats such as `2.0` are
/// accepted because spreadsheet exports often write them that way.
pub fn parse_contract(value: &str) -> Option<u32> {
    let value = value.trim();
    if let Ok(rank) = value.parse::<u32>() {
        return (rank >= 1).then_some(rank);
    }
    let float = value.parse::<f64>().ok()?;
    if float.fract() == 0.0 && float >= 1.0 && float <= u32::MAX as f64 {
        Some(float as u32)
    } else {
        None
    }
}

/// An empty cell is a missing price and becomes NaN; anything else must be numeric.
pub fn parse_price(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return Some(f64::NAN);
    }
    value.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn raw(rows: &[(&str, &str, &str, &str)]) -> RawPriceFrame {
        RawPriceFrame {
            source: PathBuf::from("memory"),
            price_column: "PX_LAST".to_string(),
            rows: rows
                .iter()
                .enumerate()
                .map(|(i, (commodity, contract, date, price))| RawPriceRow {
                    row: i + 1,
                    commodity: commodity.to_string(),
                    contract: contract.to_string(),
                    date: date.to_string(),
                    price: price.to_string(),
                })
                .collect(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn excluded() -> Vec<String> {
        ["Barley", "Coal", "Propane", "Broilers", "Butter"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn casts_sorts_and_filters() {
        let frame = raw(&[
            ("Gold", "1", "2020-01-03", "1550.5"),
            ("Corn", "2.0", "2020-01-03 00:00:00", "390"),
            ("Corn", "1", "2020-01-02", "388.25"),
            ("Corn", "1", "2019-12-31", "387"),
        ]);
        let table = clean_process_data(&frame, date(2020, 1, 1), date(2020, 1, 31), &excluded()).unwrap();

        let keys: Vec<_> = table
            .iter()
            .map(|o| (o.date, o.commodity.as_str(), o.contract))
            .collect();
        assert_eq!(
            keys,
            vec![
                (date(2020, 1, 2), "Corn", 1),
                (date(2020, 1, 3), "Corn", 2),
                (date(2020, 1, 3), "Gold", 1),
            ]
        );
        assert_eq!(table.rows()[1].close_price, 390.0);
        assert_eq!(table.rows()[0].year_month.to_string(), "2020-01");
    }

    #[test]
    fn excluded_commodities_never_survive() {
        let frame = raw(&[
            ("Barley", "1", "2000-01-03", "1"),
            ("Coal", "1", "2000-01-03", "1"),
            ("Propane", "1", "2000-01-03", "1"),
            ("Broilers", "1", "2000-01-03", "1"),
            ("Butter", "1", "2000-01-03", "1"),
            ("Wheat", "1", "2000-01-03", "1"),
        ]);
        let table = clean_process_data(&frame, date(1970, 1, 1), date(2008, 12, 31), &excluded()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].commodity, "Wheat");
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let frame = raw(&[
            ("Corn", "1", "2008-12-31", "1"),
            ("Corn", "1", "2009-01-01", "2"),
        ]);
        let old = clean_process_data(&frame, date(1970, 1, 1), date(2008, 12, 31), &[]).unwrap();
        let new = clean_process_data(&frame, date(2009, 1, 1), date(2024, 12, 31), &[]).unwrap();
        assert_eq!(old.len(), 1);
        assert_eq!(new.len(), 1);
        assert_eq!(new.rows()[0].close_price, 2.0);
    }

    #[test]
    fn non_numeric_price_fails_fast() {
        let frame = raw(&[
            ("Corn", "1", "2020-01-02", "1"),
            ("Corn", "1", "2020-01-03", "n/a"),
        ]);
        let err = clean_process_data(&frame, date(2020, 1, 1), date(2020, 12, 31), &[]).unwrap_err();
        match err {
            DataError::Cast { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "PX_LAST");
                assert_eq!(value, "n/a");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_price_is_missing_not_an_error() {
        let frame = raw(&[("Corn", "1", "2020-01-02", "")]);
        let table = clean_process_data(&frame, date(2020, 1, 1), date(2020, 12, 31), &[]).unwrap();
        assert!(table.rows()[0].close_price.is_nan());
    }

    #[test]
    fn contract_casts() {
        assert_eq!(parse_contract("3"), Some(3));
        assert_eq!(parse_contract("3.0"), Some(3));
        assert_eq!(parse_contract("2.5"), None);
        assert_eq!(parse_contract("0"), None);
        assert_eq!(parse_contract("front"), None);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let frame = raw(&[]);
        let err = clean_process_data(&frame, date(2020, 1, 2), date(2020, 1, 1), &[]).unwrap_err();
        assert!(matches!(err, DataError::InvalidRange { .. }));
    }

    #[test]
    fn cleaning_is_deterministic() {
        let frame = raw(&[
            ("Gold", "1", "2020-01-03", "1"),
            ("Corn", "2", "2020-01-03", "2"),
            ("Corn", "1", "2020-01-03", "3"),
        ]);
        let a = clean_process_data(&frame, date(2020, 1, 1), date(2020, 1, 31), &[]).unwrap();
        let b = clean_process_data(&frame, date(2020, 1, 1), date(2020, 1, 31), &[]).unwrap();
        assert_eq!(a, b);
    }
}
