//! Descriptive datasets over the cleaned table.

use analytics::mappings::sector_for;
use chrono::NaiveDate;
use core_types::{PriceTable, YearMonth};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Label used for commodities without a sector mapping.
pub const UNMAPPED_SECTOR: &str = "Unmapped";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectorCount {
    #[serde(rename = "Sector")]
    pub sector: String,
    #[serde(rename = "Commodities")]
    pub commodities: usize,
}

/// Which contract ranks each commodity is quoted in, and over what span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Availability {
    #[serde(rename = "Commodity")]
    pub commodity: String,
    #[serde(rename = "Contract")]
    pub contract: u32,
    #[serde(rename = "Observations")]
    pub observations: usize,
    #[serde(rename = "FirstDate")]
    pub first_date: NaiveDate,
    #[serde(rename = "LastDate")]
    pub last_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaxContract {
    #[serde(rename = "Commodity")]
    pub commodity: String,
    #[serde(rename = "MaxContract")]
    pub max_contract: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyMaxContract {
    #[serde(rename = "Commodity")]
    pub commodity: String,
    #[serde(rename = "YearMonth")]
    pub year_month: YearMonth,
    #[serde(rename = "MaxContract")]
    pub max_contract: u32,
}

/// Number of distinct commodities per sector.
pub fn commodities_by_sector(table: &PriceTable) -> Vec<SectorCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for commodity in table.commodities() {
        let sector = sector_for(commodity).map_or_else(|| UNMAPPED_SECTOR.to_string(), |s| s.to_string());
        *counts.entry(sector).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(sector, commodities)| SectorCount { sector, commodities })
        .collect()
}

/// Commodity × contract presence, one entry per pair that has any row.
pub fn data_availability(table: &PriceTable) -> Vec<Availability> {
    let mut spans: BTreeMap<(&str, u32), Availability> = BTreeMap::new();
    for obs in table {
        spans
            .entry((obs.commodity.as_str(), obs.contract))
            .and_modify(|a| {
                a.observations += 1;
                a.first_date = a.first_date.min(obs.date);
                a.last_date = a.last_date.max(obs.date);
            })
            .or_insert_with(|| Availability {
                commodity: obs.commodity.clone(),
                contract: obs.contract,
                observations: 1,
                first_date: obs.date,
                last_date: obs.date,
            });
    }
    spans.into_values().collect()
}

/// Highest contract rank ever quoted per commodity.
pub fn max_contract_number(table: &PriceTable) -> Vec<MaxContract> {
    let mut max: BTreeMap<&str, u32> = BTreeMap::new();
    for obs in table {
        let entry = max.entry(obs.commodity.as_str()).or_default();
        *entry = (*entry).max(obs.contract);
    }
    max.into_iter()
        .map(|(commodity, max_contract)| MaxContract {
            commodity: commodity.to_string(),
            max_contract,
        })
        .collect()
}

/// Highest contract rank quoted per commodity and month.
pub fn max_contract_availability(table: &PriceTable) -> Vec<MonthlyMaxContract> {
    let mut max: BTreeMap<(&str, YearMonth), u32> = BTreeMap::new();
    for obs in table {
        let entry = max.entry((obs.commodity.as_str(), obs.year_month)).or_default();
        *entry = (*entry).max(obs.contract);
    }
    max.into_iter()
        .map(|((commodity, year_month), max_contract)| MonthlyMaxContract {
            commodity: commodity.to_string(),
            year_month,
            max_contract,
        })
        .collect()
}

/// Commodities that never quote more than one contract rank.
pub fn single_series_commodities(table: &PriceTable) -> BTreeSet<String> {
    max_contract_number(table)
        .into_iter()
        .filter(|m| m.max_contract <= 1)
        .map(|m| m.commodity)
        .collect()
}
