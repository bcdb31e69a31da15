use crate::basis::{
    self, BackwardationFrequency, BasisRecord, ContractExpiryRecord, basis_mean_of, freq_backwardation_of,
};
use crate::error::AnalyticsError;
use crate::mappings::{sector_for, symbol_for};
use crate::observations;
use crate::performance::{self, PerformanceMetrics};
use crate::report::SummaryRow;
use crate::returns::{self, ReturnsMatrix};
use core_types::PriceTable;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

pub const DEFAULT_ANNUALIZING_PERIOD: u32 = 12;
pub const DEFAULT_FIRST_RANK: u32 = 1;
pub const DEFAULT_RETURNS_CONTRACT: u32 = 2;

/// A stateless calculator for the per-commodity summary metrics.
///
/// The engine only carries parameters; every method is a pure function of
/// the `PriceTable` it is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsEngine {
    annualizing_period: u32,
    first_rank: u32,
    returns_contract: u32,
    strict_mappings: bool,
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self {
            annualizing_period: DEFAULT_ANNUALIZING_PERIOD,
            first_rank: DEFAULT_FIRST_RANK,
            returns_contract: DEFAULT_RETURNS_CONTRACT,
            strict_mappings: false,
        }
    }
}

impl MetricsEngine {
    pub fn new(annualizing_period: u32, first_rank: u32, returns_contract: u32) -> Result<Self, AnalyticsError> {
        if annualizing_period == 0 {
            return Err(AnalyticsError::InvalidParameter {
                name: "annualizing_period",
                value: annualizing_period.to_string(),
            });
        }
        if first_rank == 0 {
            return Err(AnalyticsError::InvalidParameter {
                name: "first_rank",
                value: first_rank.to_string(),
            });
        }
        if returns_contract == 0 {
            return Err(AnalyticsError::InvalidParameter {
                name: "returns_contract",
                value: returns_contract.to_string(),
            });
        }
        Ok(Self {
            annualizing_period,
            first_rank,
            returns_contract,
            strict_mappings: false,
        })
    }

    /// Fail on commodities without a sector/symbol instead of leaving them blank.
    pub fn strict_mappings(mut self, strict: bool) -> Self {
        self.strict_mappings = strict;
        self
    }

    pub fn annualizing_period(&self) -> u32 {
        self.annualizing_period
    }

    pub fn first_rank(&self) -> u32 {
        self.first_rank
    }

    pub fn returns_contract(&self) -> u32 {
        self.returns_contract
    }

    pub fn compute_num_observations(&self, table: &PriceTable) -> BTreeMap<String, f64> {
        observations::compute_num_observations(table)
    }

    pub fn compute_commodity_excess_returns(&self, table: &PriceTable) -> ReturnsMatrix {
        returns::compute_commodity_excess_returns(table, self.returns_contract)
    }

    pub fn compute_performance_metrics(&self, returns: &ReturnsMatrix) -> BTreeMap<String, PerformanceMetrics> {
        performance::compute_performance_metrics(returns, self.annualizing_period)
    }

    pub fn get_first_last_to_expire_contract(
        &self,
        table: &PriceTable,
    ) -> (Vec<ContractExpiryRecord>, Vec<ContractExpiryRecord>) {
        basis::get_first_last_to_expire_contract(table, self.first_rank)
    }

    pub fn compute_basis_timeseries(&self, table: &PriceTable) -> Vec<BasisRecord> {
        basis::compute_basis_timeseries(table, self.first_rank)
    }

    pub fn compute_basis_mean(&self, table: &PriceTable) -> BTreeMap<String, f64> {
        basis::compute_basis_mean(table, self.first_rank)
    }

    pub fn compute_freq_backwardation(&self, table: &PriceTable) -> BTreeMap<String, BackwardationFrequency> {
        basis::compute_freq_backwardation(table, self.first_rank)
    }

    /// The main entry point: builds the annotated summary table.
    ///
    /// Every commodity that appears in any of the individual metrics gets a
    /// row. Rows are ordered by sector then commodity, unmapped sectors last.
    pub fn combine_metrics(&self, table: &PriceTable) -> Result<Vec<SummaryRow>, AnalyticsError> {
        let num_obs = self.compute_num_observations(table);
        let performance = self.compute_performance_metrics(&self.compute_commodity_excess_returns(table));

        // Basis mean and frequency share one pass over the basis records.
        let basis_records = self.compute_basis_timeseries(table);
        let basis_mean = basis_mean_of(&basis_records);
        let backwardation = freq_backwardation_of(&basis_records);
        debug!(
            "Computed {} basis records for {} commodities",
            basis_records.len(),
            basis_mean.len()
        );

        let commodities: BTreeSet<&String> = num_obs
            .keys()
            .chain(performance.keys())
            .chain(basis_mean.keys())
            .chain(backwardation.keys())
            .collect();

        let mut rows = Vec::with_capacity(commodities.len());
        for commodity in commodities {
            let (sector, symbol) = (sector_for(commodity), symbol_for(commodity));
            if sector.is_none() || symbol.is_none() {
                if self.strict_mappings {
                    return Err(AnalyticsError::UnmappedCommodity(commodity.clone()));
                }
                warn!("Commodity '{}' has no sector/symbol mapping", commodity);
            }

            let mut row = SummaryRow::new(commodity.as_str(), sector, symbol);
            row.n = num_obs.get(commodity).copied();
            row.basis = basis_mean.get(commodity).copied();
            row.freq_backwardation = backwardation.get(commodity).map(|f| f.frequency_pct);
            if let Some(metrics) = performance.get(commodity) {
                row.ann_excess_returns = Some(metrics.ann_excess_return);
                row.ann_volatility = Some(metrics.ann_volatility);
                row.ann_sharpe_ratio = Some(metrics.ann_sharpe);
            }
            rows.push(row);
        }
        rows.sort_by(SummaryRow::table_order);

        info!("Combined metrics for {} commodities", rows.len());
        Ok(rows)
    }
}
