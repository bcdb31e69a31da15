//! # Commodities Analytics
//!
//! The metrics engine of the study: average monthly observation counts,
//! annualized excess-return statistics on the second contract, roll basis
//! between the nearest and farthest contracts, and the frequency of
//! backwardation. The results are combined into one `SummaryRow` per
//! commodity.
//!
//! This is a pure logic crate. It depends only on `core-types` and performs
//! no I/O; every calculation takes a `PriceTable` and returns plain data.
//! Undefined numeric results (zero volatility, equal contract ranks) are
//! encoded as NaN rather than raised.

pub mod basis;
pub mod engine;
pub mod error;
pub mod mappings;
pub mod observations;
pub mod performance;
pub mod report;
pub mod returns;
pub mod stats;

pub use basis::{BackwardationFrequency, BasisRecord, ContractExpiryRecord};
pub use engine::MetricsEngine;
pub use error::AnalyticsError;
pub use performance::PerformanceMetrics;
pub use report::SummaryRow;
pub use returns::ReturnsMatrix;
