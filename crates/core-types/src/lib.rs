//! # Core Types
//!
//! The shared data model of the pipeline: daily futures price observations,
//! the ordered `PriceTable` they live in, and the small enumerations used to
//! annotate results. Every other crate in the workspace depends on this one,
//! and this one depends on nothing in the workspace.

pub mod enums;
pub mod error;
pub mod observation;
pub mod table;

// Re-export the core types to provide a clean public API.
pub use enums::Sector;
pub use error::CoreError;
pub use observation::{PriceObservation, YearMonth};
pub use table::PriceTable;
