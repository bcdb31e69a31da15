//! # Data
//!
//! Getting prices into memory: the loader reads the raw delimited file, the
//! cleaner casts and canonicalises it into a `PriceTable`, and the snapshot
//! module persists cleaned tables per study period so later stages can start
//! from them.

pub mod cleaner;
pub mod error;
pub mod loader;
pub mod snapshot;

pub use cleaner::clean_process_data;
pub use error::DataError;
pub use loader::{RawPriceFrame, RawPriceRow, load_data, read_raw_file};
pub use snapshot::{read_clean_snapshot, snapshot_file_name, write_clean_snapshot};
