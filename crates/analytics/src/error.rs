use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Commodity '{0}' has no sector/symbol mapping")]
    UnmappedCommodity(String),

    #[error("Invalid metrics parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },
}
