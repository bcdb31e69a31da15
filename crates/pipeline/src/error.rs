use indicatif::style::TemplateError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] configuration::error::ConfigError),

    #[error("Data error: {0}")]
    Data(#[from] data::DataError),

    #[error("Metrics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error("Report error: {0}")]
    Report(#[from] reporter::ReportError),

    #[error("Analysis error: {0}")]
    Analyzer(#[from] analyzer::error::AnalyzerError),

    #[error("Failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Task '{0}' is declared more than once")]
    DuplicateTask(String),

    #[error("Task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: String, dependency: String },

    #[error("Task dependencies form a cycle through: {}", .0.join(", "))]
    Cycle(Vec<String>),

    #[error("Task '{task}' needs {path}, which does not exist")]
    MissingFileDependency { task: String, path: PathBuf },

    #[error("Task '{task}' failed: {message}")]
    TaskFailed { task: String, message: String },

    #[error("Progress bar template error: {0}")]
    ProgressBarTemplate(String),
}

impl From<TemplateError> for PipelineError {
    fn from(error: TemplateError) -> Self {
        PipelineError::ProgressBarTemplate(error.to_string())
    }
}
