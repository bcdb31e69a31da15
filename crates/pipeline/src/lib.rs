//! # Pipeline
//!
//! Orchestrates the study: each period is cleaned into a snapshot, the
//! snapshot feeds the metrics table and the chart datasets, and a
//! timestamp-driven task graph reruns only what is stale.

pub mod error;
pub mod stages;
pub mod tasks;

pub use error::PipelineError;
pub use stages::{analysis_stage, build_task_graph, clean_stage, metrics_stage};
pub use tasks::{RunSummary, Task, TaskGraph, TaskStatus};
