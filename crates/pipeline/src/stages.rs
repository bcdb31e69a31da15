//! The study's stages and the task graph that wires them together.

use crate::error::PipelineError;
use crate::tasks::{Task, TaskGraph};
use analytics::{MetricsEngine, SummaryRow};
use analyzer::Analyzer;
use configuration::{Config, PeriodName};
use data::{clean_process_data, load_data, read_clean_snapshot, snapshot_file_name, write_clean_snapshot};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where the cleaned table of a period is stored.
pub fn snapshot_path(config: &Config, period: PeriodName) -> PathBuf {
    let range = config.periods.get(period);
    config
        .paths
        .manual_dir()
        .join(snapshot_file_name(range.start, range.end, &config.paths.input_file))
}

/// The `.tex` and `.csv` summary tables of a period.
pub fn table_paths(config: &Config, period: PeriodName) -> (PathBuf, PathBuf) {
    let stem = reporter::table_stem(&config.periods.get(period).year_tag());
    let dir = &config.paths.output_dir;
    (dir.join(format!("{stem}.tex")), dir.join(format!("{stem}.csv")))
}

pub fn chart_paths(config: &Config, period: PeriodName) -> Vec<PathBuf> {
    let tag = config.periods.get(period).year_tag();
    analyzer::output_file_names(&tag, config.analysis.rolling_window)
        .into_iter()
        .map(|name| config.paths.output_dir.join(name))
        .collect()
}

/// Loads the raw file, cleans it to the period and stores the snapshot.
pub fn clean_stage(config: &Config, period: PeriodName) -> Result<PathBuf, PipelineError> {
    let range = config.periods.get(period);
    let raw = load_data(
        &config.paths.data_dir,
        &config.paths.input_file,
        &config.cleaning.price_column,
    )?;
    let table = clean_process_data(&raw, range.start, range.end, &config.cleaning.excluded_commodities)?;

    let path = snapshot_path(config, period);
    ensure_dir(&config.paths.manual_dir())?;
    write_clean_snapshot(&table, &path)?;

    info!("Clean stage for {} period done: {} rows", period, table.len());
    Ok(path)
}

/// Computes the summary table from the period's snapshot and writes it.
pub fn metrics_stage(config: &Config, period: PeriodName) -> Result<Vec<SummaryRow>, PipelineError> {
    let table = read_clean_snapshot(&snapshot_path(config, period))?;

    let params = &config.metrics;
    let engine = MetricsEngine::new(params.annualizing_period, params.first_rank, params.returns_contract)?
        .strict_mappings(params.strict_mappings);
    let rows = engine.combine_metrics(&table)?;

    ensure_dir(&config.paths.output_dir)?;
    let (tex, csv) = table_paths(config, period);
    reporter::write_latex(&rows, &tex)?;
    reporter::write_summary_csv(&rows, &csv)?;

    info!("Metrics stage for {} period done: {} commodities", period, rows.len());
    Ok(rows)
}

/// Writes the chart datasets from the period's snapshot.
pub fn analysis_stage(config: &Config, period: PeriodName) -> Result<Vec<PathBuf>, PipelineError> {
    let table = read_clean_snapshot(&snapshot_path(config, period))?;

    ensure_dir(&config.paths.output_dir)?;
    let analyzer = Analyzer::new(config.analysis.clone(), config.metrics.first_rank)?;
    let tag = config.periods.get(period).year_tag();
    let written = analyzer.write_all(&table, &config.paths.output_dir, &tag)?;

    info!("Analysis stage for {} period done: {} datasets", period, written.len());
    Ok(written)
}

/// Declares `clean:<period>`, `metrics:<period>` and `analysis:<period>` for every period.
pub fn build_task_graph(config: &Config) -> Result<TaskGraph, PipelineError> {
    let mut graph = TaskGraph::new();

    for period in PeriodName::ALL {
        let range = config.periods.get(period);
        let snapshot = snapshot_path(config, period);
        let clean = format!("clean:{period}");

        let cfg = config.clone();
        graph.add(
            Task::new(clean.clone(), move || {
                clean_stage(&cfg, period)?;
                Ok(())
            })
            .doc(format!("Clean {} to {}", range.start, range.end))
            .file_dep(config.paths.input_path())
            .target(&snapshot),
        )?;

        let cfg = config.clone();
        let (tex, csv) = table_paths(config, period);
        graph.add(
            Task::new(format!("metrics:{period}"), move || {
                metrics_stage(&cfg, period)?;
                Ok(())
            })
            .doc(format!("Summary table {}", range.year_tag()))
            .file_dep(&snapshot)
            .task_dep(clean.clone())
            .targets([tex, csv]),
        )?;

        let cfg = config.clone();
        graph.add(
            Task::new(format!("analysis:{period}"), move || {
                analysis_stage(&cfg, period)?;
                Ok(())
            })
            .doc(format!("Chart datasets {}", range.year_tag()))
            .file_dep(&snapshot)
            .task_dep(clean)
            .targets(chart_paths(config, period)),
        )?;
    }

    Ok(graph)
}

fn ensure_dir(dir: &Path) -> Result<(), PipelineError> {
    fs::create_dir_all(dir).map_err(|source| PipelineError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_declares_three_tasks_per_period() {
        let graph = build_task_graph(&Config::default()).unwrap();
        let names: Vec<_> = graph
            .ordered()
            .unwrap()
            .into_iter()
            .map(|i| graph.tasks()[i].name.clone())
            .collect();
        assert_eq!(
            names,
            vec![
                "clean:old",
                "metrics:old",
                "analysis:old",
                "clean:new",
                "metrics:new",
                "analysis:new"
            ]
        );
    }

    #[test]
    fn artifact_names_carry_the_year_tag() {
        let config = Config::default();
        assert_eq!(
            snapshot_path(&config, PeriodName::Old),
            Path::new("data").join("manual").join("clean_1970_2008_commodities_data.csv")
        );
        let (tex, csv) = table_paths(&config, PeriodName::New);
        assert_eq!(tex, Path::new("output").join("table1_2009_2024.tex"));
        assert_eq!(csv, Path::new("output").join("table1_2009_2024.csv"));
    }
}
