use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use configuration::{Config, DEFAULT_CONFIG_FILE, PeriodName};
use pipeline::{TaskStatus, analysis_stage, build_task_graph, clean_stage, metrics_stage};
use std::path::PathBuf;
use tracing::info;

/// The main entry point for the commodities study.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = configuration::load_config_from(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    // Held until exit so buffered file logs are flushed.
    let _guard = configuration::init_tracing(&config.logging)?;

    match cli.command {
        Commands::Clean(args) => {
            let path = clean_stage(&config, args.period)?;
            info!("Cleaned snapshot written to {}", path.display());
        }
        Commands::Metrics(args) => {
            let rows = metrics_stage(&config, args.period)?;
            println!("{}", reporter::render_console(&rows));
        }
        Commands::Analyze(args) => {
            let written = analysis_stage(&config, args.period)?;
            for path in written {
                println!("{}", path.display());
            }
        }
        Commands::Run { force } => handle_run(&config, force)?,
        Commands::Tasks => handle_tasks(&config)?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Replication pipeline for the commodities-futures study.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file; missing files fall back to defaults.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the raw price file and store the cleaned snapshot of one period.
    Clean(PeriodArgs),
    /// Compute the summary table of one period from its snapshot.
    Metrics(PeriodArgs),
    /// Write the chart datasets of one period from its snapshot.
    Analyze(PeriodArgs),
    /// Run every stale task of the pipeline.
    Run {
        /// Run every task, even when its targets are up to date.
        #[arg(long)]
        force: bool,
    },
    /// List the pipeline tasks and whether they would run.
    Tasks,
}

#[derive(Args)]
struct PeriodArgs {
    /// The study period.
    #[arg(long, value_enum)]
    period: PeriodName,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_run(config: &Config, force: bool) -> anyhow::Result<()> {
    let mut graph = build_task_graph(config)?;
    let summary = graph.run(force)?;
    println!(
        "{} task(s) executed, {} up to date",
        summary.executed.len(),
        summary.skipped.len()
    );
    Ok(())
}

fn handle_tasks(config: &Config) -> anyhow::Result<()> {
    let graph = build_task_graph(config)?;
    for (task, status) in graph.status()? {
        let marker = match status {
            TaskStatus::UpToDate => "--",
            TaskStatus::Outdated => "..",
            TaskStatus::MissingInput => "!!",
        };
        println!(
            "{} {:<14} {:<14} {}",
            marker,
            task.name,
            status,
            task.doc.as_deref().unwrap_or_default()
        );
    }
    Ok(())
}
