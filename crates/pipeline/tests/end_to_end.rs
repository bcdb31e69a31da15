use analytics::MetricsEngine;
use chrono::NaiveDate;
use configuration::{Config, DateRange, PeriodName};
use data::{clean_process_data, read_clean_snapshot, read_raw_file};
use pipeline::stages::{snapshot_path, table_paths};
use pipeline::{build_task_graph, clean_stage, metrics_stage};
use std::fs;
use std::path::PathBuf;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A config rooted in a fresh scratch directory with the given raw file.
fn scratch_config(name: &str, raw: &str) -> Config {
    let root = std::env::temp_dir().join(format!("commodities-e2e-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&root);
    let mut config = Config::default();
    config.paths.data_dir = root.join("data");
    config.paths.output_dir = root.join("output");
    config.paths.input_file = "prices.csv".to_string();
    config.analysis.rolling_window = 2;
    config.periods.old = DateRange::new(date(2019, 1, 1), date(2019, 12, 31));
    config.periods.new = DateRange::new(date(2020, 1, 1), date(2020, 12, 31));

    fs::create_dir_all(config.paths.manual_dir()).unwrap();
    fs::write(config.paths.input_path(), raw).unwrap();
    config
}

/// Two months of two contracts for a handful of commodities in each period.
fn sample_prices() -> String {
    let mut csv = String::from("Commodity,Contract,Date,PX_LAST\n");
    let days = [
        "2019-10-31",
        "2019-11-29",
        "2019-12-31",
        "2020-01-31",
        "2020-02-28",
        "2020-03-31",
    ];
    let books = [("Crude Oil", 60.0), ("Corn", 380.0), ("Gold", 1500.0), ("Barley", 150.0)];
    for (i, day) in days.iter().enumerate() {
        for (commodity, base) in books {
            let wobble = if i % 2 == 0 { 1.0 } else { -1.0 };
            let near = base + i as f64 * 2.0 + wobble;
            let far = base * (1.0 + 0.02 * wobble) + i as f64;
            csv.push_str(&format!("{commodity},1,{day},{near}\n"));
            csv.push_str(&format!("{commodity},2,{day},{far}\n"));
        }
    }
    csv
}

fn output_exists(config: &Config, period: PeriodName) -> bool {
    let (tex, csv) = table_paths(config, period);
    tex.is_file() && csv.is_file()
}

#[test]
fn full_run_produces_every_artifact_and_then_is_up_to_date() {
    let config = scratch_config("full", &sample_prices());
    let mut graph = build_task_graph(&config).unwrap().with_progress(false);

    let first = graph.run(false).unwrap();
    assert_eq!(first.executed.len(), 6);
    assert!(first.skipped.is_empty());

    for period in PeriodName::ALL {
        assert!(snapshot_path(&config, period).is_file());
        assert!(output_exists(&config, period));
    }
    let tag = config.periods.old.year_tag();
    let charts: Vec<PathBuf> = analyzer::output_file_names(&tag, 2)
        .into_iter()
        .map(|n| config.paths.output_dir.join(n))
        .collect();
    assert!(charts.iter().all(|p| p.is_file()));

    let second = graph.run(false).unwrap();
    assert!(second.executed.is_empty());
    assert_eq!(second.skipped.len(), 6);
}

#[test]
fn summary_table_excludes_barley_and_lists_the_rest() {
    let config = scratch_config("table", &sample_prices());
    clean_stage(&config, PeriodName::New).unwrap();
    let rows = metrics_stage(&config, PeriodName::New).unwrap();

    let names: Vec<_> = rows.iter().map(|r| r.commodity.as_str()).collect();
    assert_eq!(names, vec!["Corn", "Crude Oil", "Gold"]);

    for row in &rows {
        let n = row.n.unwrap();
        assert!((1.0..=31.0).contains(&n));
        let freq = row.freq_backwardation.unwrap();
        assert!((0.0..=100.0).contains(&freq));
        let sharpe = row.ann_sharpe_ratio.unwrap();
        assert!(sharpe.is_nan() || sharpe.abs() <= 100.0);
    }

    let (tex, _) = table_paths(&config, PeriodName::New);
    let tex = fs::read_to_string(tex).unwrap();
    assert!(tex.starts_with("\\begin{tabular}{lllrrrrrr}"));
    assert!(tex.contains("Energy & Crude Oil & CL & 2 &"));
    assert!(!tex.contains("Barley"));
}

#[test]
fn cleaning_conserves_rows_and_is_idempotent() {
    let config = scratch_config("conserve", &sample_prices());
    let raw = read_raw_file(&config.paths.input_path(), "PX_LAST").unwrap();
    let range = config.periods.new;

    let expected = raw
        .rows
        .iter()
        .filter(|r| r.commodity != "Barley" && r.date.as_str() >= "2020-01-01")
        .count();

    let a = clean_process_data(&raw, range.start, range.end, &config.cleaning.excluded_commodities).unwrap();
    let b = clean_process_data(&raw, range.start, range.end, &config.cleaning.excluded_commodities).unwrap();
    assert_eq!(a.len(), expected);
    assert_eq!(a, b);

    let engine = MetricsEngine::default();
    let first = engine.combine_metrics(&a).unwrap();
    let second = engine.combine_metrics(&b).unwrap();
    assert_eq!(format!("{first:?}"), format!("{second:?}"));

    clean_stage(&config, PeriodName::New).unwrap();
    let snapshot = read_clean_snapshot(&snapshot_path(&config, PeriodName::New)).unwrap();
    assert_eq!(snapshot, a);
}

#[test]
fn gold_fixture_through_the_stages() {
    let raw = "Commodity,Contract,Date,PX_LAST\n\
               Gold,1,2020-01-31,100\n\
               Gold,2,2020-01-31,101\n\
               Gold,1,2020-02-29,102\n\
               Gold,2,2020-02-29,103\n";
    let config = scratch_config("gold", raw);
    clean_stage(&config, PeriodName::New).unwrap();
    let rows = metrics_stage(&config, PeriodName::New).unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].n, Some(2.0));
    let expected = ((100f64 / 101.0).ln() + (102f64 / 103.0).ln()) / 2.0;
    approx::assert_abs_diff_eq!(rows[0].basis.unwrap(), expected, epsilon = 1e-9);
}

#[test]
fn touching_the_input_makes_downstream_tasks_stale() {
    let config = scratch_config("stale", &sample_prices());
    let mut graph = build_task_graph(&config).unwrap().with_progress(false);
    graph.run(false).unwrap();

    // Rewrite the input with a strictly later modification time.
    std::thread::sleep(std::time::Duration::from_millis(1100));
    fs::write(config.paths.input_path(), sample_prices()).unwrap();

    let rerun = graph.run(false).unwrap();
    assert!(rerun.executed.contains(&"clean:old".to_string()));
    assert!(rerun.executed.contains(&"metrics:new".to_string()));
}

#[test]
fn missing_input_file_fails_the_clean_stage() {
    let config = scratch_config("missing", "");
    fs::remove_file(config.paths.input_path()).unwrap();
    let err = clean_stage(&config, PeriodName::Old).unwrap_err();
    assert!(matches!(err, pipeline::PipelineError::Data(data::DataError::FileNotFound(_))));
}
