mod app;
mod color;
mod state;
mod ui;

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use serde::Serialize;

use trijet_mass::analysis::accumulator::{MassAccumulator, MassSnapshot};
use trijet_mass::analysis::cuts::SelectionCuts;
use trijet_mass::analysis::pipeline::{process_events, process_events_parallel};
use trijet_mass::data::loader::load_file;
use trijet_mass::histogram::Histogram;

use state::{AppState, DatasetResult};

/// Reconstruct the top-quark mass from the highest-pt b-tagged trijet of
/// single-lepton events.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Event files (.parquet, .json or .csv), processed in the given order.
    #[arg(required = true, value_name = "DATASET")]
    datasets: Vec<PathBuf>,

    /// JSON file overriding selection thresholds.
    #[arg(long, value_name = "FILE")]
    cuts: Option<PathBuf>,

    /// Write counters, cutflow, masses and histogram to a JSON file.
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Open a window with the mass histogram.
    #[arg(long, default_value_t = false)]
    plot: bool,

    /// Process events on a single thread.
    #[arg(long, default_value_t = false)]
    sequential: bool,

    /// Log level; `RUST_LOG` takes precedence when set.
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

#[derive(Serialize)]
struct Report<'a> {
    cuts: &'a SelectionCuts,
    #[serde(flatten)]
    snapshot: MassSnapshot,
    histogram: Histogram,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .parse_default_env()
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let cuts = match &cli.cuts {
        Some(path) => SelectionCuts::from_json_file(path)?,
        None => SelectionCuts::default(),
    };
    log::debug!("Selection cuts: {cuts:?}");

    let mut combined = MassAccumulator::new();
    let mut results = Vec::with_capacity(cli.datasets.len());

    for path in &cli.datasets {
        let columns =
            load_file(path).with_context(|| format!("loading {}", path.display()))?;
        log::info!("Loaded {} events from {}", columns.len(), path.display());

        let acc = if cli.sequential {
            process_events(&columns, &cuts)
        } else {
            process_events_parallel(&columns, &cuts)
        };
        log::info!(
            "{}: {} of {} events selected",
            path.display(),
            acc.selected_events(),
            acc.total_events()
        );
        log::debug!("{}: {:?}", path.display(), acc.cutflow());

        results.push(DatasetResult::new(dataset_name(path), &acc));
        combined.merge(acc);
    }

    print_report(&combined);

    if let Some(path) = &cli.json {
        write_json(path, &cuts, &combined)?;
        log::info!("Wrote report to {}", path.display());
    }

    if cli.plot {
        app::run(AppState::new(results))
            .map_err(|e| anyhow::anyhow!("histogram window failed: {e}"))?;
    }

    Ok(())
}

fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

fn print_report(acc: &MassAccumulator) {
    let flow = acc.cutflow();
    println!("Total number of events: {}", acc.total_events());
    println!("Number of selected events: {}", acc.selected_events());
    println!(
        "Cutflow: lepton {} -> jets {} -> b-tag {} -> trijet {}",
        flow.lepton, flow.jets, flow.btag, flow.selected
    );
    println!();
    print!("{}", Histogram::from_values(acc.masses()).render_text(50));
}

fn write_json(path: &Path, cuts: &SelectionCuts, acc: &MassAccumulator) -> Result<()> {
    let report = Report {
        cuts,
        snapshot: acc.snapshot(),
        histogram: Histogram::from_values(acc.masses()),
    };
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report).context("writing JSON report")?;
    writer.flush().context("flushing JSON report")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use clap::CommandFactory;
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn missing_datasets_is_a_usage_error() {
        let err = Cli::try_parse_from(["trijet-mass"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn several_datasets_keep_their_order() {
        let cli = Cli::try_parse_from(["trijet-mass", "b.parquet", "a.json", "--sequential"])
            .unwrap();
        assert_eq!(
            cli.datasets,
            vec![PathBuf::from("b.parquet"), PathBuf::from("a.json")]
        );
        assert!(cli.sequential);
        assert_eq!(cli.log_level, LevelFilter::Info);
    }

    #[test]
    fn json_report_has_counters_and_masses() {
        let dir = tempfile::tempdir().unwrap();
        let events = dir.path().join("events.json");
        let record = r#"{
            "electron_pt": [30], "muon_pt": [],
            "jet_pt": [30, 30, 30, 30, 10], "jet_btag": [0.6, 0.6, 0.1, 0.1, 0.9],
            "jet_px": [30, 0, -30, 20, 10], "jet_py": [0, 30, 0, 22, 0],
            "jet_pz": [10, -5, 0, 8, 0], "jet_e": [40, 35, 32, 31, 12]
        }"#;
        let empty = r#"{
            "electron_pt": [], "muon_pt": [],
            "jet_pt": [], "jet_btag": [], "jet_px": [], "jet_py": [], "jet_pz": [], "jet_e": []
        }"#;
        std::fs::write(&events, format!("[{record}, {empty}]")).unwrap();

        let out = dir.path().join("report.json");
        let args: Vec<OsString> = vec![
            "trijet-mass".into(),
            events.into_os_string(),
            "--json".into(),
            out.clone().into_os_string(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        run(&cli).unwrap();

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(report["total_events"], 2);
        assert_eq!(report["selected_events"], 1);
        assert_eq!(report["masses"].as_array().unwrap().len(), 1);
        assert_eq!(report["cutflow"]["lepton"], 1);
        assert_eq!(report["cuts"]["min_jets"], 4);
    }
}
