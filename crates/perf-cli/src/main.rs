//! perf-cli: daily returns and alpha/beta reports from JSON series files.
//!
//! Usage:
//!   perf-cli returns AAPL --from 2024-01-01 --to 2024-06-30
//!   perf-cli alpha AAPL SPY --data ./data
//!   perf-cli alpha AAPL SPY                      # year to date
//!
//! Environment: DATA_DIR (default ./data), TREASURY_SERIES (default DGS5),
//! MAX_WINDOW_DAYS (default 3650), RUST_LOG.

mod file_provider;

use analysis_orchestrator::{OrchestratorConfig, PerformanceOrchestrator};
use anyhow::{bail, Context};
use file_provider::FileSeriesProvider;

const USAGE: &str = "\
usage: perf-cli returns <SYMBOL> [--from YYYY-MM-DD] [--to YYYY-MM-DD] [--data DIR]
       perf-cli alpha <TICKER> <BENCHMARK> [--from YYYY-MM-DD] [--to YYYY-MM-DD] [--data DIR]";

/// Value following `--flag`, if present.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

/// Arguments that are neither flags nor flag values.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip = false;
    for arg in args {
        if skip {
            skip = false;
        } else if arg.starts_with("--") {
            skip = true;
        } else {
            out.push(arg.as_str());
        }
    }
    out
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "perf_cli=info,analysis_orchestrator=info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let positional = positionals(&args);
    let from = flag_value(&args, "--from");
    let to = flag_value(&args, "--to");
    let data_dir = flag_value(&args, "--data")
        .map(str::to_string)
        .or_else(|| std::env::var("DATA_DIR").ok())
        .unwrap_or_else(|| "./data".to_string());

    let orchestrator = PerformanceOrchestrator::with_config(
        FileSeriesProvider::new(&data_dir),
        OrchestratorConfig::from_env(),
    );
    tracing::info!(
        "Reading series from {} (treasury series {}, window limit {} days)",
        data_dir,
        orchestrator.config().treasury_series,
        orchestrator.config().max_window_days
    );
    let range = orchestrator.resolve_range(from, to)?;

    let output = match positional.as_slice() {
        ["returns", symbol] => {
            let returns = orchestrator
                .daily_returns(symbol, range)
                .await
                .with_context(|| format!("computing returns for {}", symbol))?;
            serde_json::to_string_pretty(&returns)?
        }
        ["alpha", ticker, benchmark] => {
            let report = orchestrator
                .alpha_beta(ticker, benchmark, range)
                .await
                .with_context(|| {
                    format!("computing alpha/beta for {} vs {}", ticker, benchmark)
                })?;
            serde_json::to_string_pretty(&report)?
        }
        _ => bail!(USAGE),
    };

    println!("{}", output);
    Ok(())
}
