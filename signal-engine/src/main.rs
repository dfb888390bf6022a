use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use signal_engine::{
    filter_suggestions, generate_synthetic_records, load_file, AnalysisEngine, AnalysisParameters,
    AnalysisRecord, AnalysisResult, AnalysisSummary, BatchIndexComputer, IndicatorRecord,
    RawRecord, Suggestion, SummaryCalculator,
};

#[derive(Parser, Debug)]
#[command(name = "signal-engine")]
#[command(version = "0.1.0")]
#[command(about = "Technical indicator analysis and trading signal engine", long_about = None)]
struct Args {
    /// Run mode: analyze (latest snapshot per symbol) or index (historical indicator table)
    #[arg(short, long, default_value = "analyze")]
    mode: String,

    /// Data file path (CSV/JSON), repeatable. The file stem is used as the symbol.
    #[arg(short = 'f', long)]
    data_file: Vec<PathBuf>,

    /// Symbols to generate synthetic data for when no data file is given
    #[arg(short, long, value_delimiter = ',', default_value = "DEMO")]
    symbols: Vec<String>,

    /// Number of days of synthetic data
    #[arg(short, long, default_value = "60")]
    days: usize,

    /// Initial price for synthetic data
    #[arg(long, default_value = "100.0")]
    initial_price: f64,

    /// Analysis parameters as JSON. Missing fields keep their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum confidence used by the summary and the suggestion lists
    #[arg(long)]
    min_confidence: Option<f64>,

    /// Output format (json, text)
    #[arg(short, long, default_value = "json")]
    output: String,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Serialize)]
struct Failure {
    symbol: String,
    error: String,
}

#[derive(Debug, Serialize)]
struct AnalyzeReport {
    results: Vec<AnalysisResult>,
    records: Vec<AnalysisRecord>,
    failures: Vec<Failure>,
    summary: AnalysisSummary,
}

#[derive(Debug, Serialize)]
struct IndexReport {
    records: Vec<IndicatorRecord>,
    failures: Vec<Failure>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut params = match &args.config {
        Some(path) => load_params(path)?,
        None => AnalysisParameters::default(),
    };
    if let Some(min_confidence) = args.min_confidence {
        params = params.with_min_confidence(min_confidence);
    }
    params.validate()?;

    let min_confidence = params.min_confidence;
    let (inputs, mut failures) = collect_inputs(&args);

    match args.mode.as_str() {
        "analyze" => {
            let report = run_analyze(params, &inputs, failures);
            match args.output.as_str() {
                "json" => print_json(&report, args.pretty)?,
                "text" => print_analyze_report(&report, min_confidence),
                other => {
                    warn!(format = other, "unknown output format, using text");
                    print_analyze_report(&report, min_confidence);
                }
            }
        }
        "index" => {
            let computer = BatchIndexComputer::new();
            let mut records = Vec::new();
            for (symbol, outcome) in computer.compute_many(&inputs) {
                match outcome {
                    Ok(mut symbol_records) => records.append(&mut symbol_records),
                    Err(e) => failures.push(Failure {
                        symbol,
                        error: e.to_string(),
                    }),
                }
            }
            let report = IndexReport { records, failures };
            match args.output.as_str() {
                "text" => print_index_report(&report),
                _ => print_json(&report, args.pretty)?,
            }
        }
        other => bail!("unknown mode: {} (expected analyze or index)", other),
    }

    Ok(())
}

fn load_params(path: &Path) -> Result<AnalysisParameters> {
    let file = File::open(path).with_context(|| format!("opening config {:?}", path))?;
    let params =
        serde_json::from_reader(file).with_context(|| format!("parsing config {:?}", path))?;
    info!(config = ?path, "parameters loaded");
    Ok(params)
}

/// Raw rows per symbol; load failures are reported per file
fn collect_inputs(args: &Args) -> (Vec<(String, Vec<RawRecord>)>, Vec<Failure>) {
    let mut inputs = Vec::new();
    let mut failures = Vec::new();

    if args.data_file.is_empty() {
        info!(
            days = args.days,
            initial_price = args.initial_price,
            symbols = args.symbols.len(),
            "generating synthetic data"
        );
        for symbol in &args.symbols {
            inputs.push((
                symbol.clone(),
                generate_synthetic_records(args.days, args.initial_price),
            ));
        }
        return (inputs, failures);
    }

    for path in &args.data_file {
        let symbol = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();

        match load_file(path) {
            Ok(records) => {
                info!(symbol = %symbol, rows = records.len(), path = ?path, "data loaded");
                inputs.push((symbol, records));
            }
            Err(e) => {
                warn!(symbol = %symbol, path = ?path, error = %e, "failed to load data");
                failures.push(Failure {
                    symbol,
                    error: e.to_string(),
                });
            }
        }
    }

    (inputs, failures)
}

fn run_analyze(
    params: AnalysisParameters,
    inputs: &[(String, Vec<RawRecord>)],
    mut failures: Vec<Failure>,
) -> AnalyzeReport {
    let engine = AnalysisEngine::new(params);

    let mut results = Vec::new();
    for (symbol, outcome) in engine.analyze_many(inputs) {
        match outcome {
            Ok(result) => results.push(result),
            Err(e) => failures.push(Failure {
                symbol,
                error: e.to_string(),
            }),
        }
    }

    let records = results.iter().map(|r| engine.to_record(r)).collect();
    let summary = SummaryCalculator::calculate(&results, engine.params().min_confidence);

    AnalyzeReport {
        results,
        records,
        failures,
        summary,
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

fn print_failures(failures: &[Failure]) {
    if failures.is_empty() {
        return;
    }
    println!();
    println!("  FAILURES");
    println!("----------------------------------------------------------------");
    for failure in failures {
        println!("  {:<10} {}", failure.symbol, failure.error);
    }
}

fn print_analyze_report(report: &AnalyzeReport, min_confidence: f64) {
    let summary = &report.summary;

    println!();
    println!("================================================================");
    println!("  TECHNICAL ANALYSIS REPORT");
    println!("================================================================");
    println!();
    println!("  Symbols Analysed: {:>8}", summary.total);
    println!(
        "  Buy / Sell / Hold: {:>3} / {:>3} / {:>3}",
        summary.buy_count, summary.sell_count, summary.hold_count
    );
    println!(
        "  Bullish / Bearish / Range: {:>3} / {:>3} / {:>3}",
        summary.bullish_count, summary.bearish_count, summary.range_count
    );
    println!("  Avg Confidence:   {:>8.3}", summary.avg_confidence);
    println!(
        "  High Confidence:  {:>8.1}%",
        summary.high_confidence_ratio * 100.0
    );
    println!("  Risk Level:       {:>8}", summary.risk_level);
    println!();
    println!("----------------------------------------------------------------");
    println!("  RESULTS");
    println!("----------------------------------------------------------------");
    for result in &report.results {
        let ind = &result.indicators;
        println!(
            "  {:<10} {:>10.2} | {:<7} {:<4} | conf {:.2} | RSI {:>6.2} | MACD {:>+8.4}",
            result.symbol,
            result.current_price,
            result.trend,
            result.suggestion,
            result.confidence,
            ind.rsi,
            ind.macd
        );
    }

    for suggestion in [Suggestion::Buy, Suggestion::Sell] {
        let picks = filter_suggestions(&report.results, suggestion, min_confidence);
        if picks.is_empty() {
            continue;
        }
        println!();
        println!(
            "  {} (confidence >= {:.2})",
            suggestion.as_str().to_uppercase(),
            min_confidence
        );
        println!("----------------------------------------------------------------");
        for result in picks {
            println!("  {:<10} conf {:.2}", result.symbol, result.confidence);
        }
    }

    print_failures(&report.failures);
    println!();
    println!("================================================================");
}

fn print_index_report(report: &IndexReport) {
    println!();
    println!("================================================================");
    println!("  INDICATOR TABLE ({} records)", report.records.len());
    println!("================================================================");
    for record in &report.records {
        println!(
            "  {:<10} {} {:<12} {:>14.4}",
            record.symbol,
            record.index_date.format("%Y-%m-%d"),
            record.index_name,
            record.index_value
        );
    }
    print_failures(&report.failures);
    println!();
}
