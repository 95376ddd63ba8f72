//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_graph_adapter::load_graph;
use crate::adapters::synthetic_data_adapter::SyntheticDataAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestParams};
use crate::domain::error::FlowtraderError;
use crate::domain::validation::validate;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

const DEFAULT_INITIAL_CAPITAL: f64 = 10_000.0;
const DEFAULT_COMMISSION: f64 = 0.0;

#[derive(Parser, Debug)]
#[command(name = "flowtrader", about = "Flow-graph strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over a strategy graph
    Backtest {
        /// Strategy graph JSON exported from the editor
        #[arg(short, long)]
        graph: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory of per-ticker CSV files; synthetic data when absent
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Seed for the synthetic data source
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        start_date: Option<NaiveDate>,
        #[arg(long)]
        end_date: Option<NaiveDate>,
        #[arg(long)]
        initial_capital: Option<f64>,
        #[arg(long)]
        commission: Option<f64>,
        /// Write a text report here
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the full result as JSON on stdout
        #[arg(long)]
        json: bool,
    },
    /// Validate a strategy graph without running it
    Validate {
        #[arg(short, long)]
        graph: PathBuf,
    },
}

/// Everything `backtest` takes from the command line, bundled so the
/// override precedence (flags over config over defaults) lives in one
/// place.
#[derive(Debug, Default, Clone)]
pub struct ParamOverrides {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub initial_capital: Option<f64>,
    pub commission: Option<f64>,
    pub seed: Option<u64>,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            graph,
            config,
            data_dir,
            seed,
            start_date,
            end_date,
            initial_capital,
            commission,
            output,
            json,
        } => {
            let overrides = ParamOverrides {
                start_date,
                end_date,
                initial_capital,
                commission,
                seed,
            };
            run_backtest(
                &graph,
                config.as_deref(),
                data_dir.as_deref(),
                &overrides,
                output.as_deref(),
                json,
            )
        }
        Command::Validate { graph } => run_validate(&graph),
    }
}

fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn run_backtest(
    graph_path: &Path,
    config_path: Option<&Path>,
    data_dir: Option<&Path>,
    overrides: &ParamOverrides,
    output_path: Option<&Path>,
    json: bool,
) -> ExitCode {
    // Stage 1: Load and validate the graph
    eprintln!("Loading graph from {}", graph_path.display());
    let graph = match load_graph(graph_path) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let report = validate(&graph);
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    if !report.is_valid() {
        for error in &report.errors {
            eprintln!("error: {error}");
        }
        return ExitCode::from(4);
    }

    // Stage 2: Load config, if any
    let config_adapter = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            match load_config(path) {
                Ok(a) => Some(a),
                Err(code) => return code,
            }
        }
        None => None,
    };
    let config = config_adapter.as_ref().map(|a| a as &dyn ConfigPort);

    // Stage 3: Build and validate run parameters
    let (params, seed) = match build_backtest_params(config, overrides) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Err(e) = validate_backtest_params(&params) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 4: Pick the data source
    let csv_port;
    let synthetic_port;
    let data_port: &dyn DataPort = match data_dir {
        Some(dir) => {
            eprintln!("Using CSV data from {}", dir.display());
            csv_port = CsvAdapter::new(dir);
            &csv_port
        }
        None => {
            synthetic_port = match seed {
                Some(s) => {
                    eprintln!("Using synthetic data, seed {s}");
                    SyntheticDataAdapter::with_seed(s)
                }
                None => {
                    eprintln!("Using synthetic data");
                    SyntheticDataAdapter::new()
                }
            };
            &synthetic_port
        }
    };

    // Stage 5: Run
    eprintln!(
        "Running backtest: {} to {}",
        params.start_date, params.end_date
    );
    let result = backtest_engine::run_backtest(&graph, &params, data_port);

    if !result.success {
        for error in &result.errors {
            eprintln!("error: {error}");
        }
        if result
            .errors
            .iter()
            .any(|e| e.contains("no historical data for any requested ticker"))
        {
            return ExitCode::from(5);
        }
        return ExitCode::from(4);
    }
    for error in &result.errors {
        eprintln!("warning: {error}");
    }

    // Stage 6: Console summary to stderr
    let m = &result.metrics;
    eprintln!("\n=== Backtest Results ===");
    eprintln!("Total Return:     {:.2}%", m.total_return_pct);
    eprintln!("Annualized:       {:.2}%", m.annualized_return);
    eprintln!("Sharpe Ratio:     {:.2}", m.sharpe_ratio);
    eprintln!("Max Drawdown:     -{:.1}%", m.max_drawdown);
    eprintln!("Total Trades:     {}", m.number_of_trades);
    eprintln!("Win Rate:         {:.1}%", m.win_rate);
    eprintln!("Profit Factor:    {:.2}", m.profit_factor);

    // Stage 7: Outputs
    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(body) => println!("{body}"),
            Err(e) => {
                eprintln!("error: failed to serialize result: {e}");
                return ExitCode::from(1);
            }
        }
    }

    if let Some(path) = output_path {
        let title = graph_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Backtest".to_string());
        let reporter = TextReportAdapter::new();
        if let Err(e) = reporter.write(&result, &title, path) {
            eprintln!("error: failed to write report: {e}");
            return (&e).into();
        }
        eprintln!("\nReport written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_validate(graph_path: &Path) -> ExitCode {
    eprintln!("Loading graph from {}", graph_path.display());
    let graph = match load_graph(graph_path) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let report = validate(&graph);
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    if report.is_valid() {
        eprintln!("Graph validated successfully");
        ExitCode::SUCCESS
    } else {
        for error in &report.errors {
            eprintln!("error: {error}");
        }
        ExitCode::from(4)
    }
}

/// Merge run parameters: command-line overrides win over config values,
/// config over defaults. Start and end dates must come from one of the
/// two. Also resolves the synthetic data seed, which follows the same
/// precedence under `[data] seed`.
pub fn build_backtest_params(
    config: Option<&dyn ConfigPort>,
    overrides: &ParamOverrides,
) -> Result<(BacktestParams, Option<u64>), FlowtraderError> {
    let start_date = match overrides.start_date {
        Some(d) => d,
        None => config
            .map(|c| c.get_date("backtest", "start_date"))
            .transpose()?
            .flatten()
            .ok_or_else(|| FlowtraderError::ConfigMissing {
                section: "backtest".into(),
                key: "start_date".into(),
            })?,
    };
    let end_date = match overrides.end_date {
        Some(d) => d,
        None => config
            .map(|c| c.get_date("backtest", "end_date"))
            .transpose()?
            .flatten()
            .ok_or_else(|| FlowtraderError::ConfigMissing {
                section: "backtest".into(),
                key: "end_date".into(),
            })?,
    };

    let initial_capital = match overrides.initial_capital {
        Some(v) => v,
        None => config
            .map(|c| c.get_double("backtest", "initial_capital"))
            .transpose()?
            .flatten()
            .unwrap_or(DEFAULT_INITIAL_CAPITAL),
    };
    let commission_per_trade = match overrides.commission {
        Some(v) => v,
        None => config
            .map(|c| c.get_double("backtest", "commission"))
            .transpose()?
            .flatten()
            .unwrap_or(DEFAULT_COMMISSION),
    };
    let seed = match overrides.seed {
        Some(v) => Some(v),
        None => config
            .map(|c| c.get_int("data", "seed"))
            .transpose()?
            .flatten()
            .map(|v| v as u64),
    };

    Ok((
        BacktestParams {
            start_date,
            end_date,
            initial_capital,
            commission_per_trade,
        },
        seed,
    ))
}

pub fn validate_backtest_params(params: &BacktestParams) -> Result<(), FlowtraderError> {
    if params.initial_capital <= 0.0 {
        return Err(FlowtraderError::ConfigInvalid {
            section: "backtest".into(),
            key: "initial_capital".into(),
            reason: "must be positive".into(),
        });
    }
    if params.commission_per_trade < 0.0 {
        return Err(FlowtraderError::ConfigInvalid {
            section: "backtest".into(),
            key: "commission".into(),
            reason: "must not be negative".into(),
        });
    }
    if params.end_date < params.start_date {
        return Err(FlowtraderError::ConfigInvalid {
            section: "backtest".into(),
            key: "end_date".into(),
            reason: "must not precede start_date".into(),
        });
    }
    Ok(())
}
