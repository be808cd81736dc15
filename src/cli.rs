//! CLI definition and dispatch.
//!
//! Command output (results, previews, listings) is JSON on stdout or in the
//! `--output` file; progress and errors go through `tracing` to stderr.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_store::JsonStore;
use crate::domain::backtest::{run_backtest, BacktestConfig, BacktestResult};
use crate::domain::config_validation::{
    backtest_config_from_port, validate_backtest_config, validate_strategy_rules,
};
use crate::domain::enrich::indicators_for_rules;
use crate::domain::error::BacktestError;
use crate::domain::history::HistoryEntry;
use crate::domain::metrics::Stats;
use crate::domain::ohlcv::{preview, PricePoint};
use crate::domain::strategy::StrategyRules;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::store_port::{HistoryStore, StrategyStore};

/// Read from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "backtester.ini";

#[derive(Parser, Debug)]
#[command(name = "backtester", about = "Rule-driven strategy backtester")]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over a CSV file
    Backtest {
        #[arg(short, long)]
        data: String,
        #[arg(short, long)]
        rules: PathBuf,
        #[arg(long)]
        initial_balance: Option<f64>,
        #[arg(long)]
        commission: Option<f64>,
        /// Append the result to the run history
        #[arg(long)]
        save: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print timestamp and close for each bar
    Preview {
        #[arg(short, long)]
        data: String,
    },
    /// Check a rules file without running it
    Validate {
        #[arg(short, long)]
        rules: PathBuf,
    },
    /// Manage saved strategies
    Strategy {
        #[command(subcommand)]
        action: StrategyCommand,
    },
    /// Inspect saved backtest runs
    History {
        #[command(subcommand)]
        action: HistoryCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum StrategyCommand {
    /// Save a rules file under a name
    Save {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        rules: PathBuf,
    },
    /// List saved strategies
    List,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// Summarise every saved run
    List,
    /// Show the most recent run
    Latest,
    /// Show one run by id
    Show { id: String },
}

/// One line of `history list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub id: String,
    pub timestamp: i64,
    pub file_name: String,
    pub stats: Stats,
}

impl From<&HistoryEntry> for HistorySummary {
    fn from(entry: &HistoryEntry) -> Self {
        HistorySummary {
            id: entry.id.clone(),
            timestamp: entry.timestamp,
            file_name: entry.file_name.clone(),
            stats: entry.result.stats.clone(),
        }
    }
}

/// What `validate` reports for a rules file that passes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub entry: String,
    pub exit: String,
    pub fields: Vec<String>,
    pub indicators: Vec<String>,
}

pub fn run(cli: Cli) -> ExitCode {
    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

fn dispatch(cli: Cli) -> Result<(), BacktestError> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Backtest {
            data,
            rules,
            initial_balance,
            commission,
            save,
            output,
        } => {
            let rules = load_rules(&rules)?;
            let bt_config = build_backtest_config(&config, initial_balance, commission)?;
            let data_port = data_adapter(&config);
            let store = store_adapter(&config);
            let history: Option<&dyn HistoryStore> = if save { Some(&store) } else { None };

            let result = run_backtest_pipeline(&data_port, &data, &rules, &bt_config, history)?;
            write_json(&result, output.as_deref())
        }
        Command::Preview { data } => {
            let points = run_preview(&data_adapter(&config), &data)?;
            write_json(&points, None)
        }
        Command::Validate { rules } => {
            let report = validate_rules_file(&rules)?;
            write_json(&report, None)
        }
        Command::Strategy { action } => {
            let store = store_adapter(&config);
            match action {
                StrategyCommand::Save { name, rules } => {
                    let rules = load_rules(&rules)?;
                    validate_strategy_rules(&rules)?;
                    let stored = store.save_strategy(&name, &rules)?;
                    write_json(&stored, None)
                }
                StrategyCommand::List => write_json(&store.load_strategies()?, None),
            }
        }
        Command::History { action } => {
            let store = store_adapter(&config);
            match action {
                HistoryCommand::List => {
                    let summaries: Vec<HistorySummary> =
                        store.load_history()?.iter().map(HistorySummary::from).collect();
                    write_json(&summaries, None)
                }
                HistoryCommand::Latest => {
                    let latest = store.latest_history()?.ok_or_else(|| BacktestError::NotFound {
                        kind: "history entry".to_string(),
                        id: "latest".to_string(),
                    })?;
                    write_json(&latest, None)
                }
                HistoryCommand::Show { id } => write_json(&store.history_by_id(&id)?, None),
            }
        }
    }
}

/// Load the INI file named by `--config`, or [`DEFAULT_CONFIG_FILE`] when it
/// exists. With neither, every setting takes its default.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, BacktestError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            FileConfigAdapter::from_file(path)
        }
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            info!(path = DEFAULT_CONFIG_FILE, "loading config");
            FileConfigAdapter::from_file(DEFAULT_CONFIG_FILE)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

/// `[backtest]` settings with command-line overrides applied.
pub fn build_backtest_config(
    adapter: &dyn ConfigPort,
    initial_balance: Option<f64>,
    commission: Option<f64>,
) -> Result<BacktestConfig, BacktestError> {
    let mut config = backtest_config_from_port(adapter)?;
    if let Some(balance) = initial_balance {
        config.initial_balance = balance;
    }
    if let Some(rate) = commission {
        config.commission = rate;
    }
    validate_backtest_config(&config)?;
    Ok(config)
}

pub fn load_rules(path: &Path) -> Result<StrategyRules, BacktestError> {
    let text = fs::read_to_string(path)?;
    let rules: StrategyRules = serde_json::from_str(&text)?;
    Ok(rules)
}

pub fn data_adapter(config: &dyn ConfigPort) -> CsvAdapter {
    CsvAdapter::new(PathBuf::from(config.get_string_or("data", "base_path", ".")))
}

pub fn store_adapter(config: &dyn ConfigPort) -> JsonStore {
    JsonStore::new(PathBuf::from(config.get_string_or("storage", "dir", ".")))
}

/// Load bars, run the backtest, and optionally record it in `history`.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    source: &str,
    rules: &StrategyRules,
    config: &BacktestConfig,
    history: Option<&dyn HistoryStore>,
) -> Result<BacktestResult, BacktestError> {
    validate_strategy_rules(rules)?;

    info!(source, "loading bars");
    let bars = data_port.fetch_bars(source)?;
    if bars.is_empty() {
        return Err(BacktestError::NoData {
            source_name: source.to_string(),
        });
    }

    info!(
        bars = bars.len(),
        initial_balance = config.initial_balance,
        commission = config.commission,
        "running backtest"
    );
    let result = run_backtest(&bars, rules, config);

    info!(
        "final balance {:.2}, profit {:.2}, {} trades, win rate {:.1}%, max drawdown {:.1}%",
        result.stats.final_balance,
        result.stats.total_profit,
        result.stats.total_trades,
        result.stats.win_rate * 100.0,
        result.stats.max_drawdown * 100.0,
    );
    if result.open_trade.is_some() {
        warn!("position still open at end of data; marked to market");
    }

    if let Some(store) = history {
        let entry = store.save_simulation(&result, rules, config.initial_balance, source)?;
        info!(id = %entry.id, "saved to history");
    }

    Ok(result)
}

pub fn run_preview(data_port: &dyn DataPort, source: &str) -> Result<Vec<PricePoint>, BacktestError> {
    let bars = data_port.fetch_bars(source)?;
    Ok(preview(&bars))
}

pub fn validate_rules_file(path: &Path) -> Result<ValidationReport, BacktestError> {
    info!(path = %path.display(), "validating rules");
    let rules = load_rules(path)?;
    validate_strategy_rules(&rules)?;

    Ok(ValidationReport {
        entry: rules.entry.to_string(),
        exit: rules.exit.to_string(),
        fields: rules.field_names().into_iter().collect(),
        indicators: indicators_for_rules(&rules)
            .iter()
            .map(ToString::to_string)
            .collect(),
    })
}

/// Pretty JSON to `output`, or stdout when `None`.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<(), BacktestError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| BacktestError::Storage {
        reason: format!("failed to serialize output: {e}"),
    })?;

    match output {
        Some(path) => {
            fs::write(path, text)?;
            info!(path = %path.display(), "output written");
        }
        None => println!("{text}"),
    }
    Ok(())
}
