//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::open_record_source;
use crate::domain::alias::{resolve, Metric};
use crate::domain::config_validation::validate_config;
use crate::domain::error::ScreenerError;
use crate::domain::filter::{
    filter_by_conditions, screen, DefensiveScreen, GrowthScreen, ThresholdPredicate, Thresholds,
    DEFAULT_LIMIT,
};
use crate::domain::query::{self, DEFAULT_PAGE_SIZE};
use crate::domain::store::RecordStore;
use crate::ports::config_port::ConfigPort;
use crate::ports::record_source::{RecordSource, SourceFormat};

pub const DEFAULT_LISTEN: &str = "127.0.0.1:8000";
const LOG_ENV: &str = "STOCKSCREEN_LOG";

#[derive(Parser, Debug)]
#[command(name = "stockscreen", about = "Screen stock metric records with filter conditions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Where records come from. `--data` overrides `[data] path` in the config.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(short, long)]
    pub data: Option<PathBuf>,
    /// json or csv; inferred from the file extension when omitted
    #[arg(long)]
    pub format: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Growth,
    Defensive,
}

/// Overrides for preset defaults. Each applies only to the preset that uses it.
#[derive(Args, Debug, Clone, Copy, Default, PartialEq)]
pub struct PresetOverrides {
    /// growth: CAGR must exceed this
    #[arg(long, allow_negative_numbers = true)]
    pub cagr_min: Option<f64>,
    /// growth: ROE must exceed this
    #[arg(long, allow_negative_numbers = true)]
    pub roe_min: Option<f64>,
    /// defensive: Sharpe ratio must exceed this
    #[arg(long, allow_negative_numbers = true)]
    pub sharpe_min: Option<f64>,
    /// defensive: volatility must stay below this
    #[arg(long, allow_negative_numbers = true)]
    pub volatility_max: Option<f64>,
    /// defensive: dividend yield must exceed this
    #[arg(long, allow_negative_numbers = true)]
    pub dividend_min: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Select records matching every condition, e.g. --where "CAGR > 15"
    Query {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(short = 'w', long = "where")]
        conditions: Vec<String>,
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,
    },
    /// Select records within metric bounds
    Screen {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, allow_negative_numbers = true)]
        cagr_min: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        roe_min: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        roi_min: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        sharpe_min: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        volatility_max: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        dividend_min: Option<f64>,
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,
    },
    /// Run a named screen, optionally overriding its default bounds
    Preset {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(value_enum)]
        preset: Preset,
        #[command(flatten)]
        overrides: PresetOverrides,
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,
    },
    /// Show one symbol, or one of its canonical metrics
    Show {
        #[command(flatten)]
        source: SourceArgs,
        symbol: String,
        #[arg(short, long)]
        metric: Option<String>,
    },
    /// List records in an industry
    Industry {
        #[command(flatten)]
        source: SourceArgs,
        industry: String,
        #[arg(long, default_value_t = 0)]
        skip: usize,
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,
    },
    /// List records in load order
    List {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value_t = 0)]
        skip: usize,
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,
    },
    /// Validate a configuration file and its data source
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_path: PathBuf,
    pub format: Option<SourceFormat>,
    pub default_limit: i64,
    pub page_size: i64,
    pub listen: SocketAddr,
    pub allow_reload: bool,
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging();

    let result = match cli.command {
        Command::Query {
            source,
            conditions,
            limit,
        } => run_query(&source, &conditions, limit),
        Command::Screen {
            source,
            cagr_min,
            roe_min,
            roi_min,
            sharpe_min,
            volatility_max,
            dividend_min,
            limit,
        } => {
            let thresholds = Thresholds {
                cagr_min,
                roe_min,
                roi_min,
                sharpe_min,
                volatility_max,
                dividend_min,
            };
            run_screen(&source, &thresholds, limit)
        }
        Command::Preset {
            source,
            preset,
            overrides,
            limit,
        } => run_preset(&source, &preset_predicates(preset, &overrides), limit),
        Command::Show {
            source,
            symbol,
            metric,
        } => run_show(&source, &symbol, metric.as_deref()),
        Command::Industry {
            source,
            industry,
            skip,
            limit,
        } => run_industry(&source, &industry, skip, limit),
        Command::List {
            source,
            skip,
            limit,
        } => run_list(&source, skip, limit),
        Command::Validate { config } => run_validate(&config),
        Command::Serve { config } => run_serve(&config),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn init_logging() {
    let filter = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());

    // A subscriber may already be installed when `run` is called more than once.
    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .with_env_filter(EnvFilter::new(filter))
        .try_init();
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ScreenerError> {
    tracing::debug!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path).map_err(|e| ScreenerError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn parse_format(raw: &str) -> Result<SourceFormat, ScreenerError> {
    SourceFormat::parse(raw).ok_or_else(|| ScreenerError::ConfigInvalid {
        section: "data".into(),
        key: "format".into(),
        reason: format!("unknown format '{}' (expected json or csv)", raw),
    })
}

pub fn build_settings(config: &dyn ConfigPort) -> Result<Settings, ScreenerError> {
    validate_config(config)?;

    let data_path = config
        .get_string("data", "path")
        .map(PathBuf::from)
        .ok_or_else(|| ScreenerError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;
    let format = config
        .get_string("data", "format")
        .as_deref()
        .map(parse_format)
        .transpose()?;
    let listen = config
        .get_string("web", "listen")
        .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
    let listen = listen
        .trim()
        .parse()
        .map_err(|_| ScreenerError::ConfigInvalid {
            section: "web".into(),
            key: "listen".into(),
            reason: format!("'{}' is not a socket address", listen),
        })?;

    Ok(Settings {
        data_path,
        format,
        default_limit: config.get_int("query", "default_limit", DEFAULT_LIMIT),
        page_size: config.get_int("query", "page_size", DEFAULT_PAGE_SIZE),
        listen,
        allow_reload: config.get_bool("web", "allow_reload", true),
    })
}

/// Merges config file settings with command-line overrides.
pub fn resolve_settings(args: &SourceArgs) -> Result<Settings, ScreenerError> {
    let mut settings = match (&args.config, &args.data) {
        (Some(config_path), _) => build_settings(&load_config(config_path)?)?,
        (None, Some(data)) => Settings {
            data_path: data.clone(),
            format: None,
            default_limit: DEFAULT_LIMIT,
            page_size: DEFAULT_PAGE_SIZE,
            listen: DEFAULT_LISTEN.parse().map_err(|_| ScreenerError::ConfigInvalid {
                section: "web".into(),
                key: "listen".into(),
                reason: "invalid default listen address".into(),
            })?,
            allow_reload: true,
        },
        (None, None) => {
            return Err(ScreenerError::ConfigMissing {
                section: "data".into(),
                key: "path".into(),
            });
        }
    };

    if let Some(data) = &args.data {
        settings.data_path = data.clone();
    }
    if let Some(format) = &args.format {
        settings.format = Some(parse_format(format)?);
    }
    Ok(settings)
}

fn open_store(
    settings: &Settings,
) -> Result<(Arc<RecordStore>, Arc<dyn RecordSource + Send + Sync>), ScreenerError> {
    let source: Arc<dyn RecordSource + Send + Sync> =
        Arc::from(open_record_source(settings.data_path.clone(), settings.format)?);
    let store = RecordStore::load(source.as_ref())?;
    Ok((Arc::new(store), source))
}

fn print_json<T: Serialize>(value: &T) -> Result<ExitCode, ScreenerError> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    println!("{json}");
    Ok(ExitCode::SUCCESS)
}

fn run_query(
    args: &SourceArgs,
    conditions: &[String],
    limit: Option<i64>,
) -> Result<ExitCode, ScreenerError> {
    let settings = resolve_settings(args)?;
    let (store, _) = open_store(&settings)?;
    let snapshot = store.snapshot();
    let matches = filter_by_conditions(
        &snapshot,
        conditions,
        limit.unwrap_or(settings.default_limit),
    );
    tracing::info!(conditions = conditions.len(), matched = matches.len(), "query complete");
    print_json(&matches)
}

fn run_screen(
    args: &SourceArgs,
    thresholds: &Thresholds,
    limit: Option<i64>,
) -> Result<ExitCode, ScreenerError> {
    let settings = resolve_settings(args)?;
    let (store, _) = open_store(&settings)?;
    let snapshot = store.snapshot();
    let matches = screen(
        &snapshot,
        &thresholds.predicates(),
        limit.unwrap_or(settings.default_limit),
    );
    print_json(&matches)
}

/// Preset bounds with any overrides applied. Overrides for the other preset
/// are ignored with a warning.
pub fn preset_predicates(preset: Preset, overrides: &PresetOverrides) -> Vec<ThresholdPredicate> {
    match preset {
        Preset::Growth => {
            if overrides.sharpe_min.is_some()
                || overrides.volatility_max.is_some()
                || overrides.dividend_min.is_some()
            {
                tracing::warn!("defensive bounds ignored for the growth preset");
            }
            let defaults = GrowthScreen::default();
            GrowthScreen {
                cagr_min: overrides.cagr_min.unwrap_or(defaults.cagr_min),
                roe_min: overrides.roe_min.unwrap_or(defaults.roe_min),
            }
            .predicates()
        }
        Preset::Defensive => {
            if overrides.cagr_min.is_some() || overrides.roe_min.is_some() {
                tracing::warn!("growth bounds ignored for the defensive preset");
            }
            let defaults = DefensiveScreen::default();
            DefensiveScreen {
                sharpe_min: overrides.sharpe_min.unwrap_or(defaults.sharpe_min),
                volatility_max: overrides.volatility_max.unwrap_or(defaults.volatility_max),
                dividend_min: overrides.dividend_min.unwrap_or(defaults.dividend_min),
            }
            .predicates()
        }
    }
}

fn run_preset(
    args: &SourceArgs,
    predicates: &[ThresholdPredicate],
    limit: Option<i64>,
) -> Result<ExitCode, ScreenerError> {
    let settings = resolve_settings(args)?;
    let (store, _) = open_store(&settings)?;
    let snapshot = store.snapshot();
    let matches = screen(&snapshot, predicates, limit.unwrap_or(settings.default_limit));
    print_json(&matches)
}

fn run_show(
    args: &SourceArgs,
    symbol: &str,
    metric: Option<&str>,
) -> Result<ExitCode, ScreenerError> {
    let settings = resolve_settings(args)?;
    let (store, _) = open_store(&settings)?;
    let snapshot = store.snapshot();
    let found = query::get(&snapshot, symbol)?;

    let Some(name) = metric else {
        return print_json(&found);
    };
    let Some(metric) = Metric::from_name(name) else {
        eprintln!("error: unknown metric '{name}'");
        return Ok(ExitCode::from(2));
    };
    print_json(&serde_json::json!({
        "symbol": found.symbol,
        "metric": metric.name(),
        "value": resolve(found.record, metric),
    }))
}

fn run_industry(
    args: &SourceArgs,
    industry: &str,
    skip: usize,
    limit: Option<i64>,
) -> Result<ExitCode, ScreenerError> {
    let settings = resolve_settings(args)?;
    let (store, _) = open_store(&settings)?;
    let snapshot = store.snapshot();
    let page = query::by_industry(
        &snapshot,
        industry,
        skip,
        limit.unwrap_or(settings.page_size),
    )?;
    print_json(&page)
}

fn run_list(args: &SourceArgs, skip: usize, limit: Option<i64>) -> Result<ExitCode, ScreenerError> {
    let settings = resolve_settings(args)?;
    let (store, _) = open_store(&settings)?;
    let snapshot = store.snapshot();
    print_json(&query::list(&snapshot, skip, limit.unwrap_or(settings.page_size)))
}

fn run_validate(config_path: &Path) -> Result<ExitCode, ScreenerError> {
    let settings = build_settings(&load_config(config_path)?)?;
    let (store, _) = open_store(&settings)?;
    println!(
        "Config OK: {} records from {}",
        store.snapshot().len(),
        settings.data_path.display()
    );
    Ok(ExitCode::SUCCESS)
}

fn run_serve(config_path: &Path) -> Result<ExitCode, ScreenerError> {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{build_router, AppState};

        let settings = build_settings(&load_config(config_path)?)?;
        let (store, source) = open_store(&settings)?;

        let mut state = AppState::new(store, source);
        state.default_limit = settings.default_limit;
        state.page_size = settings.page_size;
        state.allow_reload = settings.allow_reload;
        let router = build_router(state);

        tracing::info!(addr = %settings.listen, "starting web server");
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(settings.listen).await?;
            axum::serve(listener, router).await
        })?;

        return Ok(ExitCode::SUCCESS);
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        return Ok(ExitCode::from(1));
    }
}
