//! # `fishery`: Stream Fish Names to the User Interface
//!
//! Fetches the genera and species collections (remote service or local
//! cache), formats each name and pushes it through a UI channel.
//!
//! ## Usage
//!
//! ```text
//! fishery [OPTIONS]
//!
//!     --config-path <PATH>     JSON configuration file (camelCase keys)
//!     --base-url <URL>         Remote service base URL
//!     --data-dir <DIR>         Directory holding genera.json / species.json
//!     --local                  Read genera from the local cache
//!     --local-all              Read every stream from the local cache
//!     --streams <LIST>         Streams to run, in order [default: genera,species]
//!     --on-error <POLICY>      abort | skip [default: abort]
//!     --channel <CHANNEL>      console | log [default: console]
//!     --log-dir <DIR>          Also write logs to a rotating file in DIR
//!     --log-level <LEVEL>      trace | debug | info | warn | error [default: info]
//! ```
//!
//! Configuration precedence: defaults < config file < `FISHERY_*` environment
//! variables (a `.env` file is honoured) < command-line flags.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use lib_fishery::loggers::{setup_logging, LogOptions};
use lib_fishery::{
    Channel, ConfigLayer, ConsoleChannel, ErrorPolicy, FisheryConfig, LocalSource, LogChannel,
    Pipeline, StreamKind, StreamPlan,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OnError {
    Abort,
    Skip,
}

impl From<OnError> for ErrorPolicy {
    fn from(value: OnError) -> Self {
        match value {
            OnError::Abort => ErrorPolicy::Abort,
            OnError::Skip => ErrorPolicy::Skip,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ChannelArg {
    Console,
    Log,
}

#[derive(Parser, Debug, Clone)]
#[clap(about = "Streams genus and species names to the user interface", version)]
struct Cli {
    #[clap(long, env = "FISHERY_CONFIG_PATH", help = "Path to the JSON configuration file.")]
    config_path: Option<PathBuf>,

    #[clap(long, help = "Base URL of the remote fish service.")]
    base_url: Option<String>,

    #[clap(long, help = "Directory holding the cached {route}.json files.")]
    data_dir: Option<PathBuf>,

    #[clap(long, help = "Default message template with one {} placeholder.")]
    name_template: Option<String>,

    #[clap(long, help = "Attempts per remote request.")]
    max_attempts: Option<u32>,

    #[clap(long, help = "Read the genera stream from the local cache.")]
    local: bool,

    #[clap(long, help = "Read every stream from the local cache.")]
    local_all: bool,

    #[clap(long, value_delimiter = ',', default_value = "genera,species", help = "Streams to run, in order.")]
    streams: Vec<String>,

    #[clap(long, value_enum, default_value_t = OnError::Abort, help = "What to do when a stream fails.")]
    on_error: OnError,

    #[clap(long, value_enum, default_value_t = ChannelArg::Console, help = "Where notifications are delivered.")]
    channel: ChannelArg,

    #[clap(long, env = "FISHERY_LOG_DIR", help = "Directory for log files.")]
    log_dir: Option<PathBuf>,

    #[clap(long, env = "FISHERY_LOG_LEVEL", default_value = "info", help = "Logging level (trace, debug, info, warn, error).")]
    log_level: String,
}

impl Cli {
    fn overrides(&self) -> ConfigLayer {
        ConfigLayer {
            base_url: self.base_url.clone(),
            data_dir: self.data_dir.clone(),
            name_template: self.name_template.clone(),
            max_attempts: self.max_attempts,
            ..Default::default()
        }
    }
}

/// Merges config file, environment and CLI flags over the defaults.
fn load_config(cli: &Cli, env_layer: ConfigLayer) -> anyhow::Result<FisheryConfig> {
    let file_layer = match &cli.config_path {
        Some(path) => ConfigLayer::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ConfigLayer::default(),
    };

    let config = file_layer
        .merge(env_layer)
        .merge(cli.overrides())
        .resolve()
        .context("invalid configuration")?;
    Ok(config)
}

fn describe(kind: StreamKind) -> impl Fn(&str) -> String + 'static {
    let label = match kind {
        StreamKind::Genera => "genus",
        StreamKind::Species => "species",
    };
    move |name: &str| format!("This is the {} name: {}", label, name)
}

fn build_plans(cli: &Cli, config: &FisheryConfig) -> anyhow::Result<Vec<StreamPlan>> {
    let mut plans = Vec::with_capacity(cli.streams.len());
    for name in &cli.streams {
        let kind: StreamKind = name.parse()?;
        let mut plan = StreamPlan::new(kind).with_transform(describe(kind));
        if cli.local_all || (cli.local && kind == StreamKind::Genera) {
            plan = plan.with_source(LocalSource::new(config.data_dir.clone()));
        }
        plans.push(plan);
    }
    Ok(plans)
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_file = setup_logging(&LogOptions {
        app_name: "fishery".to_string(),
        log_dir: cli.log_dir.clone(),
        level: cli.log_level.clone(),
        use_tty: true,
    })?;
    if let Some(path) = &log_file {
        log::debug!("Logging to {}", path.display());
    }

    let config = load_config(&cli, ConfigLayer::from_env())?;
    log::debug!("{}", config);

    let plans = build_plans(&cli, &config)?;
    let channel: Box<dyn Channel> = match cli.channel {
        ChannelArg::Console => Box::new(ConsoleChannel),
        ChannelArg::Log => Box::new(LogChannel),
    };

    let summary = Pipeline::from_config(config, channel)
        .with_policy(cli.on_error.into())
        .run(plans)
        .context("fishery run aborted")?;

    for (kind, error) in &summary.skipped {
        log::warn!("Skipped {} stream: {}", kind, error);
    }
    log::info!(
        "Delivered {} notifications across {} streams",
        summary.total_delivered(),
        summary.delivered.len()
    );
    Ok(())
}
