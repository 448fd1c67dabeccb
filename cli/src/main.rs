//! vdao: command line entry point for the treasury governance engine.

mod config;
mod scenario;

use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;

use config::DaoConfig;
use vdao_utils::{format_duration, init_logging};

#[derive(Parser)]
#[command(name = "vdao", about = "Treasury governance engine with veto and weighted voting")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, global = true, env = "VDAO_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "VDAO_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "VDAO_LOG_FORMAT")]
    log_format: Option<String>,

    /// Voting window length in seconds.
    #[arg(long, global = true, env = "VDAO_VOTING_WINDOW_SECS")]
    voting_window_secs: Option<u64>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Replay a JSON scenario and print the outcome as JSON.
    Run {
        /// Scenario file: `{ "steps": [ { "step": "fund", ... }, ... ] }`.
        #[arg(long)]
        scenario: PathBuf,

        /// Exit with an error if any step was rejected.
        #[arg(long)]
        strict: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn load_config(cli: &Cli) -> anyhow::Result<DaoConfig> {
    let mut config = match &cli.config {
        Some(path) => DaoConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DaoConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    if let Some(window) = cli.voting_window_secs {
        config.params.voting_window_secs = window;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(config.log_format()?, &config.log_level);

    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    match cli.command {
        Command::Run { scenario, strict } => {
            let raw = std::fs::read_to_string(&scenario)
                .with_context(|| format!("reading scenario {}", scenario.display()))?;
            let parsed: scenario::Scenario = serde_json::from_str(&raw)
                .with_context(|| format!("parsing scenario {}", scenario.display()))?;

            tracing::info!(
                steps = parsed.steps.len(),
                window = %format_duration(config.params.voting_window_secs),
                quorum = %config.params.quorum,
                "replaying scenario"
            );
            let report = scenario::run(&parsed, &config).context("seeding treasury")?;
            println!("{}", serde_json::to_string_pretty(&report)?);

            let rejected = report.rejected();
            if rejected > 0 {
                tracing::warn!(rejected, "some steps were rejected");
                if strict {
                    bail!("{rejected} of {} steps rejected", report.outcomes.len());
                }
            }
        }
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}
