//! appdesc - build, validate and print the application descriptor
//!
//! Startup path:
//! - load `.env`, the settings file and the environment
//! - build the descriptor from the settings
//! - validate and fail fast on bad configuration

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, Registry};

use app_descriptor::{ApplicationDescriptor, Settings};

#[derive(Parser, Debug)]
#[command(name = "appdesc", version, about = "Build and print the application descriptor")]
struct Cli {
    /// Settings file (defaults to ~/.app-descriptor/settings.yaml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    format: OutputFormat,

    /// Print the API key instead of a mask
    #[arg(long)]
    reveal_key: bool,

    /// Print the descriptor even if validation fails
    #[arg(long)]
    skip_validation: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq)]
enum Command {
    /// Build, validate and print the descriptor
    Show,
    /// Print the effective settings
    Settings,
    /// Validate only
    Check,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let (_guard, log_level) = init_logging(cli.log_file.as_deref(), cli.verbose)?;

    match &dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(err) if is_missing_dotenv(err) => {}
        Err(err) => tracing::warn!(error = %err, "Failed to load .env, using process environment"),
    }

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    if settings.debug_mode() && !cli.verbose {
        log_level
            .modify(|filter| *filter = LevelFilter::DEBUG)
            .context("Failed to raise log level")?;
    }

    tracing::debug!(config = ?cli.config, "Settings loaded");
    if settings.dump_defaults() {
        tracing::info!(settings = %settings.dump(), "Effective settings");
    }

    match cli.command.unwrap_or(Command::Show) {
        Command::Settings => print_value(&settings.dump(), cli.format),
        Command::Check => {
            let descriptor = ApplicationDescriptor::from_settings(&settings);
            check(&settings, &descriptor)?;
            tracing::info!(app = descriptor.app_name(), "Configuration OK");
            Ok(())
        }
        Command::Show => {
            let descriptor = ApplicationDescriptor::from_settings(&settings);
            if !cli.skip_validation {
                check(&settings, &descriptor)?;
            }
            let value = descriptor
                .to_json_value(cli.reveal_key)
                .context("Failed to serialize descriptor")?;
            print_value(&value, cli.format)
        }
    }
}

/// Fail fast on the settings first so errors name the env var
fn check(settings: &Settings, descriptor: &ApplicationDescriptor) -> Result<()> {
    if let Err(err) = settings.validate().and_then(|_| descriptor.validate()) {
        tracing::warn!(field = ?err.field(), error = %err, "Invalid configuration");
        return Err(err).context("Configuration error");
    }
    Ok(())
}

fn print_value(value: &serde_json::Value, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", rendered.trim_end())?;
    Ok(())
}

/// A `.env` that does not exist is fine; anything else is worth reporting
fn is_missing_dotenv(err: &dotenvy::Error) -> bool {
    matches!(err, dotenvy::Error::Io(io_err) if io_err.kind() == io::ErrorKind::NotFound)
}

/// Install the subscriber before anything logs. The returned handle lets
/// `DEBUG_MODE` raise the level once settings are known.
fn init_logging(
    log_file: Option<&Path>,
    verbose: bool,
) -> Result<(Option<WorkerGuard>, reload::Handle<LevelFilter, Registry>)> {
    let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let (filter, handle) = reload::Layer::new(level);

    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Invalid log file path: {}", path.display()))?;

            let file_appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                .init();
            Ok((Some(guard), handle))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(io::stderr))
                .init();
            Ok((None, handle))
        }
    }
}
