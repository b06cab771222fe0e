//! localmart mock API server
//!
//! Serves the deterministic demo dataset over HTTP, or writes it to stdout
//! with the `generate` subcommand.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use localmart::api::{build_config, AppState, CliArgs, Server, ServerConfig};
use localmart::catalog::CatalogRegistry;
use localmart::context::{DeterministicDate, GenerationContext};
use localmart::generator::generate_profile;
use localmart::serialization::{DatasetSerializer, JsonSerializer, NdjsonSerializer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "localmart-api")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Configuration file path (TOML format)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Host address to bind to
    #[arg(long, global = true)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, global = true)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Dataset seed
    #[arg(long, global = true)]
    seed: Option<u32>,

    /// Catalog profile (client, server)
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Reference date for listing dates, YYYY-MM-DD
    #[arg(long, global = true)]
    today: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the API (default)
    Serve,
    /// Write the generated dataset to stdout
    Generate {
        #[arg(long, value_enum, default_value_t = Format::Ndjson)]
        format: Format,
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Json,
    Ndjson,
}

impl From<&Args> for CliArgs {
    fn from(args: &Args) -> Self {
        CliArgs {
            config_file: args.config.clone(),
            host: args.host.clone(),
            port: args.port,
            log_level: args.log_level.clone(),
            seed: args.seed,
            profile: args.profile.clone(),
            today: args.today,
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = build_config(&CliArgs::from(&args)).context("Failed to load configuration")?;
    init_tracing(config.log_level.as_filter_str());

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Generate { format, pretty } => write_dataset(&config, format, pretty),
    }
}

async fn serve(config: ServerConfig) -> Result<()> {
    tracing::info!("localmart API v{}", localmart::VERSION);
    tracing::info!(
        host = %config.host,
        port = config.port,
        seed = config.seed,
        profile = %config.profile,
        log_level = %config.log_level,
        "Server configuration loaded"
    );

    let state = AppState::from_config(config, DeterministicDate::utc_today().today())
        .context("Failed to build dataset")?;
    tracing::info!(
        listings = state.dataset.listings.len(),
        fingerprint = %state.dataset.fingerprint,
        today = %state.today(),
        "Dataset generated"
    );

    Server::new(state).run().await
}

fn write_dataset(config: &ServerConfig, format: Format, pretty: bool) -> Result<()> {
    let registry = CatalogRegistry::with_builtin();
    let profile = registry.require(&config.profile)?;
    let today = config
        .today
        .unwrap_or_else(|| DeterministicDate::utc_today().today());
    let listings = generate_profile(profile, &GenerationContext::new(config.seed, today));

    let bytes = match format {
        Format::Json if pretty => JsonSerializer::new_pretty().serialize(&listings)?,
        Format::Json => JsonSerializer::new().serialize(&listings)?,
        Format::Ndjson => NdjsonSerializer::new().serialize(&listings)?,
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&bytes).context("Failed to write dataset")?;
    stdout.flush().context("Failed to flush stdout")?;
    tracing::info!(count = listings.len(), seed = config.seed, "Dataset written");
    Ok(())
}
