//! battmon CLI: battery telemetry ingestion into TimescaleDB.

use bm_config::Settings;
use bm_pipeline::{logging, run_ingestion, run_schema_setup, ExitCode};
use clap::{Parser, Subcommand};
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "battmon", version, about = "Battery telemetry ingestion for TimescaleDB")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one ingestion pass over all assets
    Ingest,

    /// Provision the store schema and refresh the daily SOC aggregate
    SetupSchema,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("battmon: {e}");
            std::process::exit(ExitCode::ConfigError.as_i32());
        }
    };
    logging::init_tracing(&settings.log_level);

    let code = match cli.command {
        Command::Ingest => ingest(&settings).await,
        Command::SetupSchema => setup_schema(&settings).await,
    };
    std::process::exit(code.as_i32());
}

async fn ingest(settings: &Settings) -> ExitCode {
    match run_ingestion(settings).await {
        Ok(report) if report.succeeded() => ExitCode::Success,
        Ok(_) => ExitCode::PartialFail,
        Err(e) => {
            error!(error = %e, code = e.code(), "ingestion run failed");
            ExitCode::from(&e)
        }
    }
}

async fn setup_schema(settings: &Settings) -> ExitCode {
    match run_schema_setup(settings).await {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            error!(error = %e, code = e.code(), "schema setup failed");
            ExitCode::from(&e)
        }
    }
}
