//! Clearlane command-line front end.
//!
//! Each subcommand runs one ledger, estimator, or audit operation and prints
//! the result as JSON on stdout. Domain errors are printed as a JSON error
//! object on stderr with a non-zero exit status.

mod commands;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clearlane_db::connect;
use clearlane_shared::AppConfig;

use commands::{Cli, Outcome};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clearlane=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    let outcome = if cli.command.needs_database() {
        let db = connect(&config.database).await?;
        info!("Connected to database");
        cli.command.run(&config, Some(db)).await?
    } else {
        cli.command.run(&config, None).await?
    };

    match outcome {
        Outcome::Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Outcome::Failed(err) => {
            let body = serde_json::json!({
                "error": err.error_code(),
                "status": err.status_code(),
                "message": err.to_string(),
            });
            eprintln!("{}", serde_json::to_string_pretty(&body)?);
            std::process::exit(1);
        }
    }
}
