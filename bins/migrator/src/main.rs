//! Database migration runner for Clearlane.
//!
//! Usage:
//!   migrator up [-n N]    - Run pending migrations
//!   migrator down [-n N]  - Roll back migrations (default: the last one)
//!   migrator status       - Show migration status
//!   migrator fresh        - Drop all tables and re-run migrations
//!
//! The database URL comes from the `database.url` setting
//! (`CLEARLANE__DATABASE__URL` in the environment).

use clap::{Parser, Subcommand};
use sea_orm_migration::MigratorTrait;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clearlane_db::{connect, migration::Migrator};
use clearlane_shared::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "migrator", about = "Clearlane database migrations")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending migrations.
    Up {
        /// Number of migrations to apply; all when omitted.
        #[arg(short = 'n', long)]
        num: Option<u32>,
    },
    /// Roll back applied migrations.
    Down {
        /// Number of migrations to roll back.
        #[arg(short = 'n', long, default_value_t = 1)]
        num: u32,
    },
    /// Show which migrations are applied.
    Status,
    /// Drop every table and apply all migrations.
    Fresh,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clearlane=info,sea_orm_migration=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    let db = connect(&config.database).await?;

    match cli.command {
        Command::Up { num } => {
            Migrator::up(&db, num).await?;
            info!("Migrations applied");
        }
        Command::Down { num } => {
            Migrator::down(&db, Some(num)).await?;
            info!(count = num, "Migrations rolled back");
        }
        Command::Status => Migrator::status(&db).await?,
        Command::Fresh => {
            Migrator::fresh(&db).await?;
            info!("Database recreated");
        }
    }

    Ok(())
}
