//! Subcommand definitions and dispatch.

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use clearlane_core::audit::{AuditAction, AuditTable};
use clearlane_core::estimate::{EstimateQuery, RunningCostInput, RunningCostSchedule};
use clearlane_core::ledger::{CreateFinancialsInput, RecordPaymentInput, UpdateFinancialsInput};
use clearlane_core::vehicle::{CreateVehicleInput, VehicleFilter, VehicleStatus};
use clearlane_db::{
    AuditLogFilter, AuditLogRepository, EstimateRepository, FinancialsRepository,
    RepositoryError, VehicleRepository,
};
use clearlane_shared::types::{SliceRequest, UserId, VehicleId};
use clearlane_shared::{AppConfig, AppError};

/// Result of a subcommand: a JSON payload or a domain error to report.
pub enum Outcome {
    /// Operation succeeded.
    Ok(Value),
    /// Operation was rejected by a business rule.
    Failed(AppError),
}

impl Outcome {
    fn value<T: Serialize>(value: &T) -> anyhow::Result<Self> {
        Ok(Self::Ok(serde_json::to_value(value)?))
    }

    /// Splits repository errors into reportable rejections and hard failures.
    fn settle<T: Serialize>(result: Result<T, RepositoryError>) -> anyhow::Result<Self> {
        match result {
            Ok(value) => Self::value(&value),
            Err(RepositoryError::Ledger(err)) => Ok(Self::Failed(err.into())),
            Err(RepositoryError::Database(err)) => Err(err.into()),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "clearlane", version, about = "Vehicle clearing ledger and cost estimator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate the clearing cost of a vehicle from historical records.
    Estimate {
        #[arg(long)]
        make: String,
        #[arg(long)]
        model: String,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        terminal: Option<String>,
        /// Current customs exchange rate; overrides the configured one.
        #[arg(long)]
        rate: Option<Decimal>,
    },
    /// Compute a running-cost total from the configured charges.
    RunningCost {
        #[arg(long)]
        vehicle_cost: Decimal,
        #[arg(long)]
        shipping_fees: Decimal,
        #[arg(long)]
        customs_duty: Decimal,
        #[arg(long)]
        terminal: String,
    },
    /// Vehicle registration, lookup, and status.
    #[command(subcommand)]
    Vehicle(VehicleCommand),
    /// Financial records of vehicles.
    #[command(subcommand)]
    Financials(FinancialsCommand),
    /// Payments against a financial record.
    #[command(subcommand)]
    Payment(PaymentCommand),
    /// List audit entries, newest first.
    Audit(AuditArgs),
}

#[derive(Debug, Subcommand)]
pub enum VehicleCommand {
    /// Register a vehicle.
    Register {
        #[arg(long)]
        vin: String,
        #[arg(long)]
        make: String,
        #[arg(long)]
        model: String,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        terminal: Option<String>,
        #[arg(long)]
        owner: Option<UserId>,
        #[command(flatten)]
        actor: ActorArgs,
    },
    /// Show a vehicle.
    Show { vehicle_id: VehicleId },
    /// Move a vehicle to another pipeline status.
    Status {
        vehicle_id: VehicleId,
        /// One of "In Transit", "Clearing", "Done".
        status: VehicleStatus,
        #[command(flatten)]
        actor: ActorArgs,
    },
    /// List vehicles, newest first.
    List {
        /// Case-insensitive match on VIN or make.
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<VehicleStatus>,
        #[arg(long)]
        owner: Option<UserId>,
        #[command(flatten)]
        slice: SliceArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum FinancialsCommand {
    /// Create the financial record of a vehicle.
    Create {
        vehicle_id: VehicleId,
        #[arg(long)]
        total_cost: Decimal,
        #[arg(long)]
        rate: Option<Decimal>,
        #[command(flatten)]
        actor: ActorArgs,
    },
    /// Change the total cost or exchange rate of a record.
    Update {
        vehicle_id: VehicleId,
        #[arg(long)]
        total_cost: Option<Decimal>,
        #[arg(long, conflicts_with = "clear_rate")]
        rate: Option<Decimal>,
        /// Remove the stored exchange rate.
        #[arg(long)]
        clear_rate: bool,
        #[command(flatten)]
        actor: ActorArgs,
    },
    /// Show a vehicle's record with its balance.
    Show { vehicle_id: VehicleId },
    /// List records.
    List {
        #[arg(long)]
        vehicle: Option<VehicleId>,
        #[command(flatten)]
        slice: SliceArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum PaymentCommand {
    /// Record a payment; negative amounts are refunds.
    Record {
        vehicle_id: VehicleId,
        #[arg(long, allow_negative_numbers = true)]
        amount: Decimal,
        /// RFC 3339 payment time; defaults to now.
        #[arg(long)]
        date: Option<DateTime<Utc>>,
        #[arg(long)]
        reference: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[command(flatten)]
        actor: ActorArgs,
    },
    /// List a vehicle's payments, newest first.
    List {
        vehicle_id: VehicleId,
        #[command(flatten)]
        slice: SliceArgs,
    },
}

#[derive(Debug, Args)]
pub struct ActorArgs {
    /// Acting user recorded in the audit log.
    #[arg(long = "as", env = "CLEARLANE_ACTOR")]
    actor: Option<UserId>,
}

#[derive(Debug, Args)]
pub struct SliceArgs {
    /// Rows to skip.
    #[arg(long, default_value_t = 0)]
    skip: u64,
    /// Rows to return; values above 1000 return 1000.
    #[arg(long, default_value_t = 100)]
    limit: u64,
}

impl From<&SliceArgs> for SliceRequest {
    fn from(args: &SliceArgs) -> Self {
        Self::new(args.skip, args.limit)
    }
}

#[derive(Debug, Args)]
pub struct AuditArgs {
    #[arg(long)]
    user: Option<UserId>,
    #[arg(long)]
    action: Option<AuditAction>,
    #[arg(long)]
    table: Option<AuditTable>,
    #[arg(long)]
    record: Option<Uuid>,
    #[arg(long)]
    from: Option<DateTime<Utc>>,
    #[arg(long)]
    to: Option<DateTime<Utc>>,
    #[command(flatten)]
    slice: SliceArgs,
}

impl Command {
    /// Returns false for commands computed from configuration alone.
    pub const fn needs_database(&self) -> bool {
        !matches!(self, Self::RunningCost { .. })
    }

    /// Runs the command.
    pub async fn run(
        self,
        config: &AppConfig,
        db: Option<DatabaseConnection>,
    ) -> anyhow::Result<Outcome> {
        match self {
            Self::RunningCost {
                vehicle_cost,
                shipping_fees,
                customs_duty,
                terminal,
            } => {
                let schedule = RunningCostSchedule::from(&config.running_cost);
                let input = RunningCostInput {
                    vehicle_cost,
                    shipping_fees,
                    customs_duty,
                    terminal,
                };
                match schedule.calculate(&input) {
                    Ok(result) => Outcome::value(&result),
                    Err(err) => Ok(Outcome::Failed(err.into())),
                }
            }
            Self::Estimate {
                make,
                model,
                year,
                terminal,
                rate,
            } => {
                let mut query = EstimateQuery::new(make, model, year);
                if let Some(terminal) = terminal {
                    query = query.with_terminal(terminal);
                }
                let current_rate = rate
                    .filter(|r| *r > Decimal::ZERO)
                    .or_else(|| config.estimator.current_rate());

                let repo = EstimateRepository::new(connection(db)?);
                match repo.estimate(&query, current_rate).await? {
                    Some(result) => Outcome::value(&result),
                    None => Ok(Outcome::Failed(AppError::NotFound(
                        "No historical data found for this vehicle".into(),
                    ))),
                }
            }
            Self::Vehicle(command) => run_vehicle(command, connection(db)?).await,
            Self::Financials(command) => run_financials(command, connection(db)?).await,
            Self::Payment(command) => run_payment(command, connection(db)?).await,
            Self::Audit(args) => {
                let filter = AuditLogFilter {
                    user_id: args.user,
                    action: args.action,
                    table: args.table,
                    record_id: args.record,
                    from: args.from,
                    to: args.to,
                };
                let entries = AuditLogRepository::new(connection(db)?)
                    .list(&filter, SliceRequest::from(&args.slice))
                    .await?;
                Outcome::value(&entries)
            }
        }
    }
}

fn connection(db: Option<DatabaseConnection>) -> anyhow::Result<DatabaseConnection> {
    db.context("this command needs a database connection")
}

async fn run_vehicle(command: VehicleCommand, db: DatabaseConnection) -> anyhow::Result<Outcome> {
    let repo = VehicleRepository::new(db);
    match command {
        VehicleCommand::Register {
            vin,
            make,
            model,
            year,
            terminal,
            owner,
            actor,
        } => {
            let input = CreateVehicleInput {
                vin,
                make,
                model,
                year,
                terminal,
                owner_id: owner,
            };
            Outcome::settle(repo.create(input, actor.actor).await)
        }
        VehicleCommand::Show { vehicle_id } => Outcome::settle(repo.get(vehicle_id).await),
        VehicleCommand::Status {
            vehicle_id,
            status,
            actor,
        } => Outcome::settle(repo.update_status(vehicle_id, status, actor.actor).await),
        VehicleCommand::List {
            search,
            status,
            owner,
            slice,
        } => {
            let filter = VehicleFilter {
                search,
                status,
                owner_id: owner,
            };
            Outcome::settle(repo.list(&filter, SliceRequest::from(&slice)).await)
        }
    }
}

async fn run_financials(
    command: FinancialsCommand,
    db: DatabaseConnection,
) -> anyhow::Result<Outcome> {
    let repo = FinancialsRepository::new(db);
    match command {
        FinancialsCommand::Create {
            vehicle_id,
            total_cost,
            rate,
            actor,
        } => {
            let input = CreateFinancialsInput {
                total_cost,
                exchange_rate_at_clearing: rate,
            };
            Outcome::settle(repo.create(vehicle_id, input, actor.actor).await)
        }
        FinancialsCommand::Update {
            vehicle_id,
            total_cost,
            rate,
            clear_rate,
            actor,
        } => {
            let exchange_rate_at_clearing = if clear_rate { Some(None) } else { rate.map(Some) };
            let input = UpdateFinancialsInput {
                total_cost,
                exchange_rate_at_clearing,
            };
            Outcome::settle(repo.update(vehicle_id, input, actor.actor).await)
        }
        FinancialsCommand::Show { vehicle_id } => {
            Outcome::settle(repo.get_summary(vehicle_id).await)
        }
        FinancialsCommand::List { vehicle, slice } => {
            Outcome::settle(repo.list(vehicle, SliceRequest::from(&slice)).await)
        }
    }
}

async fn run_payment(command: PaymentCommand, db: DatabaseConnection) -> anyhow::Result<Outcome> {
    let repo = FinancialsRepository::new(db);
    match command {
        PaymentCommand::Record {
            vehicle_id,
            amount,
            date,
            reference,
            notes,
            actor,
        } => {
            let input = RecordPaymentInput {
                amount,
                payment_date: date,
                reference,
                notes,
            };
            Outcome::settle(repo.record_payment(vehicle_id, input, actor.actor).await)
        }
        PaymentCommand::List { vehicle_id, slice } => {
            Outcome::settle(repo.list_payments(vehicle_id, SliceRequest::from(&slice)).await)
        }
    }
}
