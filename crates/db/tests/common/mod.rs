//! Shared setup for repository integration tests.
//!
//! Each test gets its own in-memory `SQLite` database with the migrations
//! applied. The pool holds exactly one connection so the database lives as
//! long as the pool.

#![allow(dead_code)]

use clearlane_core::vehicle::{CreateVehicleInput, VehicleView};
use clearlane_db::VehicleRepository;
use clearlane_db::migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

/// Connects to a fresh in-memory database and runs all migrations.
pub async fn setup() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to connect to in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Registers a vehicle with a random VIN.
pub async fn create_vehicle(
    db: &DatabaseConnection,
    make: &str,
    model: &str,
    year: i32,
    terminal: Option<&str>,
) -> VehicleView {
    let vin = Uuid::new_v4().simple().to_string()[..17].to_uppercase();
    VehicleRepository::new(db.clone())
        .create(
            CreateVehicleInput {
                vin,
                make: make.to_string(),
                model: model.to_string(),
                year,
                terminal: terminal.map(str::to_string),
                owner_id: None,
            },
            None,
        )
        .await
        .expect("Failed to create test vehicle")
}
