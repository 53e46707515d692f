//! Initial schema: vehicles, financials, payments and the audit trail.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vehicles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Vehicles::Vin).string_len(32).not_null().unique_key())
                    .col(ColumnDef::new(Vehicles::Make).string_len(100).not_null())
                    .col(ColumnDef::new(Vehicles::Model).string_len(100).not_null())
                    .col(ColumnDef::new(Vehicles::Year).integer().not_null())
                    .col(ColumnDef::new(Vehicles::Terminal).string_len(50).null())
                    .col(
                        ColumnDef::new(Vehicles::Status)
                            .string_len(20)
                            .not_null()
                            .default("In Transit"),
                    )
                    .col(ColumnDef::new(Vehicles::OwnerId).uuid().null())
                    .col(
                        ColumnDef::new(Vehicles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Vehicles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vehicles_make_model_year")
                    .table(Vehicles::Table)
                    .col(Vehicles::Make)
                    .col(Vehicles::Model)
                    .col(Vehicles::Year)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vehicles_year")
                    .table(Vehicles::Table)
                    .col(Vehicles::Year)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Financials::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Financials::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Financials::VehicleId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Financials::TotalCost)
                            .decimal_len(16, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Financials::AmountPaid)
                            .decimal_len(16, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Financials::ExchangeRateAtClearing)
                            .decimal_len(16, 6)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Financials::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Financials::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_financials_vehicle")
                            .from(Financials::Table, Financials::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Payments::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Payments::FinancialId).uuid().not_null())
                    .col(ColumnDef::new(Payments::Amount).decimal_len(16, 4).not_null())
                    .col(
                        ColumnDef::new(Payments::PaymentDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payments::Reference).string_len(100).null())
                    .col(ColumnDef::new(Payments::Notes).text().null())
                    .col(ColumnDef::new(Payments::RecordedById).uuid().null())
                    .col(
                        ColumnDef::new(Payments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_financials")
                            .from(Payments::Table, Payments::FinancialId)
                            .to(Financials::Table, Financials::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_financial_created")
                    .table(Payments::Table)
                    .col(Payments::FinancialId)
                    .col(Payments::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AuditLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AuditLogs::UserId).uuid().null())
                    .col(ColumnDef::new(AuditLogs::Action).string_len(20).not_null())
                    .col(ColumnDef::new(AuditLogs::TableName).string_len(50).not_null())
                    .col(ColumnDef::new(AuditLogs::RecordId).uuid().null())
                    .col(ColumnDef::new(AuditLogs::OldValue).text().null())
                    .col(ColumnDef::new(AuditLogs::NewValue).text().null())
                    .col(
                        ColumnDef::new(AuditLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_logs_created_at")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_logs_record")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::TableName)
                    .col(AuditLogs::RecordId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLogs::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Financials::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vehicles::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Vehicles {
    Table,
    Id,
    Vin,
    Make,
    Model,
    Year,
    Terminal,
    Status,
    OwnerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Financials {
    Table,
    Id,
    VehicleId,
    TotalCost,
    AmountPaid,
    ExchangeRateAtClearing,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    FinancialId,
    Amount,
    PaymentDate,
    Reference,
    Notes,
    RecordedById,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AuditLogs {
    Table,
    Id,
    UserId,
    Action,
    TableName,
    RecordId,
    OldValue,
    NewValue,
    CreatedAt,
}
