//! `SeaORM` Entity for financials table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "financials")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub vehicle_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub total_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount_paid: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 6)))", nullable)]
    pub exchange_rate_at_clearing: Option<Decimal>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vehicles::Entity",
        from = "Column::VehicleId",
        to = "super::vehicles::Column::Id",
        on_delete = "Cascade"
    )]
    Vehicles,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::vehicles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicles.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
