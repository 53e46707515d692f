//! `SeaORM` Entity for payments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub financial_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    pub payment_date: DateTimeWithTimeZone,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub recorded_by_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::financials::Entity",
        from = "Column::FinancialId",
        to = "super::financials::Column::Id",
        on_delete = "Cascade"
    )]
    Financials,
}

impl Related<super::financials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Financials.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
