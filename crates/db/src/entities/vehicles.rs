//! `SeaORM` Entity for vehicles table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub vin: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub terminal: Option<String>,
    pub status: String,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::financials::Entity")]
    Financials,
}

impl Related<super::financials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Financials.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
