use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account/counterparty master. A party ledger that carries its own
/// `location_id` is itself a stock-holding location; settling against it
/// posts mirrored stock movements there (inter-location transfer through
/// the counterparty relationship).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ledgers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub location_id: Option<i64>,
    pub status: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
