use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Origin of a stock movement row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum MovementType {
    #[sea_orm(string_value = "Sale")]
    Sale,
    #[sea_orm(string_value = "SaleReturn")]
    SaleReturn,
    #[sea_orm(string_value = "Purchase")]
    Purchase,
    #[sea_orm(string_value = "PurchaseReturn")]
    PurchaseReturn,
    #[sea_orm(string_value = "KitchenProduction")]
    KitchenProduction,
    #[sea_orm(string_value = "KitchenIssue")]
    KitchenIssue,
    #[sea_orm(string_value = "Adjustment")]
    Adjustment,
}

/// Signed quantity ledger entry for one item at one location tied to one
/// transaction. Negative quantity is outflow, positive inflow. For any
/// (movement_type, transaction_id, location_id) key at most one generation
/// of rows is live; edits delete the prior generation before re-posting.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_movements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub item_id: i64,
    pub quantity: Decimal,
    pub movement_type: MovementType,
    pub transaction_id: i64,
    pub transaction_no: String,
    pub transaction_date: DateTime<Utc>,
    pub location_id: i64,
    pub net_rate: Option<Decimal>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
