use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Accounting posting header. One active header exists per
/// (voucher_id, reference_id); an edit soft-deletes the prior header and
/// posts a replacement.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounting")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub voucher_id: i64,
    /// Id of the originating settlement transaction.
    pub reference_id: i64,
    pub reference_no: String,
    pub financial_year_id: i64,
    pub transaction_date: DateTime<Utc>,
    pub status: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::accounting_line::Entity")]
    AccountingLine,
}

impl Related<super::accounting_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountingLine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
