use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One debit or credit leg of an accounting posting. Exactly one of
/// `debit`/`credit` is set per row; the header's legs sum to equal debit
/// and credit totals.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounting_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub accounting_id: i64,
    pub ledger_id: i64,
    pub debit: Option<Decimal>,
    pub credit: Option<Decimal>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounting::Entity",
        from = "Column::AccountingId",
        to = "super::accounting::Column::Id"
    )]
    Accounting,
}

impl Related<super::accounting::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounting.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Signed amount: positive for debit, negative for credit.
    pub fn signed_amount(&self) -> Decimal {
        self.debit.unwrap_or_default() - self.credit.unwrap_or_default()
    }
}
