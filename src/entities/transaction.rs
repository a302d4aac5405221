use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction family discriminator for the polymorphic header table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum TransactionKind {
    #[sea_orm(string_value = "Sale")]
    Sale,
    #[sea_orm(string_value = "SaleReturn")]
    SaleReturn,
    #[sea_orm(string_value = "Purchase")]
    Purchase,
    #[sea_orm(string_value = "PurchaseReturn")]
    PurchaseReturn,
    #[sea_orm(string_value = "Order")]
    Order,
}

impl TransactionKind {
    /// Short prefix used when generating transaction numbers.
    pub fn number_prefix(&self) -> &'static str {
        match self {
            TransactionKind::Sale => "SL",
            TransactionKind::SaleReturn => "SR",
            TransactionKind::Purchase => "PU",
            TransactionKind::PurchaseReturn => "PR",
            TransactionKind::Order => "OR",
        }
    }
}

/// Transaction header shared by all families.
///
/// `status == false` marks a soft-deleted header; its line items survive as
/// the historical record. `order_id` is set on a Sale that fulfils an Order;
/// `fulfilled_by_id` is the back-pointer on the Order row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub kind: TransactionKind,
    /// Immutable once assigned; unique within (kind, financial year, location).
    pub transaction_no: String,
    pub transaction_date: DateTime<Utc>,
    pub location_id: i64,
    pub company_id: i64,
    pub financial_year_id: i64,
    pub party_ledger_id: Option<i64>,
    pub order_id: Option<i64>,
    pub fulfilled_by_id: Option<i64>,
    pub base_total: Decimal,
    pub discount_total: Decimal,
    pub tax_total: Decimal,
    pub total_amount: Decimal,
    pub cash_amount: Decimal,
    pub card_amount: Decimal,
    pub upi_amount: Decimal,
    pub status: bool,
    pub created_by: Option<String>,
    pub last_modified_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transaction_line::Entity")]
    TransactionLine,
}

impl Related<super::transaction_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionLine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The portion of the total settled on the party's account rather than
    /// through a tender (cash/card/UPI).
    pub fn credit_amount(&self) -> Decimal {
        self.total_amount - self.cash_amount - self.card_amount - self.upi_amount
    }

    /// Tendered portion settled immediately at the till.
    pub fn tendered_amount(&self) -> Decimal {
        self.cash_amount + self.card_amount + self.upi_amount
    }
}
