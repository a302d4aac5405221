use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
};
use tracing::{debug, instrument};

use crate::{
    entities::accounting::{self, Entity as AccountingEntity},
    entities::accounting_line,
    errors::ServiceError,
};

/// One debit or credit leg of a posting plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PostingLeg {
    pub ledger_id: i64,
    pub debit: Option<Decimal>,
    pub credit: Option<Decimal>,
}

impl PostingLeg {
    pub fn debit(ledger_id: i64, amount: Decimal) -> Self {
        Self {
            ledger_id,
            debit: Some(amount),
            credit: None,
        }
    }

    pub fn credit(ledger_id: i64, amount: Decimal) -> Self {
        Self {
            ledger_id,
            debit: None,
            credit: Some(amount),
        }
    }
}

/// A complete posting to persist: one header plus its balanced legs.
#[derive(Debug, Clone)]
pub struct PostingPlan {
    pub voucher_id: i64,
    pub reference_id: i64,
    pub reference_no: String,
    pub financial_year_id: i64,
    pub transaction_date: DateTime<Utc>,
    pub legs: Vec<PostingLeg>,
}

impl PostingPlan {
    pub fn debit_total(&self) -> Decimal {
        self.legs.iter().filter_map(|l| l.debit).sum()
    }

    pub fn credit_total(&self) -> Decimal {
        self.legs.iter().filter_map(|l| l.credit).sum()
    }

    pub fn is_balanced(&self) -> bool {
        self.debit_total() == self.credit_total()
    }
}

/// Persists balanced double-entry postings, one active header per
/// (voucher, reference). Edits supersede: the prior header is soft-deleted
/// before the replacement is written, never patched.
#[derive(Clone, Debug, Default)]
pub struct AccountingService;

impl AccountingService {
    pub fn new() -> Self {
        Self
    }

    /// Soft-deletes the active posting for (voucher, reference), if any.
    #[instrument(skip(self, db))]
    pub async fn supersede<C: ConnectionTrait>(
        &self,
        db: &C,
        voucher_id: i64,
        reference_id: i64,
    ) -> Result<u64, ServiceError> {
        let result = AccountingEntity::update_many()
            .col_expr(accounting::Column::Status, sea_orm::sea_query::Expr::value(false))
            .filter(accounting::Column::VoucherId.eq(voucher_id))
            .filter(accounting::Column::ReferenceId.eq(reference_id))
            .filter(accounting::Column::Status.eq(true))
            .exec(db)
            .await
            .map_err(ServiceError::db_error)?;

        debug!(
            rows = result.rows_affected,
            voucher_id, reference_id, "prior posting superseded"
        );
        Ok(result.rows_affected)
    }

    /// Persists a posting plan as one header plus line rows. Rejects
    /// unbalanced plans and legs carrying both or neither side.
    #[instrument(skip(self, db, plan), fields(voucher_id = plan.voucher_id, reference_id = plan.reference_id))]
    pub async fn post<C: ConnectionTrait>(
        &self,
        db: &C,
        plan: PostingPlan,
    ) -> Result<accounting::Model, ServiceError> {
        if plan.legs.is_empty() {
            return Err(ServiceError::InvalidOperation(
                "posting plan has no legs".to_string(),
            ));
        }
        for leg in &plan.legs {
            if leg.debit.is_some() == leg.credit.is_some() {
                return Err(ServiceError::InvalidOperation(format!(
                    "posting leg for ledger {} must carry exactly one of debit/credit",
                    leg.ledger_id
                )));
            }
        }
        if !plan.is_balanced() {
            return Err(ServiceError::InvalidOperation(format!(
                "posting for reference {} is unbalanced: debit {} != credit {}",
                plan.reference_no,
                plan.debit_total(),
                plan.credit_total()
            )));
        }

        let header = accounting::ActiveModel {
            id: Default::default(),
            voucher_id: Set(plan.voucher_id),
            reference_id: Set(plan.reference_id),
            reference_no: Set(plan.reference_no.clone()),
            financial_year_id: Set(plan.financial_year_id),
            transaction_date: Set(plan.transaction_date),
            status: Set(true),
            created_at: Set(Utc::now()),
        };
        let header = header.insert(db).await.map_err(ServiceError::db_error)?;

        for leg in plan.legs {
            let line = accounting_line::ActiveModel {
                id: Default::default(),
                accounting_id: Set(header.id),
                ledger_id: Set(leg.ledger_id),
                debit: Set(leg.debit),
                credit: Set(leg.credit),
            };
            line.insert(db).await.map_err(ServiceError::db_error)?;
        }

        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn plan_with(legs: Vec<PostingLeg>) -> PostingPlan {
        PostingPlan {
            voucher_id: 1,
            reference_id: 10,
            reference_no: "SL-1-1-00001".to_string(),
            financial_year_id: 1,
            transaction_date: Utc::now(),
            legs,
        }
    }

    #[test]
    fn balanced_plan_is_accepted() {
        let plan = plan_with(vec![
            PostingLeg::debit(1, dec!(224.2)),
            PostingLeg::credit(2, dec!(190)),
            PostingLeg::credit(4, dec!(34.2)),
        ]);
        assert!(plan.is_balanced());
        assert_eq!(plan.debit_total(), dec!(224.2));
        assert_eq!(plan.credit_total(), dec!(224.2));
    }

    #[test]
    fn unbalanced_plan_is_detected() {
        let plan = plan_with(vec![
            PostingLeg::debit(1, dec!(100)),
            PostingLeg::credit(2, dec!(90)),
        ]);
        assert!(!plan.is_balanced());
    }
}
