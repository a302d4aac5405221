use rust_decimal::Decimal;

use crate::{
    config::SettlementConfig,
    entities::{stock_movement::MovementType, transaction},
    entities::transaction::TransactionKind,
    errors::ServiceError,
    services::accounting::PostingLeg,
};

use super::{SettlementCore, TransactionFamily, TransactionInput, TransactionOverview};

/// Purchase return: goods go back to the supplier. Mirror of a Purchase:
/// stock outflow, postings swapped.
pub struct PurchaseReturnFamily;

impl TransactionFamily for PurchaseReturnFamily {
    const KIND: TransactionKind = TransactionKind::PurchaseReturn;
    const MOVEMENT: MovementType = MovementType::PurchaseReturn;

    fn stock_sign() -> Decimal {
        Decimal::NEGATIVE_ONE
    }

    fn voucher_id(config: &SettlementConfig) -> i64 {
        config.purchase_return_voucher_id
    }

    fn build_postings(
        overview: &TransactionOverview,
        config: &SettlementConfig,
    ) -> Vec<PostingLeg> {
        let mut legs = Vec::new();
        if overview.tendered_amount > Decimal::ZERO {
            legs.push(PostingLeg::debit(
                config.cash_ledger_id,
                overview.tendered_amount,
            ));
        }
        if overview.credit_amount > Decimal::ZERO {
            if let Some(party) = overview.party_ledger_id {
                legs.push(PostingLeg::debit(party, overview.credit_amount));
            }
        }
        if overview.taxable_amount > Decimal::ZERO {
            legs.push(PostingLeg::credit(
                config.purchase_ledger_id,
                overview.taxable_amount,
            ));
        }
        if overview.tax_total > Decimal::ZERO {
            legs.push(PostingLeg::credit(config.gst_ledger_id, overview.tax_total));
        }
        legs
    }
}

/// Orchestrator facade for the PurchaseReturn family.
#[derive(Clone)]
pub struct PurchaseReturnService {
    core: SettlementCore,
}

impl PurchaseReturnService {
    pub fn new(core: SettlementCore) -> Self {
        Self { core }
    }

    pub async fn save_purchase_return(
        &self,
        input: TransactionInput,
    ) -> Result<transaction::Model, ServiceError> {
        self.core.save::<PurchaseReturnFamily>(input).await
    }

    pub async fn delete_purchase_return(&self, id: i64) -> Result<(), ServiceError> {
        self.core.delete::<PurchaseReturnFamily>(id).await
    }

    pub async fn recover_purchase_return(
        &self,
        id: i64,
    ) -> Result<transaction::Model, ServiceError> {
        self.core.recover::<PurchaseReturnFamily>(id).await
    }
}
