use rust_decimal::Decimal;

use crate::{
    config::SettlementConfig,
    entities::{stock_movement::MovementType, transaction},
    entities::transaction::TransactionKind,
    errors::ServiceError,
    services::accounting::PostingLeg,
};

use super::{SettlementCore, TransactionFamily, TransactionInput, TransactionOverview};

/// Purchase: goods or raw materials arrive from a supplier. Stock inflow;
/// no recipe explosion (materials are bought as themselves).
pub struct PurchaseFamily;

impl TransactionFamily for PurchaseFamily {
    const KIND: TransactionKind = TransactionKind::Purchase;
    const MOVEMENT: MovementType = MovementType::Purchase;

    fn stock_sign() -> Decimal {
        Decimal::ONE
    }

    fn voucher_id(config: &SettlementConfig) -> i64 {
        config.purchase_voucher_id
    }

    fn build_postings(
        overview: &TransactionOverview,
        config: &SettlementConfig,
    ) -> Vec<PostingLeg> {
        let mut legs = Vec::new();
        if overview.taxable_amount > Decimal::ZERO {
            legs.push(PostingLeg::debit(
                config.purchase_ledger_id,
                overview.taxable_amount,
            ));
        }
        if overview.tax_total > Decimal::ZERO {
            legs.push(PostingLeg::debit(config.gst_ledger_id, overview.tax_total));
        }
        if overview.tendered_amount > Decimal::ZERO {
            legs.push(PostingLeg::credit(
                config.cash_ledger_id,
                overview.tendered_amount,
            ));
        }
        if overview.credit_amount > Decimal::ZERO {
            if let Some(party) = overview.party_ledger_id {
                legs.push(PostingLeg::credit(party, overview.credit_amount));
            }
        }
        legs
    }
}

/// Orchestrator facade for the Purchase family.
#[derive(Clone)]
pub struct PurchaseService {
    core: SettlementCore,
}

impl PurchaseService {
    pub fn new(core: SettlementCore) -> Self {
        Self { core }
    }

    pub async fn save_purchase(
        &self,
        input: TransactionInput,
    ) -> Result<transaction::Model, ServiceError> {
        self.core.save::<PurchaseFamily>(input).await
    }

    pub async fn delete_purchase(&self, id: i64) -> Result<(), ServiceError> {
        self.core.delete::<PurchaseFamily>(id).await
    }

    pub async fn recover_purchase(&self, id: i64) -> Result<transaction::Model, ServiceError> {
        self.core.recover::<PurchaseFamily>(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn credit_purchase_credits_the_supplier() {
        let config = SettlementConfig::default();
        let overview = TransactionOverview {
            transaction_id: 3,
            transaction_no: "PU-1-1-00001".to_string(),
            transaction_date: Utc::now(),
            financial_year_id: 1,
            location_id: 1,
            party_ledger_id: Some(7),
            taxable_amount: dec!(500),
            tax_total: dec!(25),
            total_amount: dec!(525),
            tendered_amount: dec!(0),
            credit_amount: dec!(525),
        };

        let legs = PurchaseFamily::build_postings(&overview, &config);
        assert_eq!(
            legs,
            vec![
                PostingLeg::debit(config.purchase_ledger_id, dec!(500)),
                PostingLeg::debit(config.gst_ledger_id, dec!(25)),
                PostingLeg::credit(7, dec!(525)),
            ]
        );
    }
}
