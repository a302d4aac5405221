use rust_decimal::Decimal;

use crate::{
    config::SettlementConfig,
    entities::{stock_movement::MovementType, transaction},
    entities::transaction::TransactionKind,
    errors::ServiceError,
    services::accounting::PostingLeg,
};

use super::{SettlementCore, TransactionFamily, TransactionInput, TransactionOverview};

/// Sale return: finished goods come back, money flows out. The exact mirror
/// of a Sale: stock inflow, recipe consumption reversed, postings swapped.
pub struct SaleReturnFamily;

impl TransactionFamily for SaleReturnFamily {
    const KIND: TransactionKind = TransactionKind::SaleReturn;
    const MOVEMENT: MovementType = MovementType::SaleReturn;

    fn stock_sign() -> Decimal {
        Decimal::ONE
    }

    fn explodes_recipes() -> bool {
        true
    }

    fn links_orders() -> bool {
        true
    }

    fn voucher_id(config: &SettlementConfig) -> i64 {
        config.sale_return_voucher_id
    }

    fn build_postings(
        overview: &TransactionOverview,
        config: &SettlementConfig,
    ) -> Vec<PostingLeg> {
        let mut legs = Vec::new();
        if overview.taxable_amount > Decimal::ZERO {
            legs.push(PostingLeg::debit(
                config.sales_ledger_id,
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

/// Orchestrator facade for the SaleReturn family.
#[derive(Clone)]
pub struct SaleReturnService {
    core: SettlementCore,
}

impl SaleReturnService {
    pub fn new(core: SettlementCore) -> Self {
        Self { core }
    }

    pub async fn save_sale_return(
        &self,
        input: TransactionInput,
    ) -> Result<transaction::Model, ServiceError> {
        self.core.save::<SaleReturnFamily>(input).await
    }

    pub async fn delete_sale_return(&self, id: i64) -> Result<(), ServiceError> {
        self.core.delete::<SaleReturnFamily>(id).await
    }

    pub async fn recover_sale_return(
        &self,
        id: i64,
    ) -> Result<transaction::Model, ServiceError> {
        self.core.recover::<SaleReturnFamily>(id).await
    }
}
