use rust_decimal::Decimal;

use crate::{
    config::SettlementConfig,
    entities::{stock_movement::MovementType, transaction},
    entities::transaction::TransactionKind,
    errors::ServiceError,
    services::accounting::PostingLeg,
};

use super::{SettlementCore, TransactionFamily, TransactionInput, TransactionOverview};

/// Sale: finished goods leave the shop, payment arrives as tenders and/or
/// on the customer's account.
pub struct SaleFamily;

impl TransactionFamily for SaleFamily {
    const KIND: TransactionKind = TransactionKind::Sale;
    const MOVEMENT: MovementType = MovementType::Sale;

    fn stock_sign() -> Decimal {
        Decimal::NEGATIVE_ONE
    }

    fn explodes_recipes() -> bool {
        true
    }

    fn links_orders() -> bool {
        true
    }

    fn voucher_id(config: &SettlementConfig) -> i64 {
        config.sale_voucher_id
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
                config.sales_ledger_id,
                overview.taxable_amount,
            ));
        }
        if overview.tax_total > Decimal::ZERO {
            legs.push(PostingLeg::credit(config.gst_ledger_id, overview.tax_total));
        }
        legs
    }
}

/// Orchestrator facade for the Sale family.
#[derive(Clone)]
pub struct SaleService {
    core: SettlementCore,
}

impl SaleService {
    pub fn new(core: SettlementCore) -> Self {
        Self { core }
    }

    pub async fn save_sale(
        &self,
        input: TransactionInput,
    ) -> Result<transaction::Model, ServiceError> {
        self.core.save::<SaleFamily>(input).await
    }

    pub async fn delete_sale(&self, id: i64) -> Result<(), ServiceError> {
        self.core.delete::<SaleFamily>(id).await
    }

    pub async fn recover_sale(&self, id: i64) -> Result<transaction::Model, ServiceError> {
        self.core.recover::<SaleFamily>(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn overview(tendered: Decimal, credit: Decimal) -> TransactionOverview {
        TransactionOverview {
            transaction_id: 1,
            transaction_no: "SL-1-1-00001".to_string(),
            transaction_date: Utc::now(),
            financial_year_id: 1,
            location_id: 1,
            party_ledger_id: Some(9),
            taxable_amount: dec!(190),
            tax_total: dec!(34.2),
            total_amount: dec!(224.2),
            tendered_amount: tendered,
            credit_amount: credit,
        }
    }

    #[test]
    fn cash_sale_posts_worked_example() {
        let config = SettlementConfig::default();
        let legs = SaleFamily::build_postings(&overview(dec!(224.2), dec!(0)), &config);

        assert_eq!(legs.len(), 3);
        assert_eq!(legs[0], PostingLeg::debit(config.cash_ledger_id, dec!(224.2)));
        assert_eq!(
            legs[1],
            PostingLeg::credit(config.sales_ledger_id, dec!(190))
        );
        assert_eq!(legs[2], PostingLeg::credit(config.gst_ledger_id, dec!(34.2)));

        let debit: Decimal = legs.iter().filter_map(|l| l.debit).sum();
        let credit: Decimal = legs.iter().filter_map(|l| l.credit).sum();
        assert_eq!(debit, credit);
    }

    #[test]
    fn on_account_portion_debits_the_party() {
        let config = SettlementConfig::default();
        let legs = SaleFamily::build_postings(&overview(dec!(100), dec!(124.2)), &config);

        assert!(legs.contains(&PostingLeg::debit(config.cash_ledger_id, dec!(100))));
        assert!(legs.contains(&PostingLeg::debit(9, dec!(124.2))));
    }
}
