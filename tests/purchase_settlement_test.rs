//! Purchase and purchase-return settlement: stock inflow/outflow, supplier
//! credit postings, and delete reversal.

mod common;

use bakery_settlement::{
    entities::{
        stock_movement::MovementType,
        transaction::Entity as TransactionEntity,
        transaction_line::{self, Entity as TransactionLineEntity},
    },
    LineInput, TenderSplit, TransactionInput, WriteMode,
};
use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use common::RAW_FLOUR;

fn flour_purchase(env: &common::TestEnv) -> TransactionInput {
    // 10 kg flour at 50, no discount, 2.5+2.5% GST.
    TransactionInput {
        mode: WriteMode::Insert,
        transaction_date: Utc::now(),
        location_id: env.loc_primary,
        company_id: 1,
        financial_year_id: env.fy_open,
        party_ledger_id: Some(env.party_plain),
        order_id: None,
        tender: TenderSplit::default(),
        lines: vec![LineInput {
            item_id: RAW_FLOUR,
            quantity: dec!(10),
            rate: dec!(50),
            discount_amount: dec!(0),
            cgst_amount: dec!(12.5),
            sgst_amount: dec!(12.5),
        }],
        actor: None,
    }
}

#[tokio::test]
async fn credit_purchase_receives_stock_and_credits_the_supplier() {
    let env = common::setup().await;

    let purchase = env
        .services
        .purchases
        .save_purchase(flour_purchase(&env))
        .await
        .expect("save purchase");

    assert_eq!(purchase.transaction_no, "PU-1-1-00001");
    assert_eq!(purchase.total_amount, dec!(525));

    let rows =
        common::stock_rows(&env.db, MovementType::Purchase, purchase.id, env.loc_primary).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].item_id, RAW_FLOUR);
    assert_eq!(rows[0].quantity, dec!(10));
    assert_eq!(rows[0].net_rate, Some(dec!(50)));

    let (_, legs) =
        common::active_posting(&env.db, env.config.purchase_voucher_id, purchase.id)
            .await
            .expect("posting exists");
    assert!(legs
        .iter()
        .any(|l| l.ledger_id == env.config.purchase_ledger_id && l.debit == Some(dec!(500))));
    assert!(legs
        .iter()
        .any(|l| l.ledger_id == env.config.gst_ledger_id && l.debit == Some(dec!(25))));
    assert!(legs
        .iter()
        .any(|l| l.ledger_id == env.party_plain && l.credit == Some(dec!(525))));
}

#[tokio::test]
async fn purchase_return_sends_stock_back() {
    let env = common::setup().await;

    let ret = env
        .services
        .purchase_returns
        .save_purchase_return(TransactionInput {
            tender: TenderSplit {
                cash: dec!(525),
                ..Default::default()
            },
            party_ledger_id: None,
            ..flour_purchase(&env)
        })
        .await
        .expect("save purchase return");

    assert_eq!(ret.transaction_no, "PR-1-1-00001");

    let rows =
        common::stock_rows(&env.db, MovementType::PurchaseReturn, ret.id, env.loc_primary).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].quantity, dec!(-10));

    // The supplier refunds: cash comes in, the expense reverses.
    let (_, legs) =
        common::active_posting(&env.db, env.config.purchase_return_voucher_id, ret.id)
            .await
            .expect("posting exists");
    assert!(legs
        .iter()
        .any(|l| l.ledger_id == env.config.cash_ledger_id && l.debit == Some(dec!(525))));
    assert!(legs
        .iter()
        .any(|l| l.ledger_id == env.config.purchase_ledger_id && l.credit == Some(dec!(500))));
}

#[tokio::test]
async fn delete_reverses_ledgers_but_keeps_the_lines() {
    let env = common::setup().await;

    let purchase = env
        .services
        .purchases
        .save_purchase(flour_purchase(&env))
        .await
        .expect("save purchase");

    env.services
        .purchases
        .delete_purchase(purchase.id)
        .await
        .expect("delete purchase");

    let header = TransactionEntity::find_by_id(purchase.id)
        .one(&*env.db)
        .await
        .unwrap()
        .unwrap();
    assert!(!header.status);

    let rows =
        common::stock_rows(&env.db, MovementType::Purchase, purchase.id, env.loc_primary).await;
    assert!(rows.is_empty());
    assert!(
        common::active_posting(&env.db, env.config.purchase_voucher_id, purchase.id)
            .await
            .is_none()
    );

    // Lines survive as the historical record, still active.
    let lines = TransactionLineEntity::find()
        .filter(transaction_line::Column::TransactionId.eq(purchase.id))
        .filter(transaction_line::Column::Status.eq(true))
        .all(&*env.db)
        .await
        .unwrap();
    assert_eq!(lines.len(), 1);
}

#[tokio::test]
async fn purchase_from_stock_holding_supplier_mirrors_the_inflow() {
    let env = common::setup().await;

    let purchase = env
        .services
        .purchases
        .save_purchase(TransactionInput {
            party_ledger_id: Some(env.party_branch),
            ..flour_purchase(&env)
        })
        .await
        .expect("save purchase");

    let own =
        common::stock_rows(&env.db, MovementType::Purchase, purchase.id, env.loc_primary).await;
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].quantity, dec!(10));

    // The supplier's own location gives up the stock.
    let mirrored =
        common::stock_rows(&env.db, MovementType::Purchase, purchase.id, env.loc_branch).await;
    assert_eq!(mirrored.len(), 1);
    assert_eq!(mirrored[0].quantity, dec!(-10));
}
