//! Delete and recover: soft-delete reverses the ledgers, recovery replays
//! the save path and regenerates them from the stored lines.

mod common;

use assert_matches::assert_matches;
use bakery_settlement::{
    entities::{stock_movement::MovementType, transaction::Entity as TransactionEntity},
    LineInput, ServiceError, TenderSplit, TransactionInput, WriteMode,
};
use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;

use common::{PRODUCT_WITH_RECIPE, RAW_FLOUR};

fn bread_sale(env: &common::TestEnv) -> TransactionInput {
    TransactionInput {
        mode: WriteMode::Insert,
        transaction_date: Utc::now(),
        location_id: env.loc_primary,
        company_id: 1,
        financial_year_id: env.fy_open,
        party_ledger_id: None,
        order_id: None,
        tender: TenderSplit {
            cash: dec!(224.2),
            ..Default::default()
        },
        lines: vec![LineInput {
            item_id: PRODUCT_WITH_RECIPE,
            quantity: dec!(2),
            rate: dec!(100),
            discount_amount: dec!(10),
            cgst_amount: dec!(17.1),
            sgst_amount: dec!(17.1),
        }],
        actor: None,
    }
}

#[tokio::test]
async fn delete_then_recover_round_trips_the_ledgers() {
    let env = common::setup().await;

    let sale = env
        .services
        .sales
        .save_sale(bread_sale(&env))
        .await
        .expect("save sale");

    env.services.sales.delete_sale(sale.id).await.expect("delete sale");

    let deleted = TransactionEntity::find_by_id(sale.id)
        .one(&*env.db)
        .await
        .unwrap()
        .unwrap();
    assert!(!deleted.status);
    assert!(
        common::stock_rows(&env.db, MovementType::Sale, sale.id, env.loc_primary)
            .await
            .is_empty()
    );
    assert!(
        common::active_posting(&env.db, env.config.sale_voucher_id, sale.id)
            .await
            .is_none()
    );

    let recovered = env
        .services
        .sales
        .recover_sale(sale.id)
        .await
        .expect("recover sale");

    assert!(recovered.status);
    assert_eq!(recovered.transaction_no, sale.transaction_no);
    assert_eq!(recovered.total_amount, dec!(224.2));

    // Stock comes back exactly once per item, recipe lines included.
    let rows = common::stock_rows(&env.db, MovementType::Sale, sale.id, env.loc_primary).await;
    assert_eq!(rows.len(), 2);
    let product = rows.iter().find(|r| r.item_id == PRODUCT_WITH_RECIPE).unwrap();
    assert_eq!(product.quantity, dec!(-2));
    let flour = rows.iter().find(|r| r.item_id == RAW_FLOUR).unwrap();
    assert_eq!(flour.quantity, dec!(-6));

    let (_, legs) = common::active_posting(&env.db, env.config.sale_voucher_id, sale.id)
        .await
        .expect("posting restored");
    let net: rust_decimal::Decimal = legs.iter().map(|l| l.signed_amount()).sum();
    assert_eq!(net, dec!(0));
}

#[tokio::test]
async fn double_delete_is_refused() {
    let env = common::setup().await;

    let sale = env.services.sales.save_sale(bread_sale(&env)).await.unwrap();
    env.services.sales.delete_sale(sale.id).await.unwrap();

    let again = env.services.sales.delete_sale(sale.id).await;
    assert_matches!(again, Err(ServiceError::InvalidOperation(_)));
}

#[tokio::test]
async fn missing_transaction_is_not_found() {
    let env = common::setup().await;

    assert_matches!(
        env.services.sales.delete_sale(404).await,
        Err(ServiceError::NotFound(_))
    );
    assert_matches!(
        env.services.sales.recover_sale(404).await,
        Err(ServiceError::NotFound(_))
    );
}

#[tokio::test]
async fn kinds_do_not_cross() {
    let env = common::setup().await;

    let sale = env.services.sales.save_sale(bread_sale(&env)).await.unwrap();

    // A sale id handed to the purchase service is a different transaction
    // family, not a match.
    assert_matches!(
        env.services.purchases.delete_purchase(sale.id).await,
        Err(ServiceError::NotFound(_))
    );
}
