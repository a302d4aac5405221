//! Financial-period enforcement: no save, edit, delete or recovery may touch
//! a locked (or inactive) year, and a failed guard leaves no partial writes.

mod common;

use assert_matches::assert_matches;
use bakery_settlement::{
    entities::transaction::{self, Entity as TransactionEntity},
    LineInput, ServiceError, TenderSplit, TransactionInput, WriteMode,
};
use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use common::PRODUCT_PLAIN;

fn sale_in(env: &common::TestEnv, financial_year_id: i64) -> TransactionInput {
    TransactionInput {
        mode: WriteMode::Insert,
        transaction_date: Utc::now(),
        location_id: env.loc_primary,
        company_id: 1,
        financial_year_id,
        party_ledger_id: None,
        order_id: None,
        tender: TenderSplit {
            cash: dec!(100),
            ..Default::default()
        },
        lines: vec![LineInput {
            item_id: PRODUCT_PLAIN,
            quantity: dec!(1),
            rate: dec!(100),
            discount_amount: dec!(0),
            cgst_amount: dec!(0),
            sgst_amount: dec!(0),
        }],
        actor: None,
    }
}

#[tokio::test]
async fn save_into_a_locked_year_writes_nothing() {
    let env = common::setup().await;

    let result = env.services.sales.save_sale(sale_in(&env, env.fy_locked)).await;
    assert_matches!(result, Err(ServiceError::PeriodLocked(_)));

    let count = TransactionEntity::find().count(&*env.db).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn save_into_an_unknown_year_is_locked() {
    let env = common::setup().await;

    let result = env.services.sales.save_sale(sale_in(&env, 999)).await;
    assert_matches!(result, Err(ServiceError::PeriodLocked(_)));
}

#[tokio::test]
async fn locking_a_year_freezes_existing_transactions() {
    let env = common::setup().await;

    let sale = env
        .services
        .sales
        .save_sale(sale_in(&env, env.fy_lockable))
        .await
        .expect("save sale");

    common::lock_year(&env.db, env.fy_lockable).await;

    let edit = env
        .services
        .sales
        .save_sale(TransactionInput {
            mode: WriteMode::Update(sale.id),
            ..sale_in(&env, env.fy_lockable)
        })
        .await;
    assert_matches!(edit, Err(ServiceError::PeriodLocked(_)));

    let delete = env.services.sales.delete_sale(sale.id).await;
    assert_matches!(delete, Err(ServiceError::PeriodLocked(_)));

    let recover = env.services.sales.recover_sale(sale.id).await;
    assert_matches!(recover, Err(ServiceError::PeriodLocked(_)));
}

#[tokio::test]
async fn moving_out_of_a_locked_year_is_refused() {
    let env = common::setup().await;

    let sale = env
        .services
        .sales
        .save_sale(sale_in(&env, env.fy_lockable))
        .await
        .expect("save sale");

    common::lock_year(&env.db, env.fy_lockable).await;

    // The target year is open, but the edit would rewrite ledgers of the
    // locked original year.
    let result = env
        .services
        .sales
        .save_sale(TransactionInput {
            mode: WriteMode::Update(sale.id),
            location_id: env.loc_branch,
            ..sale_in(&env, env.fy_open)
        })
        .await;
    assert_matches!(result, Err(ServiceError::PeriodLocked(_)));

    // The failed edit rolled back entirely.
    let stored = TransactionEntity::find_by_id(sale.id)
        .one(&*env.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.financial_year_id, env.fy_lockable);
    assert_eq!(stored.location_id, env.loc_primary);
}

#[tokio::test]
async fn orders_honor_the_same_guard() {
    let env = common::setup().await;

    let result = env
        .services
        .orders
        .save_order(bakery_settlement::services::orders::OrderInput {
            mode: WriteMode::Insert,
            transaction_date: Utc::now(),
            location_id: env.loc_primary,
            company_id: 1,
            financial_year_id: env.fy_locked,
            party_ledger_id: None,
            lines: sale_in(&env, env.fy_locked).lines,
            actor: None,
        })
        .await;
    assert_matches!(result, Err(ServiceError::PeriodLocked(_)));

    let count = TransactionEntity::find()
        .filter(transaction::Column::Kind.eq(transaction::TransactionKind::Order))
        .count(&*env.db)
        .await
        .unwrap();
    assert_eq!(count, 0);
}
