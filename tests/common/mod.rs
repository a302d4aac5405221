//! Shared harness for the settlement flow tests: an in-memory SQLite
//! database with migrations applied and the master data every flow needs.

// Each test binary uses a different slice of the harness.
#![allow(dead_code)]

use std::sync::Arc;

use bakery_settlement::{
    build_services,
    config::SettlementConfig,
    db::{self, DbConfig, DbPool},
    entities::{
        accounting::{self, Entity as AccountingEntity},
        accounting_line::{self, Entity as AccountingLineEntity},
        financial_year,
        ledger,
        location,
        recipe,
        recipe_line,
        stock_movement::{self, Entity as StockMovementEntity, MovementType},
    },
    SettlementServices,
};
use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter,
};

/// Item master ids used across the tests. Items live outside the settlement
/// core; only their ids flow through it.
pub const PRODUCT_WITH_RECIPE: i64 = 101;
pub const PRODUCT_PLAIN: i64 = 102;
pub const RAW_FLOUR: i64 = 201;

pub struct TestEnv {
    pub db: Arc<DbPool>,
    pub services: SettlementServices,
    pub config: SettlementConfig,
    /// Open year accepting writes.
    pub fy_open: i64,
    /// Open year that individual tests may lock.
    pub fy_lockable: i64,
    /// Year seeded locked.
    pub fy_locked: i64,
    pub loc_primary: i64,
    pub loc_branch: i64,
    /// Customer/supplier without a stock location.
    pub party_plain: i64,
    /// Counterparty that holds stock at the branch location.
    pub party_branch: i64,
    /// Counterparty holding stock at the primary location itself.
    pub party_own: i64,
}

pub async fn setup() -> TestEnv {
    let config = DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };
    let pool = db::establish_connection_with_config(&config)
        .await
        .expect("failed to open test database");
    db::run_migrations(&pool).await.expect("migrations failed");

    let db = Arc::new(pool);
    seed(&db).await;

    let settlement_config = SettlementConfig::default();
    let services = build_services(db.clone(), settlement_config.clone(), None);

    TestEnv {
        db,
        services,
        config: settlement_config,
        fy_open: 1,
        fy_lockable: 2,
        fy_locked: 3,
        loc_primary: 1,
        loc_branch: 2,
        party_plain: 5,
        party_branch: 6,
        party_own: 7,
    }
}

async fn seed(db: &DbPool) {
    let years = [
        ("2025-26", false, true),
        ("2026-27", false, true),
        ("2024-25", true, true),
    ];
    for (i, (name, locked, status)) in years.iter().enumerate() {
        financial_year::ActiveModel {
            id: Default::default(),
            name: Set(name.to_string()),
            start_date: Set(Utc
                .with_ymd_and_hms(2024 + i as i32, 4, 1, 0, 0, 0)
                .unwrap()),
            end_date: Set(Utc
                .with_ymd_and_hms(2025 + i as i32, 3, 31, 23, 59, 59)
                .unwrap()),
            locked: Set(*locked),
            status: Set(*status),
        }
        .insert(db)
        .await
        .expect("seed financial year");
    }

    for name in ["Main Outlet", "Branch Cafe"] {
        location::ActiveModel {
            id: Default::default(),
            name: Set(name.to_string()),
            status: Set(true),
        }
        .insert(db)
        .await
        .expect("seed location");
    }

    // Posting ledgers first so their ids line up with the default config
    // (cash=1, sales=2, purchases=3, gst=4), then the parties.
    let ledgers: [(&str, Option<i64>); 7] = [
        ("Cash In Hand", None),
        ("Sales Account", None),
        ("Purchase Account", None),
        ("GST Payable", None),
        ("Walk-in Customer", None),
        ("Branch Cafe Counter", Some(2)),
        ("Shop Counter", Some(1)),
    ];
    for (name, location_id) in ledgers {
        ledger::ActiveModel {
            id: Default::default(),
            name: Set(name.to_string()),
            location_id: Set(location_id),
            status: Set(true),
        }
        .insert(db)
        .await
        .expect("seed ledger");
    }

    // One bread recipe: each unit of PRODUCT_WITH_RECIPE consumes 3 units
    // of flour.
    let bread = recipe::ActiveModel {
        id: Default::default(),
        product_id: Set(PRODUCT_WITH_RECIPE),
        status: Set(true),
    }
    .insert(db)
    .await
    .expect("seed recipe");
    recipe_line::ActiveModel {
        id: Default::default(),
        recipe_id: Set(bread.id),
        raw_material_id: Set(RAW_FLOUR),
        quantity: Set(dec!(3)),
    }
    .insert(db)
    .await
    .expect("seed recipe line");
}

/// Locks a financial year in place.
pub async fn lock_year(db: &DbPool, id: i64) {
    let year = financial_year::Entity::find_by_id(id)
        .one(db)
        .await
        .expect("load year")
        .expect("year exists");
    let mut active = year.into_active_model();
    active.locked = Set(true);
    active.update(db).await.expect("lock year");
}

/// All stock rows for one (type, transaction, location) generation key.
pub async fn stock_rows(
    db: &DbPool,
    movement_type: MovementType,
    transaction_id: i64,
    location_id: i64,
) -> Vec<stock_movement::Model> {
    StockMovementEntity::find()
        .filter(stock_movement::Column::MovementType.eq(movement_type))
        .filter(stock_movement::Column::TransactionId.eq(transaction_id))
        .filter(stock_movement::Column::LocationId.eq(location_id))
        .all(db)
        .await
        .expect("load stock rows")
}

/// The active posting for (voucher, reference) with its legs, if any.
pub async fn active_posting(
    db: &DbPool,
    voucher_id: i64,
    reference_id: i64,
) -> Option<(accounting::Model, Vec<accounting_line::Model>)> {
    let header = AccountingEntity::find()
        .filter(accounting::Column::VoucherId.eq(voucher_id))
        .filter(accounting::Column::ReferenceId.eq(reference_id))
        .filter(accounting::Column::Status.eq(true))
        .one(db)
        .await
        .expect("load posting")?;
    let lines = AccountingLineEntity::find()
        .filter(accounting_line::Column::AccountingId.eq(header.id))
        .all(db)
        .await
        .expect("load posting lines");
    Some((header, lines))
}
