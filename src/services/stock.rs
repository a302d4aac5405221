use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use tracing::{debug, instrument};

use crate::{
    entities::stock_movement::{self, Entity as StockMovementEntity, MovementType},
    errors::ServiceError,
};

/// A stock movement to append, before an id is assigned.
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub item_id: i64,
    /// Signed: negative = outflow, positive = inflow.
    pub quantity: Decimal,
    pub movement_type: MovementType,
    pub transaction_id: i64,
    pub transaction_no: String,
    pub transaction_date: DateTime<Utc>,
    pub location_id: i64,
    pub net_rate: Option<Decimal>,
}

/// Append-only ledger of signed quantity movements per
/// (item, location, transaction, type).
///
/// Edits never patch rows in place: the orchestrator deletes the prior
/// generation for the exact (type, transaction, location) key and re-posts
/// the new line set, so duplicate generations cannot accumulate.
#[derive(Clone, Debug, Default)]
pub struct StockLedgerService;

impl StockLedgerService {
    pub fn new() -> Self {
        Self
    }

    /// Appends one movement row.
    #[instrument(skip(self, db, movement), fields(item_id = movement.item_id, location_id = movement.location_id))]
    pub async fn post<C: ConnectionTrait>(
        &self,
        db: &C,
        movement: NewMovement,
    ) -> Result<stock_movement::Model, ServiceError> {
        let row = stock_movement::ActiveModel {
            id: Default::default(),
            item_id: Set(movement.item_id),
            quantity: Set(movement.quantity),
            movement_type: Set(movement.movement_type),
            transaction_id: Set(movement.transaction_id),
            transaction_no: Set(movement.transaction_no),
            transaction_date: Set(movement.transaction_date),
            location_id: Set(movement.location_id),
            net_rate: Set(movement.net_rate),
        };

        row.insert(db).await.map_err(ServiceError::db_error)
    }

    /// Removes the prior generation of rows for the exact
    /// (type, transaction, location) key. Called before every re-post and
    /// when reversing a deleted transaction.
    #[instrument(skip(self, db))]
    pub async fn delete_by_transaction<C: ConnectionTrait>(
        &self,
        db: &C,
        movement_type: MovementType,
        transaction_id: i64,
        location_id: i64,
    ) -> Result<u64, ServiceError> {
        let result = StockMovementEntity::delete_many()
            .filter(stock_movement::Column::MovementType.eq(movement_type))
            .filter(stock_movement::Column::TransactionId.eq(transaction_id))
            .filter(stock_movement::Column::LocationId.eq(location_id))
            .exec(db)
            .await
            .map_err(ServiceError::db_error)?;

        debug!(
            rows = result.rows_affected,
            transaction_id, location_id, "stock generation removed"
        );
        Ok(result.rows_affected)
    }
}
