use sea_orm::{ActiveModelTrait, ActiveValue::Set, ConnectionTrait, EntityTrait, IntoActiveModel};
use tracing::{debug, instrument, warn};

use crate::{
    entities::transaction::{self, Entity as TransactionEntity, TransactionKind},
    errors::ServiceError,
};

/// Keeps the optional one-to-one Order↔Sale association symmetric.
///
/// The order's `fulfilled_by_id` and the sale's `order_id` always agree:
/// linking sets both, unlinking nulls both. Edits run unlink-then-relink so
/// a changed order assignment can never leave a stale back-pointer.
#[derive(Clone, Debug, Default)]
pub struct OrderLinkService;

impl OrderLinkService {
    pub fn new() -> Self {
        Self
    }

    /// Clears the back-pointer on the order the sale referenced before the
    /// edit. The sale side is overwritten by the header upsert; the edit
    /// path then re-links to whatever the edited sale now specifies, which
    /// may be the same order, a different one, or none.
    #[instrument(skip(self, db, stored_sale), fields(sale_id = stored_sale.id))]
    pub async fn unlink_before_edit<C: ConnectionTrait>(
        &self,
        db: &C,
        stored_sale: &transaction::Model,
    ) -> Result<Option<i64>, ServiceError> {
        let Some(order_id) = stored_sale.order_id else {
            return Ok(None);
        };

        if let Some(order) = TransactionEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
        {
            let mut active = order.into_active_model();
            active.fulfilled_by_id = Set(None);
            active.update(db).await.map_err(ServiceError::db_error)?;
        }

        debug!(order_id, "order link cleared before edit");
        Ok(Some(order_id))
    }

    /// Points the order at the sale that fulfils it. A missing or inactive
    /// order is skipped, not an error: the sale stands on its own.
    #[instrument(skip(self, db))]
    pub async fn link_on_save<C: ConnectionTrait>(
        &self,
        db: &C,
        order_id: i64,
        sale_id: i64,
    ) -> Result<bool, ServiceError> {
        let order = TransactionEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        let order = match order {
            Some(order) if order.kind == TransactionKind::Order && order.status => order,
            Some(_) => {
                warn!(order_id, sale_id, "order inactive or wrong kind; not linking");
                return Ok(false);
            }
            None => {
                warn!(order_id, sale_id, "order not found; not linking");
                return Ok(false);
            }
        };

        let mut active = order.into_active_model();
        active.fulfilled_by_id = Set(Some(sale_id));
        active.update(db).await.map_err(ServiceError::db_error)?;

        debug!(order_id, sale_id, "order linked to fulfilling sale");
        Ok(true)
    }

    /// Clears both sides of the link for a sale being deleted.
    #[instrument(skip(self, db, sale), fields(sale_id = sale.id))]
    pub async fn unlink_for_delete<C: ConnectionTrait>(
        &self,
        db: &C,
        sale: &transaction::Model,
    ) -> Result<(), ServiceError> {
        let Some(order_id) = sale.order_id else {
            return Ok(());
        };

        if let Some(order) = TransactionEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
        {
            let mut active = order.into_active_model();
            active.fulfilled_by_id = Set(None);
            active.update(db).await.map_err(ServiceError::db_error)?;
        }

        let mut active = sale.clone().into_active_model();
        active.order_id = Set(None);
        active.update(db).await.map_err(ServiceError::db_error)?;
        Ok(())
    }
}
