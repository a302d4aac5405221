use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::{
    db::DbPool,
    entities::{
        transaction::{self, Entity as TransactionEntity, TransactionKind},
        transaction_line::{self, Entity as TransactionLineEntity},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        financial_period::FinancialPeriodService,
        numbering::TransactionNumberService,
        settlement::{self, CartTotals, LineInput, WriteMode},
    },
};

/// Input cart for an order save. Orders carry no tender split: nothing is
/// settled until a sale fulfils them.
#[derive(Debug, Clone)]
pub struct OrderInput {
    pub mode: WriteMode,
    pub transaction_date: DateTime<Utc>,
    pub location_id: i64,
    pub company_id: i64,
    pub financial_year_id: i64,
    pub party_ledger_id: Option<i64>,
    pub lines: Vec<LineInput>,
    pub actor: Option<String>,
}

/// Persists Order headers and line items through the same header/line
/// machinery as the settlement families (period guard, scoped numbering,
/// full-replace line generations) but posts no stock and no accounting:
/// an order reserves nothing until the fulfilling sale settles it.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DbPool>,
    periods: FinancialPeriodService,
    numbering: TransactionNumberService,
    event_sender: Option<EventSender>,
}

impl OrderService {
    pub fn new(db: Arc<DbPool>, event_sender: Option<EventSender>) -> Self {
        Self {
            db,
            periods: FinancialPeriodService::new(),
            numbering: TransactionNumberService::new(),
            event_sender,
        }
    }

    #[instrument(skip(self, input), fields(mode = ?input.mode))]
    pub async fn save_order(
        &self,
        input: OrderInput,
    ) -> Result<transaction::Model, ServiceError> {
        settlement::validate_order_lines(&input.lines)?;
        let totals = CartTotals::from_lines(&input.lines);

        let db = &*self.db;
        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let stored = match input.mode {
            WriteMode::Insert => None,
            WriteMode::Update(id) => Some(
                TransactionEntity::find_by_id(id)
                    .one(&txn)
                    .await
                    .map_err(ServiceError::db_error)?
                    .filter(|t| t.kind == TransactionKind::Order)
                    .ok_or_else(|| ServiceError::NotFound(format!("order {} not found", id)))?,
            ),
        };

        self.periods
            .ensure_open(&txn, input.financial_year_id)
            .await?;
        if let Some(prev) = &stored {
            if prev.financial_year_id != input.financial_year_id {
                self.periods
                    .ensure_open(&txn, prev.financial_year_id)
                    .await?;
            }
        }

        let transaction_no = match &stored {
            Some(prev) => prev.transaction_no.clone(),
            None => {
                self.numbering
                    .next_number(
                        &txn,
                        TransactionKind::Order,
                        input.location_id,
                        input.financial_year_id,
                    )
                    .await?
            }
        };

        let now = Utc::now();
        let header = match &stored {
            Some(prev) => {
                let mut active = prev.clone().into_active_model();
                active.transaction_date = Set(input.transaction_date);
                active.location_id = Set(input.location_id);
                active.company_id = Set(input.company_id);
                active.financial_year_id = Set(input.financial_year_id);
                active.party_ledger_id = Set(input.party_ledger_id);
                active.base_total = Set(totals.base_total);
                active.discount_total = Set(totals.discount_total);
                active.tax_total = Set(totals.tax_total);
                active.total_amount = Set(totals.total_amount);
                active.status = Set(true);
                active.last_modified_by = Set(input.actor.clone());
                active.updated_at = Set(now);
                active.update(&txn).await.map_err(ServiceError::db_error)?
            }
            None => {
                let active = transaction::ActiveModel {
                    id: Default::default(),
                    kind: Set(TransactionKind::Order),
                    transaction_no: Set(transaction_no.clone()),
                    transaction_date: Set(input.transaction_date),
                    location_id: Set(input.location_id),
                    company_id: Set(input.company_id),
                    financial_year_id: Set(input.financial_year_id),
                    party_ledger_id: Set(input.party_ledger_id),
                    order_id: Set(None),
                    fulfilled_by_id: Set(None),
                    base_total: Set(totals.base_total),
                    discount_total: Set(totals.discount_total),
                    tax_total: Set(totals.tax_total),
                    total_amount: Set(totals.total_amount),
                    cash_amount: Set(Decimal::ZERO),
                    card_amount: Set(Decimal::ZERO),
                    upi_amount: Set(Decimal::ZERO),
                    status: Set(true),
                    created_by: Set(input.actor.clone()),
                    last_modified_by: Set(input.actor.clone()),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                active.insert(&txn).await.map_err(ServiceError::db_error)?
            }
        };

        if stored.is_some() {
            settlement::supersede_lines(&txn, header.id).await?;
        }
        for line in &input.lines {
            let row = transaction_line::ActiveModel {
                id: Default::default(),
                transaction_id: Set(header.id),
                item_id: Set(line.item_id),
                quantity: Set(line.quantity),
                rate: Set(line.rate),
                discount_amount: Set(line.discount_amount),
                cgst_amount: Set(line.cgst_amount),
                sgst_amount: Set(line.sgst_amount),
                total: Set(line.total()),
                net_rate: Set(line.net_rate()),
                status: Set(true),
            };
            row.insert(&txn).await.map_err(ServiceError::db_error)?;
        }

        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(order_id = header.id, transaction_no = %transaction_no, "order saved");

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::TransactionSettled {
                    kind: TransactionKind::Order,
                    transaction_id: header.id,
                    transaction_no,
                    total_amount: header.total_amount,
                })
                .await;
        }

        Ok(header)
    }

    /// Soft-deletes an order, clearing any link to its fulfilling sale on
    /// both sides. Line items remain as the historical record.
    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: i64) -> Result<(), ServiceError> {
        let db = &*self.db;
        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let order = TransactionEntity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .filter(|t| t.kind == TransactionKind::Order)
            .ok_or_else(|| ServiceError::NotFound(format!("order {} not found", id)))?;

        if !order.status {
            return Err(ServiceError::InvalidOperation(format!(
                "order {} is already deleted",
                id
            )));
        }

        self.periods
            .ensure_open(&txn, order.financial_year_id)
            .await?;

        let fulfilling_sale = order.fulfilled_by_id;
        if let Some(sale_id) = fulfilling_sale {
            if let Some(sale) = TransactionEntity::find_by_id(sale_id)
                .one(&txn)
                .await
                .map_err(ServiceError::db_error)?
            {
                let mut active = sale.into_active_model();
                active.order_id = Set(None);
                active.update(&txn).await.map_err(ServiceError::db_error)?;
            }
        }

        let mut active = order.into_active_model();
        active.fulfilled_by_id = Set(None);
        active.status = Set(false);
        active.updated_at = Set(Utc::now());
        active.update(&txn).await.map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(order_id = id, "order deleted");

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::TransactionDeleted {
                    kind: TransactionKind::Order,
                    transaction_id: id,
                })
                .await;
            if let Some(sale_id) = fulfilling_sale {
                sender
                    .send_or_log(Event::OrderUnlinked {
                        order_id: id,
                        sale_id,
                    })
                    .await;
            }
        }

        Ok(())
    }

    /// Recovers a soft-deleted order by replaying the save path with the
    /// stored active lines.
    #[instrument(skip(self))]
    pub async fn recover_order(&self, id: i64) -> Result<transaction::Model, ServiceError> {
        let db = &*self.db;
        let order = TransactionEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .filter(|t| t.kind == TransactionKind::Order)
            .ok_or_else(|| ServiceError::NotFound(format!("order {} not found", id)))?;

        let lines = TransactionLineEntity::find()
            .filter(transaction_line::Column::TransactionId.eq(id))
            .filter(transaction_line::Column::Status.eq(true))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let input = OrderInput {
            mode: WriteMode::Update(id),
            transaction_date: order.transaction_date,
            location_id: order.location_id,
            company_id: order.company_id,
            financial_year_id: order.financial_year_id,
            party_ledger_id: order.party_ledger_id,
            lines: lines
                .into_iter()
                .map(|l| LineInput {
                    item_id: l.item_id,
                    quantity: l.quantity,
                    rate: l.rate,
                    discount_amount: l.discount_amount,
                    cgst_amount: l.cgst_amount,
                    sgst_amount: l.sgst_amount,
                })
                .collect(),
            actor: order.last_modified_by.clone(),
        };

        let recovered = self.save_order(input).await?;

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::TransactionRecovered {
                    kind: TransactionKind::Order,
                    transaction_id: id,
                })
                .await;
        }

        Ok(recovered)
    }
}
