//! Settlement orchestration: the saga that persists a transaction header and
//! its line items, regenerates stock ledgers (including recipe-derived
//! raw-material consumption and inter-location mirrors), maintains
//! Order↔Sale links, and posts balanced accounting, in a fixed order
//! inside one database transaction.
//!
//! Family differences (stock sign, recipe participation, order linkage,
//! posting rules) live in [`TransactionFamily`] implementations; the saga
//! itself is shared.

pub mod purchase_returns;
pub mod purchases;
pub mod sale_returns;
pub mod sales;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::{
    config::SettlementConfig,
    db::DbPool,
    entities::{
        ledger::Entity as LedgerEntity,
        stock_movement::MovementType,
        transaction::{self, Entity as TransactionEntity, TransactionKind},
        transaction_line::{self, Entity as TransactionLineEntity},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        accounting::{AccountingService, PostingLeg, PostingPlan},
        financial_period::FinancialPeriodService,
        numbering::TransactionNumberService,
        order_links::OrderLinkService,
        recipes::{ExplosionDirection, RecipeService},
        stock::{NewMovement, StockLedgerService},
    },
};

/// Tagged write operation. An update carries the existing header id; there
/// is no sentinel id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Insert,
    Update(i64),
}

impl WriteMode {
    pub fn existing_id(&self) -> Option<i64> {
        match self {
            WriteMode::Insert => None,
            WriteMode::Update(id) => Some(*id),
        }
    }
}

/// How the settled amount was tendered. Whatever the tenders do not cover
/// is settled on the party's account.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TenderSplit {
    pub cash: Decimal,
    pub card: Decimal,
    pub upi: Decimal,
}

impl TenderSplit {
    pub fn total(&self) -> Decimal {
        self.cash + self.card + self.upi
    }
}

/// One line of a transaction cart.
#[derive(Debug, Clone, PartialEq)]
pub struct LineInput {
    pub item_id: i64,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub discount_amount: Decimal,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
}

impl LineInput {
    pub fn gross(&self) -> Decimal {
        self.quantity * self.rate
    }

    /// Amount after discount, before tax.
    pub fn taxable(&self) -> Decimal {
        self.gross() - self.discount_amount
    }

    pub fn total(&self) -> Decimal {
        self.taxable() + self.cgst_amount + self.sgst_amount
    }

    /// Effective per-unit value after discount, used for stock valuation.
    pub fn net_rate(&self) -> Decimal {
        self.taxable() / self.quantity
    }
}

/// Input cart for a save. `mode` decides insert-vs-update explicitly.
#[derive(Debug, Clone)]
pub struct TransactionInput {
    pub mode: WriteMode,
    pub transaction_date: DateTime<Utc>,
    pub location_id: i64,
    pub company_id: i64,
    pub financial_year_id: i64,
    pub party_ledger_id: Option<i64>,
    /// Order fulfilled by this transaction (sale families only).
    pub order_id: Option<i64>,
    pub tender: TenderSplit,
    pub lines: Vec<LineInput>,
    pub actor: Option<String>,
}

/// Summed totals over a line cart.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CartTotals {
    pub base_total: Decimal,
    pub discount_total: Decimal,
    pub tax_total: Decimal,
    pub total_amount: Decimal,
}

impl CartTotals {
    pub fn from_lines(lines: &[LineInput]) -> Self {
        lines.iter().fold(Self::default(), |mut acc, line| {
            acc.base_total += line.gross();
            acc.discount_total += line.discount_amount;
            acc.tax_total += line.cgst_amount + line.sgst_amount;
            acc.total_amount += line.total();
            acc
        })
    }
}

/// Read-only projection of a settled transaction handed to the accounting
/// plan builders.
#[derive(Debug, Clone)]
pub struct TransactionOverview {
    pub transaction_id: i64,
    pub transaction_no: String,
    pub transaction_date: DateTime<Utc>,
    pub financial_year_id: i64,
    pub location_id: i64,
    pub party_ledger_id: Option<i64>,
    /// Total net of the non-inclusive tax portion.
    pub taxable_amount: Decimal,
    pub tax_total: Decimal,
    pub total_amount: Decimal,
    /// Portion settled through cash/card/UPI tenders.
    pub tendered_amount: Decimal,
    /// Portion settled on the party's account.
    pub credit_amount: Decimal,
}

/// Per-family behavior plugged into the shared saga.
pub trait TransactionFamily {
    const KIND: TransactionKind;
    const MOVEMENT: MovementType;

    /// Sign applied to finished-good movements: -1 outflow, +1 inflow.
    fn stock_sign() -> Decimal;

    /// Whether finished-good lines explode into raw-material consumption.
    fn explodes_recipes() -> bool {
        false
    }

    /// Whether this family participates in Order↔Sale linkage.
    fn links_orders() -> bool {
        false
    }

    fn voucher_id(config: &SettlementConfig) -> i64;

    /// Builds the family's balanced posting legs. Zero legs are omitted by
    /// the builders; the accounting service re-checks balance before
    /// persisting.
    fn build_postings(overview: &TransactionOverview, config: &SettlementConfig)
        -> Vec<PostingLeg>;
}

/// The saga coordinator shared by all transaction families.
#[derive(Clone)]
pub struct SettlementCore {
    db: Arc<DbPool>,
    config: SettlementConfig,
    periods: FinancialPeriodService,
    numbering: TransactionNumberService,
    recipes: RecipeService,
    stock: StockLedgerService,
    accounting: AccountingService,
    order_links: OrderLinkService,
    event_sender: Option<EventSender>,
}

impl SettlementCore {
    pub fn new(
        db: Arc<DbPool>,
        config: SettlementConfig,
        event_sender: Option<EventSender>,
    ) -> Self {
        Self {
            db,
            config,
            periods: FinancialPeriodService::new(),
            numbering: TransactionNumberService::new(),
            recipes: RecipeService::new(),
            stock: StockLedgerService::new(),
            accounting: AccountingService::new(),
            order_links: OrderLinkService::new(),
            event_sender,
        }
    }

    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Saves (inserts or edits) a transaction, running the full settlement
    /// saga inside one database transaction:
    ///
    /// 1. resolve the transaction number (new ⇒ generate, edit ⇒ stored),
    /// 2. period guard on the target year, and on the original year for edits,
    /// 3. upsert the header,
    /// 4. supersede the active line generation and insert the new cart,
    /// 5. regenerate stock for the own-location and party-location keys,
    /// 6. order linkage (unlink-before-edit, link-on-save),
    /// 7. supersede and re-post accounting.
    #[instrument(skip(self, input), fields(kind = ?F::KIND, mode = ?input.mode))]
    pub async fn save<F: TransactionFamily>(
        &self,
        input: TransactionInput,
    ) -> Result<transaction::Model, ServiceError> {
        validate_input(&input)?;
        let totals = CartTotals::from_lines(&input.lines);
        let credit_amount = totals.total_amount - input.tender.total();
        if credit_amount < Decimal::ZERO {
            return Err(ServiceError::ValidationError(format!(
                "tendered amount {} exceeds transaction total {}",
                input.tender.total(),
                totals.total_amount
            )));
        }
        if credit_amount > Decimal::ZERO && input.party_ledger_id.is_none() {
            return Err(ServiceError::ValidationError(
                "on-account settlement requires a party ledger".to_string(),
            ));
        }

        let db = &*self.db;
        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let stored = match input.mode {
            WriteMode::Insert => None,
            WriteMode::Update(id) => Some(
                TransactionEntity::find_by_id(id)
                    .one(&txn)
                    .await
                    .map_err(ServiceError::db_error)?
                    .filter(|t| t.kind == F::KIND)
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("{} {} not found", F::KIND, id))
                    })?,
            ),
        };

        // Step 2: period guard before any write. The number resolution below
        // is read-only, so ordering with step 1 is immaterial.
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

        // Step 1: the stored number is preserved verbatim on edits.
        let transaction_no = match &stored {
            Some(prev) => prev.transaction_no.clone(),
            None => {
                self.numbering
                    .next_number(&txn, F::KIND, input.location_id, input.financial_year_id)
                    .await?
            }
        };

        // Step 3: header upsert.
        let now = Utc::now();
        let header = match &stored {
            Some(prev) => {
                let mut active = prev.clone().into_active_model();
                active.transaction_date = Set(input.transaction_date);
                active.location_id = Set(input.location_id);
                active.company_id = Set(input.company_id);
                active.financial_year_id = Set(input.financial_year_id);
                active.party_ledger_id = Set(input.party_ledger_id);
                active.order_id = Set(input.order_id);
                active.base_total = Set(totals.base_total);
                active.discount_total = Set(totals.discount_total);
                active.tax_total = Set(totals.tax_total);
                active.total_amount = Set(totals.total_amount);
                active.cash_amount = Set(input.tender.cash);
                active.card_amount = Set(input.tender.card);
                active.upi_amount = Set(input.tender.upi);
                active.status = Set(true);
                active.last_modified_by = Set(input.actor.clone());
                active.updated_at = Set(now);
                active.update(&txn).await.map_err(ServiceError::db_error)?
            }
            None => {
                let active = transaction::ActiveModel {
                    id: Default::default(),
                    kind: Set(F::KIND),
                    transaction_no: Set(transaction_no.clone()),
                    transaction_date: Set(input.transaction_date),
                    location_id: Set(input.location_id),
                    company_id: Set(input.company_id),
                    financial_year_id: Set(input.financial_year_id),
                    party_ledger_id: Set(input.party_ledger_id),
                    order_id: Set(input.order_id),
                    fulfilled_by_id: Set(None),
                    base_total: Set(totals.base_total),
                    discount_total: Set(totals.discount_total),
                    tax_total: Set(totals.tax_total),
                    total_amount: Set(totals.total_amount),
                    cash_amount: Set(input.tender.cash),
                    card_amount: Set(input.tender.card),
                    upi_amount: Set(input.tender.upi),
                    status: Set(true),
                    created_by: Set(input.actor.clone()),
                    last_modified_by: Set(input.actor.clone()),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                active.insert(&txn).await.map_err(ServiceError::db_error)?
            }
        };

        // Step 4: full-replace line generation.
        if stored.is_some() {
            supersede_lines(&txn, header.id).await?;
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

        // Step 5: stock regeneration. Prior generations are keyed by the
        // stored header's own location and its party's location; the new
        // generation posts against the freshly saved values.
        let party_location = self
            .party_location(&txn, input.party_ledger_id)
            .await?;
        if let Some(prev) = &stored {
            self.stock
                .delete_by_transaction(&txn, F::MOVEMENT, header.id, prev.location_id)
                .await?;
            if let Some(prev_party_loc) = self.party_location(&txn, prev.party_ledger_id).await? {
                if prev_party_loc != prev.location_id {
                    self.stock
                        .delete_by_transaction(&txn, F::MOVEMENT, header.id, prev_party_loc)
                        .await?;
                }
            }
        }

        let sign = F::stock_sign();
        // A party holding stock at the transaction's own location would
        // mirror into an offsetting pair at one key; skip it, as delete does.
        let mirror_location = party_location.filter(|loc| *loc != header.location_id);
        for line in &input.lines {
            self.stock
                .post(
                    &txn,
                    NewMovement {
                        item_id: line.item_id,
                        quantity: sign * line.quantity,
                        movement_type: F::MOVEMENT,
                        transaction_id: header.id,
                        transaction_no: transaction_no.clone(),
                        transaction_date: header.transaction_date,
                        location_id: header.location_id,
                        net_rate: Some(line.net_rate()),
                    },
                )
                .await?;

            if let Some(party_loc) = mirror_location {
                // The counterparty holds stock itself: mirror the movement
                // as an inter-location transfer.
                self.stock
                    .post(
                        &txn,
                        NewMovement {
                            item_id: line.item_id,
                            quantity: -sign * line.quantity,
                            movement_type: F::MOVEMENT,
                            transaction_id: header.id,
                            transaction_no: transaction_no.clone(),
                            transaction_date: header.transaction_date,
                            location_id: party_loc,
                            net_rate: Some(line.net_rate()),
                        },
                    )
                    .await?;
            }
        }

        // Raw-material consumption is tracked at the primary location only.
        if F::explodes_recipes() && header.location_id == self.config.primary_location_id {
            let direction = if sign < Decimal::ZERO {
                ExplosionDirection::Outflow
            } else {
                ExplosionDirection::Inflow
            };
            for line in &input.lines {
                let consumptions = self
                    .recipes
                    .explode(&txn, line.item_id, line.quantity, line.net_rate(), direction)
                    .await?;
                for consumption in consumptions {
                    self.stock
                        .post(
                            &txn,
                            NewMovement {
                                item_id: consumption.raw_material_id,
                                quantity: consumption.quantity,
                                movement_type: F::MOVEMENT,
                                transaction_id: header.id,
                                transaction_no: transaction_no.clone(),
                                transaction_date: header.transaction_date,
                                location_id: header.location_id,
                                net_rate: Some(consumption.net_rate),
                            },
                        )
                        .await?;
                }
            }
        }

        // Step 6: order linkage, unlink-then-relink.
        let mut linked_order = None;
        if F::links_orders() {
            if let Some(prev) = &stored {
                self.order_links.unlink_before_edit(&txn, prev).await?;
            }
            if let Some(order_id) = input.order_id {
                if self.order_links.link_on_save(&txn, order_id, header.id).await? {
                    linked_order = Some(order_id);
                }
            }
        }

        // Step 7: accounting supersede-and-repost. Satellite locations and
        // zero-value transactions keep stock ledgers but post nothing.
        let voucher_id = F::voucher_id(&self.config);
        self.accounting
            .supersede(&txn, voucher_id, header.id)
            .await?;
        let mut posted = false;
        if !header.total_amount.is_zero()
            && header.location_id == self.config.primary_location_id
        {
            let overview = TransactionOverview {
                transaction_id: header.id,
                transaction_no: transaction_no.clone(),
                transaction_date: header.transaction_date,
                financial_year_id: header.financial_year_id,
                location_id: header.location_id,
                party_ledger_id: header.party_ledger_id,
                taxable_amount: header.total_amount - header.tax_total,
                tax_total: header.tax_total,
                total_amount: header.total_amount,
                tendered_amount: header.tendered_amount(),
                credit_amount: header.credit_amount(),
            };
            let legs = F::build_postings(&overview, &self.config);
            self.accounting
                .post(
                    &txn,
                    PostingPlan {
                        voucher_id,
                        reference_id: header.id,
                        reference_no: transaction_no.clone(),
                        financial_year_id: header.financial_year_id,
                        transaction_date: header.transaction_date,
                        legs,
                    },
                )
                .await?;
            posted = true;
        }

        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(
            transaction_id = header.id,
            transaction_no = %transaction_no,
            total = %header.total_amount,
            "transaction settled"
        );

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::TransactionSettled {
                    kind: F::KIND,
                    transaction_id: header.id,
                    transaction_no: transaction_no.clone(),
                    total_amount: header.total_amount,
                })
                .await;
            if let Some(order_id) = linked_order {
                sender
                    .send_or_log(Event::OrderLinked {
                        order_id,
                        sale_id: header.id,
                    })
                    .await;
            }
            if posted {
                sender
                    .send_or_log(Event::AccountingPosted {
                        voucher_id,
                        reference_id: header.id,
                        posted_at: Utc::now(),
                    })
                    .await;
            }
        }

        Ok(header)
    }

    /// Soft-deletes a transaction and reverses its ledger effects. Line
    /// items are kept as the historical record under the inactive header.
    #[instrument(skip(self), fields(kind = ?F::KIND))]
    pub async fn delete<F: TransactionFamily>(&self, id: i64) -> Result<(), ServiceError> {
        let db = &*self.db;
        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let header = TransactionEntity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .filter(|t| t.kind == F::KIND)
            .ok_or_else(|| ServiceError::NotFound(format!("{} {} not found", F::KIND, id)))?;

        if !header.status {
            return Err(ServiceError::InvalidOperation(format!(
                "{} {} is already deleted",
                F::KIND,
                id
            )));
        }

        self.periods
            .ensure_open(&txn, header.financial_year_id)
            .await?;

        let mut unlinked_order = None;
        if F::links_orders() && header.order_id.is_some() {
            unlinked_order = header.order_id;
            self.order_links.unlink_for_delete(&txn, &header).await?;
        }

        let party_location = self.party_location(&txn, header.party_ledger_id).await?;

        let mut active = header.clone().into_active_model();
        active.status = Set(false);
        active.updated_at = Set(Utc::now());
        active.update(&txn).await.map_err(ServiceError::db_error)?;

        self.stock
            .delete_by_transaction(&txn, F::MOVEMENT, header.id, header.location_id)
            .await?;
        if let Some(party_loc) = party_location {
            if party_loc != header.location_id {
                self.stock
                    .delete_by_transaction(&txn, F::MOVEMENT, header.id, party_loc)
                    .await?;
            }
        }

        self.accounting
            .supersede(&txn, F::voucher_id(&self.config), header.id)
            .await?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(transaction_id = id, "transaction deleted");

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::TransactionDeleted {
                    kind: F::KIND,
                    transaction_id: id,
                })
                .await;
            if let Some(order_id) = unlinked_order {
                sender
                    .send_or_log(Event::OrderUnlinked {
                        order_id,
                        sale_id: id,
                    })
                    .await;
            }
        }

        Ok(())
    }

    /// Recovers a soft-deleted transaction by re-deriving the cart from the
    /// stored (never-deleted) line rows and replaying the full save path as
    /// an update, which regenerates stock and accounting from scratch.
    #[instrument(skip(self), fields(kind = ?F::KIND))]
    pub async fn recover<F: TransactionFamily>(
        &self,
        id: i64,
    ) -> Result<transaction::Model, ServiceError> {
        let db = &*self.db;
        let header = TransactionEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .filter(|t| t.kind == F::KIND)
            .ok_or_else(|| ServiceError::NotFound(format!("{} {} not found", F::KIND, id)))?;

        let lines = TransactionLineEntity::find()
            .filter(transaction_line::Column::TransactionId.eq(id))
            .filter(transaction_line::Column::Status.eq(true))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let input = TransactionInput {
            mode: WriteMode::Update(id),
            transaction_date: header.transaction_date,
            location_id: header.location_id,
            company_id: header.company_id,
            financial_year_id: header.financial_year_id,
            party_ledger_id: header.party_ledger_id,
            order_id: header.order_id,
            tender: TenderSplit {
                cash: header.cash_amount,
                card: header.card_amount,
                upi: header.upi_amount,
            },
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
            actor: header.last_modified_by.clone(),
        };

        let recovered = self.save::<F>(input).await?;

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::TransactionRecovered {
                    kind: F::KIND,
                    transaction_id: id,
                })
                .await;
        }

        Ok(recovered)
    }

    /// Resolves the stock-holding location of a party ledger, if it has one.
    /// A referenced party that does not exist is a hard stop.
    async fn party_location<C: sea_orm::ConnectionTrait>(
        &self,
        db: &C,
        party_ledger_id: Option<i64>,
    ) -> Result<Option<i64>, ServiceError> {
        let Some(ledger_id) = party_ledger_id else {
            return Ok(None);
        };
        let ledger = LedgerEntity::find_by_id(ledger_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("party ledger {} not found", ledger_id))
            })?;
        Ok(ledger.location_id)
    }
}

/// Marks every active line of a header inactive, preserving the audit trail.
pub(crate) async fn supersede_lines<C: sea_orm::ConnectionTrait>(
    db: &C,
    transaction_id: i64,
) -> Result<u64, ServiceError> {
    let result = TransactionLineEntity::update_many()
        .col_expr(
            transaction_line::Column::Status,
            sea_orm::sea_query::Expr::value(false),
        )
        .filter(transaction_line::Column::TransactionId.eq(transaction_id))
        .filter(transaction_line::Column::Status.eq(true))
        .exec(db)
        .await
        .map_err(ServiceError::db_error)?;
    Ok(result.rows_affected)
}

pub(crate) fn validate_input(input: &TransactionInput) -> Result<(), ServiceError> {
    validate_order_lines(&input.lines)?;
    if input.tender.cash < Decimal::ZERO
        || input.tender.card < Decimal::ZERO
        || input.tender.upi < Decimal::ZERO
    {
        return Err(ServiceError::ValidationError(
            "tender amounts cannot be negative".to_string(),
        ));
    }
    Ok(())
}

/// Line-cart validation shared with the order service, which has no tender.
pub(crate) fn validate_order_lines(lines: &[LineInput]) -> Result<(), ServiceError> {
    if lines.is_empty() {
        return Err(ServiceError::ValidationError(
            "transaction requires at least one line item".to_string(),
        ));
    }
    for line in lines {
        if line.quantity <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(format!(
                "line for item {} must have a positive quantity",
                line.item_id
            )));
        }
        if line.rate < Decimal::ZERO
            || line.discount_amount < Decimal::ZERO
            || line.cgst_amount < Decimal::ZERO
            || line.sgst_amount < Decimal::ZERO
        {
            return Err(ServiceError::ValidationError(format!(
                "line for item {} carries a negative amount",
                line.item_id
            )));
        }
    }
    Ok(())
}
