use sea_orm::{ConnectionTrait, EntityTrait};
use tracing::{instrument, warn};

use crate::{
    entities::financial_year::{self, Entity as FinancialYearEntity},
    errors::ServiceError,
};

/// Gate on the financial period of a transaction.
///
/// Every orchestrator entry point runs this against the target year before
/// writing, and on edits additionally against the stored header's original
/// year: editing a transaction whose original period has since been locked
/// must fail even when the new date's period is open.
#[derive(Clone, Debug, Default)]
pub struct FinancialPeriodService;

impl FinancialPeriodService {
    pub fn new() -> Self {
        Self
    }

    /// Fails with `PeriodLocked` unless the year exists, is active and
    /// unlocked. Performs no writes.
    #[instrument(skip(self, db))]
    pub async fn ensure_open<C: ConnectionTrait>(
        &self,
        db: &C,
        financial_year_id: i64,
    ) -> Result<financial_year::Model, ServiceError> {
        let year = FinancialYearEntity::find_by_id(financial_year_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::PeriodLocked(format!(
                    "financial year {} does not exist",
                    financial_year_id
                ))
            })?;

        if !year.is_open() {
            warn!(
                financial_year_id,
                locked = year.locked,
                active = year.status,
                "write rejected by period guard"
            );
            return Err(ServiceError::PeriodLocked(format!(
                "financial year {} is locked or inactive",
                year.name
            )));
        }

        Ok(year)
    }
}
