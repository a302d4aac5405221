use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};
use tracing::instrument;

use crate::{
    entities::transaction::{self, Entity as TransactionEntity, TransactionKind},
    errors::ServiceError,
};

/// Produces sequential human-readable transaction numbers scoped by
/// (family, financial year, location).
///
/// Only brand-new headers receive a number; edits preserve the stored
/// number verbatim, even when the edit moves the header to another scope.
/// The next sequence is therefore derived from the highest sequence ever
/// issued under the scope's prefix, matched on the number itself rather
/// than the header's current columns: a header that migrated out of the
/// scope still blocks its old number from being reissued.
#[derive(Clone, Debug, Default)]
pub struct TransactionNumberService;

impl TransactionNumberService {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip(self, db))]
    pub async fn next_number<C: ConnectionTrait>(
        &self,
        db: &C,
        kind: TransactionKind,
        location_id: i64,
        financial_year_id: i64,
    ) -> Result<String, ServiceError> {
        let prefix = Self::scope_prefix(kind, financial_year_id, location_id);

        let issued: Vec<String> = TransactionEntity::find()
            .select_only()
            .column(transaction::Column::TransactionNo)
            .filter(transaction::Column::TransactionNo.starts_with(&prefix))
            .into_tuple()
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let last = issued
            .iter()
            .filter_map(|no| Self::parse_sequence(no))
            .max()
            .unwrap_or(0);

        Ok(format!("{}{:05}", prefix, last + 1))
    }

    fn scope_prefix(kind: TransactionKind, financial_year_id: i64, location_id: i64) -> String {
        format!(
            "{}-{}-{}-",
            kind.number_prefix(),
            financial_year_id,
            location_id
        )
    }

    fn parse_sequence(transaction_no: &str) -> Option<u64> {
        transaction_no.rsplit('-').next()?.parse().ok()
    }
}
