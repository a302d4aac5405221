use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use tracing::instrument;

use crate::{
    entities::{
        recipe::{self, Entity as RecipeEntity},
        recipe_line::{self, Entity as RecipeLineEntity},
    },
    errors::ServiceError,
};

/// Direction of a recipe explosion, deciding the sign of the derived
/// raw-material movements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionDirection {
    /// Finished product leaves stock; raw materials were consumed.
    Outflow,
    /// Finished product re-enters stock; raw-material consumption reverses.
    Inflow,
}

impl ExplosionDirection {
    fn sign(&self) -> Decimal {
        match self {
            ExplosionDirection::Outflow => Decimal::NEGATIVE_ONE,
            ExplosionDirection::Inflow => Decimal::ONE,
        }
    }
}

/// One raw-material consumption derived from a recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct RawConsumption {
    pub raw_material_id: i64,
    /// Signed per the explosion direction.
    pub quantity: Decimal,
    /// Per-unit valuation of the raw material derived from the line's net
    /// rate.
    pub net_rate: Decimal,
}

/// Maps a finished-product quantity to its raw-material consumption via the
/// product's active recipe.
#[derive(Clone, Debug, Default)]
pub struct RecipeService;

impl RecipeService {
    pub fn new() -> Self {
        Self
    }

    /// Explodes `quantity` units of `product_id` into raw-material
    /// consumptions. A product without an active recipe explodes to nothing:
    /// purchased-only items are valid.
    ///
    /// The per-unit net rate is `line_net_rate / recipe_line.quantity`. A
    /// zero-quantity recipe line fails the operation rather than dividing.
    #[instrument(skip(self, db))]
    pub async fn explode<C: ConnectionTrait>(
        &self,
        db: &C,
        product_id: i64,
        quantity: Decimal,
        line_net_rate: Decimal,
        direction: ExplosionDirection,
    ) -> Result<Vec<RawConsumption>, ServiceError> {
        let recipe = RecipeEntity::find()
            .filter(recipe::Column::ProductId.eq(product_id))
            .filter(recipe::Column::Status.eq(true))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        let Some(recipe) = recipe else {
            return Ok(Vec::new());
        };

        let lines = RecipeLineEntity::find()
            .filter(recipe_line::Column::RecipeId.eq(recipe.id))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let sign = direction.sign();
        let mut consumptions = Vec::with_capacity(lines.len());
        for line in lines {
            if line.quantity.is_zero() {
                return Err(ServiceError::InvalidOperation(format!(
                    "recipe {} has a zero-quantity line for raw material {}",
                    recipe.id, line.raw_material_id
                )));
            }
            consumptions.push(RawConsumption {
                raw_material_id: line.raw_material_id,
                quantity: sign * line.quantity * quantity,
                net_rate: line_net_rate / line.quantity,
            });
        }

        Ok(consumptions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn direction_signs() {
        assert_eq!(ExplosionDirection::Outflow.sign(), dec!(-1));
        assert_eq!(ExplosionDirection::Inflow.sign(), dec!(1));
    }
}
