use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Bill-of-materials header tying one finished product to its raw-material
/// consumption lines. Read-only from the settlement core's perspective.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub product_id: i64,
    pub status: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recipe_line::Entity")]
    RecipeLine,
}

impl Related<super::recipe_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeLine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
