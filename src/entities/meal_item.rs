//! Meal item entity - One line of a logged meal.
//!
//! `position` keeps the original item order within the meal.

use crate::models::Unit;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Meal item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meal_items")]
pub struct Model {
    /// Row identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning meal
    pub meal_id: i64,
    /// Order within the meal
    pub position: i32,
    /// Catalog product id
    pub product_id: i64,
    /// Amount in `unit`
    pub quantity: f64,
    /// Unit of `quantity`
    pub unit: Unit,
}

/// Defines relationships between `MealItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each item belongs to one meal
    #[sea_orm(
        belongs_to = "super::meal::Entity",
        from = "Column::MealId",
        to = "super::meal::Column::Id"
    )]
    Meal,
}

impl Related<super::meal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
