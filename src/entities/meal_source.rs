//! Meal source entity - Provenance of a deducted meal.
//!
//! One row per inventory lot touched while deducting the meal, holding enough
//! of the lot's attributes to recreate it on restoration.

use crate::models::{StorageLocation, Unit};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Meal source database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meal_sources")]
pub struct Model {
    /// Row identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning meal
    pub meal_id: i64,
    /// Lot the quantity came from; the lot itself may no longer exist
    pub inventory_id: Option<i64>,
    /// Catalog product id
    pub product_id: i64,
    /// Amount consumed, in the lot's unit
    pub quantity: f64,
    /// The lot's unit
    pub unit: Unit,
    /// The lot's storage location
    pub storage_location: StorageLocation,
    /// The lot's expiration date
    pub expiration_date: Date,
}

/// Defines relationships between `MealSource` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each source belongs to one meal
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
