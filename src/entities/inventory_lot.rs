//! Inventory lot entity - One physical batch of a product.
//!
//! Each lot has its own quantity, unit, storage location and expiration date.
//! Lots are decremented or deleted by deduction and incremented or recreated
//! by restoration.

use crate::models::{StorageLocation, Unit};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Inventory lot database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_lots")]
pub struct Model {
    /// Unique identifier for the lot
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Catalog product this lot holds (weak reference)
    pub product_id: i64,
    /// Amount on hand, in `unit`
    pub quantity: f64,
    /// Unit of `quantity`
    pub unit: Unit,
    /// Fridge, freezer or pantry
    pub storage_location: StorageLocation,
    /// Calendar date the lot expires
    pub expiration_date: Date,
    /// When the lot was added
    pub added_at: DateTimeUtc,
}

/// Lots reference products by plain id; a lot may outlive its product
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
