//! Product entity - A catalog template with macros per 100 g / 100 ml.
//!
//! Products are referenced by id from inventory lots, meal items and meal
//! sources; they are never embedded.

use crate::models::Unit;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Chicken Breast")
    pub name: String,
    /// Energy per 100 g/ml
    pub kcal_per_100: f64,
    /// Protein grams per 100 g/ml
    pub protein_per_100: f64,
    /// Fat grams per 100 g/ml
    pub fat_per_100: f64,
    /// Carbohydrate grams per 100 g/ml
    pub carbs_per_100: f64,
    /// Simple carbohydrate grams per 100 g/ml
    pub simple_carbs_per_100: f64,
    /// Unit the product is normally counted in
    pub default_unit: Unit,
    /// Weight of one piece in grams; expected when `default_unit` is pieces
    pub piece_weight_grams: Option<f64>,
}

/// Product has no foreign-keyed relationships; lots, meal items and sources
/// hold its id as a plain column
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
