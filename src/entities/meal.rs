//! Meal entity - A logged meal with denormalized macro totals.
//!
//! Totals are computed once when the meal is logged and never recomputed.
//! Line items and provenance live in `meal_items` and `meal_sources`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Meal database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meals")]
pub struct Model {
    /// Unique identifier for the meal
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Log date
    pub date: Date,
    /// Energy in kcal
    pub total_kcal: f64,
    /// Protein in grams
    pub total_protein: f64,
    /// Fat in grams
    pub total_fat: f64,
    /// Carbohydrates in grams
    pub total_carbs: f64,
    /// Simple carbohydrates in grams
    pub total_simple_carbs: f64,
    /// When the meal was logged
    pub created_at: DateTimeUtc,
    /// Whether the meal was deducted from inventory (sources recorded)
    pub has_sources: bool,
}

/// Defines relationships between Meal and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One meal has many line items
    #[sea_orm(has_many = "super::meal_item::Entity")]
    Items,
    /// One meal has many provenance records
    #[sea_orm(has_many = "super::meal_source::Entity")]
    Sources,
}

impl Related<super::meal_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Related<super::meal_source::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sources.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
