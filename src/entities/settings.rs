//! Settings entity - The singleton holding daily macro targets.
//! Exactly one row exists once `ensure_default_settings` has run.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Settings database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Daily energy target in kcal
    pub daily_kcal: f64,
    /// Daily protein target in grams
    pub daily_protein: f64,
    /// Daily fat target in grams
    pub daily_fat: f64,
    /// Daily carbohydrate target in grams
    pub daily_carbs: f64,
    /// Upper limit for simple carbs as a share of energy, 0-100
    pub simple_carb_limit_percent: f64,
    /// Planned meals per day, at least 1
    pub meals_per_day: i32,
}

/// `Settings` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
