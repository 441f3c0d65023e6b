//! Domain types shared by the engine and the store layer.
//!
//! Units and storage locations double as `SeaORM` active enums so entity models
//! carry them typed; everything else here is a plain value type that never
//! touches the database directly.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit a quantity is expressed in.
///
/// Grams and millilitres are treated as mass-equivalent for macro scaling.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Unit {
    /// Grams
    #[sea_orm(string_value = "g")]
    #[serde(rename = "g")]
    Grams,
    /// Millilitres
    #[sea_orm(string_value = "ml")]
    #[serde(rename = "ml")]
    Millilitres,
    /// Countable pieces, weighed through the product's piece weight
    #[sea_orm(string_value = "pieces")]
    #[serde(rename = "pieces")]
    Pieces,
}

impl Unit {
    /// Short storage / display form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grams => "g",
            Self::Millilitres => "ml",
            Self::Pieces => "pieces",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "g" | "gram" | "grams" => Ok(Self::Grams),
            "ml" | "millilitre" | "millilitres" | "milliliter" | "milliliters" => {
                Ok(Self::Millilitres)
            }
            "pieces" | "piece" | "pcs" | "pc" => Ok(Self::Pieces),
            other => Err(crate::errors::Error::Config {
                message: format!("Unknown unit '{other}'"),
            }),
        }
    }
}

/// Where an inventory lot is kept
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum StorageLocation {
    /// Refrigerator
    #[sea_orm(string_value = "fridge")]
    Fridge,
    /// Freezer
    #[sea_orm(string_value = "freezer")]
    Freezer,
    /// Dry storage
    #[sea_orm(string_value = "pantry")]
    Pantry,
}

/// Kcal, protein, fat, carbs and the simple-carb subset of carbs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
    /// Energy in kcal
    pub kcal: f64,
    /// Protein in grams
    pub protein: f64,
    /// Fat in grams
    pub fat: f64,
    /// Carbohydrates in grams
    pub carbs: f64,
    /// Simple carbohydrates in grams (subset of `carbs`)
    pub simple_carbs: f64,
}

/// One line of a meal: a product and how much of it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealItem {
    /// Catalog product id
    pub product_id: i64,
    /// Amount in `unit`
    pub quantity: f64,
    /// Unit of `quantity`
    pub unit: Unit,
}

/// A request to take `quantity` of a product out of inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionRequest {
    /// Catalog product id
    pub product_id: i64,
    /// Amount to take
    pub quantity: f64,
    /// Unit of `quantity`
    pub unit: Unit,
}

impl From<&MealItem> for DeductionRequest {
    fn from(item: &MealItem) -> Self {
        Self {
            product_id: item.product_id,
            quantity: item.quantity,
            unit: item.unit,
        }
    }
}

/// Provenance of a deduction: how much was taken from which lot.
///
/// Carries everything needed to recreate the lot if it has since been deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySource {
    /// Lot the quantity came from, if known
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
    pub expiration_date: NaiveDate,
}

/// A logged meal with its line items and optional inventory provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    /// Meal id
    pub id: i64,
    /// Log date
    pub date: NaiveDate,
    /// Line items
    pub items: Vec<MealItem>,
    /// Totals computed once at logging time
    pub totals: MacroTotals,
    /// When the meal was logged
    pub created_at: DateTime<Utc>,
    /// Lots consumed for this meal; `None` for manually logged meals
    pub sources: Option<Vec<InventorySource>>,
}

/// Qualitative fit of a meal against its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealTier {
    /// Average deviation ≤ 10%
    Green,
    /// Average deviation ≤ 20%
    Yellow,
    /// Anything worse
    Red,
}

impl fmt::Display for MealTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        })
    }
}

/// A suggested meal; becomes a [`Meal`] only when accepted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealCandidate {
    /// Line items at their discretized portion sizes
    pub items: Vec<MealItem>,
    /// Aggregated macros
    pub totals: MacroTotals,
    /// Fit bucket
    pub tier: MealTier,
    /// Lower is better
    pub score: f64,
}

/// Why a shopping suggestion fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShoppingReason {
    /// Fewer than three meals could be composed
    NoItems,
    /// Protein budget left largely unmet
    LowProtein,
    /// Carb budget left largely unmet
    LowCarbs,
    /// Fat budget left largely unmet
    LowFat,
    /// Lots close to their expiration date
    Expiring,
}

/// Advice attached to a forecast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingSuggestion {
    /// Trigger
    pub reason: ShoppingReason,
    /// Message for the user
    pub message: String,
}

/// Projection of tomorrow's feasibility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastStatus {
    /// Overall fit
    pub tier: MealTier,
    /// Simulated meals, at most three
    pub meals: Vec<MealCandidate>,
    /// Suggestions, possibly several
    pub shopping_needed: Vec<ShoppingSuggestion>,
}
