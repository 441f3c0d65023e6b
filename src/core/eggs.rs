//! Daily egg limit.
//!
//! Eggs are recognised by product name. The generator receives an
//! [`EggAllowance`] and skips combinations that would go over it.

use crate::{
    core::product::ProductMap,
    models::{Meal, MealItem, Unit},
};

/// Most eggs allowed in one day
pub const EGG_MAX_PER_DAY: f64 = 3.0;

/// How many more eggs today's meals may contain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EggAllowance {
    /// Catalog id of the egg product
    pub product_id: i64,
    /// Eggs still allowed today
    pub remaining: f64,
}

fn is_egg_name(name: &str) -> bool {
    matches!(name.trim().to_lowercase().as_str(), "egg" | "eggs")
}

/// Finds the egg product in the catalog. The lowest id wins if several match.
#[must_use]
pub fn egg_product_id(products: &ProductMap) -> Option<i64> {
    products
        .values()
        .filter(|p| is_egg_name(&p.name))
        .map(|p| p.id)
        .min()
}

/// Counts eggs in `items`: pieces directly, grams through the piece weight.
#[must_use]
pub fn count_eggs(items: &[MealItem], products: &ProductMap, egg_product_id: i64) -> f64 {
    items
        .iter()
        .filter(|item| item.product_id == egg_product_id)
        .map(|item| match item.unit {
            Unit::Pieces => item.quantity,
            Unit::Grams => products
                .get(&item.product_id)
                .and_then(|p| p.piece_weight_grams)
                .filter(|w| *w > 0.0)
                .map_or(0.0, |w| item.quantity / w),
            Unit::Millilitres => 0.0,
        })
        .sum()
}

/// Eggs left for today given the meals already logged, or `None` when the
/// catalog has no egg product.
#[must_use]
pub fn egg_allowance(meals_today: &[Meal], products: &ProductMap) -> Option<EggAllowance> {
    let product_id = egg_product_id(products)?;
    let eaten: f64 = meals_today
        .iter()
        .map(|meal| count_eggs(&meal.items, products, product_id))
        .sum();
    Some(EggAllowance {
        product_id,
        remaining: (EGG_MAX_PER_DAY - eaten).max(0.0),
    })
}
