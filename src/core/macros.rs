//! Macro calculator - linear per-100 g scaling of product macros.
//!
//! Calories are rounded to whole kcal, the gram macros to one decimal. Meal
//! totals are summed from individually rounded items and then rounded again,
//! so a meal total can differ slightly from a recomputation over raw values.

use crate::{
    core::product::ProductMap,
    entities::{ProductModel, SettingsModel},
    models::{MacroTotals, Meal, MealItem, Unit},
};

/// Rounds half up, the way the stored totals have always been rounded.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Rounds to one decimal place, half up.
pub(crate) fn round1(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}

/// Converts a quantity into grams for macro scaling.
///
/// Pieces are multiplied by the product's piece weight when it has one; grams
/// and millilitres pass through unchanged.
#[must_use]
pub fn weight_in_grams(quantity: f64, unit: Unit, product: &ProductModel) -> f64 {
    match (unit, product.piece_weight_grams) {
        (Unit::Pieces, Some(weight)) if weight > 0.0 => quantity * weight,
        _ => quantity,
    }
}

/// Macros of a single line item.
#[must_use]
pub fn item_macros(item: &MealItem, product: &ProductModel) -> MacroTotals {
    let factor = weight_in_grams(item.quantity, item.unit, product) / 100.0;
    MacroTotals {
        kcal: round_half_up(product.kcal_per_100 * factor),
        protein: round1(product.protein_per_100 * factor),
        fat: round1(product.fat_per_100 * factor),
        carbs: round1(product.carbs_per_100 * factor),
        simple_carbs: round1(product.simple_carbs_per_100 * factor),
    }
}

/// Sums item macros over a meal. Items whose product is not in `products` are skipped.
#[must_use]
pub fn meal_macros(items: &[MealItem], products: &ProductMap) -> MacroTotals {
    let mut totals = MacroTotals::default();
    for item in items {
        let Some(product) = products.get(&item.product_id) else {
            continue;
        };
        let m = item_macros(item, product);
        totals.kcal += m.kcal;
        totals.protein += m.protein;
        totals.fat += m.fat;
        totals.carbs += m.carbs;
        totals.simple_carbs += m.simple_carbs;
    }
    MacroTotals {
        kcal: round_half_up(totals.kcal),
        protein: round1(totals.protein),
        fat: round1(totals.fat),
        carbs: round1(totals.carbs),
        simple_carbs: round1(totals.simple_carbs),
    }
}

/// Adds up the stored totals of already logged meals.
#[must_use]
pub fn consumed_totals(meals: &[Meal]) -> MacroTotals {
    meals.iter().fold(MacroTotals::default(), |acc, meal| MacroTotals {
        kcal: acc.kcal + meal.totals.kcal,
        protein: acc.protein + meal.totals.protein,
        fat: acc.fat + meal.totals.fat,
        carbs: acc.carbs + meal.totals.carbs,
        simple_carbs: acc.simple_carbs + meal.totals.simple_carbs,
    })
}

/// What is left of the daily targets, floored at zero.
///
/// Simple carbs have no positive budget and are always reported as 0.
#[must_use]
pub fn remaining_macros(settings: &SettingsModel, consumed: &MacroTotals) -> MacroTotals {
    MacroTotals {
        kcal: (settings.daily_kcal - consumed.kcal).max(0.0),
        protein: (settings.daily_protein - consumed.protein).max(0.0),
        fat: (settings.daily_fat - consumed.fat).max(0.0),
        carbs: (settings.daily_carbs - consumed.carbs).max(0.0),
        simple_carbs: 0.0,
    }
}

/// Even share of the remaining budget for the next meal.
///
/// `meals_left` below 1 is treated as 1.
#[must_use]
pub fn ideal_meal_macros(remaining: &MacroTotals, meals_left: i32) -> MacroTotals {
    let meals_left = f64::from(meals_left.max(1));
    MacroTotals {
        kcal: round_half_up(remaining.kcal / meals_left),
        protein: round1(remaining.protein / meals_left),
        fat: round1(remaining.fat / meals_left),
        carbs: round1(remaining.carbs / meals_left),
        simple_carbs: 0.0,
    }
}

/// Simple carbs as a share of consumed energy, in percent (4 kcal per gram).
#[must_use]
pub fn simple_carb_share_percent(consumed: &MacroTotals) -> f64 {
    if consumed.kcal > 0.0 {
        consumed.simple_carbs * 4.0 / consumed.kcal * 100.0
    } else {
        0.0
    }
}

/// Whether today's simple carbs are above the configured limit.
#[must_use]
pub fn exceeds_simple_carb_limit(settings: &SettingsModel, consumed: &MacroTotals) -> bool {
    simple_carb_share_percent(consumed) > settings.simple_carb_limit_percent
}
