//! Forecast engine - can tomorrow's meals be covered by what is in stock?
//!
//! Tomorrow is simulated as up to three meals against a full day's budget,
//! always taking the generator's best candidate. The result carries an overall
//! tier and shopping suggestions.

use crate::{
    core::{
        expiration::is_expiring_for_tomorrow,
        generator::{GeneratorOptions, generate_candidates},
        macros::{ideal_meal_macros, round_half_up},
        product::ProductMap,
    },
    entities::{SettingsModel, inventory_lot},
    models::{ForecastStatus, MacroTotals, MealCandidate, MealTier, ShoppingReason, ShoppingSuggestion},
};
use chrono::NaiveDate;
use tracing::debug;

/// Meals simulated for tomorrow
pub const FORECAST_MEALS: usize = 3;
/// Share of a daily target left unmet that triggers a shopping suggestion
pub const SHORTFALL_SHARE: f64 = 0.3;

fn full_day_budget(settings: &SettingsModel) -> MacroTotals {
    MacroTotals {
        kcal: settings.daily_kcal,
        protein: settings.daily_protein,
        fat: settings.daily_fat,
        carbs: settings.daily_carbs,
        simple_carbs: 0.0,
    }
}

fn subtract_floored(remaining: &MacroTotals, meal: &MacroTotals) -> MacroTotals {
    MacroTotals {
        kcal: (remaining.kcal - meal.kcal).max(0.0),
        protein: (remaining.protein - meal.protein).max(0.0),
        fat: (remaining.fat - meal.fat).max(0.0),
        carbs: (remaining.carbs - meal.carbs).max(0.0),
        simple_carbs: 0.0,
    }
}

fn overall_tier(meals: &[MealCandidate]) -> MealTier {
    if meals.len() < FORECAST_MEALS || meals.iter().any(|m| m.tier == MealTier::Red) {
        MealTier::Red
    } else if meals.iter().any(|m| m.tier == MealTier::Yellow) {
        MealTier::Yellow
    } else {
        MealTier::Green
    }
}

fn shopping_suggestions(
    meals: &[MealCandidate],
    remaining: &MacroTotals,
    settings: &SettingsModel,
    expiring: usize,
) -> Vec<ShoppingSuggestion> {
    let mut suggestions = Vec::new();

    if meals.len() < FORECAST_MEALS {
        suggestions.push(ShoppingSuggestion {
            reason: ShoppingReason::NoItems,
            message: "Not enough inventory items to compose 3 meals. Stock up on variety."
                .to_string(),
        });
    }

    let shortfalls = [
        (
            ShoppingReason::LowProtein,
            remaining.protein,
            settings.daily_protein,
            "protein",
            "chicken, fish, or eggs",
        ),
        (
            ShoppingReason::LowCarbs,
            remaining.carbs,
            settings.daily_carbs,
            "carbs",
            "rice, oats, or sweet potato",
        ),
        (
            ShoppingReason::LowFat,
            remaining.fat,
            settings.daily_fat,
            "fat",
            "avocado, nuts, or olive oil",
        ),
    ];
    for (reason, left, target, macro_name, ideas) in shortfalls {
        if left > target * SHORTFALL_SHARE {
            suggestions.push(ShoppingSuggestion {
                reason,
                message: format!(
                    "Need ~{}g more {macro_name}. Consider {ideas}.",
                    round_half_up(left)
                ),
            });
        }
    }

    if expiring > 0 {
        suggestions.push(ShoppingSuggestion {
            reason: ShoppingReason::Expiring,
            message: format!("{expiring} item(s) expiring soon. Plan to use them or replace."),
        });
    }

    suggestions
}

/// Projects tomorrow from the current inventory.
///
/// Lots due today or already expired are left out of the simulation. The
/// expiring count covers every lot within two days of tomorrow, including
/// those left out.
#[must_use]
pub fn generate_forecast(
    lots: &[inventory_lot::Model],
    products: &ProductMap,
    settings: &SettingsModel,
    today: NaiveDate,
) -> ForecastStatus {
    let options = GeneratorOptions::for_tomorrow(today);
    let mut remaining = full_day_budget(settings);
    let mut meals_left = settings.meals_per_day;
    let mut meals: Vec<MealCandidate> = Vec::with_capacity(FORECAST_MEALS);

    for _ in 0..FORECAST_MEALS {
        let ideal = ideal_meal_macros(&remaining, meals_left);
        let Some(best) = generate_candidates(lots, products, &ideal, &options)
            .into_iter()
            .next()
        else {
            break;
        };
        remaining = subtract_floored(&remaining, &best.totals);
        meals_left -= 1;
        meals.push(best);
    }

    let expiring = lots
        .iter()
        .filter(|lot| is_expiring_for_tomorrow(lot.expiration_date, today))
        .count();

    let tier = overall_tier(&meals);
    let shopping_needed = shopping_suggestions(&meals, &remaining, settings, expiring);
    debug!(
        "Forecast for tomorrow: {} meal(s), tier {}, {} suggestion(s)",
        meals.len(),
        tier,
        shopping_needed.len()
    );

    ForecastStatus {
        tier,
        meals,
        shopping_needed,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::models::Unit;
    use crate::test_utils::{builtin_product_map, date, default_settings_model, lot_model};

    fn reasons(status: &ForecastStatus) -> Vec<ShoppingReason> {
        status.shopping_needed.iter().map(|s| s.reason).collect()
    }

    fn id_of(products: &ProductMap, name: &str) -> i64 {
        products.values().find(|p| p.name == name).unwrap().id
    }

    #[test]
    fn test_empty_inventory_is_red() {
        let products = builtin_product_map();
        let status = generate_forecast(&[], &products, &default_settings_model(), date(2025, 6, 1));

        assert!(status.meals.is_empty());
        assert_eq!(status.tier, MealTier::Red);
        assert_eq!(
            reasons(&status),
            vec![
                ShoppingReason::NoItems,
                ShoppingReason::LowProtein,
                ShoppingReason::LowCarbs,
                ShoppingReason::LowFat,
            ]
        );
        assert_eq!(
            status.shopping_needed[1].message,
            "Need ~150g more protein. Consider chicken, fish, or eggs."
        );
    }

    #[test]
    fn test_due_today_lots_are_left_out_but_counted_as_expiring() {
        let products = builtin_product_map();
        let today = date(2025, 6, 1);
        let lots = vec![
            lot_model(1, id_of(&products, "Chicken Breast"), 500.0, Unit::Grams, today),
            lot_model(2, id_of(&products, "Rice (white)"), 500.0, Unit::Grams, today),
            lot_model(3, id_of(&products, "Oats"), 500.0, Unit::Grams, date(2025, 6, 3)),
            lot_model(4, id_of(&products, "Salmon"), 500.0, Unit::Grams, date(2025, 6, 20)),
        ];
        let status = generate_forecast(&lots, &products, &default_settings_model(), today);

        for meal in &status.meals {
            assert!(meal.items.iter().all(|i| i.product_id != lots[0].product_id));
            assert!(meal.items.iter().all(|i| i.product_id != lots[1].product_id));
        }
        let expiring = status
            .shopping_needed
            .iter()
            .find(|s| s.reason == ShoppingReason::Expiring)
            .unwrap();
        assert_eq!(expiring.message, "3 item(s) expiring soon. Plan to use them or replace.");
    }

    #[test]
    fn test_well_stocked_inventory_plans_three_meals() {
        let products = builtin_product_map();
        let today = date(2025, 6, 1);
        let far = date(2025, 7, 1);
        let names = [
            "Chicken Breast",
            "Rice (white)",
            "Oats",
            "Salmon",
            "Greek Yogurt",
            "Olive Oil",
            "Sweet Potato",
            "Almonds",
        ];
        let lots: Vec<_> = names
            .iter()
            .zip(1..)
            .map(|(name, id)| {
                let product_id = id_of(&products, name);
                let unit = products[&product_id].default_unit;
                lot_model(id, product_id, 1000.0, unit, far)
            })
            .collect();

        let status = generate_forecast(&lots, &products, &default_settings_model(), today);
        assert_eq!(status.meals.len(), FORECAST_MEALS);
        assert!(!reasons(&status).contains(&ShoppingReason::NoItems));
        assert!(!reasons(&status).contains(&ShoppingReason::Expiring));
    }

    #[test]
    fn test_overall_tier_rules() {
        let candidate = |tier| MealCandidate {
            items: Vec::new(),
            totals: MacroTotals::default(),
            tier,
            score: 0.0,
        };
        let green = candidate(MealTier::Green);
        let yellow = candidate(MealTier::Yellow);
        let red = candidate(MealTier::Red);

        assert_eq!(overall_tier(&[green.clone(), green.clone(), green.clone()]), MealTier::Green);
        assert_eq!(overall_tier(&[green.clone(), yellow.clone(), green.clone()]), MealTier::Yellow);
        assert_eq!(overall_tier(&[green.clone(), yellow, red]), MealTier::Red);
        assert_eq!(overall_tier(&[green.clone(), green]), MealTier::Red);
    }
}
