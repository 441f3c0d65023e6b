//! Daily summary generation.
//!
//! This module assembles everything a user wants to see about the current day:
//! what was eaten, what is left of the targets, the next meal's ideal macros,
//! suggested meals from stock, lots that need attention and tomorrow's
//! forecast. Building the summary is pure; [`generate_daily_summary`] only
//! loads the snapshots from the store. Rendering returns plain text.

use crate::{
    core::{
        eggs::{EggAllowance, egg_allowance},
        expiration::{ExpirationStatus, expiration_status},
        forecast::generate_forecast,
        generator::{GeneratorOptions, generate_candidates},
        inventory,
        macros::{
            consumed_totals, exceeds_simple_carb_limit, ideal_meal_macros, remaining_macros,
            simple_carb_share_percent,
        },
        meal::{meals_for_date, meals_left_today},
        product::{self, ProductMap},
        settings::get_settings,
    },
    entities::{SettingsModel, inventory_lot},
    errors::Result,
    models::{ForecastStatus, MacroTotals, Meal, MealCandidate, MealItem},
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use std::fmt::Write as _;
use tracing::{debug, instrument};

/// A lot that is expired or close to expiring
#[derive(Debug, Clone, PartialEq)]
pub struct LotAlert {
    /// The lot
    pub lot: inventory_lot::Model,
    /// Product name, or `#id` for unknown products
    pub product_name: String,
    /// Never [`ExpirationStatus::Ok`]
    pub status: ExpirationStatus,
}

/// Everything about one day, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    /// Day summarized
    pub date: NaiveDate,
    /// Daily targets
    pub targets: MacroTotals,
    /// Sum of today's logged meals
    pub consumed: MacroTotals,
    /// Targets minus consumed, floored at zero
    pub remaining: MacroTotals,
    /// Meals logged today
    pub meals_logged: usize,
    /// Meals still to plan, at least one
    pub meals_left: i32,
    /// Even share of the remaining budget
    pub ideal_next_meal: MacroTotals,
    /// Simple carbs as a share of consumed energy, percent
    pub simple_carb_share: f64,
    /// Whether `simple_carb_share` is above the configured limit
    pub simple_carb_limit_exceeded: bool,
    /// Eggs still allowed today, if the catalog has eggs
    pub egg_allowance: Option<EggAllowance>,
    /// Suggested next meals, best first
    pub candidates: Vec<MealCandidate>,
    /// Lots needing attention, soonest first
    pub alerts: Vec<LotAlert>,
    /// Tomorrow's projection
    pub forecast: ForecastStatus,
}

fn daily_targets(settings: &SettingsModel) -> MacroTotals {
    MacroTotals {
        kcal: settings.daily_kcal,
        protein: settings.daily_protein,
        fat: settings.daily_fat,
        carbs: settings.daily_carbs,
        simple_carbs: 0.0,
    }
}

fn product_name(products: &ProductMap, product_id: i64) -> String {
    products
        .get(&product_id)
        .map_or_else(|| format!("#{product_id}"), |p| p.name.clone())
}

fn lot_alerts(lots: &[inventory_lot::Model], products: &ProductMap, today: NaiveDate) -> Vec<LotAlert> {
    let mut alerts: Vec<LotAlert> = lots
        .iter()
        .filter_map(|lot| {
            let status = expiration_status(lot.expiration_date, today);
            (status != ExpirationStatus::Ok).then(|| LotAlert {
                lot: lot.clone(),
                product_name: product_name(products, lot.product_id),
                status,
            })
        })
        .collect();
    alerts.sort_by_key(|alert| (alert.lot.expiration_date, alert.lot.id));
    alerts
}

/// Builds the summary from snapshots of settings, today's meals and inventory.
#[must_use]
pub fn build_daily_summary(
    settings: &SettingsModel,
    meals_today: &[Meal],
    lots: &[inventory_lot::Model],
    products: &ProductMap,
    today: NaiveDate,
) -> DailySummary {
    let consumed = consumed_totals(meals_today);
    let remaining = remaining_macros(settings, &consumed);
    let meals_left = meals_left_today(settings, meals_today.len());
    let ideal_next_meal = ideal_meal_macros(&remaining, meals_left);
    let eggs = egg_allowance(meals_today, products);

    let options = GeneratorOptions::for_today(today).with_egg_allowance(eggs);
    let candidates = generate_candidates(lots, products, &ideal_next_meal, &options);

    DailySummary {
        date: today,
        targets: daily_targets(settings),
        consumed,
        remaining,
        meals_logged: meals_today.len(),
        meals_left,
        ideal_next_meal,
        simple_carb_share: simple_carb_share_percent(&consumed),
        simple_carb_limit_exceeded: exceeds_simple_carb_limit(settings, &consumed),
        egg_allowance: eggs,
        candidates,
        alerts: lot_alerts(lots, products, today),
        forecast: generate_forecast(lots, products, settings, today),
    }
}

/// Loads settings, today's meals, inventory and the catalog, then builds the summary.
#[instrument(skip(db))]
pub async fn generate_daily_summary(db: &DatabaseConnection, today: NaiveDate) -> Result<DailySummary> {
    let settings = get_settings(db).await?;
    let meals = meals_for_date(db, today).await?;
    let lots = inventory::get_all_lots(db).await?;
    let products = product::product_map(db).await?;

    let summary = build_daily_summary(&settings, &meals, &lots, &products, today);
    debug!(
        "Summary for {}: {} meal(s) logged, {} candidate(s), {} alert(s)",
        today,
        summary.meals_logged,
        summary.candidates.len(),
        summary.alerts.len()
    );
    Ok(summary)
}

/// How much of a target has been consumed, in percent.
///
/// A zero target yields 0.
#[must_use]
pub fn calculate_progress(consumed: f64, target: f64) -> f64 {
    if target == 0.0 {
        return 0.0;
    }

    (consumed / target) * 100.0
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80.0%`
/// The bar is clamped to 0-100 while the printed percentage is not.
#[must_use]
pub fn format_progress_bar(progress_percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped_progress = progress_percent.clamp(0.0, 100.0);

    // clamped_progress is in [0, 100] and length is small
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped_progress / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    let filled_str = "█".repeat(filled);
    let empty_str = "░".repeat(empty);

    format!("[{filled_str}{empty_str}] {progress_percent:.1}%")
}

/// One line item, e.g. `Chicken Breast 150 g`.
#[must_use]
pub fn format_item(item: &MealItem, products: &ProductMap) -> String {
    format!(
        "{} {} {}",
        product_name(products, item.product_id),
        item.quantity,
        item.unit
    )
}

/// Macro totals on one line.
#[must_use]
pub fn format_macros(totals: &MacroTotals) -> String {
    format!(
        "{} kcal | P {:.1} g | F {:.1} g | C {:.1} g",
        totals.kcal, totals.protein, totals.fat, totals.carbs
    )
}

/// A suggested meal on one line, e.g. `[green] Chicken Breast 150 g + Rice (white) 200 g`.
#[must_use]
pub fn format_candidate(candidate: &MealCandidate, products: &ProductMap) -> String {
    let items: Vec<String> = candidate
        .items
        .iter()
        .map(|item| format_item(item, products))
        .collect();
    format!(
        "[{}] {} ({})",
        candidate.tier,
        items.join(" + "),
        format_macros(&candidate.totals)
    )
}

/// Renders the summary as plain text.
#[must_use]
pub fn render_daily_summary(summary: &DailySummary, products: &ProductMap) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Daily summary for {}", summary.date);
    let _ = writeln!(
        out,
        "Meals logged: {} ({} left)",
        summary.meals_logged, summary.meals_left
    );

    let rows = [
        ("Kcal", summary.consumed.kcal, summary.targets.kcal),
        ("Protein", summary.consumed.protein, summary.targets.protein),
        ("Fat", summary.consumed.fat, summary.targets.fat),
        ("Carbs", summary.consumed.carbs, summary.targets.carbs),
    ];
    for (name, consumed, target) in rows {
        let _ = writeln!(
            out,
            "{name:<8} {consumed:.1} / {target:.1} {}",
            format_progress_bar(calculate_progress(consumed, target), None)
        );
    }

    let _ = writeln!(
        out,
        "Simple carbs: {:.1}% of energy{}",
        summary.simple_carb_share,
        if summary.simple_carb_limit_exceeded {
            " (over limit)"
        } else {
            ""
        }
    );
    if let Some(eggs) = summary.egg_allowance {
        let _ = writeln!(out, "Eggs left today: {}", eggs.remaining);
    }

    let _ = writeln!(out, "\nNext meal target: {}", format_macros(&summary.ideal_next_meal));
    if summary.candidates.is_empty() {
        let _ = writeln!(out, "No suggestions: need at least two usable inventory lots.");
    }
    for (index, candidate) in summary.candidates.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", index + 1, format_candidate(candidate, products));
    }

    if !summary.alerts.is_empty() {
        let _ = writeln!(out, "\nNeeds attention:");
        for alert in &summary.alerts {
            let _ = writeln!(
                out,
                "  {} {} {} - {} ({})",
                alert.product_name,
                alert.lot.quantity,
                alert.lot.unit,
                alert.status.label(),
                alert.lot.expiration_date
            );
        }
    }

    let _ = writeln!(out, "\nTomorrow: {}", summary.forecast.tier);
    for suggestion in &summary.forecast.shopping_needed {
        let _ = writeln!(out, "  - {}", suggestion.message);
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::meal::log_manual_meal;
    use crate::core::settings::ensure_default_settings;
    use crate::models::{MealTier, Unit};
    use crate::test_utils::*;

    fn id_of(products: &ProductMap, name: &str) -> i64 {
        products.values().find(|p| p.name == name).unwrap().id
    }

    #[test]
    fn test_calculate_progress() {
        assert_eq!(calculate_progress(75.0, 150.0), 50.0);
        assert_eq!(calculate_progress(0.0, 150.0), 0.0);
        assert_eq!(calculate_progress(300.0, 150.0), 200.0);
        assert_eq!(calculate_progress(50.0, 0.0), 0.0);
    }

    #[test]
    fn test_format_progress_bar() {
        assert_eq!(format_progress_bar(100.0, Some(10)), "[██████████] 100.0%");
        assert_eq!(format_progress_bar(50.0, Some(10)), "[█████░░░░░] 50.0%");
        assert_eq!(format_progress_bar(0.0, Some(10)), "[░░░░░░░░░░] 0.0%");
        // Over target fills the bar but keeps the real figure
        assert_eq!(format_progress_bar(125.0, Some(4)), "[████] 125.0%");
    }

    #[test]
    fn test_format_candidate() {
        let products = builtin_product_map();
        let candidate = MealCandidate {
            items: vec![
                MealItem {
                    product_id: id_of(&products, "Chicken Breast"),
                    quantity: 150.0,
                    unit: Unit::Grams,
                },
                MealItem {
                    product_id: 999,
                    quantity: 2.0,
                    unit: Unit::Pieces,
                },
            ],
            totals: MacroTotals {
                kcal: 248.0,
                protein: 46.5,
                fat: 5.4,
                carbs: 0.0,
                simple_carbs: 0.0,
            },
            tier: MealTier::Yellow,
            score: 12.0,
        };
        assert_eq!(
            format_candidate(&candidate, &products),
            "[yellow] Chicken Breast 150 g + #999 2 pieces (248 kcal | P 46.5 g | F 5.4 g | C 0.0 g)"
        );
    }

    #[test]
    fn test_build_summary_from_snapshots() {
        let products = builtin_product_map();
        let settings = default_settings_model();
        let today = date(2025, 6, 1);
        let chicken = id_of(&products, "Chicken Breast");
        let rice = id_of(&products, "Rice (white)");
        let eggs = id_of(&products, "Eggs");

        let mut breakfast = meal_with_items(vec![MealItem {
            product_id: eggs,
            quantity: 2.0,
            unit: Unit::Pieces,
        }]);
        breakfast.totals = MacroTotals {
            kcal: 186.0,
            protein: 15.6,
            fat: 13.2,
            carbs: 1.3,
            simple_carbs: 1.3,
        };
        let lots = vec![
            lot_model(1, chicken, 500.0, Unit::Grams, date(2025, 6, 10)),
            lot_model(2, rice, 1000.0, Unit::Grams, date(2025, 6, 2)),
            lot_model(3, eggs, 6.0, Unit::Pieces, date(2025, 5, 30)),
        ];

        let summary = build_daily_summary(&settings, &[breakfast], &lots, &products, today);
        assert_eq!(summary.meals_logged, 1);
        assert_eq!(summary.meals_left, 3);
        assert_eq!(summary.consumed.kcal, 186.0);
        assert_eq!(summary.remaining.kcal, 1814.0);
        assert_eq!(summary.ideal_next_meal.kcal, 605.0);
        assert_eq!(summary.egg_allowance.unwrap().remaining, 1.0);
        assert!(!summary.candidates.is_empty());
        // Expired eggs are never suggested
        assert!(
            summary
                .candidates
                .iter()
                .all(|c| c.items.iter().all(|i| i.product_id != eggs))
        );

        assert_eq!(summary.alerts.len(), 2);
        assert_eq!(summary.alerts[0].status, ExpirationStatus::Expired);
        assert_eq!(summary.alerts[0].product_name, "Eggs");
        assert_eq!(summary.alerts[1].status, ExpirationStatus::ExpiringSoon);

        let text = render_daily_summary(&summary, &products);
        assert!(text.starts_with("Daily summary for 2025-06-01\n"));
        assert!(text.contains("Meals logged: 1 (3 left)"));
        assert!(text.contains("Eggs left today: 1"));
        assert!(text.contains("Eggs 6 pieces - Expired (2025-05-30)"));
        assert!(text.contains("Tomorrow: "));
    }

    #[tokio::test]
    async fn test_generate_daily_summary_integration() -> Result<()> {
        let (db, chicken) = setup_with_product().await?;
        ensure_default_settings(&db).await?;
        let products = product::product_map(&db).await?;
        let today = date(2025, 6, 1);

        log_manual_meal(
            &db,
            today,
            &[MealItem {
                product_id: chicken.id,
                quantity: 200.0,
                unit: Unit::Grams,
            }],
            &products,
        )
        .await?;
        log_manual_meal(
            &db,
            date(2025, 5, 31),
            &[MealItem {
                product_id: chicken.id,
                quantity: 500.0,
                unit: Unit::Grams,
            }],
            &products,
        )
        .await?;
        create_lot(&db, chicken.id, 300.0, Unit::Grams, today).await?;

        let summary = generate_daily_summary(&db, today).await?;
        assert_eq!(summary.meals_logged, 1);
        assert_eq!(summary.consumed.kcal, 330.0);
        assert_eq!(summary.consumed.protein, 62.0);
        assert_eq!(summary.remaining.protein, 88.0);
        // One lot is not enough to compose a meal
        assert!(summary.candidates.is_empty());
        assert!(summary.egg_allowance.is_none());
        assert_eq!(summary.alerts.len(), 1);
        assert_eq!(summary.alerts[0].status, ExpirationStatus::DueToday);
        assert_eq!(summary.forecast.tier, MealTier::Red);
        Ok(())
    }
}
