//! Shared test utilities for `fridge-macros`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test products, lots and meals with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    config::catalog::builtin_catalog,
    core::{
        inventory::{self, NewLot},
        product::{self, ProductInput, ProductMap},
        settings,
    },
    entities::{self, ProductModel, SettingsModel},
    errors::Result,
    models::{MacroTotals, Meal, MealItem, StorageLocation, Unit},
};
use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Routes tracing output through the test harness; safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Calendar date shorthand; panics on an invalid date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Product input counted in grams with only energy set.
pub fn grams_input(name: &str, kcal_per_100: f64) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        kcal_per_100,
        protein_per_100: 0.0,
        fat_per_100: 0.0,
        carbs_per_100: 0.0,
        simple_carbs_per_100: 0.0,
        default_unit: Unit::Grams,
        piece_weight_grams: None,
    }
}

/// Builds a product model without touching the database.
///
/// `macros` is `[kcal, protein, fat, carbs, simple_carbs]` per 100.
pub fn product_model(
    id: i64,
    name: &str,
    macros: [f64; 5],
    default_unit: Unit,
    piece_weight_grams: Option<f64>,
) -> ProductModel {
    let [kcal, protein, fat, carbs, simple_carbs] = macros;
    ProductModel {
        id,
        name: name.to_string(),
        kcal_per_100: kcal,
        protein_per_100: protein,
        fat_per_100: fat,
        carbs_per_100: carbs,
        simple_carbs_per_100: simple_carbs,
        default_unit,
        piece_weight_grams,
    }
}

/// The built-in catalog as a product map, ids assigned 1.. in file order.
pub fn builtin_product_map() -> ProductMap {
    builtin_catalog()
        .unwrap()
        .products
        .iter()
        .zip(1..)
        .map(|(seed, id)| {
            let model = product_model(
                id,
                &seed.name,
                [
                    seed.kcal_per_100,
                    seed.protein_per_100,
                    seed.fat_per_100,
                    seed.carbs_per_100,
                    seed.simple_carbs_per_100,
                ],
                seed.default_unit,
                seed.piece_weight_grams,
            );
            (id, model)
        })
        .collect()
}

/// Settings row with the default targets.
pub const fn default_settings_model() -> SettingsModel {
    SettingsModel {
        id: settings::SETTINGS_ID,
        daily_kcal: settings::DEFAULT_DAILY_KCAL,
        daily_protein: settings::DEFAULT_DAILY_PROTEIN,
        daily_fat: settings::DEFAULT_DAILY_FAT,
        daily_carbs: settings::DEFAULT_DAILY_CARBS,
        simple_carb_limit_percent: settings::DEFAULT_SIMPLE_CARB_LIMIT_PERCENT,
        meals_per_day: settings::DEFAULT_MEALS_PER_DAY,
    }
}

/// Fridge lot input.
pub const fn new_lot(product_id: i64, quantity: f64, unit: Unit, expiration_date: NaiveDate) -> NewLot {
    NewLot {
        product_id,
        quantity,
        unit,
        storage_location: StorageLocation::Fridge,
        expiration_date,
    }
}

/// Fridge lot model without touching the database.
pub fn lot_model(
    id: i64,
    product_id: i64,
    quantity: f64,
    unit: Unit,
    expiration_date: NaiveDate,
) -> entities::InventoryLotModel {
    entities::InventoryLotModel {
        id,
        product_id,
        quantity,
        unit,
        storage_location: StorageLocation::Fridge,
        expiration_date,
        added_at: Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
    }
}

/// Inserts a piece-counted product with egg-like macros.
pub async fn create_pieces_product(
    db: &DatabaseConnection,
    name: &str,
    piece_weight_grams: f64,
) -> Result<ProductModel> {
    product::create_product(
        db,
        ProductInput {
            name: name.to_string(),
            kcal_per_100: 155.0,
            protein_per_100: 13.0,
            fat_per_100: 11.0,
            carbs_per_100: 1.1,
            simple_carbs_per_100: 1.1,
            default_unit: Unit::Pieces,
            piece_weight_grams: Some(piece_weight_grams),
        },
    )
    .await
}

/// Inserts a fridge lot.
pub async fn create_lot(
    db: &DatabaseConnection,
    product_id: i64,
    quantity: f64,
    unit: Unit,
    expiration_date: NaiveDate,
) -> Result<entities::InventoryLotModel> {
    inventory::add_lot(db, new_lot(product_id, quantity, unit, expiration_date)).await
}

/// Sets up a test database holding one product, "Chicken Breast".
/// Returns (db, product) for inventory and meal tests.
pub async fn setup_with_product() -> Result<(DatabaseConnection, ProductModel)> {
    let db = setup_test_db().await?;
    let chicken = product::create_product(
        &db,
        ProductInput {
            protein_per_100: 31.0,
            fat_per_100: 3.6,
            ..grams_input("Chicken Breast", 165.0)
        },
    )
    .await?;
    Ok((db, chicken))
}

/// Lot contents without ids or timestamps, in a stable order.
///
/// Restoration may recreate a lot under a new id, so round-trip checks compare
/// these instead of full models.
pub async fn lot_snapshot(
    db: &DatabaseConnection,
) -> Result<Vec<(i64, f64, Unit, StorageLocation, NaiveDate)>> {
    let mut snapshot: Vec<_> = inventory::get_all_lots(db)
        .await?
        .into_iter()
        .map(|lot| {
            (
                lot.product_id,
                lot.quantity,
                lot.unit,
                lot.storage_location,
                lot.expiration_date,
            )
        })
        .collect();
    snapshot.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then(a.4.cmp(&b.4))
            .then(a.1.total_cmp(&b.1))
    });
    Ok(snapshot)
}

/// In-memory meal with the given items and zero totals.
pub fn meal_with_items(items: Vec<MealItem>) -> Meal {
    Meal {
        id: 1,
        date: date(2025, 6, 1),
        items,
        totals: MacroTotals::default(),
        created_at: Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap(),
        sources: None,
    }
}
