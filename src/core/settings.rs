//! Settings business logic - the singleton holding daily targets.
//!
//! The row is created with defaults the first time [`ensure_default_settings`]
//! runs and is only ever updated afterwards.

use crate::{
    entities::{Settings, SettingsModel, settings},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use tracing::{info, instrument};

/// Primary key of the single settings row
pub const SETTINGS_ID: i32 = 1;

/// Daily targets used when no settings exist yet
pub const DEFAULT_DAILY_KCAL: f64 = 2000.0;
/// Default daily protein, grams
pub const DEFAULT_DAILY_PROTEIN: f64 = 150.0;
/// Default daily fat, grams
pub const DEFAULT_DAILY_FAT: f64 = 70.0;
/// Default daily carbs, grams
pub const DEFAULT_DAILY_CARBS: f64 = 200.0;
/// Default simple-carb ceiling, percent of energy
pub const DEFAULT_SIMPLE_CARB_LIMIT_PERCENT: f64 = 5.0;
/// Default planned meals per day
pub const DEFAULT_MEALS_PER_DAY: i32 = 4;

/// Partial settings change; `None` fields keep their current value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsUpdate {
    /// Daily energy target
    pub daily_kcal: Option<f64>,
    /// Daily protein target
    pub daily_protein: Option<f64>,
    /// Daily fat target
    pub daily_fat: Option<f64>,
    /// Daily carbohydrate target
    pub daily_carbs: Option<f64>,
    /// Simple-carb ceiling, 0-100
    pub simple_carb_limit_percent: Option<f64>,
    /// Meals per day, at least 1
    pub meals_per_day: Option<i32>,
}

fn validate_target(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidSetting {
            message: format!("{name} must be a non-negative number, got {value}"),
        });
    }
    Ok(())
}

fn validate(update: &SettingsUpdate) -> Result<()> {
    for (name, value) in [
        ("daily_kcal", update.daily_kcal),
        ("daily_protein", update.daily_protein),
        ("daily_fat", update.daily_fat),
        ("daily_carbs", update.daily_carbs),
    ] {
        if let Some(value) = value {
            validate_target(name, value)?;
        }
    }

    if let Some(percent) = update.simple_carb_limit_percent {
        if !(0.0..=100.0).contains(&percent) {
            return Err(Error::InvalidSetting {
                message: format!("simple_carb_limit_percent must be within 0-100, got {percent}"),
            });
        }
    }

    if let Some(meals) = update.meals_per_day {
        if meals < 1 {
            return Err(Error::InvalidSetting {
                message: format!("meals_per_day must be at least 1, got {meals}"),
            });
        }
    }

    Ok(())
}

/// Creates the settings row with defaults if it does not exist yet, and returns it.
#[instrument(skip(db))]
pub async fn ensure_default_settings(db: &DatabaseConnection) -> Result<SettingsModel> {
    if let Some(existing) = Settings::find_by_id(SETTINGS_ID).one(db).await? {
        return Ok(existing);
    }

    let defaults = settings::ActiveModel {
        id: Set(SETTINGS_ID),
        daily_kcal: Set(DEFAULT_DAILY_KCAL),
        daily_protein: Set(DEFAULT_DAILY_PROTEIN),
        daily_fat: Set(DEFAULT_DAILY_FAT),
        daily_carbs: Set(DEFAULT_DAILY_CARBS),
        simple_carb_limit_percent: Set(DEFAULT_SIMPLE_CARB_LIMIT_PERCENT),
        meals_per_day: Set(DEFAULT_MEALS_PER_DAY),
    };
    let created = defaults.insert(db).await?;
    info!("Initialized default settings");
    Ok(created)
}

/// Reads the settings, creating the defaults on first use.
pub async fn get_settings(db: &DatabaseConnection) -> Result<SettingsModel> {
    ensure_default_settings(db).await
}

/// Applies a partial update after validating every provided field.
///
/// # Errors
/// Returns `Error::InvalidSetting` if a target is negative or not finite, the
/// simple-carb limit is outside 0-100, or meals per day is below 1.
#[instrument(skip(db))]
pub async fn update_settings(db: &DatabaseConnection, update: SettingsUpdate) -> Result<SettingsModel> {
    validate(&update)?;
    let mut model: settings::ActiveModel = ensure_default_settings(db).await?.into();

    if let Some(value) = update.daily_kcal {
        model.daily_kcal = Set(value);
    }
    if let Some(value) = update.daily_protein {
        model.daily_protein = Set(value);
    }
    if let Some(value) = update.daily_fat {
        model.daily_fat = Set(value);
    }
    if let Some(value) = update.daily_carbs {
        model.daily_carbs = Set(value);
    }
    if let Some(value) = update.simple_carb_limit_percent {
        model.simple_carb_limit_percent = Set(value);
    }
    if let Some(value) = update.meals_per_day {
        model.meals_per_day = Set(value);
    }

    let updated = model.update(db).await?;
    info!("Updated settings");
    Ok(updated)
}
