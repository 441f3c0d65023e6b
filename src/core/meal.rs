//! Meal business logic - logging, deletion with restoration, and daily cleanup.
//!
//! A meal is stored as one `meals` row with its totals, plus ordered
//! `meal_items` rows and, for meals taken from inventory, `meal_sources` rows.
//! Accepting a suggestion deducts inventory and writes the meal in one
//! transaction; deleting such a meal restores the inventory in one transaction.

use crate::{
    core::{allocator, expiration::tomorrow_of, macros::meal_macros, product::ProductMap},
    entities::{
        MealItemModel, MealItemRecord, MealModel, MealRecord, MealSourceModel, MealSourceRecord,
        SettingsModel, meal, meal_item, meal_source,
    },
    errors::{Error, Result},
    models::{DeductionRequest, InventorySource, MacroTotals, Meal, MealCandidate, MealItem},
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

fn totals_of(record: &MealModel) -> MacroTotals {
    MacroTotals {
        kcal: record.total_kcal,
        protein: record.total_protein,
        fat: record.total_fat,
        carbs: record.total_carbs,
        simple_carbs: record.total_simple_carbs,
    }
}

fn item_from_record(record: &MealItemModel) -> MealItem {
    MealItem {
        product_id: record.product_id,
        quantity: record.quantity,
        unit: record.unit,
    }
}

fn source_from_record(record: &MealSourceModel) -> InventorySource {
    InventorySource {
        inventory_id: record.inventory_id,
        product_id: record.product_id,
        quantity: record.quantity,
        unit: record.unit,
        storage_location: record.storage_location,
        expiration_date: record.expiration_date,
    }
}

fn hydrate(record: &MealModel, items: &[MealItemModel], sources: &[MealSourceModel]) -> Meal {
    Meal {
        id: record.id,
        date: record.date,
        items: items.iter().map(item_from_record).collect(),
        totals: totals_of(record),
        created_at: record.created_at,
        sources: record
            .has_sources
            .then(|| sources.iter().map(source_from_record).collect()),
    }
}

async fn insert_meal<C>(
    db: &C,
    date: NaiveDate,
    items: &[MealItem],
    totals: MacroTotals,
    sources: Option<&[InventorySource]>,
) -> Result<Meal>
where
    C: ConnectionTrait,
{
    let record = meal::ActiveModel {
        date: Set(date),
        total_kcal: Set(totals.kcal),
        total_protein: Set(totals.protein),
        total_fat: Set(totals.fat),
        total_carbs: Set(totals.carbs),
        total_simple_carbs: Set(totals.simple_carbs),
        created_at: Set(Utc::now()),
        has_sources: Set(sources.is_some()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    for (position, item) in (0..).zip(items) {
        meal_item::ActiveModel {
            meal_id: Set(record.id),
            position: Set(position),
            product_id: Set(item.product_id),
            quantity: Set(item.quantity),
            unit: Set(item.unit),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    for source in sources.unwrap_or_default() {
        meal_source::ActiveModel {
            meal_id: Set(record.id),
            inventory_id: Set(source.inventory_id),
            product_id: Set(source.product_id),
            quantity: Set(source.quantity),
            unit: Set(source.unit),
            storage_location: Set(source.storage_location),
            expiration_date: Set(source.expiration_date),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    Ok(Meal {
        id: record.id,
        date,
        items: items.to_vec(),
        totals,
        created_at: record.created_at,
        sources: sources.map(<[InventorySource]>::to_vec),
    })
}

async fn delete_meal_rows<C>(db: &C, meal_ids: Vec<i64>) -> Result<u64>
where
    C: ConnectionTrait,
{
    MealItemRecord::delete_many()
        .filter(meal_item::Column::MealId.is_in(meal_ids.clone()))
        .exec(db)
        .await?;
    MealSourceRecord::delete_many()
        .filter(meal_source::Column::MealId.is_in(meal_ids.clone()))
        .exec(db)
        .await?;
    let result = MealRecord::delete_many()
        .filter(meal::Column::Id.is_in(meal_ids))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Logs a meal chosen by hand. Inventory is not touched and no sources are kept.
///
/// Totals are computed once from the current catalog; unknown products count as zero.
#[instrument(skip(db, items, products), fields(items = items.len()))]
pub async fn log_manual_meal(
    db: &DatabaseConnection,
    date: NaiveDate,
    items: &[MealItem],
    products: &ProductMap,
) -> Result<Meal> {
    let totals = meal_macros(items, products);
    let txn = db.begin().await?;
    let meal = insert_meal(&txn, date, items, totals, None).await?;
    txn.commit().await?;
    info!("Logged manual meal {} ({} kcal)", meal.id, meal.totals.kcal);
    Ok(meal)
}

/// Accepts a suggested meal: deducts its items from inventory and logs it with
/// the resulting sources, all in one transaction.
#[instrument(skip(db, candidate), fields(items = candidate.items.len()))]
pub async fn accept_candidate(
    db: &DatabaseConnection,
    candidate: &MealCandidate,
    date: NaiveDate,
) -> Result<Meal> {
    let requests: Vec<DeductionRequest> =
        candidate.items.iter().map(DeductionRequest::from).collect();

    let txn = db.begin().await?;
    let sources = allocator::deduct_in(&txn, &requests).await?;
    let meal = insert_meal(
        &txn,
        date,
        &candidate.items,
        candidate.totals,
        Some(sources.as_slice()),
    )
    .await?;
    txn.commit().await?;

    info!(
        "Accepted meal {} using {} inventory source(s)",
        meal.id,
        sources.len()
    );
    Ok(meal)
}

/// Retrieves one meal with its items and sources.
pub async fn get_meal_by_id(db: &DatabaseConnection, meal_id: i64) -> Result<Option<Meal>> {
    let Some(record) = MealRecord::find_by_id(meal_id).one(db).await? else {
        return Ok(None);
    };
    let items = record
        .find_related(MealItemRecord)
        .order_by_asc(meal_item::Column::Position)
        .all(db)
        .await?;
    let sources = record
        .find_related(MealSourceRecord)
        .order_by_asc(meal_source::Column::Id)
        .all(db)
        .await?;
    Ok(Some(hydrate(&record, &items, &sources)))
}

/// Deletes a meal. If it was taken from inventory, its sources are restored
/// first; restoration and deletion commit together.
#[instrument(skip(db))]
pub async fn delete_meal(db: &DatabaseConnection, meal_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let record = MealRecord::find_by_id(meal_id)
        .one(&txn)
        .await?
        .ok_or(Error::MealNotFound { id: meal_id })?;

    if record.has_sources {
        let sources: Vec<InventorySource> = record
            .find_related(MealSourceRecord)
            .order_by_asc(meal_source::Column::Id)
            .all(&txn)
            .await?
            .iter()
            .map(source_from_record)
            .collect();
        allocator::restore_in(&txn, &sources).await?;
        debug!("Restored {} source(s) of meal {}", sources.len(), meal_id);
    }

    delete_meal_rows(&txn, vec![meal_id]).await?;
    txn.commit().await?;
    info!("Deleted meal {}", meal_id);
    Ok(())
}

/// All meals logged on `date`, oldest first, with items and sources.
pub async fn meals_for_date(db: &DatabaseConnection, date: NaiveDate) -> Result<Vec<Meal>> {
    let records = MealRecord::find()
        .filter(meal::Column::Date.eq(date))
        .order_by_asc(meal::Column::CreatedAt)
        .order_by_asc(meal::Column::Id)
        .all(db)
        .await?;
    if records.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();

    let mut items: HashMap<i64, Vec<MealItemModel>> = HashMap::new();
    for item in MealItemRecord::find()
        .filter(meal_item::Column::MealId.is_in(ids.clone()))
        .order_by_asc(meal_item::Column::Position)
        .all(db)
        .await?
    {
        items.entry(item.meal_id).or_default().push(item);
    }

    let mut sources: HashMap<i64, Vec<MealSourceModel>> = HashMap::new();
    for source in MealSourceRecord::find()
        .filter(meal_source::Column::MealId.is_in(ids))
        .order_by_asc(meal_source::Column::Id)
        .all(db)
        .await?
    {
        sources.entry(source.meal_id).or_default().push(source);
    }

    Ok(records
        .iter()
        .map(|record| {
            hydrate(
                record,
                items.get(&record.id).map(Vec::as_slice).unwrap_or_default(),
                sources.get(&record.id).map(Vec::as_slice).unwrap_or_default(),
            )
        })
        .collect())
}

/// Deletes every meal not logged on `date`, without touching inventory.
/// Returns the number of meals removed.
#[instrument(skip(db))]
pub async fn purge_meals_not_on_date(db: &DatabaseConnection, date: NaiveDate) -> Result<u64> {
    let txn = db.begin().await?;
    let stale: Vec<i64> = MealRecord::find()
        .filter(meal::Column::Date.ne(date))
        .all(&txn)
        .await?
        .iter()
        .map(|r| r.id)
        .collect();
    if stale.is_empty() {
        return Ok(0);
    }
    let removed = delete_meal_rows(&txn, stale).await?;
    txn.commit().await?;
    info!("Purged {} meal(s) from previous days", removed);
    Ok(removed)
}

/// Daily rollover: purges meals from other days. Store failures are logged and
/// swallowed so startup and the midnight timer never fail because of it.
pub async fn run_daily_cleanup(db: &DatabaseConnection, today: NaiveDate) -> u64 {
    match purge_meals_not_on_date(db, today).await {
        Ok(removed) => removed,
        Err(e) => {
            error!("Daily cleanup failed: {}", e);
            0
        }
    }
}

/// Time from `now` until the next midnight in `now`'s time zone.
#[must_use]
pub fn duration_until_next_local_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> Duration {
    tomorrow_of(now.date_naive())
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.and_local_timezone(now.timezone()).earliest())
        .and_then(|midnight| (midnight - now.clone()).to_std().ok())
        .unwrap_or_default()
}

/// Meals still to plan today, never fewer than one.
#[must_use]
pub fn meals_left_today(settings: &SettingsModel, meals_logged: usize) -> i32 {
    let logged = i32::try_from(meals_logged).unwrap_or(i32::MAX);
    settings.meals_per_day.saturating_sub(logged).max(1)
}
