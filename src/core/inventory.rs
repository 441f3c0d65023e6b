//! Inventory business logic - Handles inventory lot operations.
//!
//! A lot is one batch of a product with its own quantity, storage location and
//! expiration date. This module covers the manual add/edit/remove operations and
//! the queries the engine runs; deduction and restoration live in
//! [`crate::core::allocator`].

use crate::{
    entities::{InventoryLot, inventory_lot},
    errors::{Error, Result},
    models::{StorageLocation, Unit},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, instrument};

/// Fields of a new lot
#[derive(Debug, Clone, PartialEq)]
pub struct NewLot {
    /// Catalog product id
    pub product_id: i64,
    /// Amount on hand
    pub quantity: f64,
    /// Unit of `quantity`
    pub unit: Unit,
    /// Fridge, freezer or pantry
    pub storage_location: StorageLocation,
    /// Expiration date
    pub expiration_date: NaiveDate,
}

/// Partial edit of a lot; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LotUpdate {
    /// New quantity
    pub quantity: Option<f64>,
    /// New unit
    pub unit: Option<Unit>,
    /// New storage location
    pub storage_location: Option<StorageLocation>,
    /// New expiration date
    pub expiration_date: Option<NaiveDate>,
}

fn validate_quantity(quantity: f64) -> Result<()> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(Error::InvalidQuantity { quantity });
    }
    Ok(())
}

/// Adds a lot, stamping `added_at` with the current time.
///
/// # Errors
/// Returns an error if the quantity is negative or not finite, or the insert fails.
#[instrument(skip(db))]
pub async fn add_lot<C>(db: &C, lot: NewLot) -> Result<inventory_lot::Model>
where
    C: ConnectionTrait,
{
    validate_quantity(lot.quantity)?;

    let model = inventory_lot::ActiveModel {
        product_id: Set(lot.product_id),
        quantity: Set(lot.quantity),
        unit: Set(lot.unit),
        storage_location: Set(lot.storage_location),
        expiration_date: Set(lot.expiration_date),
        added_at: Set(Utc::now()),
        ..Default::default()
    };
    let created = model.insert(db).await?;
    debug!("Added inventory lot {} for product {}", created.id, created.product_id);
    Ok(created)
}

/// Applies a partial edit to an existing lot.
pub async fn update_lot(
    db: &DatabaseConnection,
    lot_id: i64,
    update: LotUpdate,
) -> Result<inventory_lot::Model> {
    let mut lot: inventory_lot::ActiveModel = InventoryLot::find_by_id(lot_id)
        .one(db)
        .await?
        .ok_or(Error::LotNotFound { id: lot_id })?
        .into();

    if let Some(quantity) = update.quantity {
        validate_quantity(quantity)?;
        lot.quantity = Set(quantity);
    }
    if let Some(unit) = update.unit {
        lot.unit = Set(unit);
    }
    if let Some(location) = update.storage_location {
        lot.storage_location = Set(location);
    }
    if let Some(date) = update.expiration_date {
        lot.expiration_date = Set(date);
    }

    lot.update(db).await.map_err(Into::into)
}

/// Removes a lot.
pub async fn remove_lot(db: &DatabaseConnection, lot_id: i64) -> Result<()> {
    let result = InventoryLot::delete_by_id(lot_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::LotNotFound { id: lot_id });
    }
    Ok(())
}

/// Retrieves a lot by id.
pub async fn get_lot_by_id<C>(db: &C, lot_id: i64) -> Result<Option<inventory_lot::Model>>
where
    C: ConnectionTrait,
{
    InventoryLot::find_by_id(lot_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every lot, soonest-expiring first.
pub async fn get_all_lots<C>(db: &C) -> Result<Vec<inventory_lot::Model>>
where
    C: ConnectionTrait,
{
    InventoryLot::find()
        .order_by_asc(inventory_lot::Column::ExpirationDate)
        .order_by_asc(inventory_lot::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the lots of one product ordered by expiration date ascending.
///
/// Lots sharing a date keep insertion order.
pub async fn get_lots_for_product<C>(db: &C, product_id: i64) -> Result<Vec<inventory_lot::Model>>
where
    C: ConnectionTrait,
{
    InventoryLot::find()
        .filter(inventory_lot::Column::ProductId.eq(product_id))
        .order_by_asc(inventory_lot::Column::ExpirationDate)
        .order_by_asc(inventory_lot::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
