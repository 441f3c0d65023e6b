//! Inventory allocator - FIFO-by-expiration deduction and its inverse.
//!
//! Deduction walks a product's lots soonest-expiring first, deleting lots that
//! are used up and shrinking the one that is only partly needed. Every lot it
//! touches yields an [`InventorySource`]. Restoration replays those sources in
//! reverse: a surviving lot gets its quantity back, a deleted one is recreated.
//!
//! Both directions are planned as [`LotMutation`]s and applied inside a single
//! database transaction per batch. Any store failure aborts the whole batch.
//! Short stock is not a failure: deduction takes what exists and stops.

use crate::{
    core::{inventory, macros::weight_in_grams, product},
    entities::{InventoryLot, ProductModel, inventory_lot},
    errors::{Error, Result},
    models::{DeductionRequest, InventorySource, Unit},
};
use sea_orm::{TransactionTrait, prelude::*, sea_query::Expr};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument, warn};

/// Remaining need below this is considered satisfied
const EPSILON: f64 = 1e-9;

/// One intended change to the lots table
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LotMutation {
    /// Lot fully consumed
    Delete {
        /// Lot id
        lot_id: i64,
    },
    /// Lot partly consumed, new absolute quantity
    SetQuantity {
        /// Lot id
        lot_id: i64,
        /// Quantity after the deduction
        quantity: f64,
    },
    /// Surviving lot gets a quantity back
    Increment {
        /// Lot id
        lot_id: i64,
        /// Amount to add
        amount: f64,
    },
    /// Deleted lot comes back as a new row
    Recreate(inventory::NewLot),
}

/// Converts `quantity` between units. Grams and millilitres are interchangeable;
/// pieces go through the product's piece weight when it has one.
#[must_use]
pub fn convert_quantity(quantity: f64, from: Unit, to: Unit, product: Option<&ProductModel>) -> f64 {
    if from == to {
        return quantity;
    }
    let grams = product.map_or(quantity, |p| weight_in_grams(quantity, from, p));
    match (to, product.and_then(|p| p.piece_weight_grams)) {
        (Unit::Pieces, Some(weight)) if weight > 0.0 => grams / weight,
        _ => grams,
    }
}

/// Plans the deduction of one request against `lots` (already ordered by expiration).
pub(crate) fn plan_deduction(
    request: &DeductionRequest,
    lots: &[inventory_lot::Model],
    product: Option<&ProductModel>,
) -> (Vec<LotMutation>, Vec<InventorySource>) {
    let mut mutations = Vec::new();
    let mut sources = Vec::new();
    let mut remaining = request.quantity;

    for lot in lots {
        if remaining <= EPSILON {
            break;
        }
        let needed_in_lot_unit = convert_quantity(remaining, request.unit, lot.unit, product);

        let consumed = if lot.quantity <= needed_in_lot_unit + EPSILON {
            mutations.push(LotMutation::Delete { lot_id: lot.id });
            remaining -= convert_quantity(lot.quantity, lot.unit, request.unit, product);
            lot.quantity
        } else {
            mutations.push(LotMutation::SetQuantity {
                lot_id: lot.id,
                quantity: lot.quantity - needed_in_lot_unit,
            });
            remaining = 0.0;
            needed_in_lot_unit
        };

        sources.push(InventorySource {
            inventory_id: Some(lot.id),
            product_id: lot.product_id,
            quantity: consumed,
            unit: lot.unit,
            storage_location: lot.storage_location,
            expiration_date: lot.expiration_date,
        });
    }

    if remaining > EPSILON {
        warn!(
            "Inventory short by {} {} for product {}; deducted what was available",
            remaining, request.unit, request.product_id
        );
    }

    (mutations, sources)
}

/// Plans restoration of `sources` given which of their lots still exist.
///
/// Several sources pointing at the same missing lot are merged into one
/// recreated lot.
pub(crate) fn plan_restoration(
    sources: &[InventorySource],
    existing_lot_ids: &HashSet<i64>,
) -> Vec<LotMutation> {
    let mut mutations: Vec<LotMutation> = Vec::new();
    let mut recreated: HashMap<i64, usize> = HashMap::new();

    for source in sources {
        match source.inventory_id {
            Some(lot_id) if existing_lot_ids.contains(&lot_id) => {
                mutations.push(LotMutation::Increment {
                    lot_id,
                    amount: source.quantity,
                });
            }
            Some(lot_id) if recreated.contains_key(&lot_id) => {
                if let Some(LotMutation::Recreate(lot)) = mutations.get_mut(recreated[&lot_id]) {
                    lot.quantity += source.quantity;
                }
            }
            inventory_id => {
                if let Some(lot_id) = inventory_id {
                    recreated.insert(lot_id, mutations.len());
                }
                mutations.push(LotMutation::Recreate(inventory::NewLot {
                    product_id: source.product_id,
                    quantity: source.quantity,
                    unit: source.unit,
                    storage_location: source.storage_location,
                    expiration_date: source.expiration_date,
                }));
            }
        }
    }

    mutations
}

/// Applies planned mutations in order. Fails on the first mutation that cannot be applied.
pub(crate) async fn apply_mutations<C>(db: &C, mutations: &[LotMutation]) -> Result<()>
where
    C: ConnectionTrait,
{
    for mutation in mutations {
        match mutation {
            LotMutation::Delete { lot_id } => {
                let result = InventoryLot::delete_by_id(*lot_id).exec(db).await?;
                if result.rows_affected == 0 {
                    return Err(Error::LotNotFound { id: *lot_id });
                }
            }
            LotMutation::SetQuantity { lot_id, quantity } => {
                let result = InventoryLot::update_many()
                    .col_expr(inventory_lot::Column::Quantity, Expr::value(*quantity))
                    .filter(inventory_lot::Column::Id.eq(*lot_id))
                    .exec(db)
                    .await?;
                if result.rows_affected == 0 {
                    return Err(Error::LotNotFound { id: *lot_id });
                }
            }
            LotMutation::Increment { lot_id, amount } => {
                let result = InventoryLot::update_many()
                    .col_expr(
                        inventory_lot::Column::Quantity,
                        Expr::col(inventory_lot::Column::Quantity).add(*amount),
                    )
                    .filter(inventory_lot::Column::Id.eq(*lot_id))
                    .exec(db)
                    .await?;
                if result.rows_affected == 0 {
                    return Err(Error::LotNotFound { id: *lot_id });
                }
            }
            LotMutation::Recreate(lot) => {
                inventory::add_lot(db, lot.clone()).await?;
            }
        }
    }
    Ok(())
}

/// Deducts every request inside the caller's transaction.
pub(crate) async fn deduct_in<C>(db: &C, requests: &[DeductionRequest]) -> Result<Vec<InventorySource>>
where
    C: ConnectionTrait,
{
    let mut sources = Vec::new();
    for request in requests {
        let lots = inventory::get_lots_for_product(db, request.product_id).await?;
        let product = product::get_product_by_id(db, request.product_id).await?;
        let (mutations, request_sources) = plan_deduction(request, &lots, product.as_ref());
        debug!(
            "Deducting {} {} of product {} touches {} lot(s)",
            request.quantity,
            request.unit,
            request.product_id,
            mutations.len()
        );
        apply_mutations(db, &mutations).await?;
        sources.extend(request_sources);
    }
    Ok(sources)
}

/// Restores sources inside the caller's transaction.
pub(crate) async fn restore_in<C>(db: &C, sources: &[InventorySource]) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut existing = HashSet::new();
    for lot_id in sources.iter().filter_map(|s| s.inventory_id) {
        if inventory::get_lot_by_id(db, lot_id).await?.is_some() {
            existing.insert(lot_id);
        }
    }
    let mutations = plan_restoration(sources, &existing);
    apply_mutations(db, &mutations).await
}

/// Takes the requested quantities out of inventory, soonest-expiring lots first,
/// as one atomic batch. Returns the provenance of everything taken.
///
/// # Errors
/// Returns an error only if the store fails; the batch is then rolled back.
#[instrument(skip(db, requests), fields(requests = requests.len()))]
pub async fn deduct_for_meal(
    db: &DatabaseConnection,
    requests: &[DeductionRequest],
) -> Result<Vec<InventorySource>> {
    let txn = db.begin().await?;
    let sources = deduct_in(&txn, requests).await?;
    txn.commit().await?;
    info!("Deducted {} request(s) from {} lot(s)", requests.len(), sources.len());
    Ok(sources)
}

/// Puts previously deducted quantities back as one atomic batch.
#[instrument(skip(db, sources), fields(sources = sources.len()))]
pub async fn restore_from_sources(db: &DatabaseConnection, sources: &[InventorySource]) -> Result<()> {
    let txn = db.begin().await?;
    restore_in(&txn, sources).await?;
    txn.commit().await?;
    info!("Restored {} source(s) to inventory", sources.len());
    Ok(())
}
