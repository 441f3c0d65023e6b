//! Product business logic - Handles the product catalog.
//!
//! Products are templates carrying macros per 100 g/ml. They are referenced by
//! id from inventory lots and meals. This module provides creation with input
//! validation, updates, deletion, lookups, and idempotent seeding from the
//! configured catalog.

use crate::{
    config::catalog::{CatalogConfig, ProductSeed},
    entities::{Product, product},
    errors::{Error, Result},
    models::Unit,
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use tracing::{info, instrument};

/// Products keyed by id, the lookup shape the engine works with
pub type ProductMap = HashMap<i64, product::Model>;

/// Fields of a product to create or replace
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    /// Display name
    pub name: String,
    /// Energy per 100
    pub kcal_per_100: f64,
    /// Protein per 100
    pub protein_per_100: f64,
    /// Fat per 100
    pub fat_per_100: f64,
    /// Carbs per 100
    pub carbs_per_100: f64,
    /// Simple carbs per 100
    pub simple_carbs_per_100: f64,
    /// Unit the product is normally counted in
    pub default_unit: Unit,
    /// Weight of one piece in grams
    pub piece_weight_grams: Option<f64>,
}

impl From<&ProductSeed> for ProductInput {
    fn from(seed: &ProductSeed) -> Self {
        Self {
            name: seed.name.clone(),
            kcal_per_100: seed.kcal_per_100,
            protein_per_100: seed.protein_per_100,
            fat_per_100: seed.fat_per_100,
            carbs_per_100: seed.carbs_per_100,
            simple_carbs_per_100: seed.simple_carbs_per_100,
            default_unit: seed.default_unit,
            piece_weight_grams: seed.piece_weight_grams,
        }
    }
}

fn validate(input: &ProductInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(Error::Config {
            message: "Product name cannot be empty".to_string(),
        });
    }

    for value in [
        input.kcal_per_100,
        input.protein_per_100,
        input.fat_per_100,
        input.carbs_per_100,
        input.simple_carbs_per_100,
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidQuantity { quantity: value });
        }
    }

    match input.piece_weight_grams {
        Some(weight) if !weight.is_finite() || weight <= 0.0 => {
            Err(Error::InvalidQuantity { quantity: weight })
        }
        None if input.default_unit == Unit::Pieces => Err(Error::Config {
            message: format!("Product '{}' is counted in pieces but has no piece weight", input.name.trim()),
        }),
        _ => Ok(()),
    }
}

/// Retrieves all products, ordered alphabetically by name.
pub async fn get_all_products<C>(db: &C) -> Result<Vec<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find()
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID.
pub async fn get_product_by_id<C>(db: &C, product_id: i64) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads the whole catalog keyed by id.
pub async fn product_map<C>(db: &C) -> Result<ProductMap>
where
    C: ConnectionTrait,
{
    Ok(get_all_products(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect())
}

/// Creates a new product after validating names and macro values.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - Any per-100 value is negative or not finite
/// - The product is counted in pieces without a positive piece weight
/// - The database insert fails
pub async fn create_product<C>(db: &C, input: ProductInput) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    validate(&input)?;

    let product = product::ActiveModel {
        name: Set(input.name.trim().to_string()),
        kcal_per_100: Set(input.kcal_per_100),
        protein_per_100: Set(input.protein_per_100),
        fat_per_100: Set(input.fat_per_100),
        carbs_per_100: Set(input.carbs_per_100),
        simple_carbs_per_100: Set(input.simple_carbs_per_100),
        default_unit: Set(input.default_unit),
        piece_weight_grams: Set(input.piece_weight_grams),
        ..Default::default()
    };
    product.insert(db).await.map_err(Into::into)
}

/// Replaces all fields of an existing product.
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    input: ProductInput,
) -> Result<product::Model> {
    validate(&input)?;

    let mut product: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .into();

    product.name = Set(input.name.trim().to_string());
    product.kcal_per_100 = Set(input.kcal_per_100);
    product.protein_per_100 = Set(input.protein_per_100);
    product.fat_per_100 = Set(input.fat_per_100);
    product.carbs_per_100 = Set(input.carbs_per_100);
    product.simple_carbs_per_100 = Set(input.simple_carbs_per_100);
    product.default_unit = Set(input.default_unit);
    product.piece_weight_grams = Set(input.piece_weight_grams);

    product.update(db).await.map_err(Into::into)
}

/// Deletes a product from the catalog.
///
/// Lots and meals keep their dangling `product_id`; the engine skips unknown
/// products wherever they are referenced.
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<()> {
    let result = Product::delete_by_id(product_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::ProductNotFound { id: product_id });
    }
    Ok(())
}

/// Inserts the catalog products if the catalog is empty. Returns how many were inserted.
#[instrument(skip(db, catalog))]
pub async fn seed_default_products(db: &DatabaseConnection, catalog: &CatalogConfig) -> Result<usize> {
    let count = Product::find().count(db).await?;
    if count > 0 {
        info!("Product catalog already holds {} products, skipping seed", count);
        return Ok(0);
    }

    let txn = db.begin().await?;
    for seed in &catalog.products {
        create_product(&txn, ProductInput::from(seed)).await?;
    }
    txn.commit().await?;

    info!("Seeded {} catalog products", catalog.products.len());
    Ok(catalog.products.len())
}
