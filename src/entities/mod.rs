//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the tables of the food store: the product catalog,
//! inventory lots, logged meals with their line items and provenance, and the
//! settings singleton.

pub mod inventory_lot;
pub mod meal;
pub mod meal_item;
pub mod meal_source;
pub mod product;
pub mod settings;

// Re-export specific types to avoid conflicts with the domain types in `models`
pub use inventory_lot::{
    Column as InventoryLotColumn, Entity as InventoryLot, Model as InventoryLotModel,
};
pub use meal::{Column as MealColumn, Entity as MealRecord, Model as MealModel};
pub use meal_item::{Column as MealItemColumn, Entity as MealItemRecord, Model as MealItemModel};
pub use meal_source::{
    Column as MealSourceColumn, Entity as MealSourceRecord, Model as MealSourceModel,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use settings::{Column as SettingsColumn, Entity as Settings, Model as SettingsModel};
