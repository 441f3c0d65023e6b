//! Core business logic - framework-agnostic meal composition, forecasting and
//! inventory bookkeeping.
//!
//! The calculator, expiration classifier, generator, forecast, fuzzy matcher and
//! speech parser are pure functions over snapshots. The allocator, catalog,
//! inventory, meal and settings modules talk to the store.

/// FIFO-by-expiration deduction and its inverse restoration
pub mod allocator;
/// Daily egg limit
pub mod eggs;
/// Expiration status relative to a reference day
pub mod expiration;
/// Tomorrow's feasibility projection
pub mod forecast;
/// Typo-tolerant product name scoring
pub mod fuzzy;
/// Combinatorial meal candidate search and scoring
pub mod generator;
/// Inventory lot CRUD
pub mod inventory;
/// Bilingual word tables for the speech parser
pub mod lexicon;
/// Macro arithmetic over products and meal items
pub mod macros;
/// Meal logging, deletion with restoration, and daily cleanup
pub mod meal;
/// Product catalog CRUD and seeding
pub mod product;
/// Daily summary assembly and rendering
pub mod report;
/// Settings singleton
pub mod settings;
/// Free-text utterance to meal entries
pub mod speech;
