//! `fridge-macros` - Meal composition and forecasting over a home food inventory
//!
//! This crate tracks a product catalog and inventory lots with expiration dates,
//! suggests meals that fit the remaining daily macro budget, deducts accepted
//! meals from stock soonest-expiring first (and restores them when a meal is
//! deleted), projects whether tomorrow can be covered, and turns spoken meal
//! descriptions in English or Russian into catalog entries.

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    missing_docs,

    // Clippy categories for overall code quality
    clippy::all,
    clippy::pedantic,
    clippy::nursery,

    // Performance
    clippy::inefficient_to_string,
    clippy::large_types_passed_by_value,
    clippy::needless_pass_by_value,
    clippy::unnecessary_wraps,

    // Correctness
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Complexity and readability
    clippy::cognitive_complexity,
    clippy::large_enum_variant,
    clippy::match_same_arms,
    clippy::too_many_lines,

    // Style consistency
    clippy::enum_glob_use,
    clippy::inconsistent_struct_constructor,
    clippy::must_use_candidate,
    clippy::redundant_closure_for_method_calls,
    clippy::semicolon_if_nothing_returned,

    // Future compatibility
    future_incompatible,
    rust_2018_idioms,
)]
// Store operations share one error type; per-function `# Errors` sections
// only appear where a function adds its own failure cases
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

/// Configuration management for the database and the product catalog
pub mod config;
/// Core business logic - meal engine, allocator, parser and store operations
pub mod core;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;
/// Domain value types shared by the engine and the store layer
pub mod models;

#[cfg(test)]
pub mod test_utils;
