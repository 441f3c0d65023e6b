/// Database configuration and connection management
pub mod database;

/// Product catalog seeds loaded from config.toml
pub mod catalog;
