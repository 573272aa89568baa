/// Database connection and table creation
pub mod database;

/// Application settings loaded from TOML and environment
pub mod settings;
