/// Database configuration and connection management
pub mod database;

/// Screening defaults loading from config.toml
pub mod defaults;

/// Session-store tuning from environment variables
pub mod session;
