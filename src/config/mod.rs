//! Application configuration loaded from the environment.

/// Database configuration and connection management
pub mod database;

use crate::errors::Result;

/// Runtime settings for the server process.
#[derive(Debug, Clone)]
pub struct Settings {
    /// SeaORM connection string, e.g. `sqlite://data/billmate.sqlite`
    pub database_url: String,
    /// Socket address the HTTP server binds to
    pub bind_addr: String,
}

impl Settings {
    /// Reads settings from environment variables, applying local defaults.
    ///
    /// `DATABASE_URL` falls back to a local `SQLite` file and `BIND_ADDR`
    /// to `0.0.0.0:3000`, so a bare `.env`-less dev run still works.
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://data/billmate.sqlite?mode=rwc".to_string());
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Ok(Self {
            database_url,
            bind_addr,
        })
    }
}
