//! Store configuration.
//!
//! Loaded from environment variables with sensible defaults where a default
//! makes sense; the database URL has none and must be provided.

use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::env;

/// Connection settings for the hosted realtime database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RtdbConfig {
    /// Base URL of the database, e.g. `https://myapp-events.db.example`.
    pub base_url: String,
    /// Optional auth token appended to every request.
    pub auth_token: Option<String>,
    /// Connection timeout in seconds.
    pub connect_timeout: u64,
}

impl RtdbConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingConfig`] if `GATEPASS_DATABASE_URL` is
    /// not set.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base_url: env::var("GATEPASS_DATABASE_URL").map_err(|_| {
                StoreError::MissingConfig {
                    variable: "GATEPASS_DATABASE_URL".to_string(),
                }
            })?,
            auth_token: env::var("GATEPASS_DATABASE_AUTH").ok(),
            connect_timeout: env::var("GATEPASS_DATABASE_CONNECT_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        })
    }
}
