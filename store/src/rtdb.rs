//! Hosted realtime database store.
//!
//! Speaks the database's REST protocol: every path maps to
//! `{base}/{path}.json`, with `GET`/`PUT`/`PATCH`/`DELETE` for
//! read/overwrite/merge/remove. Push ids are minted client-side, exactly as
//! the hosted database's SDK does.

use crate::config::RtdbConfig;
use crate::error::{Result, StoreError};
use crate::path::DocPath;
use crate::push_id;
use crate::store::DocumentStore;
use chrono::Utc;
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;

/// REST client for the hosted realtime database.
#[derive(Debug, Clone)]
pub struct RtdbStore {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl RtdbStore {
    /// Creates a store from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: RtdbConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .build()
            .map_err(StoreError::unavailable)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token,
        })
    }

    /// Creates a store configured from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingConfig`] if `GATEPASS_DATABASE_URL` is
    /// not set, or [`StoreError::Unavailable`] if the HTTP client cannot be
    /// constructed.
    pub fn from_env() -> Result<Self> {
        Self::new(RtdbConfig::from_env()?)
    }

    fn endpoint(&self, path: &DocPath) -> String {
        match &self.auth_token {
            Some(token) => format!("{}/{path}.json?auth={token}", self.base_url),
            None => format!("{}/{path}.json", self.base_url),
        }
    }
}

/// Rejects non-2xx responses with the status folded into the error.
fn check_status(response: &reqwest::Response, path: &DocPath) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(StoreError::Unavailable {
            reason: format!("store returned {status} for {path}"),
        })
    }
}

impl DocumentStore for RtdbStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Value>> {
        path.validate()?;
        let response = self
            .client
            .get(self.endpoint(path))
            .send()
            .await
            .map_err(StoreError::unavailable)?;
        check_status(&response, path)?;

        let value: Value = response.json().await.map_err(StoreError::unavailable)?;
        Ok(if value.is_null() { None } else { Some(value) })
    }

    async fn set(&self, path: &DocPath, value: Value) -> Result<()> {
        if value.is_null() {
            return self.remove(path).await;
        }
        path.validate()?;
        tracing::debug!(path = %path, "store set");
        let response = self
            .client
            .put(self.endpoint(path))
            .json(&value)
            .send()
            .await
            .map_err(StoreError::unavailable)?;
        check_status(&response, path)
    }

    async fn update(&self, path: &DocPath, fields: Map<String, Value>) -> Result<()> {
        if fields.is_empty() {
            return Ok(());
        }
        path.validate()?;
        tracing::debug!(path = %path, fields = fields.len(), "store update");
        let response = self
            .client
            .patch(self.endpoint(path))
            .json(&Value::Object(fields))
            .send()
            .await
            .map_err(StoreError::unavailable)?;
        check_status(&response, path)
    }

    async fn remove(&self, path: &DocPath) -> Result<()> {
        path.validate()?;
        tracing::debug!(path = %path, "store remove");
        let response = self
            .client
            .delete(self.endpoint(path))
            .send()
            .await
            .map_err(StoreError::unavailable)?;
        check_status(&response, path)
    }

    async fn generate_id(&self, parent: &DocPath) -> Result<String> {
        parent.validate()?;
        Ok(push_id::generate(Utc::now().timestamp_millis()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store(base: &str, token: Option<&str>) -> RtdbStore {
        RtdbStore {
            client: Client::new(),
            base_url: base.trim_end_matches('/').to_string(),
            auth_token: token.map(ToString::to_string),
        }
    }

    #[test]
    fn endpoint_without_token() {
        let store = test_store("https://db.example/", None);
        let path = DocPath::new(["events", "e1"]);
        assert_eq!(store.endpoint(&path), "https://db.example/events/e1.json");
    }

    #[test]
    fn endpoint_with_token() {
        let store = test_store("https://db.example", Some("secret"));
        let path = DocPath::new(["users", "u1"]);
        assert_eq!(
            store.endpoint(&path),
            "https://db.example/users/u1.json?auth=secret"
        );
    }
}
