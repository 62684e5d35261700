//! The document store trait.

use crate::error::Result;
use crate::path::DocPath;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A keyed hierarchical document store.
///
/// This trait abstracts over the hosted realtime database (see
/// [`crate::RtdbStore`]) and its in-memory double ([`crate::MemoryStore`]).
/// Values are JSON subtrees addressed by [`DocPath`].
///
/// Implementations must uphold realtime-database write semantics: `set`
/// with `null` deletes, `update` merges shallowly and treats `null` fields
/// as deletions, and empty objects never exist.
pub trait DocumentStore: Send + Sync {
    /// Reads the subtree at `path`.
    ///
    /// Returns `None` if nothing is stored there.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached or the path is
    /// invalid.
    async fn get(&self, path: &DocPath) -> Result<Option<Value>>;

    /// Overwrites the subtree at `path` with `value`.
    ///
    /// Writing [`Value::Null`] removes the subtree.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached or the path is
    /// invalid.
    async fn set(&self, path: &DocPath, value: Value) -> Result<()>;

    /// Shallow-merges `fields` into the object at `path`.
    ///
    /// Children named in `fields` are replaced; a `null` field value
    /// deletes that child. Children not named are untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached or the path is
    /// invalid.
    async fn update(&self, path: &DocPath, fields: Map<String, Value>) -> Result<()>;

    /// Removes the subtree at `path`.
    ///
    /// Removing an absent path is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached or the path is
    /// invalid.
    async fn remove(&self, path: &DocPath) -> Result<()>;

    /// Mints a new child key under `parent`.
    ///
    /// Keys are chronologically sortable push ids; minting a key writes
    /// nothing — the caller follows up with `set`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached.
    async fn generate_id(&self, parent: &DocPath) -> Result<String>;

    /// Reads and deserializes the subtree at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure or if the stored value does not
    /// match `T`.
    async fn get_typed<T: DeserializeOwned>(&self, path: &DocPath) -> Result<Option<T>>
    where
        Self: Sized,
    {
        match self.get(path).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Serializes `value` and overwrites the subtree at `path` with it.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure or if `value` cannot be
    /// serialized.
    async fn set_typed<T: Serialize + Sync>(&self, path: &DocPath, value: &T) -> Result<()>
    where
        Self: Sized,
    {
        self.set(path, serde_json::to_value(value)?).await
    }
}
