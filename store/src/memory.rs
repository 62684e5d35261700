//! In-memory document store.
//!
//! A JSON tree behind a mutex, implementing the same merge and deletion
//! semantics as the hosted database. First-class rather than test-gated:
//! it backs every integration test and doubles as a local development
//! store.

use crate::error::{Result, StoreError};
use crate::path::DocPath;
use crate::push_id;
use crate::store::DocumentStore;
use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, MutexGuard};

/// In-memory store over a shared JSON tree.
///
/// Cloning is cheap and clones share the same tree, mirroring how several
/// services hold handles to one database connection.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    root: Arc<Mutex<Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Value>> {
        self.root
            .lock()
            .map_err(|_| StoreError::unavailable("store mutex poisoned"))
    }
}

impl DocumentStore for MemoryStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Value>> {
        path.validate()?;
        let root = self.lock()?;
        Ok(node_at(&root, path.segments()).cloned())
    }

    async fn set(&self, path: &DocPath, value: Value) -> Result<()> {
        path.validate()?;
        let value = prune_nulls(value);
        let mut root = self.lock()?;
        if value.is_null() {
            remove_at(&mut root, path.segments());
        } else {
            set_at(&mut root, path.segments(), value);
        }
        Ok(())
    }

    async fn update(&self, path: &DocPath, fields: Map<String, Value>) -> Result<()> {
        path.validate()?;
        let mut root = self.lock()?;
        for (key, value) in fields {
            let mut segments = path.segments().to_vec();
            segments.push(key);
            let value = prune_nulls(value);
            if value.is_null() {
                remove_at(&mut root, &segments);
            } else {
                set_at(&mut root, &segments, value);
            }
        }
        Ok(())
    }

    async fn remove(&self, path: &DocPath) -> Result<()> {
        path.validate()?;
        let mut root = self.lock()?;
        remove_at(&mut root, path.segments());
        Ok(())
    }

    async fn generate_id(&self, parent: &DocPath) -> Result<String> {
        parent.validate()?;
        Ok(push_id::generate(Utc::now().timestamp_millis()))
    }
}

/// Navigates to the node at `segments`, treating `null` as absent.
fn node_at<'a>(node: &'a Value, segments: &[String]) -> Option<&'a Value> {
    match segments.split_first() {
        None => {
            if node.is_null() {
                None
            } else {
                Some(node)
            }
        },
        Some((head, rest)) => node
            .as_object()
            .and_then(|map| map.get(head))
            .and_then(|child| node_at(child, rest)),
    }
}

/// Writes a non-null `value` at `segments`, materializing parent objects.
fn set_at(node: &mut Value, segments: &[String], value: Value) {
    match segments.split_first() {
        None => *node = value,
        Some((head, rest)) => {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            if let Value::Object(map) = node {
                let child = map.entry(head.clone()).or_insert(Value::Null);
                set_at(child, rest, value);
            }
        },
    }
}

/// Removes the subtree at `segments`, collapsing emptied parents.
fn remove_at(node: &mut Value, segments: &[String]) {
    match segments.split_first() {
        None => *node = Value::Null,
        Some((head, rest)) => {
            if let Value::Object(map) = node {
                if let Some(child) = map.get_mut(head) {
                    remove_at(child, rest);
                    if child.is_null() {
                        map.remove(head);
                    }
                }
                if map.is_empty() {
                    *node = Value::Null;
                }
            }
        },
    }
}

/// Strips `null` members recursively; empty objects collapse to `null`.
fn prune_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let pruned: Map<String, Value> = map
                .into_iter()
                .map(|(key, child)| (key, prune_nulls(child)))
                .filter(|(_, child)| !child.is_null())
                .collect();
            if pruned.is_empty() {
                Value::Null
            } else {
                Value::Object(pruned)
            }
        },
        other => other,
    }
}
