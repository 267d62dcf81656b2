//! Keyed registry with an explicit overwrite policy.
//!
//! Every registry in the global tree is built on [`Registry`]: editors,
//! views, toolbar entries, validators and so on. Entries keep insertion
//! order, keys may be hierarchical (`style/h1`), and a registry is frozen
//! once bootstrap completes.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use edithost_protocols::error::RegistryError;

/// What `add` does with a key that is already present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    /// Fail with `DuplicateKey`, keeping the prior value.
    #[default]
    Reject,
    /// Replace the value in place; the key keeps its position.
    Overwrite,
}

impl OverwritePolicy {
    pub fn from_allow(allow_overwrite: bool) -> Self {
        if allow_overwrite {
            Self::Overwrite
        } else {
            Self::Reject
        }
    }
}

/// A registry entry as yielded by [`Registry::get_all_as_list`].
pub struct RegistryItem<T: ?Sized> {
    pub key: String,
    pub value: Arc<T>,
}

impl<T: ?Sized> Clone for RegistryItem<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            value: self.value.clone(),
        }
    }
}

/// Insertion-ordered snapshot of a registry.
///
/// Iterating borrows the snapshot, so the same list can be walked any
/// number of times and always yields the same sequence.
pub struct RegistryList<T: ?Sized> {
    items: Vec<RegistryItem<T>>,
}

impl<T: ?Sized> RegistryList<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, RegistryItem<T>> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().map(|item| item.key.as_str())
    }
}

impl<T: ?Sized> Clone for RegistryList<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

impl<'a, T: ?Sized> IntoIterator for &'a RegistryList<T> {
    type Item = &'a RegistryItem<T>;
    type IntoIter = std::slice::Iter<'a, RegistryItem<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Generic registry mapping string keys to shared values.
///
/// # Type Parameters
///
/// * `T` - The stored type; may be a trait object (e.g. `dyn SaveHook`)
pub struct Registry<T: ?Sized> {
    description: String,
    policy: OverwritePolicy,
    entries: RwLock<IndexMap<String, Arc<T>>>,
    frozen: AtomicBool,
}

impl<T: ?Sized + Send + Sync> Registry<T> {
    /// Create a new empty registry.
    pub fn new(description: impl Into<String>, policy: OverwritePolicy) -> Self {
        Self {
            description: description.into(),
            policy,
            entries: RwLock::new(IndexMap::new()),
            frozen: AtomicBool::new(false),
        }
    }

    /// Human-readable description of what the registry holds.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn policy(&self) -> OverwritePolicy {
        self.policy
    }

    /// Add an already shared value.
    ///
    /// Returns the stored value so callers can keep configuring it.
    pub fn add_shared(&self, key: impl Into<String>, value: Arc<T>) -> Result<Arc<T>, RegistryError> {
        let key = key.into();

        if self.is_frozen() {
            return Err(RegistryError::Frozen(key));
        }

        let mut entries = self.entries.write();
        if entries.contains_key(&key) {
            match self.policy {
                OverwritePolicy::Reject => return Err(RegistryError::DuplicateKey(key)),
                OverwritePolicy::Overwrite => debug!(key = %key, "Overwriting registry entry"),
            }
        }

        entries.insert(key, value.clone());
        Ok(value)
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        self.entries.read().get(key).cloned()
    }

    /// Get a value by key or fail with `LookupMiss`.
    pub fn require(&self, key: &str) -> Result<Arc<T>, RegistryError> {
        self.get(key)
            .ok_or_else(|| RegistryError::LookupMiss(key.to_string()))
    }

    /// Check if a key is registered.
    pub fn has(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// All keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Snapshot of all entries in insertion order.
    pub fn get_all_as_list(&self) -> RegistryList<T> {
        let entries = self.entries.read();
        RegistryList {
            items: entries
                .iter()
                .map(|(key, value)| RegistryItem {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
        }
    }

    /// Direct children of `prefix`: `style/h1` but not `style/h1/deep`.
    pub fn get_children(&self, prefix: &str) -> RegistryList<T> {
        let needle = format!("{}/", prefix);
        let entries = self.entries.read();
        RegistryList {
            items: entries
                .iter()
                .filter(|(key, _)| {
                    key.strip_prefix(&needle)
                        .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
                })
                .map(|(key, value)| RegistryItem {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
        }
    }

    /// Reject all further additions.
    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::Release);
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }
}

impl<T: ?Sized + Send + Sync> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("description", &self.description)
            .field("policy", &self.policy)
            .field("keys", &self.keys())
            .field("frozen", &self.is_frozen())
            .finish()
    }
}

impl<T: Send + Sync> Registry<T> {
    /// Add a value.
    pub fn add(&self, key: impl Into<String>, value: T) -> Result<Arc<T>, RegistryError> {
        self.add_shared(key, Arc::new(value))
    }
}

#[cfg(test)]
#[path = "base_tests.rs"]
mod tests;
