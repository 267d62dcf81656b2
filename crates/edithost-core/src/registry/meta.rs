//! Registries of registries.
//!
//! The global registry is a [`MetaRegistry`]: every value is itself a
//! registry, reachable by name (`inspector`) or by nested path
//! (`inspector/editors`). Values of leaf registries are reached with
//! [`MetaRegistry::lookup`].

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use edithost_protocols::error::RegistryError;

use super::base::{OverwritePolicy, Registry, RegistryList};

/// Separates segments of a nested registry path.
pub const PATH_SEPARATOR: char = '/';

/// Type-erased view of a registry, so different registries can share a
/// namespace.
pub trait AnyRegistry: Any + Send + Sync {
    fn description(&self) -> &str;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn keys(&self) -> Vec<String>;

    /// Reject all further additions (recursively for meta registries).
    fn freeze(&self);

    fn is_frozen(&self) -> bool;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// Returns `Some` when this registry holds other registries.
    fn as_meta(&self) -> Option<&MetaRegistry> {
        None
    }
}

impl fmt::Debug for dyn AnyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyRegistry")
            .field("description", &self.description())
            .field("keys", &self.keys())
            .finish()
    }
}

impl<T: ?Sized + Send + Sync + 'static> AnyRegistry for Registry<T> {
    fn description(&self) -> &str {
        Registry::description(self)
    }

    fn len(&self) -> usize {
        Registry::len(self)
    }

    fn keys(&self) -> Vec<String> {
        Registry::keys(self)
    }

    fn freeze(&self) {
        Registry::freeze(self)
    }

    fn is_frozen(&self) -> bool {
        Registry::is_frozen(self)
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Summary of a registry subtree, for inspection tooling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryTree {
    pub key: String,
    pub summary: String,
    pub entries: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RegistryTree>,
}

/// First non-empty line of a description, trimmed.
fn summarize(description: &str) -> String {
    description
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .trim_start_matches('#')
        .trim()
        .to_string()
}

/// A registry whose values are registries.
pub struct MetaRegistry {
    inner: Registry<dyn AnyRegistry>,
}

impl MetaRegistry {
    /// Create a meta registry that rejects duplicate namespaces.
    pub fn new(description: impl Into<String>) -> Self {
        Self::with_policy(description, OverwritePolicy::Reject)
    }

    pub fn with_policy(description: impl Into<String>, policy: OverwritePolicy) -> Self {
        Self {
            inner: Registry::new(description, policy),
        }
    }

    /// Add a sub-registry, returning a typed handle to it.
    pub fn add_registry<R: AnyRegistry>(
        &self,
        key: impl Into<String>,
        registry: R,
    ) -> Result<Arc<R>, RegistryError> {
        let registry = Arc::new(registry);
        self.inner
            .add_shared(key, registry.clone() as Arc<dyn AnyRegistry>)?;
        Ok(registry)
    }

    /// Get a sub-registry by its direct key.
    pub fn get(&self, key: &str) -> Option<Arc<dyn AnyRegistry>> {
        self.inner.get(key)
    }

    /// Get a direct sub-registry with its concrete type.
    pub fn registry<R: AnyRegistry>(&self, key: &str) -> Option<Arc<R>> {
        self.get(key)?.into_any().downcast::<R>().ok()
    }

    /// Resolve a nested path such as `inspector/editors`.
    ///
    /// Fails with `PathNotFound` if a segment is missing or an intermediate
    /// segment is not a meta registry.
    pub fn resolve(&self, path: &str) -> Result<Arc<dyn AnyRegistry>, RegistryError> {
        let mut segments = path.split(PATH_SEPARATOR).filter(|s| !s.is_empty());

        let first = segments
            .next()
            .ok_or_else(|| RegistryError::path_not_found(path, ""))?;
        let mut current = self
            .get(first)
            .ok_or_else(|| RegistryError::path_not_found(path, first))?;

        for segment in segments {
            let next = current
                .as_meta()
                .and_then(|meta| meta.get(segment))
                .ok_or_else(|| RegistryError::path_not_found(path, segment))?;
            current = next;
        }

        Ok(current)
    }

    /// Resolve a nested path and downcast the result.
    pub fn resolve_as<R: AnyRegistry>(&self, path: &str) -> Result<Arc<R>, RegistryError> {
        self.resolve(path)?
            .into_any()
            .downcast::<R>()
            .map_err(|_| RegistryError::TypeMismatch {
                path: path.to_string(),
            })
    }

    /// Look up a value in a leaf registry by full path.
    ///
    /// Segments are consumed while they name meta registries; the rest of
    /// the path is the key in the `Registry<T>` reached, so keys may contain
    /// `/` (`inspector/editors/Neos.Neos/Inspector/Editors/TextFieldEditor`).
    /// `Ok(None)` means the leaf registry exists but has no such key.
    pub fn lookup<T>(&self, path: &str) -> Result<Option<Arc<T>>, RegistryError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.lookup_in(path, path.trim_start_matches(PATH_SEPARATOR))
    }

    fn lookup_in<T>(&self, path: &str, rest: &str) -> Result<Option<Arc<T>>, RegistryError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let Some((segment, key)) = rest.split_once(PATH_SEPARATOR) else {
            return Err(if self.has(rest) {
                RegistryError::TypeMismatch {
                    path: path.to_string(),
                }
            } else {
                RegistryError::path_not_found(path, rest)
            });
        };

        let registry = self
            .get(segment)
            .ok_or_else(|| RegistryError::path_not_found(path, segment))?;
        if let Some(meta) = registry.as_meta() {
            return meta.lookup_in(path, key);
        }

        let leaf = registry
            .into_any()
            .downcast::<Registry<T>>()
            .map_err(|_| RegistryError::TypeMismatch {
                path: path.to_string(),
            })?;
        Ok(leaf.get(key))
    }

    /// Optional form of [`resolve_as`](Self::resolve_as).
    pub fn find<R: AnyRegistry>(&self, path: &str) -> Option<Arc<R>> {
        self.resolve_as(path).ok()
    }

    pub fn get_all_as_list(&self) -> RegistryList<dyn AnyRegistry> {
        self.inner.get_all_as_list()
    }

    pub fn has(&self, key: &str) -> bool {
        self.inner.has(key)
    }

    /// Describe every sub-registry, recursing into meta registries.
    pub fn describe(&self) -> Vec<RegistryTree> {
        self.get_all_as_list()
            .iter()
            .map(|item| RegistryTree {
                key: item.key.clone(),
                summary: summarize(item.value.description()),
                entries: item.value.len(),
                children: item
                    .value
                    .as_meta()
                    .map(MetaRegistry::describe)
                    .unwrap_or_default(),
            })
            .collect()
    }
}

impl fmt::Debug for MetaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MetaRegistry").field(&self.inner).finish()
    }
}

impl AnyRegistry for MetaRegistry {
    fn description(&self) -> &str {
        self.inner.description()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }

    fn freeze(&self) {
        self.inner.freeze();
        for item in &self.inner.get_all_as_list() {
            item.value.freeze();
        }
    }

    fn is_frozen(&self) -> bool {
        self.inner.is_frozen()
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn as_meta(&self) -> Option<&MetaRegistry> {
        Some(self)
    }
}

#[cfg(test)]
#[path = "meta_tests.rs"]
mod tests;
