//! One-time population of the global registry tree.
//!
//! Manifests run in registration order against a fresh [`MetaRegistry`].
//! When every manifest succeeds the whole tree is frozen and handed out;
//! the first failure aborts bootstrap and nothing is handed out.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, info};

use edithost_protocols::error::{BootstrapError, RegistryError};

use crate::registry::{AnyRegistry, MetaRegistry, OverwritePolicy};

/// Settings visible to manifests while they populate the tree.
#[derive(Debug, Clone)]
pub struct ManifestContext {
    /// Application settings, e.g. the loaded configuration as JSON.
    pub settings: Value,

    /// Policy for leaf registries created by manifests.
    pub leaf_policy: OverwritePolicy,
}

impl ManifestContext {
    pub fn new(settings: Value, leaf_policy: OverwritePolicy) -> Self {
        Self {
            settings,
            leaf_policy,
        }
    }

    /// Get a setting by dotted path.
    pub fn get_setting<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        crate::store::value_at(&self.settings, path)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

impl Default for ManifestContext {
    fn default() -> Self {
        Self::new(Value::Null, OverwritePolicy::Reject)
    }
}

/// A unit of registry population, e.g. the built-in "main" manifest or a
/// site package adding its own editors.
pub trait Manifest: Send + Sync {
    fn name(&self) -> &str;

    /// Names of manifests that must run before this one.
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    fn bootstrap(&self, registry: &MetaRegistry, ctx: &ManifestContext) -> Result<(), BootstrapError>;
}

/// Bootstrap state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    Uninitialized,
    Populated,
    Failed,
}

/// Runs manifests exactly once and freezes the result.
pub struct Bootstrapper {
    manifests: Vec<Box<dyn Manifest>>,
    context: ManifestContext,
    state: BootstrapState,
}

impl Bootstrapper {
    pub fn new(context: ManifestContext) -> Self {
        Self {
            manifests: Vec::new(),
            context,
            state: BootstrapState::Uninitialized,
        }
    }

    pub fn with_manifest(mut self, manifest: impl Manifest + 'static) -> Self {
        self.add_manifest(Box::new(manifest));
        self
    }

    pub fn add_manifest(&mut self, manifest: Box<dyn Manifest>) {
        self.manifests.push(manifest);
    }

    pub fn state(&self) -> BootstrapState {
        self.state
    }

    /// Names of the queued manifests, in run order.
    pub fn manifest_names(&self) -> Vec<String> {
        self.manifests.iter().map(|m| m.name().to_string()).collect()
    }

    /// Populate and freeze the global registry.
    ///
    /// Can succeed at most once; later calls fail with `AlreadyBootstrapped`.
    pub fn run(&mut self) -> Result<Arc<MetaRegistry>, BootstrapError> {
        if self.state != BootstrapState::Uninitialized {
            return Err(BootstrapError::AlreadyBootstrapped);
        }

        match self.populate() {
            Ok(registry) => {
                registry.freeze();
                self.state = BootstrapState::Populated;
                info!(
                    manifests = self.manifests.len(),
                    registries = registry.len(),
                    "Bootstrap complete"
                );
                Ok(Arc::new(registry))
            }
            Err(e) => {
                self.state = BootstrapState::Failed;
                error!(error = %e, "Bootstrap failed");
                Err(e)
            }
        }
    }

    fn populate(&self) -> Result<MetaRegistry, BootstrapError> {
        let registry = MetaRegistry::new("Global registry");
        let mut completed: Vec<&str> = Vec::new();

        for manifest in &self.manifests {
            let name = manifest.name();
            if completed.contains(&name) {
                return Err(RegistryError::DuplicateKey(name.to_string()).into());
            }
            self.check_dependencies(manifest.as_ref(), &completed)?;

            info!(manifest = name, "Running manifest");
            manifest.bootstrap(&registry, &self.context)?;
            completed.push(name);
        }

        Ok(registry)
    }

    fn check_dependencies(&self, manifest: &dyn Manifest, completed: &[&str]) -> Result<(), BootstrapError> {
        for dep in manifest.dependencies() {
            if !completed.contains(&dep.as_str()) {
                return Err(BootstrapError::DependencyNotSatisfied {
                    manifest: manifest.name().to_string(),
                    dependency: dep,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;
