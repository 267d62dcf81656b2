//! Bootstrap errors.

use thiserror::Error;

use super::RegistryError;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Manifest dependency not satisfied: {manifest} requires {dependency}")]
    DependencyNotSatisfied { manifest: String, dependency: String },

    #[error("Manifest {manifest} failed: {message}")]
    ManifestFailed { manifest: String, message: String },

    #[error("Registries were already bootstrapped")]
    AlreadyBootstrapped,
}
