//! Bootstrapping the registry tree from configuration.

use std::sync::Arc;

use tracing::{info, warn};

use edithost_config::{Config, ConfigValidator};
use edithost_core::{
    Bootstrapper, FeedbackHandlerTable, InjectionContext, ManifestContext, MetaRegistry,
    OverwritePolicy,
};
use edithost_manifest_main::{keys, MainManifest};
use edithost_protocols::error::{BootstrapError, RegistryError};

/// A bootstrapped host: configuration plus the frozen registry tree.
pub(crate) struct Host {
    pub config: Config,
    pub registry: Arc<MetaRegistry>,
}

impl Host {
    /// Run the built-in manifests against `config`.
    pub fn bootstrap(config: Config) -> Result<Self, BootstrapError> {
        let ctx = ManifestContext::new(
            config.to_json(),
            OverwritePolicy::from_allow(config.registry.allow_overwrite),
        );
        let mut bootstrapper = Bootstrapper::new(ctx).with_manifest(MainManifest::new());
        info!(manifests = ?bootstrapper.manifest_names(), "Bootstrapping registries");

        let registry = bootstrapper.run()?;
        Ok(Self { config, registry })
    }

    /// The context handed to decorated components.
    pub fn injection_context(&self) -> InjectionContext {
        InjectionContext::new(
            self.config.frontend_json(),
            self.registry.clone(),
            self.config.routes_json(),
        )
    }

    pub fn feedback_handlers(&self) -> Result<Arc<FeedbackHandlerTable>, RegistryError> {
        self.registry
            .resolve_as::<FeedbackHandlerTable>(keys::SERVER_FEEDBACK_HANDLERS)
    }
}

/// Validate `config`, logging warnings and failing on the first error.
pub(crate) fn validate(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let warnings = ConfigValidator::validate(config).into_result()?;
    for warning in warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    Ok(())
}
