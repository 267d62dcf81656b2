//! # edithost Core
//!
//! The extensibility core of the edithost framework.
//!
//! ## Components
//!
//! - [`Registry`] / [`MetaRegistry`] - Keyed stores forming the global registry tree
//! - [`Bootstrapper`] - Runs manifests once to populate and freeze the tree
//! - [`FeedbackHandlerTable`] - Maps server feedback types to handlers
//! - [`with_registries`] - Context-injection decorator for components
//! - [`FeedbackPump`] - Sequential consumer for feedback batches
//! - [`view_config`] - Restricted expressions inside view configuration

pub mod bootstrap;
pub mod decorator;
pub mod feedback;
pub mod pump;
pub mod registry;
pub mod store;
pub mod view_config;

pub use bootstrap::{BootstrapState, Bootstrapper, Manifest, ManifestContext};
pub use decorator::{
    with_registries, Component, ContextMemo, Decorated, Decorator, InjectedProps,
    InjectionContext,
};
pub use feedback::{
    BatchReport, DispatchOutcome, FeedbackContext, FeedbackHandler, FeedbackHandlerTable,
};
pub use pump::FeedbackPump;
pub use registry::{
    AnyRegistry, MetaRegistry, OverwritePolicy, Registry, RegistryItem, RegistryList,
    RegistryTree, PATH_SEPARATOR,
};
pub use store::MemoryStore;
