//! Registries: keyed stores and registries of registries.

mod base;
mod meta;

pub use base::{OverwritePolicy, Registry, RegistryItem, RegistryList};
pub use meta::{AnyRegistry, MetaRegistry, RegistryTree, PATH_SEPARATOR};
