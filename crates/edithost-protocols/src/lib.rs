//! # edithost Protocols
//!
//! Shared types and collaborator traits for the edithost framework.
//! Contains only interface definitions - no implementations.
//!
//! ## Core Types
//!
//! - [`Feedback`] - A server-originated event keyed by its `type`
//! - [`Action`] - A plain action object dispatched into a [`Store`]
//! - [`ContentCanvas`] - DOM-side collaborator used by feedback handlers
//! - [`ComponentRef`] - Opaque reference to an externally rendered component

pub mod canvas;
pub mod component;
pub mod error;
pub mod feedback;
pub mod store;

pub use canvas::{ContentCanvas, DomAddress, InsertPosition};
pub use component::ComponentRef;
pub use error::{BootstrapError, ExprError, FeedbackError, RegistryError};
pub use feedback::{Feedback, FeedbackEnvelope};
pub use store::{Action, Store};
