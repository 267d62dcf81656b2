//! # edithost Main Manifest
//!
//! The built-in manifest every host runs first. It creates the standard
//! registry tree and registers the default rich text toolbar and the
//! built-in server feedback handlers.
//!
//! ## Registries
//!
//! - `editPreviewModes`
//! - `inspector` with `editors`, `views` and `saveHooks`
//! - `validators`
//! - `richtextToolbar`
//! - `serverFeedbackHandlers`
//! - `containers`

pub mod definitions;
pub mod handlers;
pub mod manifest;
pub mod save_hooks;
pub mod toolbar;

pub use definitions::{EditPreviewMode, EditorDefinition, Validator, ViewDefinition};
pub use manifest::{keys, MainManifest, DEFAULT_SUCCESS_TIMEOUT_MS, MANIFEST_NAME};
pub use save_hooks::{apply_save_hooks, SaveHook, SaveHookError};
pub use toolbar::{FormattingUnderCursor, ToolbarEntry, Tristate, Visibility};
