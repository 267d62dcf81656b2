//! Content canvas collaborator.
//!
//! The canvas is the DOM of the edited page. It lives outside this
//! workspace; feedback handlers reach it only through [`ContentCanvas`].

use serde::{Deserialize, Serialize};

use crate::error::FeedbackError;

/// Addresses a rendered element by node context path and fusion path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomAddress {
    pub context_path: String,
    pub fusion_path: String,
}

impl DomAddress {
    pub fn new(context_path: impl Into<String>, fusion_path: impl Into<String>) -> Self {
        Self {
            context_path: context_path.into(),
            fusion_path: fusion_path.into(),
        }
    }
}

/// Where out-of-band content is placed relative to its anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertPosition {
    Before,
    After,
    #[default]
    Into,
}

/// DOM operations needed by the built-in feedback handlers.
pub trait ContentCanvas: Send + Sync {
    /// Reload every content frame.
    fn reload_frames(&self) -> Result<(), FeedbackError>;

    /// Insert the element for `context_path` found in `rendered_html`
    /// relative to `anchor`.
    fn insert_content(
        &self,
        context_path: &str,
        rendered_html: &str,
        anchor: &DomAddress,
        position: InsertPosition,
    ) -> Result<(), FeedbackError>;

    /// Remove all elements rendered for `context_path`. Returns how many were removed.
    fn remove_nodes(&self, context_path: &str) -> Result<usize, FeedbackError>;
}
