//! Entry types of the inspector, preview-mode and validator registries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use edithost_protocols::ComponentRef;

/// An inspector editor, keyed by editor name
/// (e.g. `Neos.Neos/Inspector/Editors/SelectBoxEditor`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorDefinition {
    pub component: ComponentRef,

    /// The component renders its label itself.
    #[serde(default)]
    pub has_own_label: bool,
}

impl EditorDefinition {
    pub fn new(component: impl Into<ComponentRef>) -> Self {
        Self {
            component: component.into(),
            has_own_label: false,
        }
    }

    pub fn with_own_label(mut self) -> Self {
        self.has_own_label = true;
        self
    }
}

/// An inspector view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDefinition {
    pub component: ComponentRef,
}

impl ViewDefinition {
    pub fn new(component: impl Into<ComponentRef>) -> Self {
        Self {
            component: component.into(),
        }
    }
}

/// An edit or preview mode of the content canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditPreviewMode {
    pub title: String,

    /// Inline editing is possible in this mode.
    #[serde(default)]
    pub is_editing_mode: bool,

    #[serde(default)]
    pub is_preview_mode: bool,
}

/// A property validator, keyed by validator name
/// (e.g. `Neos.Neos/Validation/NotEmptyValidator`).
pub trait Validator: Send + Sync {
    /// Validate `value`; `None` when valid, otherwise the error message.
    fn validate(&self, value: &Value, options: &Value) -> Option<String>;
}

impl<F> Validator for F
where
    F: Fn(&Value, &Value) -> Option<String> + Send + Sync,
{
    fn validate(&self, value: &Value, options: &Value) -> Option<String> {
        self(value, options)
    }
}
