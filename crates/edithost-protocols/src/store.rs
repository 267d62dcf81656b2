//! Store collaborator: receives plain action objects.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A plain action object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: String,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,
}

impl Action {
    pub fn new(action_type: impl Into<String>, payload: Value) -> Self {
        Self {
            action_type: action_type.into(),
            payload,
        }
    }

    /// An action without payload.
    pub fn bare(action_type: impl Into<String>) -> Self {
        Self::new(action_type, Value::Null)
    }
}

/// The application store as seen by feedback handlers.
///
/// Implementations own reduction; handlers only read the current state and
/// dispatch actions.
pub trait Store: Send + Sync {
    /// Dispatch an action.
    fn dispatch(&self, action: Action);

    /// Snapshot of the current state.
    fn state(&self) -> Value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_serialization() {
        let action = Action::new("CR.Nodes.REMOVE", json!("/sites/a"));
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value, json!({"type": "CR.Nodes.REMOVE", "payload": "/sites/a"}));
    }

    #[test]
    fn test_bare_action_omits_payload() {
        let value = serde_json::to_value(Action::bare("UI.PageTree.RELOAD_TREE")).unwrap();
        assert_eq!(value, json!({"type": "UI.PageTree.RELOAD_TREE"}));
    }

    #[test]
    fn test_action_deserialize_without_payload() {
        let action: Action = serde_json::from_value(json!({"type": "X"})).unwrap();
        assert_eq!(action, Action::bare("X"));
    }
}
