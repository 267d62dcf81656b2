//! Inspector save hooks.
//!
//! An editor that wants its value post-processed on apply commits it
//! together with `{hookName: hookOptions}`. On apply, each hook name is
//! resolved in `inspector/saveHooks` and the hooks run in commit order,
//! each receiving the value produced by the previous one.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use edithost_core::Registry;
use edithost_protocols::error::RegistryError;

/// A side effect run when the inspector applies a value.
pub trait SaveHook: Send + Sync {
    fn apply(&self, value: Value, options: &Value) -> Result<Value, String>;
}

impl<F> SaveHook for F
where
    F: Fn(Value, &Value) -> Result<Value, String> + Send + Sync,
{
    fn apply(&self, value: Value, options: &Value) -> Result<Value, String> {
        self(value, options)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SaveHookError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Save hook {hook} failed: {message}")]
    Failed { hook: String, message: String },
}

/// Run `hooks` over `value` in order.
///
/// Stops at the first unknown or failing hook; nothing is applied in that
/// case.
pub fn apply_save_hooks(
    registry: &Registry<dyn SaveHook>,
    value: Value,
    hooks: &[(String, Value)],
) -> Result<Value, SaveHookError> {
    hooks.iter().try_fold(value, |value, (name, options)| {
        let hook = registry.require(name)?;
        debug!(hook = %name, "Running save hook");
        hook.apply(value, options).map_err(|message| SaveHookError::Failed {
            hook: name.clone(),
            message,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use edithost_core::OverwritePolicy;
    use serde_json::json;
    use std::sync::Arc;

    fn registry() -> Registry<dyn SaveHook> {
        let registry: Registry<dyn SaveHook> = Registry::new("saveHooks", OverwritePolicy::Reject);
        registry
            .add_shared(
                "Neos.UI:Hook.BeforeSave.CreateImageVariant",
                Arc::new(|value: Value, options: &Value| -> Result<Value, String> {
                    Ok(json!({"originalAsset": value, "adjustments": options.clone()}))
                }),
            )
            .unwrap();
        registry
            .add_shared(
                "Example:Uppercase",
                Arc::new(|value: Value, _: &Value| {
                    value
                        .as_str()
                        .map(|s| Value::String(s.to_uppercase()))
                        .ok_or_else(|| "expected a string".to_string())
                }),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_no_hooks_returns_value() {
        let value = apply_save_hooks(&registry(), json!("x"), &[]).unwrap();
        assert_eq!(value, json!("x"));
    }

    #[test]
    fn test_hooks_run_in_order() {
        let hooks = vec![
            ("Example:Uppercase".to_string(), Value::Null),
            (
                "Neos.UI:Hook.BeforeSave.CreateImageVariant".to_string(),
                json!({"crop": {"width": 10}}),
            ),
        ];
        let value = apply_save_hooks(&registry(), json!("asset-1"), &hooks).unwrap();
        assert_eq!(
            value,
            json!({"originalAsset": "ASSET-1", "adjustments": {"crop": {"width": 10}}})
        );
    }

    #[test]
    fn test_unknown_hook() {
        let hooks = vec![("Example:Missing".to_string(), Value::Null)];
        let err = apply_save_hooks(&registry(), json!("x"), &hooks).unwrap_err();
        assert_eq!(
            err,
            SaveHookError::Registry(RegistryError::LookupMiss("Example:Missing".to_string()))
        );
    }

    #[test]
    fn test_failing_hook() {
        let hooks = vec![("Example:Uppercase".to_string(), Value::Null)];
        let err = apply_save_hooks(&registry(), json!(1), &hooks).unwrap_err();
        assert!(matches!(err, SaveHookError::Failed { ref hook, .. } if hook == "Example:Uppercase"));
    }
}
