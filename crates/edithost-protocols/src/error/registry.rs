//! Registry errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The key is already present and the registry rejects overwrites.
    #[error("Registry key already registered: {0}")]
    DuplicateKey(String),

    /// A segment of a nested path is missing or is not itself a registry.
    #[error("Registry path not found: {path} (at segment '{segment}')")]
    PathNotFound { path: String, segment: String },

    /// The path resolved, but to a registry of another type.
    #[error("Registry at {path} has an unexpected type")]
    TypeMismatch { path: String },

    /// The registry was frozen after bootstrap.
    #[error("Registry is frozen, cannot add key: {0}")]
    Frozen(String),

    /// A required entry was absent.
    #[error("Registry lookup miss: {0}")]
    LookupMiss(String),
}

impl RegistryError {
    pub fn path_not_found(path: impl Into<String>, segment: impl Into<String>) -> Self {
        Self::PathNotFound {
            path: path.into(),
            segment: segment.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_error() {
        let err = RegistryError::DuplicateKey("inspector".to_string());
        let display = err.to_string();
        assert!(display.contains("already registered"));
        assert!(display.contains("inspector"));
    }

    #[test]
    fn test_path_not_found_error() {
        let err = RegistryError::path_not_found("inspector/editors/x", "editors");
        let display = err.to_string();
        assert!(display.contains("inspector/editors/x"));
        assert!(display.contains("'editors'"));
    }

    #[test]
    fn test_frozen_error() {
        let err = RegistryError::Frozen("late".to_string());
        assert!(err.to_string().contains("frozen"));
        assert!(err.to_string().contains("late"));
    }

    #[test]
    fn test_all_error_variants() {
        let errors = vec![
            RegistryError::DuplicateKey("a".to_string()),
            RegistryError::path_not_found("b", "c"),
            RegistryError::TypeMismatch {
                path: "d".to_string(),
            },
            RegistryError::Frozen("e".to_string()),
            RegistryError::LookupMiss("f".to_string()),
        ];

        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }
}
