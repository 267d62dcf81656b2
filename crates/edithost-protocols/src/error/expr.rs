//! View-configuration expression errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    #[error("Expression parse error at {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Unknown expression root: {0}")]
    UnknownRoot(String),
}

impl ExprError {
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }
}
