//! Feedback dispatch errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedbackError {
    /// The handler failed (returned an error or panicked).
    #[error("Feedback handler for {feedback_type} failed: {message}")]
    HandlerInvocation {
        feedback_type: String,
        message: String,
    },

    /// The payload lacks a field the handler needs.
    #[error("Invalid payload for {feedback_type}: {message}")]
    InvalidPayload {
        feedback_type: String,
        message: String,
    },

    /// The content canvas rejected an operation.
    #[error("Content canvas error: {0}")]
    Canvas(String),

    /// The feedback pump no longer accepts batches.
    #[error("Feedback pump closed")]
    PumpClosed,
}

impl FeedbackError {
    pub fn invalid_payload(feedback_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            feedback_type: feedback_type.into(),
            message: message.into(),
        }
    }
}
