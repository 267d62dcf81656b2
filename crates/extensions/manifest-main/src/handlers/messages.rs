//! Flash message and info feedback.

use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use edithost_core::{FeedbackContext, FeedbackHandler};
use edithost_protocols::error::FeedbackError;
use edithost_protocols::{Action, Feedback};

use super::action_types;

/// Turns `Success` and `Error` feedback into flash messages.
///
/// Success messages are dismissed after the configured timeout; every other
/// severity stays until the user closes it (timeout 0).
pub struct FlashMessageHandler {
    success_timeout_ms: u64,
}

impl FlashMessageHandler {
    pub fn new(success_timeout_ms: u64) -> Self {
        Self { success_timeout_ms }
    }

    fn timeout_for(&self, severity: &str) -> u64 {
        if severity.eq_ignore_ascii_case("success") {
            self.success_timeout_ms
        } else {
            0
        }
    }
}

impl FeedbackHandler for FlashMessageHandler {
    fn handle(&self, feedback: &Feedback, ctx: &FeedbackContext) -> Result<(), FeedbackError> {
        let message = feedback.require_str("message")?;
        let severity = feedback.require_str("severity")?;

        ctx.store.dispatch(Action::new(
            action_types::FLASH_MESSAGE_ADD,
            json!({
                "id": Uuid::new_v4().to_string(),
                "message": message,
                "severity": severity,
                "timeout": self.timeout_for(severity),
            }),
        ));
        Ok(())
    }
}

/// Logs `Info` feedback; severity `ERROR` logs at error level.
pub fn log_info(feedback: &Feedback, _ctx: &FeedbackContext) -> Result<(), FeedbackError> {
    let message = feedback.str_field("message").unwrap_or_default();
    match feedback.str_field("severity") {
        Some("ERROR") => error!(target: "server_feedback", "{}", message),
        _ => info!(target: "server_feedback", "{}", message),
    }
    Ok(())
}
