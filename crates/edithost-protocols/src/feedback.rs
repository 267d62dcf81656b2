//! Server feedback payloads.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FeedbackError;

/// A single server-originated feedback entry.
///
/// On the wire this is `{"type": "...", ...typeSpecificFields}`; everything
/// but `type` lands in [`Feedback::payload`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(rename = "type")]
    pub feedback_type: String,

    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Feedback {
    pub fn new(feedback_type: impl Into<String>) -> Self {
        Self {
            feedback_type: feedback_type.into(),
            payload: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Get a raw payload field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Get a string payload field.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }

    /// Get a string payload field or fail with `InvalidPayload`.
    pub fn require_str(&self, key: &str) -> Result<&str, FeedbackError> {
        self.str_field(key).ok_or_else(|| {
            FeedbackError::invalid_payload(
                &self.feedback_type,
                format!("missing string field `{}`", key),
            )
        })
    }

    /// Deserialize the whole payload into a typed struct.
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, FeedbackError> {
        serde_json::from_value(Value::Object(self.payload.clone()))
            .map_err(|e| FeedbackError::invalid_payload(&self.feedback_type, e.to_string()))
    }

    /// The payload as a JSON object value.
    pub fn payload_value(&self) -> Value {
        Value::Object(self.payload.clone())
    }
}

/// A batch of feedback as returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEnvelope {
    #[serde(default)]
    pub feedbacks: Vec<Feedback>,
}

impl FeedbackEnvelope {
    pub fn new(feedbacks: Vec<Feedback>) -> Self {
        Self { feedbacks }
    }

    pub fn len(&self) -> usize {
        self.feedbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feedbacks.is_empty()
    }
}

#[cfg(test)]
#[path = "feedback_tests.rs"]
mod tests;
