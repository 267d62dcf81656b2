//! Sequential feedback consumer.
//!
//! Responses to change requests may arrive out of order; the pump makes
//! sure their feedback batches are applied one at a time, in the order they
//! were submitted.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use edithost_protocols::error::FeedbackError;
use edithost_protocols::FeedbackEnvelope;

use crate::feedback::{BatchReport, FeedbackContext, FeedbackHandlerTable};

/// Owns the consumer task dispatching submitted envelopes.
pub struct FeedbackPump {
    sender: mpsc::UnboundedSender<FeedbackEnvelope>,
    worker: JoinHandle<BatchReport>,
}

impl FeedbackPump {
    /// Spawn the consumer task on the current tokio runtime.
    pub fn spawn(table: Arc<FeedbackHandlerTable>, ctx: FeedbackContext) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<FeedbackEnvelope>();

        let worker = tokio::spawn(async move {
            let mut report = BatchReport::default();
            while let Some(envelope) = receiver.recv().await {
                debug!(feedbacks = envelope.len(), "Processing feedback batch");
                report.absorb(table.dispatch_batch(&envelope.feedbacks, &ctx));
            }
            report
        });

        Self { sender, worker }
    }

    /// Queue a batch.
    pub fn submit(&self, envelope: FeedbackEnvelope) -> Result<(), FeedbackError> {
        self.sender
            .send(envelope)
            .map_err(|_| FeedbackError::PumpClosed)
    }

    /// Stop accepting batches, drain the queue and return the combined report.
    pub async fn finish(self) -> Result<BatchReport, FeedbackError> {
        drop(self.sender);
        self.worker.await.map_err(|e| {
            error!(error = %e, "Feedback pump task failed");
            FeedbackError::PumpClosed
        })
    }
}
