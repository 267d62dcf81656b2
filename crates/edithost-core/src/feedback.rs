//! Server feedback dispatch.
//!
//! The server answers change requests with a batch of feedback entries
//! (`{type, ...fields}`). [`FeedbackHandlerTable`] maps each type to one
//! handler and invokes it with a [`FeedbackContext`]. Unknown types are
//! skipped and failing handlers are contained, so one bad entry never stops
//! the rest of the batch.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, error, warn};

use edithost_protocols::error::{FeedbackError, RegistryError};
use edithost_protocols::{ContentCanvas, Feedback, Store};

use crate::registry::{AnyRegistry, MetaRegistry, OverwritePolicy};

/// Everything a handler may touch while processing one feedback entry.
#[derive(Clone)]
pub struct FeedbackContext {
    pub store: Arc<dyn Store>,
    pub global_registry: Arc<MetaRegistry>,
    pub canvas: Option<Arc<dyn ContentCanvas>>,
}

impl FeedbackContext {
    pub fn new(store: Arc<dyn Store>, global_registry: Arc<MetaRegistry>) -> Self {
        Self {
            store,
            global_registry,
            canvas: None,
        }
    }

    pub fn with_canvas(mut self, canvas: Arc<dyn ContentCanvas>) -> Self {
        self.canvas = Some(canvas);
        self
    }

    /// The canvas, or a `Canvas` error when none is attached.
    pub fn canvas(&self) -> Result<&dyn ContentCanvas, FeedbackError> {
        self.canvas
            .as_deref()
            .ok_or_else(|| FeedbackError::Canvas("no content canvas attached".to_string()))
    }
}

/// Handles one feedback type.
pub trait FeedbackHandler: Send + Sync {
    fn handle(&self, feedback: &Feedback, ctx: &FeedbackContext) -> Result<(), FeedbackError>;
}

impl<F> FeedbackHandler for F
where
    F: Fn(&Feedback, &FeedbackContext) -> Result<(), FeedbackError> + Send + Sync,
{
    fn handle(&self, feedback: &Feedback, ctx: &FeedbackContext) -> Result<(), FeedbackError> {
        self(feedback, ctx)
    }
}

/// Result of dispatching a single feedback entry.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Handled,
    Unhandled,
    Failed(FeedbackError),
}

/// Aggregated outcome of one or more batches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub handled: usize,
    pub unhandled: Vec<String>,
    pub failures: Vec<FeedbackError>,
}

impl BatchReport {
    pub fn record(&mut self, feedback_type: &str, outcome: DispatchOutcome) {
        match outcome {
            DispatchOutcome::Handled => self.handled += 1,
            DispatchOutcome::Unhandled => self.unhandled.push(feedback_type.to_string()),
            DispatchOutcome::Failed(err) => self.failures.push(err),
        }
    }

    /// Fold another report into this one.
    pub fn absorb(&mut self, other: BatchReport) {
        self.handled += other.handled;
        self.unhandled.extend(other.unhandled);
        self.failures.extend(other.failures);
    }

    pub fn total(&self) -> usize {
        self.handled + self.unhandled.len() + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.unhandled.is_empty() && self.failures.is_empty()
    }
}

/// Maps feedback types to handlers; exactly one handler per type.
pub struct FeedbackHandlerTable {
    description: String,
    policy: OverwritePolicy,
    handlers: DashMap<String, Arc<dyn FeedbackHandler>>,
    frozen: AtomicBool,
    warn_unknown: bool,
}

impl FeedbackHandlerTable {
    /// Create a table. `Overwrite` lets a later registration replace an
    /// earlier one; `Reject` fails it with `DuplicateKey`.
    pub fn new(description: impl Into<String>, policy: OverwritePolicy) -> Self {
        Self {
            description: description.into(),
            policy,
            handlers: DashMap::new(),
            frozen: AtomicBool::new(false),
            warn_unknown: true,
        }
    }

    /// Log unknown feedback types at warn (default) or debug level.
    pub fn with_warn_unknown(mut self, warn_unknown: bool) -> Self {
        self.warn_unknown = warn_unknown;
        self
    }

    pub fn policy(&self) -> OverwritePolicy {
        self.policy
    }

    /// Register a handler for a feedback type.
    pub fn register<H: FeedbackHandler + 'static>(
        &self,
        feedback_type: impl Into<String>,
        handler: H,
    ) -> Result<(), RegistryError> {
        self.register_shared(feedback_type, Arc::new(handler))
    }

    /// Register a closure handler.
    pub fn register_fn<F>(&self, feedback_type: impl Into<String>, handler: F) -> Result<(), RegistryError>
    where
        F: Fn(&Feedback, &FeedbackContext) -> Result<(), FeedbackError> + Send + Sync + 'static,
    {
        self.register(feedback_type, handler)
    }

    /// Register an already shared handler, e.g. one used for several types.
    pub fn register_shared(
        &self,
        feedback_type: impl Into<String>,
        handler: Arc<dyn FeedbackHandler>,
    ) -> Result<(), RegistryError> {
        let feedback_type = feedback_type.into();

        if self.frozen.load(Ordering::Acquire) {
            return Err(RegistryError::Frozen(feedback_type));
        }

        match self.handlers.entry(feedback_type) {
            Entry::Occupied(mut entry) => match self.policy {
                OverwritePolicy::Reject => {
                    return Err(RegistryError::DuplicateKey(entry.key().clone()));
                }
                OverwritePolicy::Overwrite => {
                    debug!(feedback_type = %entry.key(), "Replacing feedback handler");
                    entry.insert(handler);
                }
            },
            Entry::Vacant(entry) => {
                debug!(feedback_type = %entry.key(), "Registering feedback handler");
                entry.insert(handler);
            }
        }
        Ok(())
    }

    pub fn get(&self, feedback_type: &str) -> Option<Arc<dyn FeedbackHandler>> {
        self.handlers.get(feedback_type).map(|h| h.value().clone())
    }

    pub fn contains(&self, feedback_type: &str) -> bool {
        self.handlers.contains_key(feedback_type)
    }

    /// Registered feedback types, sorted.
    pub fn list_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.handlers.iter().map(|e| e.key().clone()).collect();
        types.sort();
        types
    }

    /// Invoke the handler for `feedback` synchronously.
    ///
    /// Never panics: unknown types yield `Unhandled`, handler errors and
    /// handler panics yield `Failed`.
    pub fn dispatch(&self, feedback: &Feedback, ctx: &FeedbackContext) -> DispatchOutcome {
        let feedback_type = feedback.feedback_type.as_str();

        // Clone out of the map so no shard lock is held while the handler runs.
        let Some(handler) = self.get(feedback_type) else {
            if self.warn_unknown {
                warn!(feedback_type, "No feedback handler registered");
            } else {
                debug!(feedback_type, "No feedback handler registered");
            }
            return DispatchOutcome::Unhandled;
        };

        let result = panic::catch_unwind(AssertUnwindSafe(|| handler.handle(feedback, ctx)));
        let message = match result {
            Ok(Ok(())) => {
                debug!(feedback_type, "Feedback handled");
                return DispatchOutcome::Handled;
            }
            Ok(Err(err)) => err.to_string(),
            Err(panic) => panic_message(&*panic),
        };

        error!(feedback_type, error = %message, "Feedback handler failed");
        DispatchOutcome::Failed(FeedbackError::HandlerInvocation {
            feedback_type: feedback_type.to_string(),
            message,
        })
    }

    /// Dispatch every entry in order; failures do not stop the batch.
    pub fn dispatch_batch<'a>(
        &self,
        feedbacks: impl IntoIterator<Item = &'a Feedback>,
        ctx: &FeedbackContext,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        for feedback in feedbacks {
            let outcome = self.dispatch(feedback, ctx);
            report.record(&feedback.feedback_type, outcome);
        }
        report
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("handler panicked: {}", message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("handler panicked: {}", message)
    } else {
        "handler panicked".to_string()
    }
}

impl AnyRegistry for FeedbackHandlerTable {
    fn description(&self) -> &str {
        &self.description
    }

    fn len(&self) -> usize {
        self.handlers.len()
    }

    fn keys(&self) -> Vec<String> {
        self.list_types()
    }

    fn freeze(&self) {
        self.frozen.store(true, Ordering::Release);
    }

    fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

#[cfg(test)]
#[path = "feedback_tests.rs"]
mod tests;
