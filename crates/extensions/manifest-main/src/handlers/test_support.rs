//! Recording collaborators for handler tests.

use std::sync::Arc;

use parking_lot::Mutex;

use serde_json::Value;

use edithost_core::{FeedbackContext, MemoryStore, MetaRegistry};
use edithost_protocols::error::FeedbackError;
use edithost_protocols::{ContentCanvas, DomAddress, InsertPosition};

#[derive(Debug, Clone, PartialEq)]
pub enum CanvasCall {
    Reload,
    Insert {
        context_path: String,
        anchor: DomAddress,
        position: InsertPosition,
    },
    Remove(String),
}

#[derive(Default)]
pub struct RecordingCanvas {
    calls: Mutex<Vec<CanvasCall>>,
}

impl RecordingCanvas {
    pub fn calls(&self) -> Vec<CanvasCall> {
        self.calls.lock().clone()
    }
}

impl ContentCanvas for RecordingCanvas {
    fn reload_frames(&self) -> Result<(), FeedbackError> {
        self.calls.lock().push(CanvasCall::Reload);
        Ok(())
    }

    fn insert_content(
        &self,
        context_path: &str,
        _rendered_html: &str,
        anchor: &DomAddress,
        position: InsertPosition,
    ) -> Result<(), FeedbackError> {
        self.calls.lock().push(CanvasCall::Insert {
            context_path: context_path.to_string(),
            anchor: anchor.clone(),
            position,
        });
        Ok(())
    }

    fn remove_nodes(&self, context_path: &str) -> Result<usize, FeedbackError> {
        self.calls.lock().push(CanvasCall::Remove(context_path.to_string()));
        Ok(1)
    }
}

/// Store with `state`, an empty registry and a recording canvas.
pub fn context(state: Value) -> (Arc<MemoryStore>, FeedbackContext, Arc<RecordingCanvas>) {
    let (store, ctx) = context_without_canvas(state);
    let canvas = Arc::new(RecordingCanvas::default());
    (store, ctx.with_canvas(canvas.clone()), canvas)
}

pub fn context_without_canvas(state: Value) -> (Arc<MemoryStore>, FeedbackContext) {
    let store = Arc::new(MemoryStore::new(state));
    let ctx = FeedbackContext::new(store.clone(), Arc::new(MetaRegistry::new("Global registry")));
    (store, ctx)
}
