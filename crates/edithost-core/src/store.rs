//! In-memory [`Store`] and state path helpers.

use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use edithost_protocols::{Action, Store};

/// Store that records dispatched actions over a fixed JSON state.
///
/// Reduction belongs to the embedding application; this store is what the
/// CLI and the tests hand to feedback handlers.
pub struct MemoryStore {
    state: RwLock<Value>,
    actions: RwLock<Vec<Action>>,
}

impl MemoryStore {
    pub fn new(state: Value) -> Self {
        Self {
            state: RwLock::new(state),
            actions: RwLock::new(Vec::new()),
        }
    }

    pub fn set_state(&self, state: Value) {
        *self.state.write() = state;
    }

    /// All actions dispatched so far, in order.
    pub fn dispatched(&self) -> Vec<Action> {
        self.actions.read().clone()
    }

    /// Drain the recorded actions.
    pub fn take_dispatched(&self) -> Vec<Action> {
        std::mem::take(&mut *self.actions.write())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Value::Object(Default::default()))
    }
}

impl Store for MemoryStore {
    fn dispatch(&self, action: Action) {
        debug!(action = %action.action_type, "Dispatching action");
        self.actions.write().push(action);
    }

    fn state(&self) -> Value {
        self.state.read().clone()
    }
}

/// Read a value by dotted path, e.g. `cr.nodes.focused.contextPath`.
pub fn value_at<'a>(state: &'a Value, path: &str) -> Option<&'a Value> {
    let segments: Vec<&str> = path.split('.').collect();
    value_at_path(state, &segments)
}

/// Read a value by explicit segments, for keys that contain dots.
pub fn value_at_path<'a>(state: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    segments.iter().try_fold(state, |current, segment| match current {
        Value::Object(map) => map.get(*segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
