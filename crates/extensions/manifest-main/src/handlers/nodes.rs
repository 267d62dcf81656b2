//! Content repository feedback: workspaces, created, updated and removed nodes.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use edithost_core::store::{value_at, value_at_path};
use edithost_core::FeedbackContext;
use edithost_protocols::error::FeedbackError;
use edithost_protocols::{Action, Feedback};

use super::action_types;

pub fn update_workspace_info(feedback: &Feedback, ctx: &FeedbackContext) -> Result<(), FeedbackError> {
    ctx.store
        .dispatch(Action::new(action_types::WORKSPACES_UPDATE, feedback.payload_value()));
    Ok(())
}

/// The page tree reloads the children of the new document's parent.
pub fn document_node_created(feedback: &Feedback, ctx: &FeedbackContext) -> Result<(), FeedbackError> {
    let context_path = feedback.require_str("contextPath")?;
    ctx.store.dispatch(Action::new(
        action_types::DOCUMENT_NODE_CREATED,
        json!({ "contextPath": context_path }),
    ));
    Ok(())
}

pub fn update_node_info(feedback: &Feedback, ctx: &FeedbackContext) -> Result<(), FeedbackError> {
    let node_map = match feedback.field("byContextPath") {
        Some(map @ Value::Object(_)) => map.clone(),
        _ => {
            return Err(FeedbackError::invalid_payload(
                &feedback.feedback_type,
                "missing object field `byContextPath`",
            ));
        }
    };
    ctx.store
        .dispatch(Action::new(action_types::NODES_ADD, json!({ "nodeMap": node_map })));
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoveNodePayload {
    context_path: String,
    parent_context_path: String,
}

/// Drop a removed node from focus, the page tree, the canvas and the store.
///
/// When the canvas shows the removed document it moves to the parent
/// document; otherwise the node's elements are removed from the canvas.
pub fn remove_node(feedback: &Feedback, ctx: &FeedbackContext) -> Result<(), FeedbackError> {
    let RemoveNodePayload {
        context_path,
        parent_context_path,
    } = feedback.parse_payload()?;
    let state = ctx.store.state();
    let is_removed = |path: &str| value_at(&state, path).and_then(Value::as_str) == Some(context_path.as_str());

    if is_removed("cr.nodes.focused.contextPath") {
        ctx.store.dispatch(Action::bare(action_types::NODES_UNFOCUS));
    }

    if is_removed("ui.pageTree.isFocused") {
        ctx.store.dispatch(Action::new(
            action_types::PAGE_TREE_FOCUS,
            json!({ "contextPath": parent_context_path }),
        ));
    }

    if is_removed("ui.contentCanvas.contextPath") {
        let parent_uri = value_at_path(
            &state,
            &["cr", "nodes", "byContextPath", parent_context_path.as_str(), "uri"],
        )
        .cloned()
        .unwrap_or(Value::Null);

        ctx.store
            .dispatch(Action::new(action_types::CANVAS_SET_SRC, json!({ "src": parent_uri })));
        ctx.store.dispatch(Action::new(
            action_types::CANVAS_SET_CONTEXT_PATH,
            json!({ "contextPath": parent_context_path }),
        ));
    } else if let Some(canvas) = ctx.canvas.as_deref() {
        let removed = canvas.remove_nodes(&context_path)?;
        debug!(context_path = %context_path, removed, "Removed node elements from canvas");
    } else {
        debug!(context_path = %context_path, "No content canvas attached, skipping DOM removal");
    }

    ctx.store.dispatch(Action::new(
        action_types::NODES_REMOVE,
        json!({ "contextPath": context_path }),
    ));
    Ok(())
}

#[cfg(test)]
#[path = "nodes_tests.rs"]
mod tests;
