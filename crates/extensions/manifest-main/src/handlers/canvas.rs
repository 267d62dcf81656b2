//! Feedback that changes the rendered page.

use serde::Deserialize;
use tracing::debug;

use edithost_core::FeedbackContext;
use edithost_protocols::error::FeedbackError;
use edithost_protocols::{Action, DomAddress, Feedback, InsertPosition};

use super::action_types;

/// Reload the content frames, then the page tree.
pub fn reload_document(_feedback: &Feedback, ctx: &FeedbackContext) -> Result<(), FeedbackError> {
    match ctx.canvas.as_deref() {
        Some(canvas) => canvas.reload_frames()?,
        None => debug!("No content canvas attached, skipping frame reload"),
    }
    ctx.store.dispatch(Action::bare(action_types::PAGE_TREE_RELOAD));
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OutOfBandPayload {
    context_path: String,
    rendered_content: String,
    parent_dom_address: Option<DomAddress>,
    sibling_dom_address: Option<DomAddress>,
    mode: Option<String>,
}

/// `before` and `after` place content next to a sibling; anything else
/// appends it to the parent.
fn insert_position(mode: Option<&str>) -> InsertPosition {
    match mode {
        Some("before") => InsertPosition::Before,
        Some("after") => InsertPosition::After,
        _ => InsertPosition::Into,
    }
}

/// Place server-rendered content into the canvas.
pub fn render_content_out_of_band(feedback: &Feedback, ctx: &FeedbackContext) -> Result<(), FeedbackError> {
    let payload: OutOfBandPayload = feedback.parse_payload()?;
    let position = insert_position(payload.mode.as_deref());

    let (anchor, field) = match position {
        InsertPosition::Before | InsertPosition::After => (payload.sibling_dom_address, "siblingDomAddress"),
        InsertPosition::Into => (payload.parent_dom_address, "parentDomAddress"),
    };
    let anchor = anchor.ok_or_else(|| {
        FeedbackError::invalid_payload(
            &feedback.feedback_type,
            format!("missing `{}` for mode {:?}", field, position),
        )
    })?;

    ctx.canvas()?
        .insert_content(&payload.context_path, &payload.rendered_content, &anchor, position)
}
