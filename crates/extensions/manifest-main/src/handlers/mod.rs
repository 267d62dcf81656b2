//! Built-in server feedback handlers.

mod canvas;
mod messages;
mod nodes;

#[cfg(test)]
mod test_support;

pub use canvas::{reload_document, render_content_out_of_band};
pub use messages::{log_info, FlashMessageHandler};
pub use nodes::{document_node_created, remove_node, update_node_info, update_workspace_info};

use std::sync::Arc;

use edithost_core::FeedbackHandlerTable;
use edithost_protocols::error::RegistryError;

/// Feedback types handled out of the box.
pub mod feedback_types {
    pub const SUCCESS: &str = "Neos.Neos.Ui:Success";
    pub const ERROR: &str = "Neos.Neos.Ui:Error";
    pub const INFO: &str = "Neos.Neos.Ui:Info";
    pub const UPDATE_WORKSPACE_INFO: &str = "Neos.Neos.Ui:UpdateWorkspaceInfo";
    pub const DOCUMENT_NODE_CREATED: &str = "Neos.Neos.Ui:DocumentNodeCreated";
    pub const RELOAD_DOCUMENT: &str = "Neos.Neos.Ui:ReloadDocument";
    pub const UPDATE_NODE_INFO: &str = "Neos.Neos.Ui:UpdateNodeInfo";
    pub const RENDER_CONTENT_OUT_OF_BAND: &str = "Neos.Neos.Ui:RenderContentOutOfBand";
    pub const REMOVE_NODE: &str = "Neos.Neos.Ui:RemoveNode";
}

/// Action types dispatched by the built-in handlers.
pub mod action_types {
    pub const FLASH_MESSAGE_ADD: &str = "UI.FlashMessages.ADD";
    pub const WORKSPACES_UPDATE: &str = "CR.Workspaces.UPDATE";
    pub const DOCUMENT_NODE_CREATED: &str = "UI.Remote.DOCUMENT_NODE_CREATED";
    pub const PAGE_TREE_RELOAD: &str = "UI.PageTree.RELOAD_TREE";
    pub const PAGE_TREE_FOCUS: &str = "UI.PageTree.FOCUS";
    pub const NODES_ADD: &str = "CR.Nodes.ADD";
    pub const NODES_UNFOCUS: &str = "CR.Nodes.UNFOCUS";
    pub const NODES_REMOVE: &str = "CR.Nodes.REMOVE";
    pub const CANVAS_SET_SRC: &str = "UI.ContentCanvas.SET_SRC";
    pub const CANVAS_SET_CONTEXT_PATH: &str = "UI.ContentCanvas.SET_CONTEXT_PATH";
}

/// Register every built-in handler.
pub fn register_builtin(
    table: &FeedbackHandlerTable,
    success_timeout_ms: u64,
) -> Result<(), RegistryError> {
    use feedback_types::*;

    let flash: Arc<FlashMessageHandler> = Arc::new(FlashMessageHandler::new(success_timeout_ms));
    table.register_shared(SUCCESS, flash.clone())?;
    table.register_shared(ERROR, flash)?;
    table.register_fn(INFO, log_info)?;

    table.register_fn(UPDATE_WORKSPACE_INFO, update_workspace_info)?;
    table.register_fn(DOCUMENT_NODE_CREATED, document_node_created)?;
    table.register_fn(RELOAD_DOCUMENT, reload_document)?;
    table.register_fn(UPDATE_NODE_INFO, update_node_info)?;
    table.register_fn(RENDER_CONTENT_OUT_OF_BAND, render_content_out_of_band)?;
    table.register_fn(REMOVE_NODE, remove_node)?;

    Ok(())
}
