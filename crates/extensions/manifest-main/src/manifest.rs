//! The built-in "main" manifest.

use std::sync::Arc;

use tracing::debug;

use edithost_core::{FeedbackHandlerTable, Manifest, ManifestContext, MetaRegistry, OverwritePolicy, Registry};
use edithost_protocols::error::BootstrapError;
use edithost_protocols::ComponentRef;

use crate::definitions::{EditPreviewMode, EditorDefinition, Validator, ViewDefinition};
use crate::handlers;
use crate::save_hooks::SaveHook;
use crate::toolbar::{self, ToolbarEntry};

/// Registry keys created by [`MainManifest`].
pub mod keys {
    pub const EDIT_PREVIEW_MODES: &str = "editPreviewModes";
    pub const INSPECTOR: &str = "inspector";
    pub const EDITORS: &str = "editors";
    pub const VIEWS: &str = "views";
    pub const SAVE_HOOKS: &str = "saveHooks";
    pub const VALIDATORS: &str = "validators";
    pub const RICHTEXT_TOOLBAR: &str = "richtextToolbar";
    pub const SERVER_FEEDBACK_HANDLERS: &str = "serverFeedbackHandlers";
    pub const CONTAINERS: &str = "containers";

    pub const INSPECTOR_EDITORS: &str = "inspector/editors";
    pub const INSPECTOR_VIEWS: &str = "inspector/views";
    pub const INSPECTOR_SAVE_HOOKS: &str = "inspector/saveHooks";
}

pub const MANIFEST_NAME: &str = "main";

/// Success flash message timeout when not configured.
pub const DEFAULT_SUCCESS_TIMEOUT_MS: u64 = 5000;

const INSPECTOR_DESCRIPTION: &str = "# Inspector specific registries

- 'editors' for inspector editors
- 'views' for inspector views
- 'saveHooks' for configured side-effects after apply";

const EDITORS_DESCRIPTION: &str = "Contains all inspector editors.

The key is an editor name (such as Neos.Neos/Inspector/Editors/SelectBoxEditor), and the
value names the editor component and whether it renders its own label.";

const SAVE_HOOKS_DESCRIPTION: &str = "Side-effects run when the user presses \"Apply\" inside the Inspector.

An editor commits its value together with {hookName: hookOptions}; on apply the hook names
are resolved here and run in order, each receiving the value so far.";

const VALIDATORS_DESCRIPTION: &str = "Contains all validators.

The key is a validator name (such as Neos.Neos/Validation/NotEmptyValidator).";

const RICHTEXT_TOOLBAR_DESCRIPTION: &str = "Contains the Rich Text Editing Toolbar components.

Keys below a parent (style/h1) are options of that parent. Each entry names the formatting
rule it toggles and when it is visible.";

const SERVER_FEEDBACK_DESCRIPTION: &str = "Contains all server feedback handlers.

The key is the server-feedback-handler-type; the handler receives the feedback and the
store, global registry and content canvas.";

/// Creates the standard registry tree and the built-in feedback handlers.
///
/// Reads `flash_messages.success_timeout_ms`, `feedback.allow_overwrite` and
/// `feedback.warn_unknown` from the manifest settings.
#[derive(Debug, Default)]
pub struct MainManifest;

impl MainManifest {
    pub fn new() -> Self {
        Self
    }
}

impl Manifest for MainManifest {
    fn name(&self) -> &str {
        MANIFEST_NAME
    }

    fn bootstrap(&self, registry: &MetaRegistry, ctx: &ManifestContext) -> Result<(), BootstrapError> {
        let policy = ctx.leaf_policy;

        registry.add_registry(
            keys::EDIT_PREVIEW_MODES,
            Registry::<EditPreviewMode>::new("# Edit/Preview Mode specific registry", policy),
        )?;

        let inspector = registry.add_registry(keys::INSPECTOR, MetaRegistry::new(INSPECTOR_DESCRIPTION))?;
        inspector.add_registry(keys::EDITORS, Registry::<EditorDefinition>::new(EDITORS_DESCRIPTION, policy))?;
        inspector.add_registry(
            keys::VIEWS,
            Registry::<ViewDefinition>::new("Contains all inspector views.", policy),
        )?;
        inspector.add_registry(keys::SAVE_HOOKS, Registry::<dyn SaveHook>::new(SAVE_HOOKS_DESCRIPTION, policy))?;

        registry.add_registry(
            keys::VALIDATORS,
            Registry::<dyn Validator>::new(VALIDATORS_DESCRIPTION, policy),
        )?;

        let richtext_toolbar = registry.add_registry(
            keys::RICHTEXT_TOOLBAR,
            Registry::<ToolbarEntry>::new(RICHTEXT_TOOLBAR_DESCRIPTION, policy),
        )?;
        toolbar::register_defaults(&richtext_toolbar)?;

        let feedback_policy =
            OverwritePolicy::from_allow(ctx.get_setting::<bool>("feedback.allow_overwrite").unwrap_or(true));
        let warn_unknown = ctx.get_setting::<bool>("feedback.warn_unknown").unwrap_or(true);
        let handlers: Arc<FeedbackHandlerTable> = registry.add_registry(
            keys::SERVER_FEEDBACK_HANDLERS,
            FeedbackHandlerTable::new(SERVER_FEEDBACK_DESCRIPTION, feedback_policy).with_warn_unknown(warn_unknown),
        )?;
        let success_timeout_ms = ctx
            .get_setting::<u64>("flash_messages.success_timeout_ms")
            .unwrap_or(DEFAULT_SUCCESS_TIMEOUT_MS);
        handlers::register_builtin(&handlers, success_timeout_ms)?;

        registry.add_registry(
            keys::CONTAINERS,
            Registry::<ComponentRef>::new("# Container Registry", policy),
        )?;

        debug!(
            toolbar_entries = richtext_toolbar.len(),
            feedback_types = handlers.list_types().len(),
            "Main manifest populated"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
