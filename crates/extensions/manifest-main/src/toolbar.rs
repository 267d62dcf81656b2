//! Rich text toolbar entries.
//!
//! Keys are hierarchical: `style` is the paragraph-style select and
//! `style/h1` one of its options. Visibility depends on which formatting
//! rules the focused editable enables and on the formatting state under the
//! cursor.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use edithost_core::Registry;
use edithost_protocols::error::RegistryError;
use edithost_protocols::ComponentRef;

/// Formatting state of one rule under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tristate {
    Disabled,
    Off,
    On,
}

impl Tristate {
    /// From the numeric encoding used by editors (-1, 0, 1).
    pub fn from_code(code: i64) -> Self {
        match code {
            c if c < 0 => Tristate::Disabled,
            0 => Tristate::Off,
            _ => Tristate::On,
        }
    }
}

/// Formatting rule id to state under the cursor.
pub type FormattingUnderCursor = HashMap<String, Tristate>;

/// When an entry is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Visibility {
    /// Shown when the entry's own formatting rule is enabled.
    #[default]
    RuleEnabled,

    Always,

    /// Shown when any of `rules` is enabled and, if `unless_disabled` names
    /// a rule, that rule is not disabled under the cursor.
    #[serde(rename_all = "camelCase")]
    AnyEnabled {
        rules: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unless_disabled: Option<String>,
    },
}

/// One toolbar entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolbarEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatting_rule: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentRef>,

    /// Prop of `component` fired when its value changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_prop_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover_style: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default)]
    pub visibility: Visibility,
}

impl ToolbarEntry {
    /// An icon button toggling `rule`.
    pub fn icon_button(rule: &str, icon: &str) -> Self {
        Self {
            formatting_rule: Some(rule.to_string()),
            component: Some(ComponentRef::new("IconButton")),
            callback_prop_name: Some("onClick".to_string()),
            icon: Some(icon.to_string()),
            hover_style: Some("brand".to_string()),
            label: None,
            visibility: Visibility::RuleEnabled,
        }
    }

    /// An option of the paragraph-style select.
    pub fn style_option(rule: &str, label: &str) -> Self {
        Self {
            formatting_rule: Some(rule.to_string()),
            component: None,
            callback_prop_name: None,
            icon: None,
            hover_style: None,
            label: Some(label.to_string()),
            visibility: Visibility::RuleEnabled,
        }
    }

    pub fn with_component(mut self, component: &str) -> Self {
        self.component = Some(ComponentRef::new(component));
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn is_visible(&self, enabled_rules: &[&str], cursor: &FormattingUnderCursor) -> bool {
        match &self.visibility {
            Visibility::Always => true,
            Visibility::RuleEnabled => self
                .formatting_rule
                .as_deref()
                .is_some_and(|rule| enabled_rules.contains(&rule)),
            Visibility::AnyEnabled {
                rules,
                unless_disabled,
            } => {
                let any_enabled = rules.iter().any(|r| enabled_rules.contains(&r.as_str()));
                let disabled = unless_disabled
                    .as_ref()
                    .is_some_and(|rule| cursor.get(rule) == Some(&Tristate::Disabled));
                any_enabled && !disabled
            }
        }
    }
}

/// Visible top-level entries, in registration order.
pub fn visible_items(
    toolbar: &Registry<ToolbarEntry>,
    enabled_rules: &[&str],
    cursor: &FormattingUnderCursor,
) -> Vec<(String, Arc<ToolbarEntry>)> {
    toolbar
        .get_all_as_list()
        .iter()
        .filter(|item| !item.key.contains('/'))
        .filter(|item| item.value.is_visible(enabled_rules, cursor))
        .map(|item| (item.key.clone(), item.value.clone()))
        .collect()
}

/// Visible options below `parent`, e.g. the enabled paragraph styles.
pub fn visible_children(
    toolbar: &Registry<ToolbarEntry>,
    parent: &str,
    enabled_rules: &[&str],
    cursor: &FormattingUnderCursor,
) -> Vec<(String, Arc<ToolbarEntry>)> {
    toolbar
        .get_children(parent)
        .iter()
        .filter(|item| item.value.is_visible(enabled_rules, cursor))
        .map(|item| (item.key.clone(), item.value.clone()))
        .collect()
}

/// Register the default toolbar.
pub fn register_defaults(toolbar: &Registry<ToolbarEntry>) -> Result<(), RegistryError> {
    // Inline styles
    toolbar.add("strong", ToolbarEntry::icon_button("strong", "bold"))?;
    toolbar.add("italic", ToolbarEntry::icon_button("em", "italic"))?;
    toolbar.add("underline", ToolbarEntry::icon_button("u", "underline"))?;
    toolbar.add("subscript", ToolbarEntry::icon_button("sub", "subscript"))?;
    toolbar.add("superscript", ToolbarEntry::icon_button("sup", "superscript"))?;
    toolbar.add("strikethrough", ToolbarEntry::icon_button("del", "strikethrough"))?;
    toolbar.add(
        "link",
        ToolbarEntry::icon_button("a", "link").with_component("LinkIconButton"),
    )?;

    // Paragraph styles
    toolbar.add(
        "style",
        ToolbarEntry {
            formatting_rule: None,
            component: Some(ComponentRef::new("StyleSelect")),
            callback_prop_name: Some("onSelect".to_string()),
            icon: None,
            hover_style: None,
            label: None,
            visibility: Visibility::Always,
        },
    )?;
    let styles = [
        ("p", "Paragraph"),
        ("h1", "Headline 1"),
        ("h2", "Headline 2"),
        ("h3", "Headline 3"),
        ("h4", "Headline 4"),
        ("h5", "Headline 5"),
        ("h6", "Headline 6"),
        ("pre", "Preformatted"),
    ];
    for (rule, label) in styles {
        toolbar.add(format!("style/{}", rule), ToolbarEntry::style_option(rule, label))?;
    }

    // Lists
    toolbar.add("orderedList", ToolbarEntry::icon_button("ol", "list-ol"))?;
    toolbar.add("unorderedList", ToolbarEntry::icon_button("ul", "list-ul"))?;
    for (key, icon) in [("indent", "indent"), ("outdent", "outdent")] {
        let visibility = Visibility::AnyEnabled {
            rules: vec!["ul".to_string(), "ol".to_string()],
            unless_disabled: Some(key.to_string()),
        };
        toolbar.add(key, ToolbarEntry::icon_button(key, icon).with_visibility(visibility))?;
    }

    toolbar.add("table", ToolbarEntry::icon_button("table", "table"))?;
    toolbar.add("removeFormat", ToolbarEntry::icon_button("removeFormat", "table"))?;

    Ok(())
}
