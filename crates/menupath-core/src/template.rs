//! Declarative menu templates.
//!
//! A template describes nodes to create: either a single entry or an
//! ordered sequence. Entries are converted (dev-gating, action binding,
//! path expansion) before they are built into [`MenuNode`]s.

use crate::action::{MenuAction, MenuCallback};
use crate::node::{MenuKind, MenuNode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declarative descriptor for one menu entry.
///
/// Wire fields follow the menu contract: `label`/`path`, `type`,
/// `message` + `params` + `panel`, `command` + `params`, `dev`, `submenu`,
/// and the pass-through `icon`/`enabled`/`visible`/`checked`/`accelerator`.
/// `click` and `action` are code-side only and never serialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuTemplate {
    pub label: Option<String>,
    /// Slash-separated attachment path; wins over `label` when both are set.
    pub path: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<MenuKind>,
    /// Message name dispatched when the item is activated.
    pub message: Option<String>,
    /// Positional params for `message` or `command`; must be an array.
    pub params: Option<Value>,
    /// Panel id; when set the message is addressed to that panel.
    pub panel: Option<String>,
    /// Registered command name invoked when the item is activated.
    pub command: Option<String>,
    /// Only materialized when dev mode is enabled.
    pub dev: bool,
    pub submenu: Option<Vec<MenuTemplate>>,
    pub icon: Option<String>,
    pub enabled: Option<bool>,
    pub visible: Option<bool>,
    pub checked: Option<bool>,
    pub accelerator: Option<String>,
    /// Direct callback supplied in code; not part of the wire shape.
    #[serde(skip)]
    pub click: Option<MenuCallback>,
    /// Binding resolved by conversion.
    #[serde(skip)]
    pub action: Option<MenuAction>,
}

impl MenuTemplate {
    /// Entry labeled `label` with no binding.
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    /// Separator entry.
    pub fn separator() -> Self {
        Self {
            kind: Some(MenuKind::Separator),
            ..Default::default()
        }
    }

    /// Name used in diagnostics: the path when present, else the label.
    pub(crate) fn display_name(&self) -> String {
        self.path
            .clone()
            .or_else(|| self.label.clone())
            .unwrap_or_default()
    }

    pub(crate) fn is_separator(&self) -> bool {
        matches!(self.kind, Some(MenuKind::Separator))
    }

    /// Node kind this entry resolves to: an explicit `type` wins, a
    /// `submenu` field implies a submenu, anything else is normal.
    pub(crate) fn resolved_kind(&self) -> MenuKind {
        if let Some(kind) = &self.kind {
            kind.clone()
        } else if self.submenu.is_some() {
            MenuKind::Submenu
        } else {
            MenuKind::Normal
        }
    }

    /// Build a tree node from this (already converted) entry.
    pub fn build(&self) -> MenuNode {
        let kind = self.resolved_kind();
        let mut node = match kind {
            MenuKind::Separator => MenuNode::separator(),
            kind => MenuNode::leaf(self.label.clone().unwrap_or_default(), kind),
        };
        node.set_flags(self.enabled, self.visible, self.checked);
        node.set_icon(self.icon.clone());
        node.set_accelerator(self.accelerator.clone());
        node.set_action(
            self.action
                .clone()
                .or_else(|| self.click.clone().map(MenuAction::Callback)),
        );
        if node.is_submenu() {
            if let Some(entries) = &self.submenu {
                node.replace_children(build_items(entries));
            }
        }
        node
    }
}

/// Build nodes for every entry of a converted sequence, in order.
pub fn build_items(entries: &[MenuTemplate]) -> Vec<MenuNode> {
    entries.iter().map(MenuTemplate::build).collect()
}

/// Depth-first visit of a template sequence, entries before their submenus.
pub fn walk_template<F: FnMut(&MenuTemplate)>(entries: &[MenuTemplate], visit: &mut F) {
    for entry in entries {
        visit(entry);
        if let Some(submenu) = &entry.submenu {
            walk_template(submenu, visit);
        }
    }
}

/// One entry or an ordered sequence of entries.
///
/// Every operation normalizes its input to a sequence; the single form
/// additionally allows the label to be peeled off the operation path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateInput {
    One(MenuTemplate),
    Many(Vec<MenuTemplate>),
}

impl TemplateInput {
    pub fn is_single(&self) -> bool {
        matches!(self, TemplateInput::One(_))
    }

    pub fn into_entries(self) -> Vec<MenuTemplate> {
        match self {
            TemplateInput::One(entry) => vec![entry],
            TemplateInput::Many(entries) => entries,
        }
    }
}

impl From<MenuTemplate> for TemplateInput {
    fn from(entry: MenuTemplate) -> Self {
        TemplateInput::One(entry)
    }
}

impl From<Vec<MenuTemplate>> for TemplateInput {
    fn from(entries: Vec<MenuTemplate>) -> Self {
        TemplateInput::Many(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_deserialization() {
        let tmpl: MenuTemplate = serde_json::from_value(json!({
            "label": "foobar",
            "message": "foobar:say",
            "params": ["foobar: hello!"]
        }))
        .unwrap();
        assert_eq!(tmpl.label.as_deref(), Some("foobar"));
        assert_eq!(tmpl.message.as_deref(), Some("foobar:say"));
        assert!(!tmpl.dev);
        assert!(tmpl.click.is_none());

        let input: TemplateInput = serde_json::from_value(json!([
            { "label": "a" },
            { "type": "separator" },
            { "path": "foo/bar" }
        ]))
        .unwrap();
        assert!(!input.is_single());
        let entries = input.into_entries();
        assert_eq!(entries.len(), 3);
        assert!(entries[1].is_separator());
        assert_eq!(entries[2].path.as_deref(), Some("foo/bar"));
    }

    #[test]
    fn test_build_infers_submenu_kind() {
        let tmpl: MenuTemplate = serde_json::from_value(json!({
            "label": "File",
            "submenu": [ { "label": "Open", "accelerator": "CmdOrCtrl+O" } ]
        }))
        .unwrap();

        let node = tmpl.build();
        assert!(node.is_submenu());
        let children = node.children().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].label(), "Open");
        assert_eq!(children[0].accelerator(), Some("CmdOrCtrl+O"));
        assert!(children[0].children().is_none());
    }

    #[test]
    fn test_build_defaults_and_flags() {
        let tmpl: MenuTemplate = serde_json::from_value(json!({
            "label": "Toggle",
            "type": "checkbox",
            "checked": true,
            "enabled": false
        }))
        .unwrap();

        let node = tmpl.build();
        assert_eq!(node.kind(), &MenuKind::Checkbox);
        assert!(node.checked());
        assert!(!node.enabled());
        assert!(node.visible());
    }

    #[test]
    fn test_build_binds_click_when_no_resolved_action() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let counter = Arc::new(AtomicUsize::new(0));
        let c = counter.clone();
        let tmpl = MenuTemplate {
            label: Some("Run".to_string()),
            click: Some(MenuCallback::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            })),
            ..Default::default()
        };

        let node = tmpl.build();
        node.activate();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_walk_template_order() {
        let entries: Vec<MenuTemplate> = serde_json::from_value(json!([
            { "label": "a", "submenu": [ { "label": "a1" }, { "label": "a2" } ] },
            { "label": "b" }
        ]))
        .unwrap();

        let mut seen = Vec::new();
        walk_template(&entries, &mut |entry| {
            seen.push(entry.label.clone().unwrap_or_default());
        });
        assert_eq!(seen, vec!["a", "a1", "a2", "b"]);
    }
}
