//! Runtime menu tree nodes.

use crate::action::MenuAction;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Menu item kind.
///
/// Unknown strings map to [`MenuKind::Role`], an opaque pass-through for
/// host-defined roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuKind {
    Normal,
    Separator,
    Checkbox,
    Radio,
    Submenu,
    Role(String),
}

impl MenuKind {
    pub fn as_str(&self) -> &str {
        match self {
            MenuKind::Normal => "normal",
            MenuKind::Separator => "separator",
            MenuKind::Checkbox => "checkbox",
            MenuKind::Radio => "radio",
            MenuKind::Submenu => "submenu",
            MenuKind::Role(role) => role,
        }
    }
}

impl Serialize for MenuKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MenuKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(match value.as_str() {
            "normal" => MenuKind::Normal,
            "separator" => MenuKind::Separator,
            "checkbox" => MenuKind::Checkbox,
            "radio" => MenuKind::Radio,
            "submenu" => MenuKind::Submenu,
            _ => MenuKind::Role(value),
        })
    }
}

/// Options accepted by `MenuTree::set`; unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SetOptions {
    pub icon: Option<String>,
    pub enabled: Option<bool>,
    pub visible: Option<bool>,
    pub checked: Option<bool>,
}

/// A node in the menu tree.
///
/// Submenu nodes always own a (possibly empty) child sequence; nodes of any
/// other kind never do. The constructors uphold that invariant and every
/// tree operation preserves it.
#[derive(Debug, Clone)]
pub struct MenuNode {
    label: String,
    kind: MenuKind,
    enabled: bool,
    visible: bool,
    checked: bool,
    icon: Option<String>,
    accelerator: Option<String>,
    action: Option<MenuAction>,
    children: Option<Vec<MenuNode>>,
}

impl MenuNode {
    /// New empty submenu node.
    pub fn submenu(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: MenuKind::Submenu,
            enabled: true,
            visible: true,
            checked: false,
            icon: None,
            accelerator: None,
            action: None,
            children: Some(Vec::new()),
        }
    }

    /// New separator node. Separators carry no label.
    pub fn separator() -> Self {
        Self {
            label: String::new(),
            kind: MenuKind::Separator,
            enabled: true,
            visible: true,
            checked: false,
            icon: None,
            accelerator: None,
            action: None,
            children: None,
        }
    }

    /// New leaf node of the given kind.
    pub fn leaf(label: impl Into<String>, kind: MenuKind) -> Self {
        let children = if kind == MenuKind::Submenu {
            Some(Vec::new())
        } else {
            None
        };
        Self {
            label: label.into(),
            kind,
            enabled: true,
            visible: true,
            checked: false,
            icon: None,
            accelerator: None,
            action: None,
            children,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &MenuKind {
        &self.kind
    }

    pub fn is_submenu(&self) -> bool {
        self.kind == MenuKind::Submenu
    }

    pub fn is_separator(&self) -> bool {
        self.kind == MenuKind::Separator
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn checked(&self) -> bool {
        self.checked
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn accelerator(&self) -> Option<&str> {
        self.accelerator.as_deref()
    }

    pub fn action(&self) -> Option<&MenuAction> {
        self.action.as_ref()
    }

    /// Ordered children, present only on submenu nodes.
    pub fn children(&self) -> Option<&[MenuNode]> {
        self.children.as_deref()
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<MenuNode>> {
        self.children.as_mut()
    }

    /// Swap this submenu's child list, returning the previous one.
    pub(crate) fn replace_children(&mut self, children: Vec<MenuNode>) -> Vec<MenuNode> {
        debug_assert!(self.is_submenu());
        std::mem::replace(self.children.get_or_insert_with(Vec::new), children)
    }

    pub(crate) fn set_flags(
        &mut self,
        enabled: Option<bool>,
        visible: Option<bool>,
        checked: Option<bool>,
    ) {
        if let Some(enabled) = enabled {
            self.enabled = enabled;
        }
        if let Some(visible) = visible {
            self.visible = visible;
        }
        if let Some(checked) = checked {
            self.checked = checked;
        }
    }

    pub(crate) fn set_icon(&mut self, icon: Option<String>) {
        if icon.is_some() {
            self.icon = icon;
        }
    }

    pub(crate) fn set_accelerator(&mut self, accelerator: Option<String>) {
        self.accelerator = accelerator;
    }

    pub(crate) fn set_action(&mut self, action: Option<MenuAction>) {
        self.action = action;
    }

    /// Apply any options present, leaving unset fields untouched.
    pub(crate) fn apply_options(&mut self, options: &SetOptions) {
        self.set_icon(options.icon.clone());
        self.set_flags(options.enabled, options.visible, options.checked);
    }

    /// Invoke the bound action, if any.
    pub fn activate(&self) {
        if let Some(action) = &self.action {
            action.invoke();
        }
    }
}
