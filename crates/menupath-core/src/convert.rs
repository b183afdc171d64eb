//! Template conversion: dev-gating, action binding and path expansion.
//!
//! Conversion processes a template sequence in index order, resolving each
//! entry's action binding exactly once and relocating `path`-annotated
//! entries into nested submenu structure within the sequence itself. The
//! live tree is never touched here.

use crate::action::{CommandRegistry, MenuAction, MessageSink, OutboundMessage};
use crate::error::MenuError;
use crate::node::MenuKind;
use crate::path;
use crate::template::MenuTemplate;
use serde_json::Value;
use std::sync::Arc;

/// Context threaded through template conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertContext {
    /// Developer-mode switch; dev-gated entries are dropped when false.
    pub dev_mode: bool,
    /// Registry consulted for `command` bindings.
    pub commands: Arc<CommandRegistry>,
    /// Default outbound sink for `message` bindings.
    pub sink: Option<MessageSink>,
    /// Captured sender context; when set, messages are addressed here
    /// instead of the default sink.
    pub target: Option<MessageSink>,
}

impl ConvertContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    pub fn with_commands(mut self, commands: Arc<CommandRegistry>) -> Self {
        self.commands = commands;
        self
    }

    pub fn with_sink(mut self, sink: MessageSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_target(mut self, target: MessageSink) -> Self {
        self.target = Some(target);
        self
    }

    fn message_sink(&self) -> Option<MessageSink> {
        self.target.clone().or_else(|| self.sink.clone())
    }
}

/// Convert a template sequence in place.
///
/// Entries are processed in index order; an entry reported invalid (or
/// dev-gated, or relocated by path expansion) is removed from the
/// sequence and processing continues with the next.
pub fn convert(entries: &mut Vec<MenuTemplate>, ctx: &ConvertContext) {
    let mut index = 0;
    while index < entries.len() {
        if convert_entry(entries, index, ctx) {
            entries.remove(index);
        } else {
            index += 1;
        }
    }
}

/// Process one entry; returns true when it must be removed from the sequence.
fn convert_entry(entries: &mut Vec<MenuTemplate>, index: usize, ctx: &ConvertContext) -> bool {
    let item_name = entries[index].display_name();

    // dev-gated entries are dropped outside dev mode
    if entries[index].dev && !ctx.dev_mode {
        return true;
    }

    // action binding: message wins over command, command over submenu recursion
    if let Some(message) = entries[index].message.clone() {
        if !bind_message(&mut entries[index], &message, &item_name, ctx) {
            return true;
        }
    } else if let Some(command) = entries[index].command.clone() {
        if !bind_command(&mut entries[index], &command, &item_name, ctx) {
            return true;
        }
    } else if let Some(submenu) = entries[index].submenu.as_mut() {
        convert(submenu, ctx);
    }

    // a path relocates the entry inside the working sequence
    if entries[index].path.is_some() {
        if let Some(label) = entries[index].label.take() {
            tracing::warn!(
                "Skipping label '{}' in menu item '{}'",
                label,
                entries[index].path.as_deref().unwrap_or_default()
            );
        }
        return expand_path_entry(entries, index);
    }

    if entries[index].label.is_none() && !entries[index].is_separator() {
        tracing::warn!("Missing label for menu item");
    }

    false
}

fn parse_params(params: Option<&Value>) -> Result<Vec<Value>, &'static str> {
    match params {
        None => Ok(Vec::new()),
        Some(Value::Array(values)) => Ok(values.clone()),
        Some(_) => Err("'params' must be an array"),
    }
}

fn bind_message(
    entry: &mut MenuTemplate,
    message: &str,
    item_name: &str,
    ctx: &ConvertContext,
) -> bool {
    if entry.click.take().is_some() {
        tracing::error!("Skip 'click' in menu item '{item_name}', already has 'message'");
    }
    if entry.command.take().is_some() {
        tracing::error!("Skip 'command' in menu item '{item_name}', already has 'message'");
    }

    let params = match parse_params(entry.params.as_ref()) {
        Ok(params) => params,
        Err(reason) => {
            let err = MenuError::invalid_template(item_name, reason);
            tracing::error!("Failed to add menu item: {err}");
            return false;
        }
    };

    entry.action = Some(MenuAction::Message {
        sink: ctx.message_sink(),
        payload: OutboundMessage {
            panel: entry.panel.clone(),
            message: message.to_string(),
            params,
        },
    });
    true
}

fn bind_command(
    entry: &mut MenuTemplate,
    command: &str,
    item_name: &str,
    ctx: &ConvertContext,
) -> bool {
    if entry.click.take().is_some() {
        tracing::error!("Skip 'click' in menu item '{item_name}', already mapped to a command");
    }

    let Some(func) = ctx.commands.resolve(command) else {
        let err = MenuError::invalid_template(
            item_name,
            format!("no registered command '{command}'"),
        );
        tracing::error!("Failed to add menu item: {err}");
        return false;
    };

    let params = match parse_params(entry.params.as_ref()) {
        Ok(params) => params,
        Err(reason) => {
            let err = MenuError::invalid_template(item_name, reason);
            tracing::error!("Failed to add menu item: {err}");
            return false;
        }
    };

    entry.action = Some(MenuAction::Command {
        name: command.to_string(),
        func,
        params,
    });
    true
}

/// Relocate a `path`-annotated entry into nested submenu structure within
/// the working sequence.
///
/// Intermediate segments reuse an existing sibling when one matches,
/// otherwise a submenu entry is synthesized: the first segment replaces
/// the flattened entry's own slot, deeper segments are appended to their
/// level. Returns true when the original slot must be removed because the
/// first segment matched an already-existing entry.
fn expand_path_entry(entries: &mut Vec<MenuTemplate>, index: usize) -> bool {
    let Some(full_path) = entries[index].path.take() else {
        return false;
    };
    let segments = path::split(&full_path);

    if segments.len() == 1 {
        entries[index].label = Some(segments[0].clone());
        return false;
    }

    // validate the whole segment chain before mutating anything, so an
    // aborted expansion leaves no partial structure behind
    {
        let mut level: &[MenuTemplate] = entries;
        let mut used = String::new();
        for segment in &segments[..segments.len() - 1] {
            used = path::join(&used, segment);
            let Some(existing) = level
                .iter()
                .find(|entry| entry.label.as_deref() == Some(segment.as_str()))
            else {
                break;
            };
            if existing.resolved_kind() != MenuKind::Submenu {
                let err = MenuError::path_conflict(&full_path, &used);
                tracing::warn!("Cannot expand menu template: {err}");
                return false;
            }
            level = existing.submenu.as_deref().unwrap_or(&[]);
        }
    }

    let mut item = entries[index].clone();
    item.label = Some(segments[segments.len() - 1].clone());

    let mut removed_original = false;
    let mut level: &mut Vec<MenuTemplate> = entries;
    for (depth, segment) in segments[..segments.len() - 1].iter().enumerate() {
        let slot = match level
            .iter()
            .position(|entry| entry.label.as_deref() == Some(segment.as_str()))
        {
            Some(pos) => {
                if depth == 0 {
                    // the flattened entry has been relocated; drop its slot
                    removed_original = true;
                }
                pos
            }
            None => {
                let parent = MenuTemplate {
                    label: Some(segment.clone()),
                    kind: Some(MenuKind::Submenu),
                    submenu: Some(Vec::new()),
                    ..Default::default()
                };
                if depth == 0 {
                    level[index] = parent;
                    index
                } else {
                    level.push(parent);
                    level.len() - 1
                }
            }
        };
        level = level[slot].submenu.get_or_insert_with(Vec::new);
    }

    level.push(item);
    removed_original
}
