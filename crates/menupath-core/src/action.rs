//! Action bindings resolved from templates at conversion time.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Outbound channel for message-bound menu items.
pub type MessageSink = mpsc::UnboundedSender<OutboundMessage>;

/// Zero-argument callback bound to a menu item.
#[derive(Clone)]
pub struct MenuCallback(Arc<dyn Fn() + Send + Sync>);

impl MenuCallback {
    pub fn new(func: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(func))
    }

    pub fn call(&self) {
        (self.0)()
    }
}

impl fmt::Debug for MenuCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MenuCallback")
    }
}

/// Registered command function; receives the template's `params`.
#[derive(Clone)]
pub struct CommandFn(Arc<dyn Fn(&[Value]) + Send + Sync>);

impl CommandFn {
    pub fn new(func: impl Fn(&[Value]) + Send + Sync + 'static) -> Self {
        Self(Arc::new(func))
    }

    pub fn call(&self, params: &[Value]) {
        (self.0)(params)
    }
}

impl fmt::Debug for CommandFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CommandFn")
    }
}

/// Message dispatched when a message-bound menu item is activated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Panel id; when set the message is addressed to that panel.
    pub panel: Option<String>,
    /// Message name.
    pub message: String,
    /// Positional parameters.
    pub params: Vec<Value>,
}

impl OutboundMessage {
    /// Argument list in wire order: `[panel?, message, ...params]`.
    pub fn args(&self) -> Vec<Value> {
        let mut args = Vec::with_capacity(self.params.len() + 2);
        if let Some(panel) = &self.panel {
            args.push(Value::String(panel.clone()));
        }
        args.push(Value::String(self.message.clone()));
        args.extend(self.params.iter().cloned());
        args
    }
}

/// Explicit name -> function registry consulted for `command` bindings.
///
/// Commands are registered up front and resolved once at conversion time;
/// there is no ambient global scope to look names up in.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, CommandFn>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, func: impl Fn(&[Value]) + Send + Sync + 'static) {
        self.commands.insert(name.into(), CommandFn::new(func));
    }

    pub fn resolve(&self, name: &str) -> Option<CommandFn> {
        self.commands.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.commands.keys()).finish()
    }
}

/// Action binding resolved from a template entry at conversion time.
///
/// Exactly one variant is bound per item: a direct callback supplied in
/// code, a named message dispatch, or a registered command invocation.
#[derive(Debug, Clone)]
pub enum MenuAction {
    /// Direct callback, invoked synchronously.
    Callback(MenuCallback),
    /// Named message enqueued on the sink; the router delivers it after the
    /// current call stack unwinds, so activation never re-enters the menu.
    Message {
        sink: Option<MessageSink>,
        payload: OutboundMessage,
    },
    /// Registered command invoked synchronously with its params.
    Command {
        name: String,
        func: CommandFn,
        params: Vec<Value>,
    },
}

impl MenuAction {
    /// Invoke the binding. Message dispatch is fire-and-forget; a missing
    /// or closed sink drops the message with a diagnostic.
    pub fn invoke(&self) {
        match self {
            MenuAction::Callback(func) => func.call(),
            MenuAction::Message { sink: Some(sink), payload } => {
                if sink.send(payload.clone()).is_err() {
                    tracing::warn!("Menu message '{}' dropped, receiver closed", payload.message);
                }
            }
            MenuAction::Message { sink: None, payload } => {
                tracing::warn!("Menu message '{}' dropped, no sink configured", payload.message);
            }
            MenuAction::Command { func, params, .. } => func.call(params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_outbound_message_args_order() {
        let msg = OutboundMessage {
            panel: Some("panel.timeline".to_string()),
            message: "timeline:refresh".to_string(),
            params: vec![json!(1), json!("fast")],
        };
        assert_eq!(
            msg.args(),
            vec![json!("panel.timeline"), json!("timeline:refresh"), json!(1), json!("fast")]
        );

        let msg = OutboundMessage {
            panel: None,
            message: "hint".to_string(),
            params: vec![],
        };
        assert_eq!(msg.args(), vec![json!("hint")]);
    }

    #[test]
    fn test_command_registry_resolve() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut registry = CommandRegistry::new();
        let c = counter.clone();
        registry.register("editor.log", move |params| {
            c.fetch_add(params.len(), Ordering::SeqCst);
        });

        assert!(registry.resolve("nope").is_none());
        let func = registry.resolve("editor.log").unwrap();
        func.call(&[json!(1), json!(2)]);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_message_action_enqueues_without_running_inline() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let action = MenuAction::Message {
            sink: Some(tx),
            payload: OutboundMessage {
                panel: None,
                message: "scene:save".to_string(),
                params: vec![json!("a")],
            },
        };

        action.invoke();
        action.invoke();

        // delivery happens on the receiving side, in FIFO order
        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        assert_eq!(first.message, "scene:save");
        assert_eq!(first, second);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_message_action_without_sink_is_dropped() {
        let action = MenuAction::Message {
            sink: None,
            payload: OutboundMessage {
                panel: None,
                message: "void".to_string(),
                params: vec![],
            },
        };
        // must not panic
        action.invoke();
    }

    #[test]
    fn test_callback_action() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = counter.clone();
        let action = MenuAction::Callback(MenuCallback::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));
        action.invoke();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
