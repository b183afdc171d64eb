//! Message-channel registrar for the menu engine.
//!
//! Exposes the five inbound menu operations over a serialized request
//! channel and re-publishes the tree to the display layer only when an
//! operation reports a mutation. Requests are fire-and-forget: failures
//! are logged by the engine and no acknowledgment is returned.

use menupath_core::{MenuNode, MenuTree, SetOptions, TemplateInput};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Display-layer seam.
///
/// The engine owns the tree; the host only ever receives the whole thing
/// to re-publish. Implementations wrap the native menu surface (an
/// application menu bar, a tray menu, a test recorder).
pub trait MenuHost {
    /// Re-publish the tree to the native display layer.
    fn apply(&mut self, items: &[MenuNode]);
}

/// Inbound operation on the application-menu channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MenuRequest {
    Add {
        path: String,
        template: TemplateInput,
    },
    Remove {
        path: String,
    },
    Set {
        path: String,
        options: SetOptions,
    },
    Update {
        path: String,
        template: TemplateInput,
    },
    Apply,
}

/// Application-menu service.
///
/// Owns a [`MenuTree`] and a [`MenuHost`], funnels requests into the
/// engine serially, and applies the tree to the host after every mutation
/// (and once on construction).
pub struct MainMenu<H: MenuHost> {
    tree: MenuTree,
    host: H,
}

impl<H: MenuHost> MainMenu<H> {
    /// Service over an empty tree; applies immediately.
    pub fn new(host: H) -> Self {
        Self::with_tree(MenuTree::new(), host)
    }

    /// Service over an existing tree; applies immediately.
    pub fn with_tree(tree: MenuTree, host: H) -> Self {
        let mut menu = Self { tree, host };
        menu.apply();
        menu
    }

    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut MenuTree {
        &mut self.tree
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Re-publish the whole tree to the host.
    pub fn apply(&mut self) {
        self.host.apply(self.tree.items());
    }

    pub fn add(&mut self, path: &str, template: impl Into<TemplateInput>) -> bool {
        let mutated = self.tree.add(path, template);
        if mutated {
            self.apply();
        }
        mutated
    }

    pub fn insert(
        &mut self,
        path: &str,
        position: usize,
        template: impl Into<TemplateInput>,
    ) -> bool {
        let mutated = self.tree.insert(path, position, template);
        if mutated {
            self.apply();
        }
        mutated
    }

    pub fn remove(&mut self, path: &str) -> bool {
        let mutated = self.tree.remove(path);
        if mutated {
            self.apply();
        }
        mutated
    }

    pub fn update(&mut self, path: &str, template: impl Into<TemplateInput>) -> bool {
        let mutated = self.tree.update(path, template);
        if mutated {
            self.apply();
        }
        mutated
    }

    pub fn set(&mut self, path: &str, options: &SetOptions) -> bool {
        let mutated = self.tree.set(path, options);
        if mutated {
            self.apply();
        }
        mutated
    }

    /// Dispatch one inbound request.
    pub fn handle(&mut self, request: MenuRequest) {
        match request {
            MenuRequest::Add { path, template } => {
                self.add(&path, template);
            }
            MenuRequest::Remove { path } => {
                self.remove(&path);
            }
            MenuRequest::Set { path, options } => {
                self.set(&path, &options);
            }
            MenuRequest::Update { path, template } => {
                self.update(&path, template);
            }
            MenuRequest::Apply => {
                self.apply();
            }
        }
    }

    /// Drain requests serially until the channel closes, then return the
    /// service for inspection.
    pub async fn serve(mut self, mut requests: mpsc::Receiver<MenuRequest>) -> Self {
        while let Some(request) = requests.recv().await {
            tracing::debug!("menu request: {request:?}");
            self.handle(request);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use menupath_core::{ConvertContext, OutboundMessage};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Test host recording every applied snapshot of root labels.
    #[derive(Clone, Default)]
    struct RecordingHost {
        applied: Arc<Mutex<Vec<Vec<String>>>>,
    }

    impl RecordingHost {
        fn applications(&self) -> Vec<Vec<String>> {
            self.applied.lock().unwrap().clone()
        }
    }

    impl MenuHost for RecordingHost {
        fn apply(&mut self, items: &[MenuNode]) {
            let labels = items.iter().map(|n| n.label().to_string()).collect();
            self.applied.lock().unwrap().push(labels);
        }
    }

    fn template_input(value: serde_json::Value) -> TemplateInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_applies_on_construction() {
        let host = RecordingHost::default();
        let _menu = MainMenu::new(host.clone());
        assert_eq!(host.applications(), vec![Vec::<String>::new()]);
    }

    #[test]
    fn test_applies_only_on_mutation() {
        let host = RecordingHost::default();
        let mut menu = MainMenu::new(host.clone());

        assert!(menu.add("foo/bar", template_input(json!({ "message": "m" }))));
        // duplicate add fails, must not re-apply
        assert!(!menu.add("foo", template_input(json!([{ "label": "bar" }]))));
        // set on a missing path fails silently, must not re-apply
        assert!(!menu.set("ghost", &SetOptions::default()));

        assert_eq!(
            host.applications(),
            vec![vec![], vec!["foo".to_string()]]
        );
    }

    #[test]
    fn test_remove_and_update_reapply() {
        let host = RecordingHost::default();
        let mut menu = MainMenu::with_tree(
            MenuTree::from_template(
                template_input(json!([
                    { "label": "foo", "submenu": [ { "label": "foo.01" } ] },
                    { "label": "bar", "submenu": [ { "label": "bar.01" } ] }
                ])),
                ConvertContext::new(),
            ),
            host.clone(),
        );

        assert!(menu.update("foo", template_input(json!([{ "label": "new" }]))));
        assert!(menu.remove("bar/bar.01"));
        assert!(!menu.remove("bar/bar.01"));

        let apps = host.applications();
        // construction, update, remove - the failed remove adds nothing
        assert_eq!(apps.len(), 3);
        assert_eq!(apps[1], vec!["foo".to_string(), "bar".to_string()]);
        assert_eq!(apps[2], vec!["foo".to_string()]);
    }

    #[test]
    fn test_request_wire_shape() {
        let request: MenuRequest = serde_json::from_value(json!({
            "op": "add",
            "path": "foo/bar",
            "template": { "message": "hint" }
        }))
        .unwrap();
        assert!(matches!(request, MenuRequest::Add { ref path, .. } if path == "foo/bar"));

        let request: MenuRequest = serde_json::from_value(json!({
            "op": "set",
            "path": "foo/bar",
            "options": { "enabled": false }
        }))
        .unwrap();
        match request {
            MenuRequest::Set { options, .. } => assert_eq!(options.enabled, Some(false)),
            other => panic!("expected set, got {other:?}"),
        }

        let request: MenuRequest = serde_json::from_value(json!({ "op": "apply" })).unwrap();
        assert!(matches!(request, MenuRequest::Apply));
    }

    #[tokio::test]
    async fn test_serve_drains_requests_serially() {
        let host = RecordingHost::default();
        let (tx, rx) = mpsc::channel(8);

        for request in [
            MenuRequest::Add {
                path: "foo".to_string(),
                template: template_input(json!([{ "label": "a" }])),
            },
            MenuRequest::Add {
                path: "foo".to_string(),
                template: template_input(json!([{ "label": "b" }])),
            },
            MenuRequest::Remove {
                path: "foo/a".to_string(),
            },
            MenuRequest::Apply,
        ] {
            tx.send(request).await.unwrap();
        }
        drop(tx);

        let menu = MainMenu::new(host.clone()).serve(rx).await;

        assert!(menu.tree().find("foo/b").is_some());
        assert!(menu.tree().find("foo/a").is_none());
        // construction + two adds + remove + explicit apply
        assert_eq!(host.applications().len(), 5);
    }

    #[tokio::test]
    async fn test_click_dispatch_is_deferred_and_fifo() {
        let (sink, mut rx) = mpsc::unbounded_channel::<OutboundMessage>();
        let host = RecordingHost::default();
        let mut menu = MainMenu::with_tree(
            MenuTree::with_context(ConvertContext::new().with_sink(sink)),
            host,
        );

        assert!(menu.add(
            "scene",
            template_input(json!([
                { "label": "save", "message": "scene:save" },
                { "label": "load", "message": "scene:load", "params": ["last"] }
            ]))
        ));

        // activation enqueues; nothing is delivered inside the click
        menu.tree().find("scene/save").unwrap().activate();
        menu.tree().find("scene/load").unwrap().activate();

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.message, "scene:save");
        assert_eq!(second.message, "scene:load");
        assert_eq!(second.args(), vec![json!("scene:load"), json!("last")]);
    }
}
