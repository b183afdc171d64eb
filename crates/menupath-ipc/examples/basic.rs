//! Minimal main-menu wiring: a console host, a command registry and a
//! message router.
//!
//! Run with `RUST_LOG=debug cargo run --example basic` to see the engine
//! diagnostics.

use anyhow::{Context, Result};
use menupath_core::{CommandRegistry, ConvertContext, MenuNode, MenuTree, TemplateInput};
use menupath_ipc::{MainMenu, MenuHost, MenuRequest};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;

struct ConsoleHost;

impl MenuHost for ConsoleHost {
    fn apply(&mut self, items: &[MenuNode]) {
        fn print(items: &[MenuNode], depth: usize) {
            for node in items {
                println!("{}{}", "  ".repeat(depth + 1), node.label());
                if let Some(children) = node.children() {
                    print(children, depth + 1);
                }
            }
        }
        println!("-- menu applied --");
        print(items, 0);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut commands = CommandRegistry::new();
    commands.register("editor.log", |params| println!("editor.log {params:?}"));

    let (sink, mut messages) = mpsc::unbounded_channel();
    let context = ConvertContext::new()
        .with_commands(Arc::new(commands))
        .with_sink(sink);

    let mut menu = MainMenu::with_tree(MenuTree::with_context(context), ConsoleHost);

    menu.add(
        "My Menu",
        serde_json::from_value::<TemplateInput>(json!([
            { "label": "Foo", "message": "app:foo" },
            { "label": "Bar", "command": "editor.log", "params": ["Bar"] }
        ]))?,
    );

    // route one inbound request the way a remote caller would
    let (tx, rx) = mpsc::channel::<MenuRequest>(8);
    tx.send(serde_json::from_value(json!({
        "op": "add",
        "path": "My Menu/Nested/Deep",
        "template": { "message": "app:deep" }
    }))?)
    .await?;
    drop(tx);
    let menu = menu.serve(rx).await;

    // a click enqueues; the router delivers on a later turn
    menu.tree()
        .find("My Menu/Foo")
        .context("menu item missing")?
        .activate();
    if let Some(message) = messages.recv().await {
        println!("dispatched: {:?}", message.args());
    }

    menu.tree()
        .find("My Menu/Bar")
        .context("menu item missing")?
        .activate();

    Ok(())
}
