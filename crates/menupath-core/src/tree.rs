//! Path-addressable overlay over an ordered menu tree.

use crate::convert::{convert, ConvertContext};
use crate::error::MenuError;
use crate::node::{MenuNode, SetOptions};
use crate::path;
use crate::template::{build_items, TemplateInput};

/// The menu-tree engine.
///
/// Owns the root level (an ordered list of nodes, each possibly a submenu
/// with its own ordered list) and exposes path-based mutation. Paths are
/// slash-separated label chains resolved by exact, case-sensitive match.
///
/// Every mutating operation comes in two forms: a `try_*` form returning
/// `Result<(), MenuError>`, and a boolean form that reports the failure on
/// the diagnostic channel and returns whether a mutation occurred. Failed
/// operations leave the tree in its prior state.
#[derive(Debug, Default)]
pub struct MenuTree {
    items: Vec<MenuNode>,
    context: ConvertContext,
}

impl MenuTree {
    /// Empty tree with a default conversion context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty tree using `context` for template conversion.
    pub fn with_context(context: ConvertContext) -> Self {
        Self {
            items: Vec::new(),
            context,
        }
    }

    /// Convert `template` and build a tree from it in one step.
    pub fn from_template(template: impl Into<TemplateInput>, context: ConvertContext) -> Self {
        let mut entries = template.into().into_entries();
        convert(&mut entries, &context);
        Self {
            items: build_items(&entries),
            context,
        }
    }

    /// Root-level nodes, in order.
    pub fn items(&self) -> &[MenuNode] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn context(&self) -> &ConvertContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ConvertContext {
        &mut self.context
    }

    /// Drop every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Rebuild the whole tree from `template`.
    pub fn reset(&mut self, template: impl Into<TemplateInput>) {
        let mut entries = template.into().into_entries();
        convert(&mut entries, &self.context);
        self.items = build_items(&entries);
    }

    /// Resolve `path` to a node, if it exists.
    pub fn find(&self, path: &str) -> Option<&MenuNode> {
        find_in(&self.items, &path::split(path), 0)
    }

    /// Sibling index of the node at `path` among its parent's children.
    pub fn node_index(&self, path: &str) -> Option<usize> {
        index_in(&self.items, &path::split(path), 0)
    }

    /// Depth-first visit of every node, parents before children.
    pub fn walk<F: FnMut(&MenuNode)>(&self, mut visit: F) {
        fn go<F: FnMut(&MenuNode)>(items: &[MenuNode], visit: &mut F) {
            for node in items {
                visit(node);
                if let Some(children) = node.children() {
                    go(children, visit);
                }
            }
        }
        go(&self.items, &mut visit);
    }

    /// Build `template` and append it under the submenu at `path`,
    /// creating missing intermediate submenus.
    ///
    /// A single entry without a label (and not a separator) takes the final
    /// path segment as its label, e.g. `add("foo/bar", …)` attaches a node
    /// labeled `bar` under `foo`. The operation is all-or-nothing: if any
    /// converted entry collides with an existing sibling label, nothing is
    /// appended.
    pub fn add(&mut self, path: &str, template: impl Into<TemplateInput>) -> bool {
        match self.try_add(path, template) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!("Failed to add menu at '{path}': {err}");
                false
            }
        }
    }

    pub fn try_add(
        &mut self,
        path: &str,
        template: impl Into<TemplateInput>,
    ) -> Result<(), MenuError> {
        let input = template.into();
        let single = input.is_single();
        let mut entries = input.into_entries();
        let mut path = path.to_string();

        // in single-entry mode the label falls back to the last path segment
        if single {
            if let Some(entry) = entries.first_mut() {
                if entry.label.is_none() && !entry.is_separator() {
                    if let Some(pos) = path.rfind('/') {
                        entry.label = Some(path[pos + 1..].to_string());
                        path.truncate(pos);
                    }
                }
            }
        }

        let ctx = self.context.clone();
        let segments = path::split(&path);
        let target = resolve_level(&mut self.items, &segments, 0, true, &path)?;
        let Some(children) = target.children_mut() else {
            return Err(MenuError::path_conflict(&path, &path));
        };

        convert(&mut entries, &ctx);

        // all-or-nothing duplicate check before any append
        for entry in &entries {
            if entry.is_separator() {
                continue;
            }
            let label = entry.label.as_deref().unwrap_or_default();
            if children
                .iter()
                .any(|child| !child.is_separator() && child.label() == label)
            {
                return Err(MenuError::duplicate(path::join(&path, label)));
            }
        }

        children.extend(build_items(&entries));
        Ok(())
    }

    /// Wrap `template` in a new submenu named after the final path segment
    /// and insert it at `position` among the parent's children.
    ///
    /// A single-segment path inserts the new submenu at root level; deeper
    /// paths require the parent to already exist and the final segment to
    /// be free. `position` past the end lands at the end (the ordered
    /// primitive's bounds behavior).
    pub fn insert(
        &mut self,
        path: &str,
        position: usize,
        template: impl Into<TemplateInput>,
    ) -> bool {
        match self.try_insert(path, position, template) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!("Failed to insert menu at '{path}': {err}");
                false
            }
        }
    }

    pub fn try_insert(
        &mut self,
        path: &str,
        position: usize,
        template: impl Into<TemplateInput>,
    ) -> Result<(), MenuError> {
        let input = template.into();
        let single = input.is_single();
        let mut entries = input.into_entries();
        let mut path = path.to_string();

        if single {
            if let Some(entry) = entries.first_mut() {
                if entry.label.is_none() && !entry.is_separator() {
                    if let Some(pos) = path.rfind('/') {
                        entry.label = Some(path[pos + 1..].to_string());
                        path.truncate(pos);
                    }
                }
            }
        }

        let ctx = self.context.clone();

        let Some(parent) = path::parent(&path).map(str::to_string) else {
            // root level: the path itself names the new submenu
            convert(&mut entries, &ctx);
            let mut node = MenuNode::submenu(path);
            node.replace_children(build_items(&entries));
            insert_clamped(&mut self.items, position, node);
            return Ok(());
        };

        let name = path::basename(&path).to_string();
        let segments = path::split(&parent);
        let target = resolve_level(&mut self.items, &segments, 0, false, &parent)?;
        let Some(children) = target.children_mut() else {
            return Err(MenuError::path_conflict(&path, &parent));
        };

        if children
            .iter()
            .any(|child| !child.is_separator() && child.label() == name)
        {
            return Err(MenuError::duplicate(&path));
        }

        convert(&mut entries, &ctx);
        let mut node = MenuNode::submenu(name);
        node.replace_children(build_items(&entries));
        insert_clamped(children, position, node);
        Ok(())
    }

    /// Remove the node at `path`.
    ///
    /// The host primitive has no targeted delete, so removal rebuilds the
    /// tree: subtrees the target does not pass through move over wholesale,
    /// ancestors of the target are rebuilt with the target filtered out,
    /// and an ancestor submenu left with no children is pruned.
    pub fn remove(&mut self, path: &str) -> bool {
        match self.try_remove(path) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!("Failed to remove menu at '{path}': {err}");
                false
            }
        }
    }

    pub fn try_remove(&mut self, path: &str) -> Result<(), MenuError> {
        if self.find(path).is_none() {
            return Err(MenuError::not_found(path));
        }

        let items = std::mem::take(&mut self.items);
        let mut found = false;
        self.items = rebuild_without(items, path, "", &mut found);
        debug_assert!(found, "precheck guarantees the removal target exists");
        Ok(())
    }

    /// Replace the node at `path` with a submenu built from `template`,
    /// preserving its sibling index.
    pub fn update(&mut self, path: &str, template: impl Into<TemplateInput>) -> bool {
        match self.try_update(path, template) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!("Failed to update menu at '{path}': {err}");
                false
            }
        }
    }

    pub fn try_update(
        &mut self,
        path: &str,
        template: impl Into<TemplateInput>,
    ) -> Result<(), MenuError> {
        let Some(index) = self.node_index(path) else {
            return Err(MenuError::not_found(path));
        };
        self.try_remove(path)?;
        self.try_insert(path, index, template)
    }

    /// Assign any options present onto the node at `path`, in place.
    ///
    /// A path that does not resolve fails silently; a separator fails with
    /// a diagnostic. Never rebuilds the tree.
    pub fn set(&mut self, path: &str, options: &SetOptions) -> bool {
        match self.try_set(path, options) {
            Ok(()) => true,
            Err(err @ MenuError::NotFound { .. }) => {
                tracing::debug!("{err}");
                false
            }
            Err(err) => {
                tracing::error!("Failed to set menu at '{path}': {err}");
                false
            }
        }
    }

    pub fn try_set(&mut self, path: &str, options: &SetOptions) -> Result<(), MenuError> {
        let segments = path::split(path);
        let Some(node) = find_in_mut(&mut self.items, &segments, 0) else {
            return Err(MenuError::not_found(path));
        };
        if node.is_separator() {
            return Err(MenuError::separator_not_settable(path));
        }
        node.apply_options(options);
        Ok(())
    }
}

// Vec insertion with the ordered-insert primitive's bounds behavior.
fn insert_clamped(items: &mut Vec<MenuNode>, position: usize, node: MenuNode) {
    let position = position.min(items.len());
    items.insert(position, node);
}

fn find_in<'a>(items: &'a [MenuNode], segments: &[String], depth: usize) -> Option<&'a MenuNode> {
    let node = items.iter().find(|node| node.label() == segments[depth])?;
    if depth == segments.len() - 1 {
        return Some(node);
    }
    find_in(node.children()?, segments, depth + 1)
}

fn find_in_mut<'a>(
    items: &'a mut [MenuNode],
    segments: &[String],
    depth: usize,
) -> Option<&'a mut MenuNode> {
    let node = items
        .iter_mut()
        .find(|node| node.label() == segments[depth])?;
    if depth == segments.len() - 1 {
        return Some(node);
    }
    find_in_mut(node.children_mut()?, segments, depth + 1)
}

fn index_in(items: &[MenuNode], segments: &[String], depth: usize) -> Option<usize> {
    let pos = items
        .iter()
        .position(|node| node.label() == segments[depth])?;
    if depth == segments.len() - 1 {
        return Some(pos);
    }
    index_in(items[pos].children()?, segments, depth + 1)
}

/// Walk the tree by label, synthesizing missing submenus when asked to.
///
/// A synthesized root-level submenu lands second-to-last, reserving the
/// conventional trailing Help slot; deeper levels append.
fn resolve_level<'a>(
    items: &'a mut Vec<MenuNode>,
    segments: &[String],
    depth: usize,
    create_missing: bool,
    full_path: &str,
) -> Result<&'a mut MenuNode, MenuError> {
    let segment = &segments[depth];
    let last = depth == segments.len() - 1;

    let pos = match items.iter().position(|node| node.label() == *segment) {
        Some(pos) => pos,
        None if create_missing => {
            let node = MenuNode::submenu(segment.clone());
            if depth == 0 {
                let pos = items.len().saturating_sub(1);
                items.insert(pos, node);
                pos
            } else {
                items.push(node);
                items.len() - 1
            }
        }
        None => return Err(MenuError::not_found(full_path)),
    };

    if last {
        return Ok(&mut items[pos]);
    }

    match items[pos].children_mut() {
        Some(children) => resolve_level(children, segments, depth + 1, create_missing, full_path),
        None => Err(MenuError::path_conflict(
            full_path,
            segments[..=depth].join("/"),
        )),
    }
}

/// Rebuild `items` without the node at `except`, marking whether it was
/// seen. Untouched subtrees move over unchanged; ancestors of the target
/// are rebuilt child-by-child and dropped once emptied.
fn rebuild_without(
    items: Vec<MenuNode>,
    except: &str,
    base: &str,
    found: &mut bool,
) -> Vec<MenuNode> {
    let mut kept = Vec::with_capacity(items.len());
    for mut node in items {
        let node_path = path::join(base, node.label());

        if !path::contains(&node_path, except) {
            kept.push(node);
            continue;
        }

        if node_path == except {
            *found = true;
            continue;
        }

        if !node.is_submenu() {
            kept.push(node);
            continue;
        }

        let children = node.replace_children(Vec::new());
        let filtered = rebuild_without(children, except, &node_path, found);
        if !filtered.is_empty() {
            node.replace_children(filtered);
            kept.push(node);
        }
    }
    kept
}
