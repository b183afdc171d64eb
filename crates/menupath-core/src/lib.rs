//! Path-addressable overlay for ordered menu trees.
//!
//! Menu items are referenced by slash-delimited label paths instead of
//! object references or manual traversal. The [`MenuTree`] engine resolves
//! paths, mutates structure (`add` / `insert` / `remove` / `update` /
//! `set`), and expands flattened `path`-annotated templates into nested
//! submenu structure. Because the native menu primitive the tree mirrors
//! has no targeted delete, removal rebuilds the tree while reusing every
//! untouched subtree.
//!
//! ```
//! use menupath_core::{MenuTemplate, MenuTree};
//!
//! let mut tree = MenuTree::new();
//! tree.add("File/Open Recent", MenuTemplate {
//!     message: Some("recent:open".to_string()),
//!     ..Default::default()
//! });
//!
//! assert_eq!(tree.items()[0].label(), "File");
//! assert!(tree.find("File/Open Recent").is_some());
//! ```

mod action;
mod convert;
mod error;
mod node;
pub mod path;
mod template;
mod tree;

pub use action::{
    CommandFn, CommandRegistry, MenuAction, MenuCallback, MessageSink, OutboundMessage,
};
pub use convert::{convert, ConvertContext};
pub use error::{MenuError, MenuErrorCode};
pub use node::{MenuKind, MenuNode, SetOptions};
pub use template::{build_items, walk_template, MenuTemplate, TemplateInput};
pub use tree::MenuTree;
