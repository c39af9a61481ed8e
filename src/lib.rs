//! An in-memory virtual file tree with shell-like navigation.
//! The tree is loaded from a JSON description and can then be browsed with `cd`, `ls`, `pwd`
//! and `cat`-style operations. Nothing is ever written back.
//!
//! ### Overview
//!
//! `vfs-tree` keeps the whole tree in an arena ([`Tree`]) and tracks the current directory as a
//! stack of `(name, node)` frames ([`NavigationStack`]). A [`Session`] ties the two together
//! and implements the [`Navigator`] trait that a command layer talks to.
//!
//! **Key ideas**:
//! - **All or nothing**: a description is validated completely before it replaces the current
//!   tree; a failed `mount` or `cd` leaves the session exactly as it was.
//! - **No reverse lookups**: the current path is rebuilt from the names on the stack.
//! - **Explicit sessions**: no global state, so several independent sessions can coexist.
//! - **Configurable leniency**: [`LeafPolicy`] decides what happens to nodes of unknown shape.
//!
//! ### Description format
//!
//! ```text
//! {"type": "directory", "contents": {"motd": {"type": "file", "content": "hello"}}}
//! ```

mod core;
mod vfs;

pub use crate::core::{LoadError, Navigator, ResolveError, Result};
pub use vfs::{
    LeafPolicy, MAX_DESCRIPTION_LEN, NavigationStack, Node, NodeId, NodeKind, Session, Tree,
    locate, lookup_here, resolve,
};
