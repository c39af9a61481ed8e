//! An explicit navigation session over an installed tree.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, anyhow};
use log::debug;

use crate::core::{LoadError, Navigator, ResolveError, Result};
use crate::vfs::node::{Node, NodeId, NodeKind};
use crate::vfs::resolver::{locate, lookup_here, resolve};
use crate::vfs::stack::NavigationStack;
use crate::vfs::tree::{LeafPolicy, Tree};

/// Largest description accepted by [`Session::mount_file`].
pub const MAX_DESCRIPTION_LEN: u64 = 64 * 1024 * 1024;

/// A single shell-like session: one installed [`Tree`] plus the [`NavigationStack`] into it.
///
/// ### Internal state
///
/// * `tree` - the installed tree. Replaced as a whole by `mount()`, never edited in place.
/// * `stack` - frames from the root to the current directory. Reset to the root on every
///   successful mount.
/// * `leaf_policy` - how `mount()` treats children it does not recognize.
///
/// ### Lifecycle
///
/// - On creation: the tree holds only an empty root directory and the current path is `/`.
/// - `mount()` builds the new tree completely before swapping it in; on error the old tree and
///   stack stay untouched.
/// - `change_dir()` resolves on a copy of the stack and commits it only on success.
///
/// ### Thread Safety
///
/// A `Session` is plain owned data. If several threads drive the same session, wrap it in a
/// `Mutex` (or `RwLock`) at the application level; a locked `mount()` is an atomic swap.
///
/// ### Example
///
/// ```
/// use vfs_tree::{Navigator, Session};
///
/// let mut session = Session::new();
/// session
///     .mount(r#"{"type": "directory", "contents": {
///         "etc": {"type": "directory", "contents": {
///             "motd": {"type": "file", "content": "hello"}
///         }}
///     }}"#)
///     .unwrap();
///
/// assert_eq!(session.change_dir("etc").unwrap(), "/etc");
/// assert_eq!(session.read_file("motd").unwrap(), b"hello");
/// assert_eq!(session.change_dir("/").unwrap(), "/");
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    tree: Tree,
    stack: NavigationStack,
    leaf_policy: LeafPolicy,
}

impl Session {
    /// Creates a session over an empty root directory.
    pub fn new() -> Self {
        Self::with_tree(Tree::new())
    }

    /// Creates a session over an already built tree, positioned at its root.
    pub fn with_tree(tree: Tree) -> Self {
        let stack = NavigationStack::new(tree.root());
        Self {
            tree,
            stack,
            leaf_policy: LeafPolicy::default(),
        }
    }

    /// Changes how subsequent mounts treat unrecognized children.
    pub fn set_leaf_policy(&mut self, policy: LeafPolicy) {
        self.leaf_policy = policy;
    }

    pub fn leaf_policy(&self) -> LeafPolicy {
        self.leaf_policy
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn stack(&self) -> &NavigationStack {
        &self.stack
    }

    /// Replaces the tree and resets navigation to its root.
    pub fn install(&mut self, tree: Tree) {
        self.stack = NavigationStack::new(tree.root());
        self.tree = tree;
    }

    /// Reads a description from the host file system and mounts it.
    ///
    /// The file is read once, up to [`MAX_DESCRIPTION_LEN`] bytes.
    pub fn mount_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;

        let mut description = String::new();
        file.take(MAX_DESCRIPTION_LEN + 1)
            .read_to_string(&mut description)
            .with_context(|| format!("cannot read {}", path.display()))?;
        if description.len() as u64 > MAX_DESCRIPTION_LEN {
            return Err(anyhow!(
                "{} is larger than {} bytes",
                path.display(),
                MAX_DESCRIPTION_LEN
            ));
        }

        self.mount(&description)
            .with_context(|| format!("cannot mount {}", path.display()))
    }

    /// Lists the immediate children of the directory at `path` without moving.
    pub fn list(&self, path: &str) -> std::result::Result<Vec<(String, bool)>, ResolveError> {
        let (dir, _) = resolve(&self.tree, &self.stack, path)?;
        Ok(self.entries(dir))
    }

    /// Checks whether `path` names any node. The path can be relative or absolute.
    pub fn exists(&self, path: &str) -> bool {
        locate(&self.tree, &self.stack, path).is_ok()
    }

    /// Returns every node below the directory at `path` as absolute paths, depth first.
    pub fn walk(&self, path: &str) -> std::result::Result<Vec<(String, NodeKind)>, ResolveError> {
        let (dir, stack) = resolve(&self.tree, &self.stack, path)?;
        Ok(self.tree.walk(dir, &stack.path()))
    }

    fn entries(&self, dir: NodeId) -> Vec<(String, bool)> {
        self.tree
            .node(dir)
            .children()
            .unwrap_or_default()
            .iter()
            .map(|(name, id)| (name.clone(), self.tree.node(*id).is_dir()))
            .collect()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for Session {
    /// Parses `description` with the session's leaf policy and installs it.
    /// On error the current tree and path are left unchanged.
    fn mount(&mut self, description: &str) -> std::result::Result<(), LoadError> {
        let tree = Tree::load(description, self.leaf_policy)?;
        let (dirs, files) = tree.stats();
        debug!("mounted tree: {dirs} directories, {files} files");
        self.install(tree);
        Ok(())
    }

    fn current_path(&self) -> String {
        self.stack.path()
    }

    /// Returns `(name, is_directory)` for each child of the current directory in insertion
    /// order.
    fn list_current(&self) -> Vec<(String, bool)> {
        self.entries(self.stack.top())
    }

    /// Changes the current directory and returns the new current path.
    /// On error the current directory is unchanged.
    fn change_dir(&mut self, path: &str) -> std::result::Result<String, ResolveError> {
        let (_, stack) = resolve(&self.tree, &self.stack, path)?;
        self.stack = stack;
        let current = self.stack.path();
        debug!("cd {path:?} -> {current}");
        Ok(current)
    }

    /// Reads a file from the current directory. `name` is a single segment.
    fn read_file(&self, name: &str) -> std::result::Result<Vec<u8>, ResolveError> {
        if name == "." || name == ".." {
            return Err(ResolveError::IsADirectory(name.to_string()));
        }
        let id = lookup_here(&self.tree, &self.stack, name)
            .ok_or_else(|| ResolveError::NotFound(name.to_string()))?;
        match self.tree.node(id) {
            Node::File { content } => Ok(content.clone()),
            Node::Directory { .. } => Err(ResolveError::IsADirectory(name.to_string())),
        }
    }

    fn stats(&self) -> (usize, usize) {
        self.tree.stats()
    }
}
