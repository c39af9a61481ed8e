//! The tree store: an arena of nodes built from a JSON description.
//!
//! ### Description format
//!
//! ```text
//! directory: {"type": "directory", "contents": {"<name>": <node>, ...}}
//! file:      {"type": "file", "content": "<string>"}
//! ```
//!
//! The root must be a directory and every directory must carry `contents`, even when it is
//! empty. Children are kept in the order they appear in the description. Children without a
//! recognizable shape are handled according to [`LeafPolicy`].

use log::warn;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::core::LoadError;
use crate::vfs::node::{Node, NodeId, NodeKind};

/// What to do with a child whose shape is neither a directory nor a file.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum LeafPolicy {
    /// Treat it as an empty file.
    #[default]
    Lenient,
    /// Reject the whole description with [`LoadError::UnrecognizedNode`].
    Strict,
}

/// An immutable node graph with a single directory root.
///
/// ### Invariants
///
/// 1. **Root**: `nodes[0]` exists and is a directory.
/// 2. **Ownership**: every other node is the child of exactly one directory; no cycles.
/// 3. **Names**: child names are non-empty, contain no `/` and are neither `.` nor `..`.
///
/// A `Tree` is only ever built whole by [`Tree::load`] (or [`Tree::new`]) and is not mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

enum Shape<'a> {
    Directory(Option<&'a Map<String, Value>>),
    File(&'a str),
    Unrecognized,
}

impl Tree {
    /// Creates a tree holding nothing but an empty root directory.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::directory()],
        }
    }

    /// Parses and validates a description, building the whole tree or nothing.
    ///
    /// # Errors
    /// * [`LoadError::MalformedFormat`] - `description` is not valid JSON.
    /// * [`LoadError::InvalidRoot`] - the root, or some nested directory, lacks
    ///   `"type": "directory"` / `"contents"`.
    /// * [`LoadError::InvalidName`] - a child name is empty, `.`, `..` or contains `/`.
    /// * [`LoadError::UnrecognizedNode`] - an unrecognized child under [`LeafPolicy::Strict`].
    pub fn load(description: &str, policy: LeafPolicy) -> Result<Tree, LoadError> {
        let mut json = serde_json::Deserializer::from_str(description);
        json.disable_recursion_limit();
        let value = Value::deserialize(serde_stacker::Deserializer::new(&mut json))?;
        json.end()?;

        let tree = Self::build(&value, policy);
        dispose(value);
        tree
    }

    fn build(value: &Value, policy: LeafPolicy) -> Result<Tree, LoadError> {
        let root_contents = match classify(value) {
            Shape::Directory(Some(contents)) => contents,
            _ => {
                return Err(LoadError::InvalidRoot {
                    path: "/".to_string(),
                });
            }
        };

        let mut tree = Tree::new();
        let mut pending = vec![(tree.root(), "/".to_string(), root_contents)];

        while let Some((dir, dir_path, contents)) = pending.pop() {
            for (name, value) in contents {
                if !is_valid_name(name) {
                    return Err(LoadError::InvalidName {
                        path: dir_path,
                        name: name.clone(),
                    });
                }
                let path = join_path(&dir_path, name);

                let id = match classify(value) {
                    Shape::Directory(Some(contents)) => {
                        let id = tree.push(Node::directory());
                        pending.push((id, path, contents));
                        id
                    }
                    Shape::Directory(None) => return Err(LoadError::InvalidRoot { path }),
                    Shape::File(content) => tree.push(Node::file(content.as_bytes())),
                    Shape::Unrecognized => match policy {
                        LeafPolicy::Lenient => {
                            warn!("{path}: unrecognized node, treating as an empty file");
                            tree.push(Node::file(b""))
                        }
                        LeafPolicy::Strict => return Err(LoadError::UnrecognizedNode { path }),
                    },
                };
                tree.nodes[dir.0].insert_child(name, id);
            }
        }

        Ok(tree)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Returns the node behind `id`.
    ///
    /// # Panics
    /// If `id` was not produced by this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Looks up `name` among the children of `dir`; `None` if `dir` is a file.
    pub fn child(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        self.node(dir).child(name)
    }

    /// Number of nodes in the arena, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root is always present.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Counts `(directories, files)` below the root. The root itself is not counted.
    pub fn stats(&self) -> (usize, usize) {
        let (mut dirs, mut files) = (0, 0);
        let mut pending = vec![self.root()];
        while let Some(id) = pending.pop() {
            for &(_, child) in self.node(id).children().unwrap_or_default() {
                match self.node(child).kind() {
                    NodeKind::Directory => {
                        dirs += 1;
                        pending.push(child);
                    }
                    NodeKind::File => files += 1,
                }
            }
        }
        (dirs, files)
    }

    /// Returns every node below `from` in depth-first, insertion order.
    ///
    /// Paths are joined onto `prefix`, which is normally the path of `from` itself.
    /// Returns an empty list if `from` is a file.
    pub fn walk(&self, from: NodeId, prefix: &str) -> Vec<(String, NodeKind)> {
        let mut result = Vec::new();
        let mut pending = Vec::new();
        self.push_children(&mut pending, from, prefix);
        while let Some((path, id)) = pending.pop() {
            self.push_children(&mut pending, id, &path);
            result.push((path, self.node(id).kind()));
        }
        result
    }

    // reversed so that the first child is popped first
    fn push_children(&self, pending: &mut Vec<(String, NodeId)>, dir: NodeId, path: &str) {
        for (name, child) in self.node(dir).children().unwrap_or_default().iter().rev() {
            pending.push((join_path(path, name), *child));
        }
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Joins a child name onto a slash path.
pub(crate) fn join_path(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{parent}{name}")
    } else {
        format!("{parent}/{name}")
    }
}

/// Takes a parsed description apart without recursing; nested `Value`s drop recursively.
fn dispose(value: Value) {
    let mut pending = vec![value];
    while let Some(value) = pending.pop() {
        match value {
            Value::Object(map) => pending.extend(map.into_iter().map(|(_, child)| child)),
            Value::Array(items) => pending.extend(items),
            _ => {}
        }
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains('/')
}

fn classify(value: &Value) -> Shape<'_> {
    let Some(object) = value.as_object() else {
        return Shape::Unrecognized;
    };
    match object.get("type").and_then(Value::as_str) {
        Some("directory") => Shape::Directory(object.get("contents").and_then(Value::as_object)),
        Some("file") => match object.get("content") {
            None => Shape::File(""),
            Some(Value::String(content)) => Shape::File(content),
            Some(_) => Shape::Unrecognized,
        },
        _ => Shape::Unrecognized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "directory",
        "contents": {
            "etc": {
                "type": "directory",
                "contents": {
                    "motd": {"type": "file", "content": "hello"},
                    "conf.d": {"type": "directory", "contents": {}}
                }
            },
            "readme.md": {"type": "file", "content": "docs"},
            "home": {"type": "directory", "contents": {}}
        }
    }"#;

    fn names(tree: &Tree, dir: NodeId) -> Vec<String> {
        tree.node(dir)
            .children()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    mod load {
        use super::*;

        #[test]
        fn test_load_sample() -> Result<(), LoadError> {
            let tree = Tree::load(SAMPLE, LeafPolicy::Lenient)?;
            assert_eq!(names(&tree, tree.root()), vec!["etc", "readme.md", "home"]);

            let etc = tree.child(tree.root(), "etc").unwrap();
            assert!(tree.node(etc).is_dir());
            assert_eq!(names(&tree, etc), vec!["motd", "conf.d"]);

            let motd = tree.child(etc, "motd").unwrap();
            assert_eq!(tree.node(motd).content(), Some(&b"hello"[..]));
            assert_eq!(tree.len(), 6);
            Ok(())
        }

        #[test]
        fn test_load_empty_root() -> Result<(), LoadError> {
            let tree = Tree::load(r#"{"type":"directory","contents":{}}"#, LeafPolicy::Strict)?;
            assert_eq!(tree, Tree::new());
            assert!(!tree.is_empty());
            Ok(())
        }

        #[test]
        fn test_load_malformed() {
            let result = Tree::load("{\"type\": \"directory\",", LeafPolicy::Lenient);
            assert!(matches!(result, Err(LoadError::MalformedFormat(_))));

            let result = Tree::load("", LeafPolicy::Lenient);
            assert!(matches!(result, Err(LoadError::MalformedFormat(_))));

            let trailing = r#"{"type": "directory", "contents": {}} {}"#;
            let result = Tree::load(trailing, LeafPolicy::Lenient);
            assert!(matches!(result, Err(LoadError::MalformedFormat(_))));
        }

        #[test]
        fn test_load_invalid_root() {
            for description in [
                r#"{"contents": {}}"#,
                r#"{"type": "file", "content": "x"}"#,
                r#"{"type": "directory"}"#,
                r#"{"type": "directory", "contents": []}"#,
                r#"[]"#,
                r#""directory""#,
            ] {
                let result = Tree::load(description, LeafPolicy::Lenient);
                assert!(
                    matches!(&result, Err(LoadError::InvalidRoot { path }) if path == "/"),
                    "{description} should be rejected, got {result:?}"
                );
            }
        }

        #[test]
        fn test_load_nested_directory_without_contents() {
            let description = r#"{"type": "directory", "contents": {
                "a": {"type": "directory", "contents": {
                    "b": {"type": "directory"}
                }}
            }}"#;
            let result = Tree::load(description, LeafPolicy::Lenient);
            assert!(matches!(&result, Err(LoadError::InvalidRoot { path }) if path == "/a/b"));
        }

        #[test]
        fn test_load_lenient_leaves() -> Result<(), LoadError> {
            let description = r#"{"type": "directory", "contents": {
                "untyped": {"content": "ignored"},
                "number": 42,
                "odd": {"type": "socket"},
                "bad_content": {"type": "file", "content": 7},
                "no_content": {"type": "file"}
            }}"#;
            let tree = Tree::load(description, LeafPolicy::Lenient)?;
            for name in ["untyped", "number", "odd", "bad_content", "no_content"] {
                let id = tree.child(tree.root(), name).unwrap();
                assert_eq!(tree.node(id), &Node::file(b""), "{name}");
            }
            Ok(())
        }

        #[test]
        fn test_load_strict_leaves() {
            let description = r#"{"type": "directory", "contents": {
                "dir": {"type": "directory", "contents": {"odd": {"type": "socket"}}}
            }}"#;
            let result = Tree::load(description, LeafPolicy::Strict);
            assert!(
                matches!(&result, Err(LoadError::UnrecognizedNode { path }) if path == "/dir/odd")
            );

            // a file without content is still a file
            let description = r#"{"type": "directory", "contents": {"f": {"type": "file"}}}"#;
            assert!(Tree::load(description, LeafPolicy::Strict).is_ok());
        }

        #[test]
        fn test_load_invalid_names() {
            for name in ["", ".", "..", "a/b"] {
                let description = format!(
                    r#"{{"type": "directory", "contents": {{"{name}": {{"type": "file"}}}}}}"#
                );
                let result = Tree::load(&description, LeafPolicy::Lenient);
                assert!(
                    matches!(&result, Err(LoadError::InvalidName { path, name: bad }) if path == "/" && bad == name),
                    "{name:?} should be rejected, got {result:?}"
                );
            }
        }

        #[test]
        fn test_load_duplicate_names_last_wins() -> Result<(), LoadError> {
            let description = r#"{"type": "directory", "contents": {
                "a": {"type": "file", "content": "first"},
                "b": {"type": "file", "content": "b"},
                "a": {"type": "file", "content": "second"}
            }}"#;
            let tree = Tree::load(description, LeafPolicy::Lenient)?;
            assert_eq!(names(&tree, tree.root()), vec!["a", "b"]);
            let a = tree.child(tree.root(), "a").unwrap();
            assert_eq!(tree.node(a).content(), Some(&b"second"[..]));
            Ok(())
        }

        #[test]
        fn test_load_keeps_unicode_content() -> Result<(), LoadError> {
            let description =
                r#"{"type": "directory", "contents": {"привет": {"type": "file", "content": "мир"}}}"#;
            let tree = Tree::load(description, LeafPolicy::Lenient)?;
            let id = tree.child(tree.root(), "привет").unwrap();
            assert_eq!(tree.node(id).content(), Some("мир".as_bytes()));
            Ok(())
        }
    }

    mod stats {
        use super::*;

        #[test]
        fn test_stats_sample() -> Result<(), LoadError> {
            let tree = Tree::load(SAMPLE, LeafPolicy::Lenient)?;
            assert_eq!(tree.stats(), (3, 2));
            Ok(())
        }

        #[test]
        fn test_stats_empty_root() {
            assert_eq!(Tree::new().stats(), (0, 0));
        }

        #[test]
        fn test_stats_deep_tree() -> Result<(), LoadError> {
            let depth = 1000;
            let mut description = String::from(r#"{"type": "file", "content": "leaf"}"#);
            for level in (0..depth).rev() {
                description = format!(
                    r#"{{"type": "directory", "contents": {{"d{level}": {description}}}}}"#
                );
            }
            let tree = Tree::load(&description, LeafPolicy::Strict)?;
            assert_eq!(tree.stats(), (depth - 1, 1));
            assert_eq!(tree.walk(tree.root(), "/").len(), depth);
            Ok(())
        }
    }

    mod walk {
        use super::*;

        #[test]
        fn test_walk_from_root() -> Result<(), LoadError> {
            let tree = Tree::load(SAMPLE, LeafPolicy::Lenient)?;
            let walked = tree.walk(tree.root(), "/");
            assert_eq!(
                walked,
                vec![
                    ("/etc".to_string(), NodeKind::Directory),
                    ("/etc/motd".to_string(), NodeKind::File),
                    ("/etc/conf.d".to_string(), NodeKind::Directory),
                    ("/readme.md".to_string(), NodeKind::File),
                    ("/home".to_string(), NodeKind::Directory),
                ]
            );
            Ok(())
        }

        #[test]
        fn test_walk_from_subdirectory_and_file() -> Result<(), LoadError> {
            let tree = Tree::load(SAMPLE, LeafPolicy::Lenient)?;
            let etc = tree.child(tree.root(), "etc").unwrap();
            let walked: Vec<_> = tree.walk(etc, "/etc").into_iter().map(|(p, _)| p).collect();
            assert_eq!(walked, vec!["/etc/motd", "/etc/conf.d"]);

            let readme = tree.child(tree.root(), "readme.md").unwrap();
            assert!(tree.walk(readme, "/readme.md").is_empty());
            Ok(())
        }
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/", "etc"), "/etc");
        assert_eq!(join_path("/etc", "motd"), "/etc/motd");
    }
}
