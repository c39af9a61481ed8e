/// Index of a node inside a [`Tree`](crate::Tree) arena.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
}

/// A single arena record.
///
/// Directories keep their children in insertion order. A child is owned by
/// exactly one directory; the arena never shares a `NodeId` between parents.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Directory { children: Vec<(String, NodeId)> },
    File { content: Vec<u8> },
}

impl Node {
    pub fn directory() -> Node {
        Node::Directory {
            children: Vec::new(),
        }
    }

    pub fn file(content: &[u8]) -> Node {
        Node::File {
            content: content.to_vec(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Directory { .. } => NodeKind::Directory,
            Node::File { .. } => NodeKind::File,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind() == NodeKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind() == NodeKind::Directory
    }

    /// Returns file content, `None` for directories.
    pub fn content(&self) -> Option<&[u8]> {
        match self {
            Node::File { content } => Some(content),
            Node::Directory { .. } => None,
        }
    }

    /// Returns directory children in insertion order, `None` for files.
    pub fn children(&self) -> Option<&[(String, NodeId)]> {
        match self {
            Node::Directory { children } => Some(children),
            Node::File { .. } => None,
        }
    }

    /// Looks `name` up among directory children. Always `None` for files.
    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.children()?
            .iter()
            .find(|(child_name, _)| child_name == name)
            .map(|&(_, id)| id)
    }

    /// Adds a child, replacing an existing one with the same name in place.
    /// Returns the replaced id, if any. Does nothing for files.
    pub(crate) fn insert_child(&mut self, name: &str, id: NodeId) -> Option<NodeId> {
        let Node::Directory { children } = self else {
            return None;
        };
        match children.iter_mut().find(|(child_name, _)| child_name == name) {
            Some(slot) => Some(std::mem::replace(&mut slot.1, id)),
            None => {
                children.push((name.to_string(), id));
                None
            }
        }
    }
}
