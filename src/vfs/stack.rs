use crate::vfs::node::NodeId;

/// The chain of directories from the root to the current directory.
///
/// Each frame remembers the name it was entered by, so the current path is rebuilt from the
/// frames alone and never has to be searched for in the parent directory.
///
/// ### Invariants
///
/// 1. Never empty: frame 0 is the root and has an empty name.
/// 2. Frame `i + 1` is a child directory of frame `i`, entered by its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationStack {
    frames: Vec<(String, NodeId)>,
}

impl NavigationStack {
    /// Creates a stack positioned at `root`.
    pub fn new(root: NodeId) -> Self {
        Self {
            frames: vec![(String::new(), root)],
        }
    }

    /// The current directory.
    pub fn top(&self) -> NodeId {
        // frame 0 is never popped
        self.frames[self.frames.len() - 1].1
    }

    pub fn root(&self) -> NodeId {
        self.frames[0].1
    }

    /// Number of frames, root included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_root(&self) -> bool {
        self.frames.len() == 1
    }

    /// Names from the root down to the current directory, root excluded.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.frames[1..].iter().map(|(name, _)| name.as_str())
    }

    /// Node ids from the root down to the current directory.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        self.frames.iter().map(|&(_, id)| id)
    }

    /// The `/`-joined current path, `/` at the root.
    pub fn path(&self) -> String {
        let mut path = String::new();
        for name in self.names() {
            path.push('/');
            path.push_str(name);
        }
        if path.is_empty() {
            path.push('/');
        }
        path
    }

    /// Resets the stack to the root frame only.
    pub(crate) fn truncate_to_root(&mut self) {
        self.frames.truncate(1);
    }

    pub(crate) fn push(&mut self, name: &str, dir: NodeId) {
        self.frames.push((name.to_string(), dir));
    }

    /// Ascends one level. At the root this does nothing and returns `false`.
    pub(crate) fn pop(&mut self) -> bool {
        if self.is_root() {
            return false;
        }
        self.frames.pop();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stack_is_root() {
        let stack = NavigationStack::new(NodeId(0));
        assert!(stack.is_root());
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), NodeId(0));
        assert_eq!(stack.path(), "/");
        assert_eq!(stack.names().count(), 0);
    }

    #[test]
    fn test_push_pop() {
        let mut stack = NavigationStack::new(NodeId(0));
        stack.push("home", NodeId(1));
        stack.push("user", NodeId(4));
        assert_eq!(stack.path(), "/home/user");
        assert_eq!(stack.top(), NodeId(4));
        assert_eq!(stack.root(), NodeId(0));
        assert_eq!(
            stack.nodes().collect::<Vec<_>>(),
            vec![NodeId(0), NodeId(1), NodeId(4)]
        );

        assert!(stack.pop());
        assert_eq!(stack.path(), "/home");
        assert!(stack.pop());
        assert_eq!(stack.path(), "/");
        assert!(!stack.pop());
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_truncate_to_root() {
        let mut stack = NavigationStack::new(NodeId(0));
        stack.push("a", NodeId(1));
        stack.push("b", NodeId(2));
        stack.truncate_to_root();
        assert_eq!(stack, NavigationStack::new(NodeId(0)));
    }
}
