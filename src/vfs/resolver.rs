//! Path interpretation against a [`NavigationStack`].
//!
//! Paths starting with `/` are resolved from the root, anything else from the current
//! directory. Segments are separated by `/`; empty segments are skipped, `.` is a no-op and
//! `..` ascends one level (at the root it is silently absorbed). Every function here works on
//! a copy of the stack: on error the caller's stack is left exactly as it was.

use crate::core::ResolveError;
use crate::vfs::node::NodeId;
use crate::vfs::stack::NavigationStack;
use crate::vfs::tree::Tree;

/// Resolves `path` to a directory and returns it together with the stack that leads to it.
///
/// # Errors
/// * [`ResolveError::NotFound`] - a segment does not exist in the directory it is looked up in.
/// * [`ResolveError::NotADirectory`] - a segment names a file.
///
/// # Panics
/// If `stack` was not built against `tree` (for example a stack kept across a remount).
pub fn resolve(
    tree: &Tree,
    stack: &NavigationStack,
    path: &str,
) -> Result<(NodeId, NavigationStack), ResolveError> {
    if path.is_empty() || path == "." {
        return Ok((stack.top(), stack.clone()));
    }

    let mut working = start(stack, path);
    for segment in segments(path) {
        step(tree, &mut working, segment)?;
    }
    Ok((working.top(), working))
}

/// Resolves `path` to any node, letting the final segment name a file.
///
/// The stack is not changed. A trailing `/` after a file name is ignored.
///
/// # Panics
/// If `stack` was not built against `tree` (for example a stack kept across a remount).
pub fn locate(tree: &Tree, stack: &NavigationStack, path: &str) -> Result<NodeId, ResolveError> {
    let all: Vec<&str> = segments(path).collect();
    let mut working = start(stack, path);
    let Some((&last, init)) = all.split_last() else {
        return Ok(working.top());
    };

    for &segment in init {
        step(tree, &mut working, segment)?;
    }
    match last {
        "." | ".." => {
            step(tree, &mut working, last)?;
            Ok(working.top())
        }
        name => lookup_here(tree, &working, name)
            .ok_or_else(|| ResolveError::NotFound(name.to_string())),
    }
}

/// Looks `name` up in the current directory only, without touching the stack.
///
/// # Panics
/// If `stack` was not built against `tree` (for example a stack kept across a remount).
pub fn lookup_here(tree: &Tree, stack: &NavigationStack, name: &str) -> Option<NodeId> {
    tree.child(stack.top(), name)
}

fn start(stack: &NavigationStack, path: &str) -> NavigationStack {
    let mut working = stack.clone();
    if path.starts_with('/') {
        working.truncate_to_root();
    }
    working
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

fn step(tree: &Tree, working: &mut NavigationStack, segment: &str) -> Result<(), ResolveError> {
    match segment {
        "." => {}
        ".." => {
            working.pop();
        }
        name => {
            let child = lookup_here(tree, working, name)
                .ok_or_else(|| ResolveError::NotFound(name.to_string()))?;
            if tree.node(child).is_file() {
                return Err(ResolveError::NotADirectory(name.to_string()));
            }
            working.push(name, child);
        }
    }
    Ok(())
}
