use thiserror::Error;

/// Shell-like navigation over an installed tree.
///
/// This is the whole surface a command layer needs: it never sees nodes, only
/// names, paths and contents.
pub trait Navigator {
    fn mount(&mut self, description: &str) -> std::result::Result<(), LoadError>;
    fn current_path(&self) -> String;
    fn list_current(&self) -> Vec<(String, bool)>;
    fn change_dir(&mut self, path: &str) -> std::result::Result<String, ResolveError>;
    fn read_file(&self, name: &str) -> std::result::Result<Vec<u8>, ResolveError>;
    fn stats(&self) -> (usize, usize);
}

/// Errors produced while parsing and validating a tree description.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed tree description: {0}")]
    MalformedFormat(#[from] serde_json::Error),

    /// `path` is `/` for the root, otherwise the directory whose shape is wrong.
    #[error("invalid directory node at {path}: expected type \"directory\" with \"contents\"")]
    InvalidRoot { path: String },

    #[error("invalid entry name {name:?} in {path}")]
    InvalidName { path: String, name: String },

    /// Only returned under [`LeafPolicy::Strict`](crate::LeafPolicy::Strict).
    #[error("unrecognized node at {path}")]
    UnrecognizedNode { path: String },
}

/// Errors produced while interpreting a path against the navigation stack.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("{0}: no such file or directory")]
    NotFound(String),

    #[error("{0}: not a directory")]
    NotADirectory(String),

    #[error("{0}: is a directory")]
    IsADirectory(String),
}

pub type Result<T> = std::result::Result<T, anyhow::Error>;
