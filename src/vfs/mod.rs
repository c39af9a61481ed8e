mod node;
mod resolver;
mod session;
mod stack;
mod tree;

pub use node::{Node, NodeId, NodeKind};
pub use resolver::{locate, lookup_here, resolve};
pub use session::{MAX_DESCRIPTION_LEN, Session};
pub use stack::NavigationStack;
pub use tree::{LeafPolicy, Tree};
