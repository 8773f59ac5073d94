pub mod node;

pub use node::{Alignment, Node, NodeKind};
