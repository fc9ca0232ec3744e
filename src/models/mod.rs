//! 数据模型层

pub mod node;

pub use node::{Expansion, NodeError, NodeKind, OpenAction, TreeNode};
