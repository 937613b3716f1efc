//! Tree emission: top-down walk of each pyramid into a sparse hyper-tree.

pub mod emit;
pub mod forest;
pub mod tree;

pub use emit::{emit_tree, should_subdivide};
pub use forest::HyperTreeForest;
pub use tree::{HyperTree, NodeFields, TreeNode};
