//! HyperTreeForest - every emitted tree plus the grid they live on.

use super::tree::HyperTree;
use crate::bounds::Bounds;
use crate::grid::GridLayout;
use crate::stats::ResampleStats;

/// Result of a resampling run.
#[derive(Clone, Debug, PartialEq)]
pub struct HyperTreeForest {
  /// Outer grid, bounds and branching of the trees.
  pub layout: GridLayout,
  /// One tree per occupied coarse cell, sorted by tree index. Global node
  /// ids run contiguously through them in that order.
  pub trees: Vec<HyperTree>,
  pub stats: ResampleStats,
}

impl HyperTreeForest {
  /// Sort trees by index and hand out global node offsets.
  pub(crate) fn new(layout: GridLayout, mut trees: Vec<HyperTree>, stats: ResampleStats) -> Self {
    trees.sort_unstable_by_key(|t| t.tree_index);
    let mut offset = 0;
    for tree in &mut trees {
      tree.global_offset = offset;
      offset += tree.len();
    }
    Self { layout, trees, stats }
  }

  /// Nodes over all trees.
  pub fn node_count(&self) -> usize {
    self.trees.last().map_or(0, |t| t.global_offset + t.len())
  }

  /// Tree of coarse cell `tree_index`, `None` if that cell held no samples.
  pub fn tree(&self, tree_index: usize) -> Option<&HyperTree> {
    self
      .trees
      .binary_search_by_key(&tree_index, |t| t.tree_index)
      .ok()
      .map(|i| &self.trees[i])
  }

  /// World-space bounds of node `id` of `tree`.
  pub fn node_bounds(&self, tree: &HyperTree, id: usize) -> Bounds {
    self.layout.cell_bounds(tree.tree_index, tree.nodes[id].cell)
  }
}
