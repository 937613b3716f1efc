//! Top-down pass: walk one pyramid from depth 0 and emit its tree.

use super::tree::{HyperTree, NodeFields, TreeNode};
use crate::config::ResampleConfig;
use crate::grid::{GridCell, GridElement, MultiResolutionGrid};

/// Whether a node backed by `element` at `depth` gets children.
///
/// A node whose primary measurement is undefined never subdivides.
pub fn should_subdivide(element: &GridElement, depth: u32, primary: Option<f64>, config: &ResampleConfig) -> bool {
  depth < config.max_depth
    && element.leaf_count > 1
    && element.can_subdivide
    && primary.is_some_and(|value| config.passes_range(value))
}

/// Emit the tree of coarse cell `tree_index` from its rolled-up pyramid.
///
/// Nodes are visited depth first with an explicit stack. Children of a
/// subdivided node are allocated as one block when the node is visited, so
/// ids only depend on the input and configuration. `global_offset` is left
/// at 0 for the caller to assign.
#[tracing::instrument(skip_all, name = "emitter::emit_tree", fields(tree = tree_index))]
pub fn emit_tree(tree_index: usize, coordinate: [u32; 3], grid: &MultiResolutionGrid, config: &ResampleConfig) -> HyperTree {
  let branch_factor = config.branch_factor;
  let children_per_node = config.children_per_node();

  let mut nodes = vec![TreeNode {
    cell: GridCell::root(),
    first_child: None,
  }];
  let mut fields = NodeFields::new(config.secondary.is_some());
  fields.push_masked();

  let mut stack = vec![0usize];
  while let Some(id) = stack.pop() {
    let cell = nodes[id].cell;
    let Some(element) = grid.get(cell) else {
      // Masked: already written as such when allocated.
      continue;
    };

    let primary = config
      .primary
      .measure(&element.primary, element.sample_count, element.accumulated_weight);
    let secondary = config
      .secondary
      .and_then(|m| m.measure(&element.secondary, element.sample_count, element.accumulated_weight));
    fields.write(id, primary, secondary, element.sample_count, element.leaf_count);

    if !should_subdivide(element, cell.depth, primary, config) {
      continue;
    }

    let first = nodes.len();
    nodes[id].first_child = Some(first);
    for child in cell.children(branch_factor) {
      nodes.push(TreeNode {
        cell: child,
        first_child: None,
      });
      fields.push_masked();
    }
    stack.extend((first..first + children_per_node).rev());
  }

  let tree = HyperTree {
    tree_index,
    coordinate,
    global_offset: 0,
    branch_factor,
    nodes,
    fields,
  };
  tracing::debug!(
    tree = tree_index,
    nodes = tree.len(),
    leaves = tree.leaf_count(),
    masked = tree.masked_count(),
    depth = tree.depth(),
    "tree emitted"
  );
  tree
}

#[cfg(test)]
#[path = "emit_test.rs"]
mod emit_test;
