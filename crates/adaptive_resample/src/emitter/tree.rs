//! HyperTree - emitted subtree of one coarse cell.
//!
//! Nodes are stored in allocation order: the root is node 0, and the
//! children of a subdivided node occupy one contiguous block of `b^3` ids,
//! ordered like [`GridCell::child`]. Per-node fields are columnar and share
//! node ids.

use std::ops::Range;

use crate::constants::coord_to_index;
use crate::grid::GridCell;

/// Topology of one emitted node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeNode {
  pub cell: GridCell,
  /// Id of the first child, `None` for a leaf.
  pub first_child: Option<usize>,
}

/// Per-node output arrays, indexed by node id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeFields {
  /// Primary measurement, NaN when masked or not measurable.
  pub primary: Vec<f64>,
  /// Secondary measurement, present when one is configured.
  pub secondary: Option<Vec<f64>>,
  /// Samples in the node's subtree.
  pub sample_count: Vec<u64>,
  /// Occupied finest-level cells in the node's subtree.
  pub leaf_count: Vec<u64>,
  /// No data reached the node.
  pub mask: Vec<bool>,
}

impl NodeFields {
  pub fn new(with_secondary: bool) -> Self {
    Self {
      secondary: with_secondary.then(Vec::new),
      ..Self::default()
    }
  }

  pub fn len(&self) -> usize {
    self.mask.len()
  }

  pub fn is_empty(&self) -> bool {
    self.mask.is_empty()
  }

  /// Append a masked entry; [`write`](Self::write) fills it in later.
  pub(crate) fn push_masked(&mut self) {
    self.primary.push(f64::NAN);
    if let Some(secondary) = &mut self.secondary {
      secondary.push(f64::NAN);
    }
    self.sample_count.push(0);
    self.leaf_count.push(0);
    self.mask.push(true);
  }

  pub(crate) fn write(&mut self, id: usize, primary: Option<f64>, secondary: Option<f64>, sample_count: u64, leaf_count: u64) {
    self.primary[id] = primary.unwrap_or(f64::NAN);
    if let Some(column) = &mut self.secondary {
      column[id] = secondary.unwrap_or(f64::NAN);
    }
    self.sample_count[id] = sample_count;
    self.leaf_count[id] = leaf_count;
    self.mask[id] = false;
  }
}

/// Emitted subtree of one coarse cell.
#[derive(Clone, Debug, PartialEq)]
pub struct HyperTree {
  /// Linear index of the coarse cell.
  pub tree_index: usize,
  /// Coarse cell coordinate.
  pub coordinate: [u32; 3],
  /// Global id of node 0 across the forest.
  pub global_offset: usize,
  pub branch_factor: u32,
  pub nodes: Vec<TreeNode>,
  pub fields: NodeFields,
}

impl HyperTree {
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  #[inline]
  pub fn is_leaf(&self, id: usize) -> bool {
    self.nodes[id].first_child.is_none()
  }

  /// Ids of the children of `id`, `None` for a leaf.
  pub fn children(&self, id: usize) -> Option<Range<usize>> {
    let first = self.nodes[id].first_child?;
    Some(first..first + (self.branch_factor as usize).pow(3))
  }

  #[inline]
  pub fn global_id(&self, id: usize) -> usize {
    self.global_offset + id
  }

  /// Deepest node reached from the root towards `cell`: the leaf covering
  /// it, or the node matching it exactly.
  pub fn find(&self, cell: GridCell) -> Option<usize> {
    let b = self.branch_factor;
    let mut id = 0;
    while id < self.nodes.len() {
      let node = self.nodes[id];
      if node.cell.depth == cell.depth {
        return (node.cell == cell).then_some(id);
      }
      let Some(first) = node.first_child else {
        return Some(id);
      };
      let step = cell.ancestor_at(node.cell.depth + 1, b);
      let r = b as u64;
      let offset = coord_to_index(step.x % r, step.y % r, step.z % r, r);
      id = first + offset as usize;
    }
    None
  }

  /// Nodes without children.
  pub fn leaf_count(&self) -> usize {
    self.nodes.iter().filter(|n| n.first_child.is_none()).count()
  }

  pub fn masked_count(&self) -> usize {
    self.fields.mask.iter().filter(|&&m| m).count()
  }

  /// Deepest level reached.
  pub fn depth(&self) -> u32 {
    self.nodes.iter().map(|n| n.cell.depth).max().unwrap_or(0)
  }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
