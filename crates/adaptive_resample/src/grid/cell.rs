//! GridCell - immutable position of a cell inside one coarse cell.
//!
//! Depth 0 is the whole coarse cell, higher depth = finer. Coordinates are at
//! the cell's own depth, so at depth `d` they lie in `[0, b^d)`.

use crate::constants::{coord_to_index, index_to_coord, resolution};

/// Cell position inside one coarse cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct GridCell {
  pub x: u64,
  pub y: u64,
  pub z: u64,
  /// 0 = coarse cell, higher = finer.
  pub depth: u32,
}

impl GridCell {
  pub fn new(x: u64, y: u64, z: u64, depth: u32) -> Self {
    Self { x, y, z, depth }
  }

  /// The coarse cell itself.
  pub fn root() -> Self {
    Self::default()
  }

  /// Child `index` (`0..b^3`), ordered like level keys: X major, Z minor.
  pub fn child(&self, index: usize, branch_factor: u32) -> Self {
    let b = branch_factor as u64;
    let (cx, cy, cz) = index_to_coord(index as u64, b);
    Self {
      x: self.x * b + cx,
      y: self.y * b + cy,
      z: self.z * b + cz,
      depth: self.depth + 1,
    }
  }

  /// All children in traversal order.
  pub fn children(self, branch_factor: u32) -> impl Iterator<Item = Self> {
    let count = (branch_factor as usize).pow(3);
    (0..count).map(move |i| self.child(i, branch_factor))
  }

  /// Enclosing cell one level coarser, `None` at depth 0.
  pub fn parent(&self, branch_factor: u32) -> Option<Self> {
    if self.depth == 0 {
      return None;
    }
    let b = branch_factor as u64;
    Some(Self {
      x: self.x / b,
      y: self.y / b,
      z: self.z / b,
      depth: self.depth - 1,
    })
  }

  /// Enclosing cell at a coarser `depth` (itself when `depth` equals its own).
  pub fn ancestor_at(&self, depth: u32, branch_factor: u32) -> Self {
    debug_assert!(depth <= self.depth, "ancestor must not be finer than the cell");
    let scale = resolution(branch_factor, self.depth - depth);
    Self {
      x: self.x / scale,
      y: self.y / scale,
      z: self.z / scale,
      depth,
    }
  }

  /// Key of this cell in its pyramid level.
  #[inline]
  pub fn key(&self, branch_factor: u32) -> u64 {
    coord_to_index(self.x, self.y, self.z, resolution(branch_factor, self.depth))
  }

  /// Inverse of [`key`](Self::key).
  #[inline]
  pub fn from_key(key: u64, depth: u32, branch_factor: u32) -> Self {
    let (x, y, z) = index_to_coord(key, resolution(branch_factor, depth));
    Self { x, y, z, depth }
  }
}

#[cfg(test)]
#[path = "cell_test.rs"]
mod cell_test;
