//! Mapping between world positions, coarse cells and finest-level cells.

use glam::DVec3;

use super::cell::GridCell;
use crate::bounds::Bounds;
use crate::config::ResampleConfig;
use crate::constants::resolution;

/// Outer grid of coarse cells spanning the input bounds.
///
/// Every coarse cell (a "tree") owns `b^max_depth` finest cells per axis. An
/// axis with zero extent maps every position to index 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
  pub bounds: Bounds,
  pub dimensions: [u32; 3],
  pub branch_factor: u32,
  pub max_depth: u32,
}

impl GridLayout {
  pub fn new(bounds: Bounds, config: &ResampleConfig) -> Self {
    Self {
      bounds,
      dimensions: config.dimensions,
      branch_factor: config.branch_factor,
      max_depth: config.max_depth,
    }
  }

  /// Number of coarse cells.
  pub fn tree_count(&self) -> usize {
    self.dimensions.iter().map(|&d| d as usize).product()
  }

  /// Finest cells per axis inside one coarse cell.
  #[inline]
  pub fn finest_resolution(&self) -> u64 {
    resolution(self.branch_factor, self.max_depth)
  }

  /// Size of one coarse cell.
  pub fn tree_size(&self) -> DVec3 {
    self.bounds.size() / DVec3::new(self.dimensions[0] as f64, self.dimensions[1] as f64, self.dimensions[2] as f64)
  }

  /// Linear index of a coarse cell, X major.
  #[inline]
  pub fn tree_index(&self, coordinate: [u32; 3]) -> usize {
    let [_, dy, dz] = self.dimensions.map(|d| d as usize);
    let [cx, cy, cz] = coordinate.map(|c| c as usize);
    (cx * dy + cy) * dz + cz
  }

  /// Inverse of [`tree_index`](Self::tree_index).
  #[inline]
  pub fn tree_coordinate(&self, index: usize) -> [u32; 3] {
    let [_, dy, dz] = self.dimensions.map(|d| d as usize);
    [(index / (dy * dz)) as u32, ((index / dz) % dy) as u32, (index % dz) as u32]
  }

  /// Finest-level coordinate along one axis across the whole outer grid.
  ///
  /// The upper bound folds into the last cell. `None` outside the bounds.
  fn finest_coordinate(&self, axis: usize, value: f64) -> Option<u64> {
    let min = self.bounds.min[axis];
    let extent = self.bounds.max[axis] - min;
    let cells = self.dimensions[axis] as u64 * self.finest_resolution();
    if !(value >= min && value <= min + extent) {
      return None;
    }
    if extent <= 0.0 {
      return Some(0);
    }
    let t = (value - min) / extent;
    Some(((t * cells as f64).floor() as u64).min(cells - 1))
  }

  /// Coarse cell and finest local cell holding `position`.
  pub fn locate(&self, position: DVec3) -> Option<(usize, GridCell)> {
    let fx = self.finest_coordinate(0, position.x)?;
    let fy = self.finest_coordinate(1, position.y)?;
    let fz = self.finest_coordinate(2, position.z)?;
    let r = self.finest_resolution();
    let tree = self.tree_index([(fx / r) as u32, (fy / r) as u32, (fz / r) as u32]);
    Some((tree, GridCell::new(fx % r, fy % r, fz % r, self.max_depth)))
  }

  pub fn tree_bounds(&self, index: usize) -> Bounds {
    let [cx, cy, cz] = self.tree_coordinate(index);
    let size = self.tree_size();
    let min = self.bounds.min + DVec3::new(cx as f64, cy as f64, cz as f64) * size;
    Bounds::new(min, min + size)
  }

  /// World-space bounds of `cell` inside coarse cell `tree`.
  pub fn cell_bounds(&self, tree: usize, cell: GridCell) -> Bounds {
    let origin = self.tree_bounds(tree).min;
    let size = self.tree_size() / resolution(self.branch_factor, cell.depth) as f64;
    let min = origin + DVec3::new(cell.x as f64, cell.y as f64, cell.z as f64) * size;
    Bounds::new(min, min + size)
  }

  /// Indices of the coarse cells whose bounds overlap `bounds`.
  pub fn trees_overlapping(&self, bounds: &Bounds) -> Vec<usize> {
    if !self.bounds.overlaps(bounds) {
      return Vec::new();
    }
    let size = self.tree_size();
    let range = |axis: usize| {
      let last = self.dimensions[axis] - 1;
      if size[axis] <= 0.0 {
        return (0, 0);
      }
      let to_cell = |v: f64| (((v - self.bounds.min[axis]) / size[axis]).floor().max(0.0) as u32).min(last);
      (to_cell(bounds.min[axis]), to_cell(bounds.max[axis]))
    };
    let (x0, x1) = range(0);
    let (y0, y1) = range(1);
    let (z0, z1) = range(2);

    let mut trees = Vec::new();
    for x in x0..=x1 {
      for y in y0..=y1 {
        for z in z0..=z1 {
          trees.push(self.tree_index([x, y, z]));
        }
      }
    }
    trees
  }
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;
