//! MultiResolutionGrid - sparse per-depth cell maps for one coarse cell.
//!
//! Samples land at `max_depth`; [`MultiResolutionGrid::roll_up`] then folds
//! each level into its parent level until depth 0 holds the coarse cell
//! aggregate. A cell exists at depth `d` only if some finest cell beneath it
//! received a sample.

use std::collections::HashMap;

use super::cell::GridCell;
use super::element::GridElement;
use crate::config::ResampleConfig;
use crate::error::Result;

/// Per-depth cell maps for one coarse cell. Level 0 is the coarsest.
#[derive(Clone, Debug, Default)]
pub struct MultiResolutionGrid {
  branch_factor: u32,
  levels: Vec<HashMap<u64, GridElement>>,
}

impl MultiResolutionGrid {
  pub fn new(branch_factor: u32, max_depth: u32) -> Self {
    Self {
      branch_factor,
      levels: vec![HashMap::new(); max_depth as usize + 1],
    }
  }

  pub fn branch_factor(&self) -> u32 {
    self.branch_factor
  }

  pub fn max_depth(&self) -> u32 {
    self.levels.len().saturating_sub(1) as u32
  }

  /// Cells of one level keyed by [`GridCell::key`].
  pub fn level(&self, depth: u32) -> Option<&HashMap<u64, GridElement>> {
    self.levels.get(depth as usize)
  }

  pub fn get(&self, cell: GridCell) -> Option<&GridElement> {
    self.levels.get(cell.depth as usize)?.get(&cell.key(self.branch_factor))
  }

  pub fn get_mut(&mut self, cell: GridCell) -> Option<&mut GridElement> {
    let key = cell.key(self.branch_factor);
    self.levels.get_mut(cell.depth as usize)?.get_mut(&key)
  }

  pub fn contains(&self, cell: GridCell) -> bool {
    self.get(cell).is_some()
  }

  /// Total number of elements over all levels.
  pub fn len(&self) -> usize {
    self.levels.iter().map(HashMap::len).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.levels.iter().all(HashMap::is_empty)
  }

  /// Fold one sample into the finest cell `cell`, creating it on first touch.
  ///
  /// A rejected sample never leaves an element behind.
  pub fn insert_sample(&mut self, cell: GridCell, value: f64, weight: f64, config: &ResampleConfig) -> Result<()> {
    debug_assert_eq!(cell.depth, self.max_depth(), "samples land at the finest level");
    let key = cell.key(self.branch_factor);
    let Some(level) = self.levels.get_mut(cell.depth as usize) else {
      return Ok(());
    };
    match level.get_mut(&key) {
      Some(element) => element.add_sample(value, weight),
      None => {
        let mut element = GridElement::new(config);
        element.add_sample(value, weight)?;
        level.insert(key, element);
        Ok(())
      }
    }
  }

  /// Aggregate every level into the one above, finest first.
  ///
  /// Children are visited in key order so the floating-point result does not
  /// depend on hash iteration order.
  pub fn roll_up(&mut self, config: &ResampleConfig) -> Result<()> {
    let branch_factor = self.branch_factor;
    let children_per_node = config.children_per_node();

    for depth in (1..self.levels.len()).rev() {
      let (coarser, finer) = self.levels.split_at_mut(depth);
      let parents = &mut coarser[depth - 1];
      let children = &finer[0];
      parents.clear();

      let mut keys: Vec<u64> = children.keys().copied().collect();
      keys.sort_unstable();

      for key in keys {
        let Some(child) = children.get(&key) else {
          continue;
        };
        let Some(parent_cell) = GridCell::from_key(key, depth as u32, branch_factor).parent(branch_factor) else {
          continue;
        };
        let eligible = config.is_subdivision_eligible(child.sample_count, child.accumulated_weight);
        match parents.get_mut(&parent_cell.key(branch_factor)) {
          Some(parent) => parent.absorb_child(child, eligible)?,
          None => {
            parents.insert(parent_cell.key(branch_factor), GridElement::from_child(child, eligible));
          }
        }
      }

      for parent in parents.values_mut() {
        parent.finish_roll_up(children_per_node);
      }
    }
    Ok(())
  }
}

#[cfg(test)]
#[path = "pyramid_test.rs"]
mod pyramid_test;
