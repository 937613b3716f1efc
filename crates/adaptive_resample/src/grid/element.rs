//! GridElement - aggregate state of one occupied cell at one depth.

use crate::accumulator::{Accumulate, Accumulator};
use crate::config::ResampleConfig;
use crate::error::Result;
use crate::measurement::AccumulatorSet;

/// Counts, accumulators and subdivision bookkeeping for one cell.
#[derive(Clone, Debug, PartialEq)]
pub struct GridElement {
  /// Samples that landed anywhere inside the cell.
  pub sample_count: u64,
  /// Sum of their weights.
  pub accumulated_weight: f64,
  /// Occupied finest-level cells beneath this one.
  pub leaf_count: u64,
  /// Accumulators of the primary measurement.
  pub primary: AccumulatorSet,
  /// Accumulators of the secondary measurement, empty without one.
  pub secondary: AccumulatorSet,
  /// Every existing child met the sample and measurability thresholds.
  pub can_subdivide: bool,
  /// Children that exist at the next depth.
  pub non_masked_child_count: u32,
  /// All `b^3` children exist and so do all of theirs, down to the finest
  /// level.
  pub children_subtree_fully_unmasked: bool,
}

impl GridElement {
  /// Empty finest-level element with fresh accumulators.
  pub fn new(config: &ResampleConfig) -> Self {
    Self {
      sample_count: 0,
      accumulated_weight: 0.0,
      leaf_count: 1,
      primary: config.primary.new_accumulators(),
      secondary: config
        .secondary
        .map(|m| m.new_accumulators())
        .unwrap_or_default(),
      can_subdivide: false,
      non_masked_child_count: 0,
      children_subtree_fully_unmasked: true,
    }
  }

  fn accumulators(&self) -> impl Iterator<Item = &Accumulator> {
    self.primary.iter().chain(self.secondary.iter())
  }

  fn accumulators_mut(&mut self) -> impl Iterator<Item = &mut Accumulator> {
    self.primary.iter_mut().chain(self.secondary.iter_mut())
  }

  /// Check `value` against every accumulator without touching any of them.
  pub fn check_domain(&self, value: f64) -> Result<()> {
    self.accumulators().try_for_each(|a| a.check_domain(value))
  }

  /// Fold one sample in. Either every accumulator takes it or none does.
  pub fn add_sample(&mut self, value: f64, weight: f64) -> Result<()> {
    self.check_domain(value)?;
    for accumulator in self.accumulators_mut() {
      accumulator.add(value, weight)?;
    }
    self.sample_count += 1;
    self.accumulated_weight += weight;
    Ok(())
  }

  /// Parent created from its first child.
  ///
  /// `eligible` tells whether the child passes the subdivision thresholds.
  pub fn from_child(child: &GridElement, eligible: bool) -> Self {
    Self {
      sample_count: child.sample_count,
      accumulated_weight: child.accumulated_weight,
      leaf_count: child.leaf_count,
      primary: child.primary.clone(),
      secondary: child.secondary.clone(),
      can_subdivide: eligible,
      non_masked_child_count: 1,
      children_subtree_fully_unmasked: child.children_subtree_fully_unmasked,
    }
  }

  /// Merge a further child into this parent.
  ///
  /// # Errors
  /// [`ConfigurationMismatch`](crate::ResampleError::ConfigurationMismatch)
  /// when the child was built for other measurements.
  pub fn absorb_child(&mut self, child: &GridElement, eligible: bool) -> Result<()> {
    for (mine, theirs) in self.primary.iter_mut().zip(&child.primary) {
      mine.merge(theirs)?;
    }
    for (mine, theirs) in self.secondary.iter_mut().zip(&child.secondary) {
      mine.merge(theirs)?;
    }
    self.sample_count += child.sample_count;
    self.accumulated_weight += child.accumulated_weight;
    self.leaf_count += child.leaf_count;
    self.can_subdivide &= eligible;
    self.non_masked_child_count += 1;
    self.children_subtree_fully_unmasked &= child.children_subtree_fully_unmasked;
    Ok(())
  }

  /// Close the bookkeeping once every child has been absorbed.
  pub fn finish_roll_up(&mut self, children_per_node: usize) {
    self.children_subtree_fully_unmasked &= self.non_masked_child_count as usize == children_per_node;
  }
}

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;
