//! ResampleConfig - tree shape, subdivision criteria and measurements.

use crate::accumulator::ScalarReducer;
use crate::constants::{children_per_node, max_supported_depth, resolution};
use crate::error::{ResampleError, Result};
use crate::measurement::ArrayMeasurement;

/// Deepest refinement of the gap test below an empty cell.
pub const MAX_GAP_REFINEMENT_LEVELS: u32 = 8;

/// What to do with a sample an accumulator cannot take (log or inverse of a
/// non-positive value, NaN, negative weight).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DomainPolicy {
  /// Drop the sample, log a warning and keep going.
  #[default]
  Skip,
  /// Fail the whole run with the domain error.
  Abort,
}

/// Configuration for pyramid construction and tree emission.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResampleConfig {
  /// Children per axis when a node subdivides (2 or 3).
  pub branch_factor: u32,

  /// Finest level. Level 0 is a whole coarse cell.
  pub max_depth: u32,

  /// Coarse cells per axis.
  pub dimensions: [u32; 3],

  /// Minimum samples every child must hold before its parent may subdivide.
  pub min_sample_count: u64,

  /// Lower bound of the subdivision range test (exclusive).
  pub min: f64,

  /// Upper bound of the subdivision range test (exclusive).
  pub max: f64,

  /// Subdivide values inside `(min, max)` when true, outside when false.
  pub in_range: bool,

  /// Keep cells that input geometry passes through from being masked.
  pub no_empty_cells: bool,

  /// Extra levels the gap test descends below an empty cell to confirm
  /// that geometry really reaches it.
  pub gap_refinement_levels: u32,

  /// Measurement driving subdivision.
  pub primary: ArrayMeasurement,

  /// Display-only measurement written alongside the primary one.
  pub secondary: Option<ArrayMeasurement>,

  /// Reduction for vector-valued samples.
  pub reducer: ScalarReducer,

  /// Handling of samples outside an accumulator's domain.
  pub domain_policy: DomainPolicy,
}

impl ResampleConfig {
  #[must_use]
  pub fn with_branch_factor(mut self, branch_factor: u32) -> Self {
    self.branch_factor = branch_factor;
    self
  }

  #[must_use]
  pub fn with_max_depth(mut self, max_depth: u32) -> Self {
    self.max_depth = max_depth;
    self
  }

  #[must_use]
  pub fn with_dimensions(mut self, dimensions: [u32; 3]) -> Self {
    self.dimensions = dimensions;
    self
  }

  #[must_use]
  pub fn with_min_sample_count(mut self, min_sample_count: u64) -> Self {
    self.min_sample_count = min_sample_count;
    self
  }

  /// Set the range test: subdivide when `min < value < max` equals `in_range`.
  #[must_use]
  pub fn with_range(mut self, min: f64, max: f64, in_range: bool) -> Self {
    self.min = min;
    self.max = max;
    self.in_range = in_range;
    self
  }

  #[must_use]
  pub fn with_no_empty_cells(mut self, no_empty_cells: bool) -> Self {
    self.no_empty_cells = no_empty_cells;
    self
  }

  #[must_use]
  pub fn with_gap_refinement_levels(mut self, levels: u32) -> Self {
    self.gap_refinement_levels = levels;
    self
  }

  #[must_use]
  pub fn with_primary(mut self, measurement: ArrayMeasurement) -> Self {
    self.primary = measurement;
    self
  }

  #[must_use]
  pub fn with_secondary(mut self, measurement: Option<ArrayMeasurement>) -> Self {
    self.secondary = measurement;
    self
  }

  #[must_use]
  pub fn with_reducer(mut self, reducer: ScalarReducer) -> Self {
    self.reducer = reducer;
    self
  }

  #[must_use]
  pub fn with_domain_policy(mut self, domain_policy: DomainPolicy) -> Self {
    self.domain_policy = domain_policy;
    self
  }

  /// Check every field, then the measurements' own parameters.
  ///
  /// # Errors
  /// [`ResampleError::InvalidConfig`] naming the first offending field.
  pub fn validate(&self) -> Result<()> {
    let deepest = max_supported_depth(self.branch_factor).ok_or_else(|| {
      ResampleError::invalid_config("branch_factor", format!("must be 2 or 3, got {}", self.branch_factor))
    })?;
    if self.max_depth == 0 || self.max_depth > deepest {
      return Err(ResampleError::invalid_config(
        "max_depth",
        format!(
          "must lie in [1, {deepest}] for branch factor {}, got {}",
          self.branch_factor, self.max_depth
        ),
      ));
    }
    if self.dimensions.contains(&0) {
      return Err(ResampleError::invalid_config(
        "dimensions",
        format!("every axis needs at least one cell, got {:?}", self.dimensions),
      ));
    }
    if self.min_sample_count == 0 {
      return Err(ResampleError::invalid_config("min_sample_count", "must be at least 1"));
    }
    if self.gap_refinement_levels > MAX_GAP_REFINEMENT_LEVELS {
      return Err(ResampleError::invalid_config(
        "gap_refinement_levels",
        format!(
          "must be at most {MAX_GAP_REFINEMENT_LEVELS}, got {}",
          self.gap_refinement_levels
        ),
      ));
    }
    if self.min.is_nan() || self.max.is_nan() || self.min > self.max {
      return Err(ResampleError::invalid_config(
        "min",
        format!("range ({}, {}) is empty or not a number", self.min, self.max),
      ));
    }
    self.primary.validate()?;
    if let Some(secondary) = &self.secondary {
      secondary.validate()?;
    }
    Ok(())
  }

  /// Cells per axis inside one coarse cell at `depth`.
  #[inline]
  pub fn resolution_at(&self, depth: u32) -> u64 {
    resolution(self.branch_factor, depth)
  }

  /// Children per subdivided node.
  #[inline]
  pub fn children_per_node(&self) -> usize {
    children_per_node(self.branch_factor)
  }

  /// Sample count a child must reach, combining the configured minimum with
  /// what the measurements themselves need.
  pub fn subdivision_threshold(&self) -> u64 {
    let secondary = self.secondary.map_or(1, |m| m.minimum_sample_count());
    self
      .min_sample_count
      .max(self.primary.minimum_sample_count())
      .max(secondary)
  }

  /// Whether a child with these totals lets its parent subdivide.
  pub fn is_subdivision_eligible(&self, sample_count: u64, total_weight: f64) -> bool {
    sample_count >= self.subdivision_threshold()
      && self.primary.is_measurable(sample_count, total_weight)
      && self
        .secondary
        .is_none_or(|m| m.is_measurable(sample_count, total_weight))
  }

  /// Range test with invertible sense.
  #[inline]
  pub fn passes_range(&self, value: f64) -> bool {
    let inside = self.min < value && value < self.max;
    inside == self.in_range
  }

  /// Parse a TOML document; missing fields take their defaults.
  ///
  /// # Errors
  /// [`ResampleError::ConfigParse`] on malformed TOML, then anything
  /// [`validate`](Self::validate) reports.
  #[cfg(feature = "serde")]
  pub fn from_toml_str(text: &str) -> Result<Self> {
    let config: Self = toml::from_str(text).map_err(|e| ResampleError::ConfigParse(e.to_string()))?;
    config.validate()?;
    Ok(config)
  }
}

impl Default for ResampleConfig {
  fn default() -> Self {
    Self {
      branch_factor: 2,
      max_depth: 4,
      dimensions: [1, 1, 1],
      min_sample_count: 1,
      min: f64::NEG_INFINITY,
      max: f64::INFINITY,
      in_range: true,
      no_empty_cells: false,
      gap_refinement_levels: 2,
      primary: ArrayMeasurement::ArithmeticMean,
      secondary: None,
      reducer: ScalarReducer::EuclideanNorm,
      domain_policy: DomainPolicy::Skip,
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
