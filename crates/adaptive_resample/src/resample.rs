//! Resampling orchestrator.
//!
//! Buckets samples per coarse cell, then builds, gap-fills and emits every
//! occupied coarse cell in parallel with rayon. Coarse cells share nothing,
//! so each one runs its bottom-up and top-down passes on its own worker.
//!
//! # Usage
//!
//! ```ignore
//! let input = ResampleInput::new(samples).with_bounds(bounds);
//! let config = ResampleConfig::default()
//!   .with_dimensions([4, 4, 1])
//!   .with_max_depth(6)
//!   .with_primary(ArrayMeasurement::StandardDeviation);
//!
//! let forest = resample(&input, &config)?;
//! for tree in &forest.trees {
//!   // hand tree.nodes / tree.fields to the sink
//! }
//! ```

use std::collections::HashMap;

use rayon::prelude::*;

use crate::bounds::Bounds;
use crate::config::ResampleConfig;
use crate::emitter::{emit_tree, HyperTree, HyperTreeForest};
use crate::error::{ResampleError, Result};
use crate::grid::{build_pyramid, bucket_samples, protect_gaps, BucketedSample, GridCell, GridLayout};
use crate::stats::ResampleStats;
use crate::types::{Primitive, Sample};

/// Samples to resample, with optional explicit bounds and gap-fill geometry.
#[derive(Clone, Debug, Default)]
pub struct ResampleInput {
  pub samples: Vec<Sample>,
  /// Domain of the outer grid. Defaults to the bounds of the sample
  /// positions; samples outside explicit bounds are ignored.
  pub bounds: Option<Bounds>,
  /// Geometry consulted when `no_empty_cells` is set.
  pub primitives: Vec<Primitive>,
}

impl ResampleInput {
  pub fn new(samples: Vec<Sample>) -> Self {
    Self {
      samples,
      ..Self::default()
    }
  }

  #[must_use]
  pub fn with_bounds(mut self, bounds: Bounds) -> Self {
    self.bounds = Some(bounds);
    self
  }

  #[must_use]
  pub fn with_primitives(mut self, primitives: Vec<Primitive>) -> Self {
    self.primitives = primitives;
    self
  }

  /// Explicit bounds, or the bounds of every finite sample position.
  pub fn resolved_bounds(&self) -> Option<Bounds> {
    self.bounds.or_else(|| {
      Bounds::from_points(
        self
          .samples
          .iter()
          .map(|s| s.position)
          .filter(|p| p.is_finite()),
      )
    })
  }
}

/// Build, gap-fill and emit one coarse cell.
fn process_tree(
  tree: usize,
  samples: &[BucketedSample],
  primitives: &[Primitive],
  layout: &GridLayout,
  config: &ResampleConfig,
) -> Result<(Option<HyperTree>, ResampleStats)> {
  let mut built = build_pyramid(tree, samples, config)?;
  let mut stats = ResampleStats {
    samples_ingested: built.ingested,
    samples_skipped: built.skipped,
    ..ResampleStats::default()
  };

  // Every sample of this cell may have been rejected.
  if !built.grid.contains(GridCell::root()) {
    return Ok((None, stats));
  }

  if config.no_empty_cells && !primitives.is_empty() {
    stats.gap_cells_protected = protect_gaps(&mut built.grid, layout, tree, primitives, config);
  }

  let emitted = emit_tree(tree, layout.tree_coordinate(tree), &built.grid, config);
  stats.trees = 1;
  stats.nodes = emitted.len();
  stats.leaves = emitted.leaf_count();
  stats.masked_nodes = emitted.masked_count();
  Ok((Some(emitted), stats))
}

/// Resample `input` into a forest of hyper-trees.
///
/// # Errors
/// - [`ResampleError::InvalidConfig`] if `config` does not validate
/// - [`ResampleError::EmptyInput`] without samples or bounds
/// - [`ResampleError::DomainViolation`] under
///   [`DomainPolicy::Abort`](crate::DomainPolicy::Abort)
#[tracing::instrument(skip_all, name = "resample", fields(samples = input.samples.len()))]
pub fn resample(input: &ResampleInput, config: &ResampleConfig) -> Result<HyperTreeForest> {
  config.validate()?;
  if input.samples.is_empty() {
    return Err(ResampleError::EmptyInput);
  }
  let bounds = input.resolved_bounds().ok_or(ResampleError::EmptyInput)?;
  let layout = GridLayout::new(bounds, config);

  let buckets = bucket_samples(&input.samples, &layout, config)?;

  let mut primitives: HashMap<usize, Vec<Primitive>> = HashMap::new();
  if config.no_empty_cells {
    let _span = tracing::info_span!("bucket_primitives", primitives = input.primitives.len()).entered();
    for primitive in &input.primitives {
      for tree in layout.trees_overlapping(&primitive.bounds()) {
        if buckets.trees.contains_key(&tree) {
          primitives.entry(tree).or_default().push(*primitive);
        }
      }
    }
  }

  let results = buckets
    .trees
    .par_iter()
    .map(|(&tree, samples)| {
      let tree_primitives = primitives.get(&tree).map_or(&[][..], Vec::as_slice);
      process_tree(tree, samples, tree_primitives, &layout, config)
    })
    .collect::<Result<Vec<_>>>()?;

  let mut stats = ResampleStats {
    samples_skipped: buckets.skipped,
    samples_outside: buckets.outside,
    ..ResampleStats::default()
  };
  let mut trees = Vec::with_capacity(results.len());
  for (tree, tree_stats) in results {
    stats.merge(&tree_stats);
    trees.extend(tree);
  }

  tracing::info!(
    trees = stats.trees,
    nodes = stats.nodes,
    skipped = stats.samples_skipped,
    outside = stats.samples_outside,
    "resampling finished"
  );
  Ok(HyperTreeForest::new(layout, trees, stats))
}

#[cfg(test)]
#[path = "resample_test.rs"]
mod resample_test;
