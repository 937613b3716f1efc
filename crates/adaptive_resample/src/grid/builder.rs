//! Bottom-up pass: bucket samples per coarse cell, fill and roll up pyramids.

use std::collections::BTreeMap;

use super::cell::GridCell;
use super::layout::GridLayout;
use super::pyramid::MultiResolutionGrid;
use crate::config::{DomainPolicy, ResampleConfig};
use crate::error::{ResampleError, Result};
use crate::types::Sample;

/// A sample reduced to a scalar and located in its coarse cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BucketedSample {
  /// Finest-level cell inside the coarse cell.
  pub cell: GridCell,
  pub value: f64,
  pub weight: f64,
}

/// Samples grouped by coarse cell index, in index order.
#[derive(Clone, Debug, Default)]
pub struct SampleBuckets {
  pub trees: BTreeMap<usize, Vec<BucketedSample>>,
  /// Samples with a negative or non-finite weight, or no value components.
  pub skipped: usize,
  /// Samples outside the layout bounds.
  pub outside: usize,
}

/// Apply the domain policy to a rejected sample.
///
/// Only domain violations are skippable. Anything else is a programming or
/// configuration error and always propagates.
fn reject(error: ResampleError, policy: DomainPolicy) -> Result<()> {
  match (&error, policy) {
    (ResampleError::DomainViolation { .. }, DomainPolicy::Skip) => {
      tracing::debug!(%error, "skipping sample");
      Ok(())
    }
    _ => Err(error),
  }
}

/// Reduce, validate and locate every sample.
///
/// # Errors
/// [`ResampleError::DomainViolation`] for a bad weight under
/// [`DomainPolicy::Abort`].
pub fn bucket_samples(samples: &[Sample], layout: &GridLayout, config: &ResampleConfig) -> Result<SampleBuckets> {
  let _span = tracing::info_span!("bucket_samples", samples = samples.len()).entered();

  let mut buckets = SampleBuckets::default();
  for sample in samples {
    if !(sample.weight.is_finite() && sample.weight >= 0.0) {
      reject(
        ResampleError::DomainViolation {
          accumulator: "weight",
          value: sample.weight,
        },
        config.domain_policy,
      )?;
      buckets.skipped += 1;
      continue;
    }
    if sample.value.is_empty() {
      reject(
        ResampleError::DomainViolation {
          accumulator: "value",
          value: f64::NAN,
        },
        config.domain_policy,
      )?;
      buckets.skipped += 1;
      continue;
    }
    let Some((tree, cell)) = layout.locate(sample.position) else {
      buckets.outside += 1;
      continue;
    };
    buckets.trees.entry(tree).or_default().push(BucketedSample {
      cell,
      value: sample.value.reduce(config.reducer),
      weight: sample.weight,
    });
  }

  if buckets.skipped > 0 {
    tracing::warn!(skipped = buckets.skipped, "samples with invalid weights or values were skipped");
  }
  if buckets.outside > 0 {
    tracing::warn!(outside = buckets.outside, "samples outside the bounds were ignored");
  }
  Ok(buckets)
}

/// Pyramid of one coarse cell plus the number of samples it rejected.
#[derive(Clone, Debug)]
pub struct BuiltPyramid {
  pub grid: MultiResolutionGrid,
  pub ingested: usize,
  pub skipped: usize,
}

/// Fill the finest level of one coarse cell and roll it up to depth 0.
///
/// # Errors
/// [`ResampleError::DomainViolation`] under [`DomainPolicy::Abort`], or a
/// configuration mismatch while merging.
#[tracing::instrument(skip_all, name = "grid::build_pyramid", fields(tree = tree))]
pub fn build_pyramid(tree: usize, samples: &[BucketedSample], config: &ResampleConfig) -> Result<BuiltPyramid> {
  let mut grid = MultiResolutionGrid::new(config.branch_factor, config.max_depth);
  let mut skipped = 0;

  for sample in samples {
    if let Err(error) = grid.insert_sample(sample.cell, sample.value, sample.weight, config) {
      reject(error, config.domain_policy)?;
      skipped += 1;
    }
  }
  if skipped > 0 {
    tracing::warn!(tree, skipped, "samples outside the accumulator domain were skipped");
  }

  {
    let _span = tracing::info_span!("roll_up").entered();
    grid.roll_up(config)?;
  }

  Ok(BuiltPyramid {
    grid,
    ingested: samples.len() - skipped,
    skipped,
  })
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod builder_test;
