//! adaptive_resample - Adaptive hierarchical resampling of point clouds
//!
//! This crate turns an unstructured cloud of weighted samples into a sparse,
//! variable-resolution forest of N-ary trees (octrees for branch factor 2,
//! 27-trees for branch factor 3). Every node carries streaming statistics
//! computed incrementally and merged across resolution levels.
//!
//! # Features
//!
//! - **Mergeable accumulators**: sums, log-products, extrema, a weighted
//!   percentile tracker and a histogram, all associative and commutative
//! - **Array measurements**: mean, standard deviation, entropy, geometric and
//!   harmonic means, extrema and quantiles, each with a measurability rule
//! - **Two-pass construction**: a bottom-up pyramid roll-up per coarse cell
//!   followed by a top-down walk that subdivides on a range test
//! - **No empty cells**: optional pass that keeps geometry crossing empty
//!   cells from being masked
//! - **Parallel**: coarse cells are processed independently with rayon
//!
//! # Example
//!
//! ```ignore
//! use adaptive_resample::{resample, ArrayMeasurement, ResampleConfig, ResampleInput, Sample};
//! use glam::DVec3;
//!
//! let samples = vec![
//!   Sample::scalar(DVec3::new(0.1, 0.2, 0.3), 1.5),
//!   Sample::scalar(DVec3::new(0.8, 0.7, 0.9), 4.0),
//! ];
//! let config = ResampleConfig::default()
//!   .with_max_depth(5)
//!   .with_primary(ArrayMeasurement::StandardDeviation)
//!   .with_range(0.0, 0.1, false);
//!
//! let forest = resample(&ResampleInput::new(samples), &config)?;
//! println!("{} trees, {} nodes", forest.trees.len(), forest.node_count());
//! ```

pub mod accumulator;
pub mod bounds;
pub mod config;
pub mod constants;
pub mod emitter;
pub mod error;
pub mod grid;
pub mod measurement;
pub mod resample;
pub mod stats;
pub mod types;

// Re-export commonly used items
pub use accumulator::{Accumulate, Accumulator, AccumulatorKind, BinFunction, ScalarReducer};
pub use bounds::Bounds;
pub use config::{DomainPolicy, ResampleConfig};
pub use constants::{coord_to_index, index_to_coord};
pub use emitter::{HyperTree, HyperTreeForest, NodeFields, TreeNode};
pub use error::{ResampleError, Result};
pub use grid::{GridCell, GridLayout};
pub use measurement::{AccumulatorSet, ArrayMeasurement};
pub use resample::{resample, ResampleInput};
pub use stats::ResampleStats;
pub use types::{Primitive, Sample, SampleValue};
