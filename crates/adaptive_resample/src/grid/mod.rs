//! Multi-resolution grid: per coarse cell pyramids of aggregated samples.
//!
//! ```text
//! samples --locate--> finest cells --roll_up--> depth max_depth-1 ... depth 0
//!                                                 (protect_gaps, optional)
//! ```

pub mod builder;
pub mod cell;
pub mod element;
pub mod gap_fill;
pub mod layout;
pub mod pyramid;

pub use builder::{build_pyramid, bucket_samples, BucketedSample, BuiltPyramid, SampleBuckets};
pub use cell::GridCell;
pub use element::GridElement;
pub use gap_fill::protect_gaps;
pub use layout::GridLayout;
pub use pyramid::MultiResolutionGrid;
