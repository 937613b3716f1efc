//! Mergeable streaming-statistics primitives.
//!
//! Every accumulator folds `(value, weight)` pairs into a running result and
//! can absorb another accumulator of the same kind and parameters. Merging is
//! order independent: feeding a multiset through any grouping of `add` and
//! `merge` calls yields the same [`Accumulate::value`] up to rounding.
//!
//! ```text
//!   Sum       ArithmeticSum | SquaredSum | InverseSum | EntropySum | GeometricProduct
//!   Extremum  Max | Min
//!   Quantile  sorted (value, weight) list + percentile cursor
//!   Bins      floor(value / step) -> weight, running Σ f(weight)
//! ```

pub mod bins;
pub mod quantile;
pub mod sum;

pub use bins::{BinFunction, BinsAccumulator};
pub use quantile::QuantileAccumulator;
pub use sum::{ExtremumAccumulator, ExtremumKind, SumAccumulator, SumKind};

use crate::error::{ResampleError, Result};

/// Shared contract of all accumulator variants.
pub trait Accumulate {
  /// Check whether `value` can be folded in without mutating anything.
  fn check_domain(&self, value: f64) -> Result<()>;

  /// Fold one weighted sample in.
  ///
  /// # Errors
  /// [`ResampleError::DomainViolation`] when the value is outside the
  /// accumulator's domain. The state is left untouched in that case.
  fn add(&mut self, value: f64, weight: f64) -> Result<()>;

  /// Merge another accumulator of the same kind and parameters.
  ///
  /// # Errors
  /// [`ResampleError::ConfigurationMismatch`] when
  /// [`has_same_parameters`](Accumulate::has_same_parameters) is false.
  fn merge(&mut self, other: &Self) -> Result<()>;

  /// Current accumulated statistic. Defined for the empty state.
  fn value(&self) -> f64;

  /// True when `other` can be merged into `self`.
  fn has_same_parameters(&self, other: &Self) -> bool;

  /// Return to the initial state, keeping parameters.
  fn reset(&mut self);
}

/// Variant tag of an [`Accumulator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccumulatorKind {
  ArithmeticSum,
  SquaredSum,
  InverseSum,
  EntropySum,
  GeometricProduct,
  Max,
  Min,
  Quantile,
  Bins,
}

/// Reduction applied to vector-valued samples before accumulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScalarReducer {
  /// sqrt(Σ c²)
  #[default]
  EuclideanNorm,
  /// max |c|
  MaxAbs,
  /// Σ c
  Sum,
  /// c[0]
  FirstComponent,
}

impl ScalarReducer {
  /// Reduce a component slice to a scalar.
  ///
  /// Single-component input is passed through unchanged regardless of the
  /// reducer. Empty input reduces to NaN, which every accumulator rejects.
  pub fn reduce(self, components: &[f64]) -> f64 {
    match components {
      [] => f64::NAN,
      [single] => *single,
      _ => match self {
        Self::EuclideanNorm => components.iter().map(|c| c * c).sum::<f64>().sqrt(),
        Self::MaxAbs => components.iter().fold(0.0_f64, |acc, c| acc.max(c.abs())),
        Self::Sum => components.iter().sum(),
        Self::FirstComponent => components[0],
      },
    }
  }
}

/// Tagged union over the accumulator variants.
#[derive(Clone, Debug, PartialEq)]
pub enum Accumulator {
  Sum(SumAccumulator),
  Extremum(ExtremumAccumulator),
  Quantile(QuantileAccumulator),
  Bins(BinsAccumulator),
}

impl Accumulator {
  /// Σ w·x
  pub fn arithmetic_sum() -> Self {
    Self::Sum(SumAccumulator::new(SumKind::Arithmetic))
  }

  /// Σ w·x²
  pub fn squared_sum() -> Self {
    Self::Sum(SumAccumulator::new(SumKind::Squared))
  }

  /// Σ w/x
  pub fn inverse_sum() -> Self {
    Self::Sum(SumAccumulator::new(SumKind::Inverse))
  }

  /// Σ w·x·ln(x)
  pub fn entropy_sum() -> Self {
    Self::Sum(SumAccumulator::new(SumKind::Entropy))
  }

  /// Π x^w, kept as Σ w·ln(x)
  pub fn geometric_product() -> Self {
    Self::Sum(SumAccumulator::new(SumKind::GeometricProduct))
  }

  pub fn max() -> Self {
    Self::Extremum(ExtremumAccumulator::new(ExtremumKind::Max))
  }

  pub fn min() -> Self {
    Self::Extremum(ExtremumAccumulator::new(ExtremumKind::Min))
  }

  /// Weighted percentile tracker, `percentile` in [0, 100].
  pub fn quantile(percentile: f64) -> Self {
    Self::Quantile(QuantileAccumulator::new(percentile))
  }

  /// Histogram with bins of width `step` and per-bin function `function`.
  pub fn bins(step: f64, function: BinFunction) -> Self {
    Self::Bins(BinsAccumulator::new(step, function))
  }

  /// Variant tag.
  pub fn kind(&self) -> AccumulatorKind {
    match self {
      Self::Sum(sum) => match sum.kind() {
        SumKind::Arithmetic => AccumulatorKind::ArithmeticSum,
        SumKind::Squared => AccumulatorKind::SquaredSum,
        SumKind::Inverse => AccumulatorKind::InverseSum,
        SumKind::Entropy => AccumulatorKind::EntropySum,
        SumKind::GeometricProduct => AccumulatorKind::GeometricProduct,
      },
      Self::Extremum(extremum) => match extremum.kind() {
        ExtremumKind::Max => AccumulatorKind::Max,
        ExtremumKind::Min => AccumulatorKind::Min,
      },
      Self::Quantile(_) => AccumulatorKind::Quantile,
      Self::Bins(_) => AccumulatorKind::Bins,
    }
  }

  /// Reduce a vector sample with `reducer`, then add it.
  pub fn add_components(&mut self, components: &[f64], weight: f64, reducer: ScalarReducer) -> Result<()> {
    self.add(reducer.reduce(components), weight)
  }
}

impl Accumulate for Accumulator {
  fn check_domain(&self, value: f64) -> Result<()> {
    match self {
      Self::Sum(acc) => acc.check_domain(value),
      Self::Extremum(acc) => acc.check_domain(value),
      Self::Quantile(acc) => acc.check_domain(value),
      Self::Bins(acc) => acc.check_domain(value),
    }
  }

  fn add(&mut self, value: f64, weight: f64) -> Result<()> {
    match self {
      Self::Sum(acc) => acc.add(value, weight),
      Self::Extremum(acc) => acc.add(value, weight),
      Self::Quantile(acc) => acc.add(value, weight),
      Self::Bins(acc) => acc.add(value, weight),
    }
  }

  fn merge(&mut self, other: &Self) -> Result<()> {
    match (self, other) {
      (Self::Sum(a), Self::Sum(b)) => a.merge(b),
      (Self::Extremum(a), Self::Extremum(b)) => a.merge(b),
      (Self::Quantile(a), Self::Quantile(b)) => a.merge(b),
      (Self::Bins(a), Self::Bins(b)) => a.merge(b),
      (this, other) => Err(ResampleError::mismatch(this.kind(), other.kind())),
    }
  }

  fn value(&self) -> f64 {
    match self {
      Self::Sum(acc) => acc.value(),
      Self::Extremum(acc) => acc.value(),
      Self::Quantile(acc) => acc.value(),
      Self::Bins(acc) => acc.value(),
    }
  }

  fn has_same_parameters(&self, other: &Self) -> bool {
    match (self, other) {
      (Self::Sum(a), Self::Sum(b)) => a.has_same_parameters(b),
      (Self::Extremum(a), Self::Extremum(b)) => a.has_same_parameters(b),
      (Self::Quantile(a), Self::Quantile(b)) => a.has_same_parameters(b),
      (Self::Bins(a), Self::Bins(b)) => a.has_same_parameters(b),
      _ => false,
    }
  }

  fn reset(&mut self) {
    match self {
      Self::Sum(acc) => acc.reset(),
      Self::Extremum(acc) => acc.reset(),
      Self::Quantile(acc) => acc.reset(),
      Self::Bins(acc) => acc.reset(),
    }
  }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
