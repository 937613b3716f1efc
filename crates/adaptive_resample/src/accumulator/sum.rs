//! Constant-time running sums and extrema.

use super::Accumulate;
use crate::error::{ResampleError, Result};

/// Term folded into a [`SumAccumulator`] per sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SumKind {
  /// w·x
  Arithmetic,
  /// w·x²
  Squared,
  /// w/x, x must be non-zero
  Inverse,
  /// w·x·ln(x), x must be positive
  Entropy,
  /// w·ln(x), x must be positive; [`Accumulate::value`] exponentiates
  GeometricProduct,
}

impl SumKind {
  fn name(self) -> &'static str {
    match self {
      Self::Arithmetic => "arithmetic sum",
      Self::Squared => "squared sum",
      Self::Inverse => "inverse sum",
      Self::Entropy => "entropy sum",
      Self::GeometricProduct => "geometric product",
    }
  }

  fn accepts(self, value: f64) -> bool {
    match self {
      Self::Arithmetic | Self::Squared => !value.is_nan(),
      Self::Inverse => value != 0.0 && !value.is_nan(),
      Self::Entropy | Self::GeometricProduct => value > 0.0,
    }
  }

  #[inline]
  fn term(self, value: f64, weight: f64) -> f64 {
    match self {
      Self::Arithmetic => weight * value,
      Self::Squared => weight * value * value,
      Self::Inverse => weight / value,
      Self::Entropy => weight * value * value.ln(),
      Self::GeometricProduct => weight * value.ln(),
    }
  }
}

/// Running sum of a per-sample term.
#[derive(Clone, Debug, PartialEq)]
pub struct SumAccumulator {
  kind: SumKind,
  sum: f64,
}

impl SumAccumulator {
  pub fn new(kind: SumKind) -> Self {
    Self { kind, sum: 0.0 }
  }

  pub fn kind(&self) -> SumKind {
    self.kind
  }

  /// The raw running sum. For [`SumKind::GeometricProduct`] this is the
  /// log of the product and never overflows.
  pub fn raw_sum(&self) -> f64 {
    self.sum
  }
}

impl Accumulate for SumAccumulator {
  fn check_domain(&self, value: f64) -> Result<()> {
    if self.kind.accepts(value) {
      Ok(())
    } else {
      Err(ResampleError::DomainViolation {
        accumulator: self.kind.name(),
        value,
      })
    }
  }

  fn add(&mut self, value: f64, weight: f64) -> Result<()> {
    self.check_domain(value)?;
    self.sum += self.kind.term(value, weight);
    Ok(())
  }

  fn merge(&mut self, other: &Self) -> Result<()> {
    if !self.has_same_parameters(other) {
      return Err(ResampleError::mismatch(self.kind, other.kind));
    }
    self.sum += other.sum;
    Ok(())
  }

  fn value(&self) -> f64 {
    match self.kind {
      SumKind::GeometricProduct => self.sum.exp(),
      _ => self.sum,
    }
  }

  fn has_same_parameters(&self, other: &Self) -> bool {
    self.kind == other.kind
  }

  fn reset(&mut self) {
    self.sum = 0.0;
  }
}

/// Which extremum an [`ExtremumAccumulator`] tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExtremumKind {
  Max,
  Min,
}

/// Running maximum or minimum. Weights are ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtremumAccumulator {
  kind: ExtremumKind,
  value: f64,
}

impl ExtremumAccumulator {
  pub fn new(kind: ExtremumKind) -> Self {
    Self {
      kind,
      value: Self::identity(kind),
    }
  }

  pub fn kind(&self) -> ExtremumKind {
    self.kind
  }

  fn identity(kind: ExtremumKind) -> f64 {
    match kind {
      ExtremumKind::Max => f64::NEG_INFINITY,
      ExtremumKind::Min => f64::INFINITY,
    }
  }

  #[inline]
  fn fold(&mut self, value: f64) {
    self.value = match self.kind {
      ExtremumKind::Max => self.value.max(value),
      ExtremumKind::Min => self.value.min(value),
    };
  }
}

impl Accumulate for ExtremumAccumulator {
  fn check_domain(&self, value: f64) -> Result<()> {
    if value.is_nan() {
      Err(ResampleError::DomainViolation {
        accumulator: "extremum",
        value,
      })
    } else {
      Ok(())
    }
  }

  fn add(&mut self, value: f64, _weight: f64) -> Result<()> {
    self.check_domain(value)?;
    self.fold(value);
    Ok(())
  }

  fn merge(&mut self, other: &Self) -> Result<()> {
    if !self.has_same_parameters(other) {
      return Err(ResampleError::mismatch(self.kind, other.kind));
    }
    self.fold(other.value);
    Ok(())
  }

  fn value(&self) -> f64 {
    self.value
  }

  fn has_same_parameters(&self, other: &Self) -> bool {
    self.kind == other.kind
  }

  fn reset(&mut self) {
    self.value = Self::identity(self.kind);
  }
}

#[cfg(test)]
#[path = "sum_test.rs"]
mod sum_test;
