//! Fixed-width histogram with an incrementally maintained `Σ f(bin weight)`.

use std::collections::HashMap;

use super::Accumulate;
use crate::error::{ResampleError, Result};

/// Function applied to each bin's accumulated weight.
///
/// Compared by variant, so two histograms built with the same named
/// function are always mergeable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BinFunction {
  /// f(w) = w
  Identity,
  /// f(w) = w²
  Square,
  /// f(w) = w·ln(w), with f(0) = 0
  #[default]
  EntropyTerm,
}

impl BinFunction {
  #[inline]
  pub fn apply(self, weight: f64) -> f64 {
    match self {
      Self::Identity => weight,
      Self::Square => weight * weight,
      Self::EntropyTerm if weight <= 0.0 => 0.0,
      Self::EntropyTerm => weight * weight.ln(),
    }
  }
}

/// Histogram keyed by `floor(value / step)`.
#[derive(Clone, Debug, PartialEq)]
pub struct BinsAccumulator {
  step: f64,
  function: BinFunction,
  bins: HashMap<i64, f64>,
  value: f64,
}

impl BinsAccumulator {
  pub fn new(step: f64, function: BinFunction) -> Self {
    Self {
      step,
      function,
      bins: HashMap::new(),
      value: 0.0,
    }
  }

  pub fn step(&self) -> f64 {
    self.step
  }

  pub fn function(&self) -> BinFunction {
    self.function
  }

  /// Number of occupied bins.
  pub fn bin_count(&self) -> usize {
    self.bins.len()
  }

  /// Accumulated weight of the bin holding `value`, if any.
  pub fn bin_weight(&self, value: f64) -> Option<f64> {
    self.bins.get(&self.bin_of(value)).copied()
  }

  #[inline]
  fn bin_of(&self, value: f64) -> i64 {
    (value / self.step).floor() as i64
  }

  /// Add `weight` into `bin`, adjusting the running value by the change in
  /// `f` for that bin only.
  #[inline]
  fn deposit(&mut self, bin: i64, weight: f64) {
    let function = self.function;
    let slot = self.bins.entry(bin).or_insert(0.0);
    let before = function.apply(*slot);
    *slot += weight;
    self.value += function.apply(*slot) - before;
  }
}

impl Accumulate for BinsAccumulator {
  fn check_domain(&self, value: f64) -> Result<()> {
    if value.is_finite() {
      Ok(())
    } else {
      Err(ResampleError::DomainViolation {
        accumulator: "bins",
        value,
      })
    }
  }

  fn add(&mut self, value: f64, weight: f64) -> Result<()> {
    self.check_domain(value)?;
    let bin = self.bin_of(value);
    self.deposit(bin, weight);
    Ok(())
  }

  fn merge(&mut self, other: &Self) -> Result<()> {
    if !self.has_same_parameters(other) {
      return Err(ResampleError::mismatch(
        (self.step, self.function),
        (other.step, other.function),
      ));
    }

    if other.bins.len() > self.bins.len() {
      // Fold the smaller map into a copy of the larger one.
      let smaller = std::mem::replace(&mut self.bins, other.bins.clone());
      self.value = other.value;
      for (bin, weight) in smaller {
        self.deposit(bin, weight);
      }
    } else {
      for (&bin, &weight) in &other.bins {
        self.deposit(bin, weight);
      }
    }
    Ok(())
  }

  fn value(&self) -> f64 {
    self.value
  }

  fn has_same_parameters(&self, other: &Self) -> bool {
    self.step == other.step && self.function == other.function
  }

  fn reset(&mut self) {
    self.bins.clear();
    self.value = 0.0;
  }
}

#[cfg(test)]
#[path = "bins_test.rs"]
mod bins_test;
