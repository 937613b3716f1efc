//! Named statistics derived from one or more accumulators.
//!
//! A measurement is a stateless factory: it hands out the ordered list of
//! accumulators it needs ([`ArrayMeasurement::new_accumulators`]) and later
//! turns those accumulators plus the sample/weight totals into a value
//! ([`ArrayMeasurement::measure`]). Callers must keep the accumulator order
//! the measurement produced.
//!
//! | Measurement         | Accumulators                   | Measurable when     |
//! |---------------------|--------------------------------|---------------------|
//! | `ArithmeticMean`    | ArithmeticSum                  | n ≥ 1, W ≠ 0        |
//! | `StandardDeviation` | ArithmeticSum, SquaredSum      | n > 1, W ≠ 0        |
//! | `Entropy`           | Bins(step, w·ln w)             | n ≥ 1, W > 0        |
//! | `GeometricMean`     | GeometricProduct               | n ≥ 1, W ≠ 0        |
//! | `HarmonicMean`      | InverseSum                     | n ≥ 1, W ≠ 0        |
//! | `Max` / `Min`       | Max / Min                      | n ≥ 1, W ≠ 0        |
//! | `Quantile`          | Quantile(percentile)           | n ≥ 1, W ≠ 0        |

use smallvec::{smallvec, SmallVec};

use crate::accumulator::{Accumulate, Accumulator, AccumulatorKind, BinFunction};
use crate::error::{ResampleError, Result};

/// Accumulators owned by one measurement inside one grid cell.
pub type AccumulatorSet = SmallVec<[Accumulator; 2]>;

/// Statistic computed per tree node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ArrayMeasurement {
  #[default]
  ArithmeticMean,
  StandardDeviation,
  /// Shannon entropy of the value histogram with bins of width
  /// `discretization_step`.
  Entropy { discretization_step: f64 },
  GeometricMean,
  HarmonicMean,
  Max,
  Min,
  /// Weighted percentile, `percentile` in [0, 100].
  Quantile { percentile: f64 },
}

impl ArrayMeasurement {
  /// 50th percentile.
  pub fn median() -> Self {
    Self::Quantile { percentile: 50.0 }
  }

  /// Human-readable name for logs.
  pub fn name(&self) -> &'static str {
    match self {
      Self::ArithmeticMean => "arithmetic mean",
      Self::StandardDeviation => "standard deviation",
      Self::Entropy { .. } => "entropy",
      Self::GeometricMean => "geometric mean",
      Self::HarmonicMean => "harmonic mean",
      Self::Max => "max",
      Self::Min => "min",
      Self::Quantile { .. } => "quantile",
    }
  }

  /// Check the measurement's own parameters.
  pub fn validate(&self) -> Result<()> {
    match *self {
      Self::Entropy { discretization_step } if !(discretization_step.is_finite() && discretization_step > 0.0) => {
        Err(ResampleError::invalid_config(
          "discretization_step",
          format!("must be finite and positive, got {discretization_step}"),
        ))
      }
      Self::Quantile { percentile } if !(0.0..=100.0).contains(&percentile) => Err(ResampleError::invalid_config(
        "percentile",
        format!("must lie in [0, 100], got {percentile}"),
      )),
      _ => Ok(()),
    }
  }

  /// Fresh accumulators in the order [`measure`](Self::measure) expects.
  pub fn new_accumulators(&self) -> AccumulatorSet {
    match *self {
      Self::ArithmeticMean => smallvec![Accumulator::arithmetic_sum()],
      Self::StandardDeviation => smallvec![Accumulator::arithmetic_sum(), Accumulator::squared_sum()],
      Self::Entropy { discretization_step } => {
        smallvec![Accumulator::bins(discretization_step, BinFunction::EntropyTerm)]
      }
      Self::GeometricMean => smallvec![Accumulator::geometric_product()],
      Self::HarmonicMean => smallvec![Accumulator::inverse_sum()],
      Self::Max => smallvec![Accumulator::max()],
      Self::Min => smallvec![Accumulator::min()],
      Self::Quantile { percentile } => smallvec![Accumulator::quantile(percentile)],
    }
  }

  /// Smallest sample count for which the measurement means anything.
  pub fn minimum_sample_count(&self) -> u64 {
    match self {
      Self::StandardDeviation => 2,
      _ => 1,
    }
  }

  pub fn is_measurable(&self, sample_count: u64, total_weight: f64) -> bool {
    match self {
      Self::StandardDeviation => sample_count > 1 && total_weight != 0.0,
      Self::Entropy { .. } => sample_count >= 1 && total_weight > 0.0,
      _ => sample_count >= 1 && total_weight != 0.0,
    }
  }

  /// Same measurement with the same parameters.
  pub fn has_same_parameters(&self, other: &Self) -> bool {
    self == other
  }

  /// Verify that `accumulators` is the list this measurement produces.
  ///
  /// # Errors
  /// [`ResampleError::ConfigurationMismatch`] on a length, kind or
  /// parameter difference.
  pub fn check_accumulators(&self, accumulators: &[Accumulator]) -> Result<()> {
    let expected = self.new_accumulators();
    let same = expected.len() == accumulators.len()
      && expected
        .iter()
        .zip(accumulators)
        .all(|(e, a)| e.has_same_parameters(a));
    if same {
      Ok(())
    } else {
      let kinds = |set: &[Accumulator]| set.iter().map(Accumulator::kind).collect::<Vec<AccumulatorKind>>();
      Err(ResampleError::mismatch(kinds(expected.as_slice()), kinds(accumulators)))
    }
  }

  /// Evaluate the statistic. Never mutates the accumulators.
  ///
  /// Returns `None` when the totals are not measurable, or when the
  /// accumulators degenerate (harmonic mean over values whose inverses
  /// cancel out).
  pub fn measure(&self, accumulators: &[Accumulator], sample_count: u64, total_weight: f64) -> Option<f64> {
    debug_assert!(
      self.check_accumulators(accumulators).is_ok(),
      "accumulators were not produced by {:?}",
      self
    );
    if !self.is_measurable(sample_count, total_weight) || accumulators.is_empty() {
      return None;
    }

    let w = total_weight;
    let value = match self {
      Self::ArithmeticMean => accumulators[0].value() / w,
      Self::StandardDeviation => {
        let sum = accumulators[0].value();
        let squared = accumulators.get(1)?.value();
        let mean = sum / w;
        // Weighted population variance with Bessel's correction on the
        // sample count, so weights need not be frequencies.
        let n = sample_count as f64;
        let variance = (squared - 2.0 * sum * mean + w * mean * mean) / w * n / (n - 1.0);
        variance.max(0.0).sqrt()
      }
      Self::Entropy { .. } => w.ln() - accumulators[0].value() / w,
      Self::GeometricMean => match &accumulators[0] {
        Accumulator::Sum(log_sum) => (log_sum.raw_sum() / w).exp(),
        other => other.value().powf(1.0 / w),
      },
      Self::HarmonicMean => {
        let inverse = accumulators[0].value();
        if inverse == 0.0 {
          return None;
        }
        w / inverse
      }
      Self::Max | Self::Min | Self::Quantile { .. } => accumulators[0].value(),
    };
    Some(value)
  }
}

#[cfg(test)]
#[path = "measurement_test.rs"]
mod measurement_test;
