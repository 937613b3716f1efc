//! Error types for accumulation, measurement and tree construction.
//!
//! "Not enough data" is not an error: measurements report it as `None` and
//! the emitter turns it into a leaf or a masked node.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ResampleError>;

/// Errors surfaced by accumulators, measurements and the resampler.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResampleError {
  /// Two accumulators (or measurements) with different variants or
  /// parameters were merged or paired.
  #[error("configuration mismatch: expected {expected}, found {found}")]
  ConfigurationMismatch {
    /// Description of the receiving side.
    expected: String,
    /// Description of the offending side.
    found: String,
  },

  /// A value outside the accumulator's domain (log or inverse of a
  /// non-positive or zero value).
  #[error("{accumulator} accumulator cannot accept value {value}")]
  DomainViolation {
    /// Accumulator kind that rejected the value.
    accumulator: &'static str,
    /// The rejected value.
    value: f64,
  },

  /// A configuration field holds an unusable value.
  #[error("invalid configuration `{field}`: {reason}")]
  InvalidConfig {
    /// Name of the configuration field.
    field: &'static str,
    /// What is wrong with it.
    reason: String,
  },

  /// The configuration text could not be parsed.
  #[error("failed to parse configuration: {0}")]
  ConfigParse(String),

  /// No sample was provided.
  #[error("no samples to resample")]
  EmptyInput,
}

impl ResampleError {
  /// Shorthand for [`ResampleError::InvalidConfig`].
  pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
    Self::InvalidConfig {
      field,
      reason: reason.into(),
    }
  }

  /// Shorthand for [`ResampleError::ConfigurationMismatch`] from two debug
  /// representations.
  pub(crate) fn mismatch(expected: impl std::fmt::Debug, found: impl std::fmt::Debug) -> Self {
    Self::ConfigurationMismatch {
      expected: format!("{expected:?}"),
      found: format!("{found:?}"),
    }
  }
}
