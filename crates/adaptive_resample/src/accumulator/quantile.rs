//! Weighted percentile tracking with an incrementally maintained cursor.
//!
//! Entries are kept sorted by value. The cursor points at the first entry
//! whose cumulative weight (inclusive, from the left) reaches
//! `percentile / 100 * total_weight`:
//!
//! ```text
//!   Σ w[..cursor] < target <= Σ w[..=cursor]
//! ```
//!
//! Insertion and merge move the cursor one entry at a time from its previous
//! position instead of rescanning the prefix sums.

use super::Accumulate;
use crate::error::{ResampleError, Result};

/// Sorted `(value, weight)` list with a percentile cursor.
#[derive(Clone, Debug, PartialEq)]
pub struct QuantileAccumulator {
  percentile: f64,
  /// Sorted by value; equal values keep insertion order.
  entries: Vec<(f64, f64)>,
  cursor: usize,
  /// Σ weight of `entries[..=cursor]`.
  cumulative: f64,
  total: f64,
}

impl QuantileAccumulator {
  /// Create an empty accumulator for `percentile` in [0, 100].
  ///
  /// Out-of-range percentiles are clamped; configuration validation
  /// rejects them before they get here.
  pub fn new(percentile: f64) -> Self {
    Self {
      percentile: percentile.clamp(0.0, 100.0),
      entries: Vec::new(),
      cursor: 0,
      cumulative: 0.0,
      total: 0.0,
    }
  }

  pub fn percentile(&self) -> f64 {
    self.percentile
  }

  /// Sorted entries.
  pub fn entries(&self) -> &[(f64, f64)] {
    &self.entries
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  /// Weight of all entries up to and including the cursor.
  pub fn cumulative_weight(&self) -> f64 {
    self.cumulative
  }

  pub fn total_weight(&self) -> f64 {
    self.total
  }

  #[inline]
  fn target(&self) -> f64 {
    self.percentile / 100.0 * self.total
  }

  /// Step the cursor until `Σ w[..cursor] < target <= Σ w[..=cursor]`.
  fn walk(&mut self) {
    if self.entries.is_empty() {
      return;
    }
    let target = self.target();

    while self.cursor > 0 && self.cumulative - self.entries[self.cursor].1 >= target {
      self.cumulative -= self.entries[self.cursor].1;
      self.cursor -= 1;
    }

    while self.cumulative < target && self.cursor + 1 < self.entries.len() {
      self.cursor += 1;
      self.cumulative += self.entries[self.cursor].1;
    }
  }
}

impl Accumulate for QuantileAccumulator {
  fn check_domain(&self, value: f64) -> Result<()> {
    if value.is_nan() {
      Err(ResampleError::DomainViolation {
        accumulator: "quantile",
        value,
      })
    } else {
      Ok(())
    }
  }

  fn add(&mut self, value: f64, weight: f64) -> Result<()> {
    self.check_domain(value)?;
    if weight <= 0.0 {
      return Ok(());
    }

    let index = self.entries.partition_point(|&(v, _)| v <= value);
    self.entries.insert(index, (value, weight));
    self.total += weight;

    if self.entries.len() == 1 {
      self.cursor = 0;
      self.cumulative = weight;
    } else if index <= self.cursor {
      // The cursor entry shifted right by one and now has `weight` more to
      // its left.
      self.cursor += 1;
      self.cumulative += weight;
    }

    self.walk();
    Ok(())
  }

  fn merge(&mut self, other: &Self) -> Result<()> {
    if !self.has_same_parameters(other) {
      return Err(ResampleError::mismatch(self.percentile, other.percentile));
    }
    if other.entries.is_empty() {
      return Ok(());
    }
    if self.entries.is_empty() {
      *self = other.clone();
      return Ok(());
    }

    let ours = std::mem::take(&mut self.entries);
    let theirs = &other.entries;
    let mut merged = Vec::with_capacity(ours.len() + theirs.len());
    let (mut i, mut j) = (0, 0);
    let mut prefix = 0.0;
    let anchor = self.cursor;

    while i < ours.len() || j < theirs.len() {
      let take_ours = j >= theirs.len() || (i < ours.len() && ours[i].0 <= theirs[j].0);
      let entry = if take_ours { ours[i] } else { theirs[j] };
      merged.push(entry);
      prefix += entry.1;

      if take_ours {
        if i == anchor {
          self.cursor = merged.len() - 1;
          self.cumulative = prefix;
        }
        i += 1;
      } else {
        j += 1;
      }
    }

    self.entries = merged;
    self.total += other.total;
    self.walk();
    Ok(())
  }

  /// Value at the cursor, `0.0` when empty.
  fn value(&self) -> f64 {
    self.entries.get(self.cursor).map_or(0.0, |&(v, _)| v)
  }

  fn has_same_parameters(&self, other: &Self) -> bool {
    self.percentile == other.percentile
  }

  fn reset(&mut self) {
    self.entries.clear();
    self.cursor = 0;
    self.cumulative = 0.0;
    self.total = 0.0;
  }
}

#[cfg(test)]
#[path = "quantile_test.rs"]
mod quantile_test;
