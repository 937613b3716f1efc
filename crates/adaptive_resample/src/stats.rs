//! Counters collected while resampling.

/// Statistics from one resampling run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResampleStats {
  /// Samples folded into some pyramid.
  pub samples_ingested: usize,
  /// Samples dropped for an accumulator domain or a bad weight.
  pub samples_skipped: usize,
  /// Samples whose position fell outside the bounds.
  pub samples_outside: usize,
  /// Trees emitted (occupied coarse cells).
  pub trees: usize,
  /// Nodes emitted over all trees.
  pub nodes: usize,
  /// Nodes without children.
  pub leaves: usize,
  /// Nodes flagged as masked.
  pub masked_nodes: usize,
  /// Cells kept from subdividing because geometry crossed an empty child.
  pub gap_cells_protected: usize,
}

impl ResampleStats {
  /// Add another run's counters into this one.
  pub fn merge(&mut self, other: &ResampleStats) {
    self.samples_ingested += other.samples_ingested;
    self.samples_skipped += other.samples_skipped;
    self.samples_outside += other.samples_outside;
    self.trees += other.trees;
    self.nodes += other.nodes;
    self.leaves += other.leaves;
    self.masked_nodes += other.masked_nodes;
    self.gap_cells_protected += other.gap_cells_protected;
  }

  /// Samples that reached the builder, ingested or not.
  #[inline]
  pub fn samples_seen(&self) -> usize {
    self.samples_ingested + self.samples_skipped + self.samples_outside
  }
}
