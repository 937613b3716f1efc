//! Axis-aligned bounding box with double precision.

use glam::DVec3;

/// Double-precision axis-aligned bounding box.
///
/// Bounds the input samples and every cell of the resampled grid. A box may
/// be flat (zero extent) along any axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
  /// Minimum corner (inclusive).
  pub min: DVec3,
  /// Maximum corner (inclusive).
  pub max: DVec3,
}

impl Bounds {
  /// Create bounds from min and max corners.
  ///
  /// # Panics
  /// Debug-asserts that min <= max on all axes.
  pub fn new(min: DVec3, max: DVec3) -> Self {
    debug_assert!(
      min.x <= max.x && min.y <= max.y && min.z <= max.z,
      "Bounds min must be <= max on all axes"
    );
    Self { min, max }
  }

  /// Bounds of a single point (zero extent).
  pub fn from_point(point: DVec3) -> Self {
    Self {
      min: point,
      max: point,
    }
  }

  /// Smallest bounds containing every point, `None` for an empty iterator.
  pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
    let mut points = points.into_iter();
    let first = points.next()?;
    Some(points.fold(Self::from_point(first), |bounds, p| bounds.including(p)))
  }

  /// Grow to include a point.
  #[inline]
  pub fn including(self, point: DVec3) -> Self {
    Self {
      min: self.min.min(point),
      max: self.max.max(point),
    }
  }

  /// Check if this box overlaps with another.
  ///
  /// Two boxes overlap if they share any interior or boundary points.
  #[inline]
  pub fn overlaps(&self, other: &Bounds) -> bool {
    self.min.x <= other.max.x
      && self.max.x >= other.min.x
      && self.min.y <= other.max.y
      && self.max.y >= other.min.y
      && self.min.z <= other.max.z
      && self.max.z >= other.min.z
  }

  /// Check if this box contains a point.
  #[inline]
  pub fn contains_point(&self, point: DVec3) -> bool {
    point.x >= self.min.x
      && point.x <= self.max.x
      && point.y >= self.min.y
      && point.y <= self.max.y
      && point.z >= self.min.z
      && point.z <= self.max.z
  }

  /// Get the size of the box (max - min).
  #[inline]
  pub fn size(&self) -> DVec3 {
    self.max - self.min
  }

  /// Get the center of the box.
  #[inline]
  pub fn center(&self) -> DVec3 {
    (self.min + self.max) * 0.5
  }

  /// Half the length of the diagonal.
  #[inline]
  pub fn half_diagonal(&self) -> f64 {
    self.size().length() * 0.5
  }

  /// Euclidean distance from a point to the box, zero inside.
  #[inline]
  pub fn distance_to_point(&self, point: DVec3) -> f64 {
    point.clamp(self.min, self.max).distance(point)
  }
}
