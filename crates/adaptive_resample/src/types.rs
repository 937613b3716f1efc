//! Input data types: weighted samples and geometric primitives.

use glam::DVec3;
use smallvec::SmallVec;

use crate::accumulator::ScalarReducer;
use crate::bounds::Bounds;

/// Value carried by a sample.
#[derive(Clone, Debug, PartialEq)]
pub enum SampleValue {
  Scalar(f64),
  /// Multi-component value, reduced to a scalar before accumulation.
  Vector(SmallVec<[f64; 4]>),
}

impl SampleValue {
  /// A vector without components.
  pub fn is_empty(&self) -> bool {
    matches!(self, Self::Vector(components) if components.is_empty())
  }

  /// Scalar used for accumulation.
  #[inline]
  pub fn reduce(&self, reducer: ScalarReducer) -> f64 {
    match self {
      Self::Scalar(v) => *v,
      Self::Vector(components) => reducer.reduce(components),
    }
  }
}

impl From<f64> for SampleValue {
  fn from(value: f64) -> Self {
    Self::Scalar(value)
  }
}

/// One input sample: position, value and weight.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
  pub position: DVec3,
  pub value: SampleValue,
  /// Non-negative, finite. Defaults to 1.
  pub weight: f64,
}

impl Sample {
  /// Unit-weight scalar sample.
  pub fn scalar(position: DVec3, value: f64) -> Self {
    Self {
      position,
      value: SampleValue::Scalar(value),
      weight: 1.0,
    }
  }

  /// Unit-weight vector sample.
  ///
  /// A sample without components is a domain violation when resampled.
  pub fn vector(position: DVec3, components: &[f64]) -> Self {
    Self {
      position,
      value: SampleValue::Vector(SmallVec::from_slice(components)),
      weight: 1.0,
    }
  }

  #[must_use]
  pub fn with_weight(mut self, weight: f64) -> Self {
    self.weight = weight;
    self
  }
}

/// Input geometry used to keep cells that real geometry passes through from
/// being masked.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
  Point(DVec3),
  Segment(DVec3, DVec3),
  Triangle(DVec3, DVec3, DVec3),
  /// Solid axis-aligned box.
  Box(Bounds),
}

impl Primitive {
  pub fn bounds(&self) -> Bounds {
    match *self {
      Self::Point(p) => Bounds::from_point(p),
      Self::Segment(a, b) => Bounds::from_point(a).including(b),
      Self::Triangle(a, b, c) => Bounds::from_point(a).including(b).including(c),
      Self::Box(bounds) => bounds,
    }
  }

  /// Euclidean distance from `point` to the primitive.
  pub fn distance(&self, point: DVec3) -> f64 {
    match *self {
      Self::Point(p) => p.distance(point),
      Self::Segment(a, b) => closest_on_segment(point, a, b).distance(point),
      Self::Triangle(a, b, c) => closest_on_triangle(point, a, b, c).distance(point),
      Self::Box(bounds) => bounds.distance_to_point(point),
    }
  }
}

fn closest_on_segment(p: DVec3, a: DVec3, b: DVec3) -> DVec3 {
  let ab = b - a;
  let length_sq = ab.length_squared();
  if length_sq == 0.0 {
    return a;
  }
  let t = ((p - a).dot(ab) / length_sq).clamp(0.0, 1.0);
  a + ab * t
}

/// Closest point on triangle `abc` by Voronoi region classification.
fn closest_on_triangle(p: DVec3, a: DVec3, b: DVec3, c: DVec3) -> DVec3 {
  let ab = b - a;
  let ac = c - a;
  let ap = p - a;

  let d1 = ab.dot(ap);
  let d2 = ac.dot(ap);
  if d1 <= 0.0 && d2 <= 0.0 {
    return a;
  }

  let bp = p - b;
  let d3 = ab.dot(bp);
  let d4 = ac.dot(bp);
  if d3 >= 0.0 && d4 <= d3 {
    return b;
  }

  let vc = d1 * d4 - d3 * d2;
  if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
    return closest_on_segment(p, a, b);
  }

  let cp = p - c;
  let d5 = ab.dot(cp);
  let d6 = ac.dot(cp);
  if d6 >= 0.0 && d5 <= d6 {
    return c;
  }

  let vb = d5 * d2 - d1 * d6;
  if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
    return closest_on_segment(p, a, c);
  }

  let va = d3 * d6 - d5 * d4;
  if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
    return closest_on_segment(p, b, c);
  }

  let denom = va + vb + vc;
  if denom == 0.0 {
    // Degenerate (collinear) triangle: nearest of its three edges.
    return [
      closest_on_segment(p, a, b),
      closest_on_segment(p, b, c),
      closest_on_segment(p, a, c),
    ]
    .into_iter()
    .min_by(|x, y| x.distance_squared(p).total_cmp(&y.distance_squared(p)))
    .unwrap_or(a);
  }
  let v = vb / denom;
  let w = vc / denom;
  a + ab * v + ac * w
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
