use super::*;

const EPS: f64 = 1e-12;

#[test]
fn test_arithmetic_sum_is_weighted() {
  let mut acc = SumAccumulator::new(SumKind::Arithmetic);
  acc.add(2.0, 1.0).unwrap();
  acc.add(3.0, 2.0).unwrap();
  assert!((acc.value() - 8.0).abs() < EPS);
}

#[test]
fn test_squared_sum() {
  let mut acc = SumAccumulator::new(SumKind::Squared);
  for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
    acc.add(v, 1.0).unwrap();
  }
  assert!((acc.value() - 55.0).abs() < EPS);
}

#[test]
fn test_inverse_sum_rejects_zero() {
  let mut acc = SumAccumulator::new(SumKind::Inverse);
  acc.add(2.0, 1.0).unwrap();
  acc.add(-4.0, 1.0).unwrap();
  assert!((acc.value() - 0.25).abs() < EPS);

  let err = acc.add(0.0, 1.0).unwrap_err();
  assert!(matches!(
    err,
    ResampleError::DomainViolation { accumulator: "inverse sum", .. }
  ));
  assert!((acc.value() - 0.25).abs() < EPS, "rejected value must not leak in");
}

#[test]
fn test_entropy_sum() {
  let mut acc = SumAccumulator::new(SumKind::Entropy);
  acc.add(std::f64::consts::E, 1.0).unwrap();
  assert!((acc.value() - std::f64::consts::E).abs() < EPS);
  assert!(acc.add(-1.0, 1.0).is_err());
}

#[test]
fn test_entropy_sum_rejects_zero() {
  let mut acc = SumAccumulator::new(SumKind::Entropy);
  acc.add(1.0, 2.0).unwrap();

  let err = acc.add(0.0, 3.0).unwrap_err();
  assert!(matches!(
    err,
    ResampleError::DomainViolation { accumulator: "entropy sum", .. }
  ));
  assert_eq!(acc.value(), 0.0, "1·ln 1 is all that was folded in");
}

/// Thousands of large factors would overflow a plain product; the log sum
/// keeps the geometric mean exact.
#[test]
fn test_geometric_product_does_not_overflow() {
  let mut acc = SumAccumulator::new(SumKind::GeometricProduct);
  for _ in 0..5000 {
    acc.add(1e10, 1.0).unwrap();
  }
  assert!(acc.raw_sum().is_finite());
  let geometric_mean = (acc.raw_sum() / 5000.0).exp();
  assert!((geometric_mean - 1e10).abs() / 1e10 < 1e-9);
  assert!(acc.value().is_infinite(), "the product itself is out of range");
}

#[test]
fn test_geometric_product_rejects_non_positive() {
  let mut acc = SumAccumulator::new(SumKind::GeometricProduct);
  assert!(acc.add(0.0, 1.0).is_err());
  assert!(acc.add(-3.0, 1.0).is_err());
  assert_eq!(acc.value(), 1.0, "empty product");
}

#[test]
fn test_sum_merge_checks_kind() {
  let mut a = SumAccumulator::new(SumKind::Arithmetic);
  let b = SumAccumulator::new(SumKind::Squared);
  assert!(a.merge(&b).is_err());
}

#[test]
fn test_max_starts_at_negative_infinity() {
  let mut acc = ExtremumAccumulator::new(ExtremumKind::Max);
  assert_eq!(acc.value(), f64::NEG_INFINITY);
  acc.add(-5.0, 1.0).unwrap();
  acc.add(-7.0, 100.0).unwrap();
  assert_eq!(acc.value(), -5.0);
}

#[test]
fn test_min_and_merge() {
  let mut a = ExtremumAccumulator::new(ExtremumKind::Min);
  assert_eq!(a.value(), f64::INFINITY);
  a.add(3.0, 1.0).unwrap();

  let mut b = ExtremumAccumulator::new(ExtremumKind::Min);
  b.add(-1.0, 1.0).unwrap();

  a.merge(&b).unwrap();
  assert_eq!(a.value(), -1.0);

  let max = ExtremumAccumulator::new(ExtremumKind::Max);
  assert!(a.merge(&max).is_err());
}

#[test]
fn test_extremum_rejects_nan() {
  let mut acc = ExtremumAccumulator::new(ExtremumKind::Max);
  assert!(acc.add(f64::NAN, 1.0).is_err());
  assert_eq!(acc.value(), f64::NEG_INFINITY);
}
