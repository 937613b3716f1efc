use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::*;

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
  (a - b).abs() <= epsilon * (1.0 + a.abs().max(b.abs()))
}

fn all_variants() -> Vec<Accumulator> {
  vec![
    Accumulator::arithmetic_sum(),
    Accumulator::squared_sum(),
    Accumulator::inverse_sum(),
    Accumulator::entropy_sum(),
    Accumulator::geometric_product(),
    Accumulator::max(),
    Accumulator::min(),
    Accumulator::quantile(50.0),
    Accumulator::quantile(90.0),
    Accumulator::bins(0.5, BinFunction::EntropyTerm),
    Accumulator::bins(0.25, BinFunction::Square),
  ]
}

fn feed(template: &Accumulator, samples: &[(f64, f64)]) -> Accumulator {
  let mut acc = template.clone();
  for &(value, weight) in samples {
    acc.add(value, weight).expect("sample in domain");
  }
  acc
}

// =========================================================================
// Merge associativity
// =========================================================================

/// Same multiset, different orderings and groupings, same value.
#[test]
fn test_merge_associativity_all_variants() {
  let mut rng = StdRng::seed_from_u64(7);
  let samples: Vec<(f64, f64)> = (0..64)
    .map(|_| (rng.random_range(0.1..10.0), rng.random_range(0.5..2.0)))
    .collect();

  for template in all_variants() {
    let sequential = feed(&template, &samples);

    // ((A + B) + C) with a shuffled order
    let mut shuffled = samples.clone();
    shuffled.shuffle(&mut rng);
    let (a, rest) = shuffled.split_at(10);
    let (b, c) = rest.split_at(30);
    let mut left = feed(&template, a);
    left.merge(&feed(&template, b)).unwrap();
    left.merge(&feed(&template, c)).unwrap();

    // (C + (B + A))
    let mut inner = feed(&template, b);
    inner.merge(&feed(&template, a)).unwrap();
    let mut right = feed(&template, c);
    right.merge(&inner).unwrap();

    assert!(
      approx_eq(sequential.value(), left.value(), 1e-9),
      "{:?}: sequential {} vs left-grouped {}",
      template.kind(),
      sequential.value(),
      left.value()
    );
    assert!(
      approx_eq(sequential.value(), right.value(), 1e-9),
      "{:?}: sequential {} vs right-grouped {}",
      template.kind(),
      sequential.value(),
      right.value()
    );
  }
}

/// Merging into or from an empty accumulator is the identity.
#[test]
fn test_merge_with_empty_is_identity() {
  let samples = [(1.5, 1.0), (2.5, 2.0), (4.0, 1.0)];
  for template in all_variants() {
    let full = feed(&template, &samples);

    let mut into_full = full.clone();
    into_full.merge(&template).unwrap();
    assert!(approx_eq(full.value(), into_full.value(), 1e-12), "{:?}", template.kind());

    let mut into_empty = template.clone();
    into_empty.merge(&full).unwrap();
    assert!(approx_eq(full.value(), into_empty.value(), 1e-12), "{:?}", template.kind());
  }
}

// =========================================================================
// Parameter checks
// =========================================================================

#[test]
fn test_merge_different_variants_is_mismatch() {
  let mut sum = Accumulator::arithmetic_sum();
  let max = Accumulator::max();

  assert!(!sum.has_same_parameters(&max));
  assert!(matches!(
    sum.merge(&max),
    Err(ResampleError::ConfigurationMismatch { .. })
  ));
}

#[test]
fn test_merge_different_parameters_is_mismatch() {
  let mut median = Accumulator::quantile(50.0);
  let p90 = Accumulator::quantile(90.0);
  assert!(!median.has_same_parameters(&p90));
  assert!(median.merge(&p90).is_err());

  let mut coarse = Accumulator::bins(1.0, BinFunction::EntropyTerm);
  let fine = Accumulator::bins(0.5, BinFunction::EntropyTerm);
  let squared = Accumulator::bins(1.0, BinFunction::Square);
  assert!(coarse.merge(&fine).is_err());
  assert!(coarse.merge(&squared).is_err());
  assert!(coarse.has_same_parameters(&Accumulator::bins(1.0, BinFunction::EntropyTerm)));
}

#[test]
fn test_every_variant_matches_itself() {
  for acc in all_variants() {
    assert!(acc.has_same_parameters(&acc.clone()), "{:?}", acc.kind());
  }
}

// =========================================================================
// Domain, reset, reducers
// =========================================================================

#[test]
fn test_domain_violation_leaves_state_untouched() {
  let mut acc = Accumulator::geometric_product();
  acc.add(2.0, 1.0).unwrap();
  let before = acc.clone();

  let err = acc.add(-1.0, 1.0).unwrap_err();
  assert!(matches!(err, ResampleError::DomainViolation { .. }));
  assert_eq!(acc, before);
}

#[test]
fn test_reset_returns_to_initial_state() {
  for template in all_variants() {
    let mut acc = feed(&template, &[(1.0, 1.0), (3.0, 2.0)]);
    acc.reset();
    assert_eq!(acc, template, "{:?} did not reset", template.kind());
  }
}

#[test]
fn test_kind_tags() {
  assert_eq!(Accumulator::arithmetic_sum().kind(), AccumulatorKind::ArithmeticSum);
  assert_eq!(Accumulator::squared_sum().kind(), AccumulatorKind::SquaredSum);
  assert_eq!(Accumulator::inverse_sum().kind(), AccumulatorKind::InverseSum);
  assert_eq!(Accumulator::entropy_sum().kind(), AccumulatorKind::EntropySum);
  assert_eq!(Accumulator::geometric_product().kind(), AccumulatorKind::GeometricProduct);
  assert_eq!(Accumulator::max().kind(), AccumulatorKind::Max);
  assert_eq!(Accumulator::min().kind(), AccumulatorKind::Min);
  assert_eq!(Accumulator::quantile(10.0).kind(), AccumulatorKind::Quantile);
  assert_eq!(Accumulator::bins(1.0, BinFunction::Identity).kind(), AccumulatorKind::Bins);
}

#[test]
fn test_reducers() {
  let v = [3.0, -4.0];
  assert_eq!(ScalarReducer::EuclideanNorm.reduce(&v), 5.0);
  assert_eq!(ScalarReducer::MaxAbs.reduce(&v), 4.0);
  assert_eq!(ScalarReducer::Sum.reduce(&v), -1.0);
  assert_eq!(ScalarReducer::FirstComponent.reduce(&v), 3.0);

  // Scalars pass through untouched, even negative ones under a norm
  assert_eq!(ScalarReducer::EuclideanNorm.reduce(&[-2.0]), -2.0);
  assert_eq!(ScalarReducer::default(), ScalarReducer::EuclideanNorm);
}

#[test]
fn test_empty_components_are_rejected() {
  assert!(ScalarReducer::Sum.reduce(&[]).is_nan());

  let mut acc = Accumulator::arithmetic_sum();
  let err = acc.add_components(&[], 1.0, ScalarReducer::EuclideanNorm).unwrap_err();
  assert!(matches!(err, ResampleError::DomainViolation { .. }));
  assert_eq!(acc.value(), 0.0);
}

#[test]
fn test_add_components_uses_reducer() {
  let mut acc = Accumulator::arithmetic_sum();
  acc
    .add_components(&[0.0, 3.0, 4.0], 2.0, ScalarReducer::EuclideanNorm)
    .unwrap();
  assert_eq!(acc.value(), 10.0);
}
