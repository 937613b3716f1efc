use super::*;
use crate::error::ResampleError;
use crate::measurement::ArrayMeasurement;

fn config() -> ResampleConfig {
  ResampleConfig::default()
    .with_primary(ArrayMeasurement::GeometricMean)
    .with_secondary(Some(ArrayMeasurement::Max))
}

#[test]
fn test_new_element_is_finest_leaf() {
  let element = GridElement::new(&config());
  assert_eq!(element.sample_count, 0);
  assert_eq!(element.leaf_count, 1);
  assert_eq!(element.primary.len(), 1);
  assert_eq!(element.secondary.len(), 1);
  assert!(!element.can_subdivide);
  assert!(element.children_subtree_fully_unmasked);

  let plain = GridElement::new(&ResampleConfig::default());
  assert!(plain.secondary.is_empty());
}

#[test]
fn test_add_sample_updates_totals() {
  let mut element = GridElement::new(&config());
  element.add_sample(2.0, 1.0).unwrap();
  element.add_sample(8.0, 1.0).unwrap();
  assert_eq!(element.sample_count, 2);
  assert_eq!(element.accumulated_weight, 2.0);
  assert_eq!(element.secondary[0].value(), 8.0);

  let mean = ArrayMeasurement::GeometricMean
    .measure(&element.primary, element.sample_count, element.accumulated_weight)
    .unwrap();
  assert!((mean - 4.0).abs() < 1e-12);
}

/// A value the geometric product rejects must not reach the max either.
#[test]
fn test_rejected_sample_leaves_element_untouched() {
  let mut element = GridElement::new(&config());
  element.add_sample(3.0, 1.0).unwrap();
  let before = element.clone();

  let err = element.add_sample(-5.0, 1.0).unwrap_err();
  assert!(matches!(err, ResampleError::DomainViolation { .. }));
  assert_eq!(element, before);
}

#[test]
fn test_roll_up_bookkeeping() {
  let config = ResampleConfig::default();
  let mut a = GridElement::new(&config);
  a.add_sample(1.0, 1.0).unwrap();
  let mut b = GridElement::new(&config);
  b.add_sample(3.0, 2.0).unwrap();

  let mut parent = GridElement::from_child(&a, true);
  parent.absorb_child(&b, false).unwrap();
  parent.finish_roll_up(8);

  assert_eq!(parent.sample_count, 2);
  assert_eq!(parent.accumulated_weight, 3.0);
  assert_eq!(parent.leaf_count, 2);
  assert_eq!(parent.non_masked_child_count, 2);
  assert!(!parent.can_subdivide, "one ineligible child blocks subdivision");
  assert!(!parent.children_subtree_fully_unmasked, "six children are missing");
  assert_eq!(parent.primary[0].value(), 7.0);
}

#[test]
fn test_fully_unmasked_requires_every_child() {
  let config = ResampleConfig::default();
  let mut child = GridElement::new(&config);
  child.add_sample(1.0, 1.0).unwrap();

  let mut parent = GridElement::from_child(&child, true);
  for _ in 1..8 {
    parent.absorb_child(&child, true).unwrap();
  }
  parent.finish_roll_up(8);
  assert!(parent.can_subdivide);
  assert!(parent.children_subtree_fully_unmasked);
  assert_eq!(parent.leaf_count, 8);
}

#[test]
fn test_absorb_mismatched_child() {
  let mut parent = GridElement::from_child(&GridElement::new(&ResampleConfig::default()), true);
  let other = GridElement::new(&ResampleConfig::default().with_primary(ArrayMeasurement::Max));
  assert!(matches!(
    parent.absorb_child(&other, true),
    Err(ResampleError::ConfigurationMismatch { .. })
  ));
}
