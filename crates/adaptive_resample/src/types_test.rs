use super::*;

const EPS: f64 = 1e-12;

#[test]
fn test_sample_constructors() {
  let s = Sample::scalar(DVec3::ONE, 2.5).with_weight(3.0);
  assert_eq!(s.value, SampleValue::Scalar(2.5));
  assert_eq!(s.weight, 3.0);

  let v = Sample::vector(DVec3::ZERO, &[3.0, 4.0]);
  assert_eq!(v.weight, 1.0);
  assert_eq!(v.value.reduce(ScalarReducer::EuclideanNorm), 5.0);
  assert_eq!(v.value.reduce(ScalarReducer::Sum), 7.0);
  assert_eq!(SampleValue::from(1.5).reduce(ScalarReducer::MaxAbs), 1.5);
}

#[test]
fn test_point_and_box_distance() {
  let p = Primitive::Point(DVec3::new(1.0, 0.0, 0.0));
  assert!((p.distance(DVec3::new(4.0, 4.0, 0.0)) - 5.0).abs() < EPS);

  let b = Primitive::Box(Bounds::new(DVec3::ZERO, DVec3::ONE));
  assert_eq!(b.distance(DVec3::splat(0.5)), 0.0);
  assert!((b.distance(DVec3::new(0.5, 0.5, 3.0)) - 2.0).abs() < EPS);
}

#[test]
fn test_segment_distance() {
  let s = Primitive::Segment(DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0));
  // Interior projection
  assert!((s.distance(DVec3::new(1.0, 1.0, 0.0)) - 1.0).abs() < EPS);
  // Past the end point
  assert!((s.distance(DVec3::new(5.0, 4.0, 0.0)) - 5.0).abs() < EPS);
  // Degenerate segment behaves like a point
  let d = Primitive::Segment(DVec3::ONE, DVec3::ONE);
  assert!((d.distance(DVec3::new(1.0, 1.0, 3.0)) - 2.0).abs() < EPS);
}

#[test]
fn test_triangle_distance_regions() {
  let t = Primitive::Triangle(
    DVec3::ZERO,
    DVec3::new(1.0, 0.0, 0.0),
    DVec3::new(0.0, 1.0, 0.0),
  );

  // Above the face
  assert!((t.distance(DVec3::new(0.25, 0.25, 2.0)) - 2.0).abs() < EPS);
  // Vertex regions
  assert!((t.distance(DVec3::new(-1.0, -1.0, 0.0)) - 2.0_f64.sqrt()).abs() < EPS);
  assert!((t.distance(DVec3::new(3.0, 0.0, 0.0)) - 2.0).abs() < EPS);
  assert!((t.distance(DVec3::new(0.0, 4.0, 0.0)) - 3.0).abs() < EPS);
  // Edge regions
  assert!((t.distance(DVec3::new(0.5, -1.0, 0.0)) - 1.0).abs() < EPS);
  assert!((t.distance(DVec3::new(-2.0, 0.5, 0.0)) - 2.0).abs() < EPS);
  assert!((t.distance(DVec3::new(1.0, 1.0, 0.0)) - 0.5_f64.sqrt()).abs() < EPS);
  // On the face
  assert!(t.distance(DVec3::new(0.2, 0.2, 0.0)).abs() < EPS);
}

#[test]
fn test_primitive_bounds() {
  let t = Primitive::Triangle(
    DVec3::new(0.0, 2.0, 1.0),
    DVec3::new(3.0, -1.0, 1.0),
    DVec3::new(1.0, 0.0, 5.0),
  );
  let bounds = t.bounds();
  assert_eq!(bounds.min, DVec3::new(0.0, -1.0, 1.0));
  assert_eq!(bounds.max, DVec3::new(3.0, 2.0, 5.0));

  assert_eq!(Primitive::Point(DVec3::ONE).bounds().size(), DVec3::ZERO);
}
