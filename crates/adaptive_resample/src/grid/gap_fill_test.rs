use glam::DVec3;

use super::*;

/// Unit cube, depth 1, every octant occupied except those in `empty`.
fn setup(empty: &[usize], gap_refinement_levels: u32) -> (MultiResolutionGrid, GridLayout, ResampleConfig) {
  let mut config = ResampleConfig::default().with_max_depth(1);
  config.gap_refinement_levels = gap_refinement_levels;
  let layout = GridLayout::new(Bounds::new(DVec3::ZERO, DVec3::ONE), &config);

  let mut grid = MultiResolutionGrid::new(2, 1);
  for (i, cell) in GridCell::root().children(2).enumerate() {
    if !empty.contains(&i) {
      grid.insert_sample(cell, 1.0, 1.0, &config).unwrap();
    }
  }
  grid.roll_up(&config).unwrap();
  (grid, layout, config)
}

fn root_can_subdivide(grid: &MultiResolutionGrid) -> bool {
  grid.get(GridCell::root()).unwrap().can_subdivide
}

#[test]
fn test_geometry_in_empty_child_protects_parent() {
  let (mut grid, layout, config) = setup(&[7], 2);
  let point = [Primitive::Point(DVec3::splat(0.8))];

  assert!(root_can_subdivide(&grid));
  assert_eq!(protect_gaps(&mut grid, &layout, 0, &point, &config), 1);
  assert!(!root_can_subdivide(&grid));
}

#[test]
fn test_geometry_in_occupied_child_changes_nothing() {
  let (mut grid, layout, config) = setup(&[7], 2);
  let point = [Primitive::Point(DVec3::splat(0.2))];
  assert_eq!(protect_gaps(&mut grid, &layout, 0, &point, &config), 0);
  assert!(root_can_subdivide(&grid));
}

/// Overlapping bounding boxes alone are not enough.
#[test]
fn test_bounding_box_overlap_without_contact() {
  let (mut grid, layout, config) = setup(&[7], 2);
  let segment = [Primitive::Segment(DVec3::new(0.0, 0.9, 0.55), DVec3::new(0.9, 0.0, 0.55))];
  assert_eq!(protect_gaps(&mut grid, &layout, 0, &segment, &config), 0);
  assert!(root_can_subdivide(&grid));
}

/// A segment grazing the empty child's bounding sphere but not the child
/// itself is rejected once the test is refined.
#[test]
fn test_refinement_rejects_near_miss() {
  let segment = [Primitive::Segment(DVec3::new(0.36, 0.62, 0.75), DVec3::new(0.62, 0.36, 0.75))];

  let (mut grid, layout, config) = setup(&[7], 0);
  assert_eq!(protect_gaps(&mut grid, &layout, 0, &segment, &config), 1);

  let (mut grid, layout, config) = setup(&[7], 1);
  assert_eq!(protect_gaps(&mut grid, &layout, 0, &segment, &config), 0);
}

#[test]
fn test_complete_subtree_is_skipped() {
  let (mut grid, layout, config) = setup(&[], 2);
  let solid = [Primitive::Box(Bounds::new(DVec3::ZERO, DVec3::ONE))];
  assert_eq!(protect_gaps(&mut grid, &layout, 0, &solid, &config), 0);
  assert!(root_can_subdivide(&grid));
}

#[test]
fn test_primitive_outside_tree_is_ignored() {
  let (mut grid, layout, config) = setup(&[7], 2);
  let far = [Primitive::Point(DVec3::splat(5.0))];
  assert_eq!(protect_gaps(&mut grid, &layout, 0, &far, &config), 0);
}

/// Deeper pyramids protect the nearest ancestor of the hole, not the root.
#[test]
fn test_protects_nearest_ancestor() {
  let config = ResampleConfig::default().with_max_depth(2);
  let layout = GridLayout::new(Bounds::new(DVec3::ZERO, DVec3::ONE), &config);
  let mut grid = MultiResolutionGrid::new(2, 2);
  // Depth-1 cell (0,0,0) gets 7 of its 8 children; every other depth-1 cell
  // gets one sample.
  for (i, cell) in GridCell::new(0, 0, 0, 1).children(2).enumerate() {
    if i != 7 {
      grid.insert_sample(cell, 1.0, 1.0, &config).unwrap();
    }
  }
  for cell in GridCell::root().children(2).skip(1) {
    grid.insert_sample(cell.child(0, 2), 1.0, 1.0, &config).unwrap();
  }
  grid.roll_up(&config).unwrap();

  // Inside the empty depth-2 cell (1,1,1).
  let point = [Primitive::Point(DVec3::splat(0.4))];
  assert_eq!(protect_gaps(&mut grid, &layout, 0, &point, &config), 1);
  assert!(root_can_subdivide(&grid));
  assert!(!grid.get(GridCell::new(0, 0, 0, 1)).unwrap().can_subdivide);
}
