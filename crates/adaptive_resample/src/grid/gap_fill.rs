//! "No empty cells" pass.
//!
//! A node that subdivides emits a masked child for every child cell without
//! samples. When input geometry passes through such a child, the hole would
//! hide real geometry, so the parent is kept from subdividing instead.
//!
//! Geometry reaches a cell when the primitive comes within the cell's
//! bounding sphere. The test is refined `gap_refinement_levels` levels
//! deeper: at least one sub-cell must pass it too.

use super::cell::GridCell;
use super::layout::GridLayout;
use super::pyramid::MultiResolutionGrid;
use crate::bounds::Bounds;
use crate::config::ResampleConfig;
use crate::types::Primitive;

/// Whether `primitive` reaches `cell`, refined `levels` levels deeper.
fn reaches(primitive: &Primitive, layout: &GridLayout, tree: usize, cell: GridCell, levels: u32) -> bool {
  let bounds = layout.cell_bounds(tree, cell);
  if primitive.distance(bounds.center()) > bounds.half_diagonal() {
    return false;
  }
  if levels == 0 {
    return true;
  }
  cell
    .children(layout.branch_factor)
    .any(|child| reaches(primitive, layout, tree, child, levels - 1))
}

/// Mark the cells of one primitive's path whose subdivision would mask it.
fn protect_primitive(
  grid: &mut MultiResolutionGrid,
  layout: &GridLayout,
  tree: usize,
  primitive: &Primitive,
  primitive_bounds: &Bounds,
  config: &ResampleConfig,
) -> usize {
  let branch_factor = config.branch_factor;
  let mut protected = 0;
  let mut stack = vec![GridCell::root()];
  let mut occupied = Vec::with_capacity(config.children_per_node());

  while let Some(cell) = stack.pop() {
    let Some(element) = grid.get(cell) else {
      continue;
    };
    // A leaf-bound cell masks nothing, a complete subtree has no holes.
    if cell.depth >= config.max_depth || !element.can_subdivide || element.children_subtree_fully_unmasked {
      continue;
    }

    occupied.clear();
    let mut gap = false;
    for child in cell.children(branch_factor) {
      if !layout.cell_bounds(tree, child).overlaps(primitive_bounds) {
        continue;
      }
      if grid.contains(child) {
        occupied.push(child);
      } else if reaches(primitive, layout, tree, child, config.gap_refinement_levels) {
        gap = true;
        break;
      }
    }

    if gap {
      if let Some(element) = grid.get_mut(cell) {
        element.can_subdivide = false;
        protected += 1;
      }
    } else {
      stack.extend(occupied.iter().copied());
    }
  }
  protected
}

/// Keep cells that input geometry passes through from being masked.
///
/// Returns the number of cells whose subdivision was disabled.
pub fn protect_gaps(
  grid: &mut MultiResolutionGrid,
  layout: &GridLayout,
  tree: usize,
  primitives: &[Primitive],
  config: &ResampleConfig,
) -> usize {
  let _span = tracing::info_span!("protect_gaps", tree, primitives = primitives.len()).entered();

  let tree_bounds = layout.tree_bounds(tree);
  primitives
    .iter()
    .filter_map(|primitive| {
      let bounds = primitive.bounds();
      bounds.overlaps(&tree_bounds).then_some((primitive, bounds))
    })
    .map(|(primitive, bounds)| protect_primitive(grid, layout, tree, primitive, &bounds, config))
    .sum()
}

#[cfg(test)]
#[path = "gap_fill_test.rs"]
mod gap_fill_test;
