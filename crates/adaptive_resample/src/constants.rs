//! Index bijections and depth limits for branch-factor grids.
//!
//! A cell at depth `d` inside one coarse cell has integer coordinates in
//! `[0, b^d)` per axis, where `b` is the branch factor. Coordinates map to a
//! single `u64` key with X as the major axis and Z as the minor axis:
//!
//! ```text
//! index = (x * r + y) * r + z,   r = b^d
//!
//!   b = 2, d = 1             b = 3, d = 1
//!   0 = (0,0,0)  4 = (1,0,0)  0 = (0,0,0)  9 = (1,0,0)  18 = (2,0,0)
//!   1 = (0,0,1)  5 = (1,0,1)  1 = (0,0,1) 10 = (1,0,1)  ...
//!   2 = (0,1,0)  6 = (1,1,0)  3 = (0,1,0) 12 = (1,1,0)
//!   3 = (0,1,1)  7 = (1,1,1)  ...
//! ```
//!
//! The same layout orders the children of a subdivided node, so child `i`
//! of a node sits at offset `index_to_coord(i, b)` from `parent * b`.

/// Supported branch factors.
pub const BRANCH_FACTORS: [u32; 2] = [2, 3];

/// Deepest level whose `(2^d)^3` key space fits a `u64`.
pub const MAX_DEPTH_BRANCH_2: u32 = 21;

/// Deepest level whose `(3^d)^3` key space fits a `u64`.
pub const MAX_DEPTH_BRANCH_3: u32 = 13;

/// Deepest supported level for `branch_factor`, `None` if unsupported.
#[inline]
pub const fn max_supported_depth(branch_factor: u32) -> Option<u32> {
  match branch_factor {
    2 => Some(MAX_DEPTH_BRANCH_2),
    3 => Some(MAX_DEPTH_BRANCH_3),
    _ => None,
  }
}

/// Cells per axis at `depth`: `branch_factor^depth`.
#[inline]
pub const fn resolution(branch_factor: u32, depth: u32) -> u64 {
  (branch_factor as u64).pow(depth)
}

/// Children per subdivided node: `branch_factor^3`.
#[inline]
pub const fn children_per_node(branch_factor: u32) -> usize {
  (branch_factor as usize).pow(3)
}

/// Convert 3D coordinates to a linear index for a cube of side `resolution`.
#[inline(always)]
pub const fn coord_to_index(x: u64, y: u64, z: u64, resolution: u64) -> u64 {
  (x * resolution + y) * resolution + z
}

/// Convert a linear index back to 3D coordinates.
#[inline(always)]
pub const fn index_to_coord(index: u64, resolution: u64) -> (u64, u64, u64) {
  let z = index % resolution;
  let y = (index / resolution) % resolution;
  let x = index / (resolution * resolution);
  (x, y, z)
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
