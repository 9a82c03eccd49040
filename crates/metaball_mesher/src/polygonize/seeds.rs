//! Seed finder: the first cubes known to straddle the surface.
//!
//! For each element, rays of lattice corners are marched from the corner
//! nearest the element's box center in all 26 lattice directions. The first
//! sign change on a ray seeds the cube spanning the two corners. A ray that
//! leaves the element's lattice box without a sign change seeds nothing.
//!
//! ```text
//!       lbn ┌──────────────────┐
//!           │  ↖   ↑   ↗       │
//!           │    ╲ │ ╱         │
//!           │  ← ─ c ─ →  ×    │   × = sign change, seed cube
//!           │    ╱ │ ╲         │
//!           │  ↙   ↓   ↘       │
//!           └──────────────────┘ rtf
//! ```

use glam::{IVec3, Vec3A};

use super::Process;
use crate::types::Aabb;

/// The 26 neighbour directions of a lattice point.
pub const SEED_DIRECTIONS: [IVec3; 26] = seed_directions();

const fn seed_directions() -> [IVec3; 26] {
  let mut directions = [IVec3::ZERO; 26];
  let mut n = 0;
  let mut x = -1;
  while x <= 1 {
    let mut y = -1;
    while y <= 1 {
      let mut z = -1;
      while z <= 1 {
        if x != 0 || y != 0 || z != 0 {
          directions[n] = IVec3::new(x, y, z);
          n += 1;
        }
        z += 1;
      }
      y += 1;
    }
    x += 1;
  }
  directions
}

/// Lattice corner nearest to `point`.
#[inline]
pub fn closest_lattice_point(point: Vec3A, cell_size: f32) -> IVec3 {
  (point / cell_size + Vec3A::ONE).floor().as_ivec3()
}

/// Lattice corner at or below `point` (lower bound of a box).
#[inline]
pub fn prev_lattice_point(point: Vec3A, cell_size: f32) -> IVec3 {
  (point / cell_size + Vec3A::splat(0.5)).floor().as_ivec3()
}

/// Lattice corner at or above `point` (upper bound of a box).
#[inline]
pub fn next_lattice_point(point: Vec3A, cell_size: f32) -> IVec3 {
  (point / cell_size + Vec3A::splat(0.5)).ceil().as_ivec3()
}

/// True when exactly one of the two corner values is positive.
///
/// Classifies corners the same way as the corner code: zero counts as
/// not positive.
#[inline]
pub fn sign_changes(a: f32, b: f32) -> bool {
  (a > 0.0) != (b > 0.0)
}

impl Process<'_> {
  /// Seed the cube stack from every element.
  ///
  /// Returns `false` if the run was cancelled.
  pub(crate) fn find_seeds(&mut self) -> bool {
    let elements = self.sampler.bvh().elements();
    for element in elements {
      if self.config.is_cancelled() {
        return false;
      }
      self.seed_element(element.bounds());
    }
    true
  }

  fn seed_element(&mut self, bounds: &Aabb) {
    let cell_size = self.cache.cell_size();
    let center = closest_lattice_point(bounds.center(), cell_size);
    let lbn = prev_lattice_point(bounds.min, cell_size);
    let rtf = next_lattice_point(bounds.max, cell_size);

    for direction in SEED_DIRECTIONS {
      let mut it = center;
      let mut value = self.corner(it).value;

      loop {
        it += direction;
        let previous = value;
        value = self.corner(it).value;

        if sign_changes(previous, value) {
          if self.add_cube(it.min(it - direction)) {
            self.seeds += 1;
          }
          break;
        }

        let inside = it.cmpgt(lbn).all() && it.cmplt(rtf).all();
        if !inside {
          break;
        }
      }
    }
  }
}

#[cfg(test)]
#[path = "seeds_test.rs"]
mod seeds_test;
