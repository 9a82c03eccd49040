//! Output mesh accumulation.
//!
//! Vertices are appended as edges are resolved; polygons are appended as
//! edge loops are emitted. A loop of `n` vertices becomes a fan around its
//! first vertex:
//!
//! ```text
//! n = 3   triangle (0 1 2)
//! n = 4   quad     (0 1 2 3)
//! n = 5   quad     (0 1 2 3) + triangle (0 3 4)
//! n = 6   quad     (0 1 2 3) + quad     (0 3 4 5)
//! n = 7   quad     (0 1 2 3) + quad     (0 3 4 5) + triangle (0 5 6)
//! ```

use glam::Vec3A;

use super::normals;
use crate::types::{Aabb, MeshOutput, Polygon};

#[derive(Default)]
pub struct MeshBuilder {
  positions: Vec<Vec3A>,
  /// Unnormalized angle-weighted sums.
  normals: Vec<Vec3A>,
  polygons: Vec<Polygon>,
}

impl MeshBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a vertex with an empty normal accumulator.
  #[inline]
  pub fn add_vertex(&mut self, position: Vec3A) -> u32 {
    let id = self.positions.len() as u32;
    self.positions.push(position);
    self.normals.push(Vec3A::ZERO);
    id
  }

  pub fn vertex_count(&self) -> usize {
    self.positions.len()
  }

  pub fn polygon_count(&self) -> usize {
    self.polygons.len()
  }

  /// Emit the polygons of one closed vertex loop.
  pub fn emit_loop(&mut self, ids: &[u32]) {
    let n = ids.len();
    debug_assert!((3..=7).contains(&n), "edge loop of {} vertices", n);

    if n == 3 {
      self.push(Polygon::Triangle([ids[0], ids[1], ids[2]]));
      return;
    }

    self.push(Polygon::Quad([ids[0], ids[1], ids[2], ids[3]]));
    let mut s = 3;
    while s + 2 < n {
      self.push(Polygon::Quad([ids[0], ids[s], ids[s + 1], ids[s + 2]]));
      s += 2;
    }
    if s + 1 < n {
      self.push(Polygon::Triangle([ids[0], ids[s], ids[s + 1]]));
    }
  }

  fn push(&mut self, polygon: Polygon) {
    normals::accumulate(&self.positions, &mut self.normals, polygon.indices());
    self.polygons.push(polygon);
  }

  /// Normalize normals and hand out the mesh. `None` if nothing was emitted.
  pub fn finish(mut self) -> Option<MeshOutput> {
    if self.polygons.is_empty() {
      return None;
    }

    normals::normalize(&mut self.normals);

    let mut bounds = Aabb::empty();
    for &position in &self.positions {
      bounds.encapsulate(position);
    }

    Some(MeshOutput {
      positions: self.positions.iter().map(|p| p.to_array()).collect(),
      normals: self.normals.iter().map(|n| n.to_array()).collect(),
      polygons: self.polygons,
      bounds,
    })
  }
}

#[cfg(test)]
#[path = "mesh_builder_test.rs"]
mod mesh_builder_test;
