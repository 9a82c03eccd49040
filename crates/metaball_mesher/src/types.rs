//! Core data types shared by the polygonizer stages.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glam::Vec3A;

use crate::error::{PolygonizeError, PolygonizeResult};

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
  /// Minimum corner (inclusive).
  pub min: Vec3A,
  /// Maximum corner (inclusive).
  pub max: Vec3A,
}

impl Aabb {
  /// Create AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: Vec3A::splat(f32::INFINITY),
      max: Vec3A::splat(f32::NEG_INFINITY),
    }
  }

  /// Expand AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: Vec3A) {
    self.min = self.min.min(point);
    self.max = self.max.max(point);
  }

  /// Smallest box containing both boxes.
  #[inline]
  pub fn union(&self, other: &Aabb) -> Aabb {
    Aabb {
      min: self.min.min(other.min),
      max: self.max.max(other.max),
    }
  }

  /// Check if this AABB contains a point (boundary included).
  #[inline]
  pub fn contains_point(&self, point: Vec3A) -> bool {
    point.x >= self.min.x
      && point.x <= self.max.x
      && point.y >= self.min.y
      && point.y <= self.max.y
      && point.z >= self.min.z
      && point.z <= self.max.z
  }

  /// Get the size of the AABB (max - min).
  #[inline]
  pub fn size(&self) -> Vec3A {
    self.max - self.min
  }

  /// Get the center of the AABB.
  #[inline]
  pub fn center(&self) -> Vec3A {
    (self.min + self.max) * 0.5
  }

  /// Index of the longest axis. Ties prefer X, then Y.
  #[inline]
  pub fn longest_axis(&self) -> usize {
    let size = self.size();
    if size.y > size.x && size.y > size.z {
      1
    } else if size.z > size.y && size.z > size.x {
      2
    } else {
      0
    }
  }
}

impl Default for Aabb {
  fn default() -> Self {
    Self::empty()
  }
}

/// One output face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Polygon {
  Triangle([u32; 3]),
  Quad([u32; 4]),
}

impl Polygon {
  /// Vertex indices in winding order (counter-clockwise seen from outside).
  #[inline]
  pub fn indices(&self) -> &[u32] {
    match self {
      Polygon::Triangle(indices) => indices,
      Polygon::Quad(indices) => indices,
    }
  }

  pub fn is_quad(&self) -> bool {
    matches!(self, Polygon::Quad(_))
  }
}

/// Polygonization result.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshOutput {
  /// Vertex positions in world space.
  pub positions: Vec<[f32; 3]>,

  /// Unit vertex normals (parallel to positions), pointing out of the
  /// surface.
  pub normals: Vec<[f32; 3]>,

  /// Faces indexing into `positions`.
  pub polygons: Vec<Polygon>,

  /// Bounding box encompassing all vertices.
  pub bounds: Aabb,
}

impl MeshOutput {
  /// Returns true if no geometry was generated.
  pub fn is_empty(&self) -> bool {
    self.polygons.is_empty()
  }

  pub fn vertex_count(&self) -> usize {
    self.positions.len()
  }

  pub fn polygon_count(&self) -> usize {
    self.polygons.len()
  }

  pub fn triangle_count(&self) -> usize {
    self.polygons.iter().filter(|p| !p.is_quad()).count()
  }

  pub fn quad_count(&self) -> usize {
    self.polygons.iter().filter(|p| p.is_quad()).count()
  }

  /// Total number of polygon corners (face-corner buffer length).
  pub fn corner_count(&self) -> usize {
    self.polygons.iter().map(|p| p.indices().len()).sum()
  }

  /// Flat triangle index buffer for renderers.
  ///
  /// Quads are split along their shorter diagonal; winding is preserved.
  pub fn triangulate(&self) -> Vec<u32> {
    let mut indices = Vec::with_capacity((self.polygons.len() + self.quad_count()) * 3);

    for polygon in &self.polygons {
      match *polygon {
        Polygon::Triangle(tri) => indices.extend_from_slice(&tri),
        Polygon::Quad([a, b, c, d]) => {
          let diag_ac = dist_sq(self.positions[a as usize], self.positions[c as usize]);
          let diag_bd = dist_sq(self.positions[b as usize], self.positions[d as usize]);

          if diag_ac <= diag_bd {
            indices.extend_from_slice(&[a, b, c, a, c, d]);
          } else {
            indices.extend_from_slice(&[a, b, d, b, c, d]);
          }
        }
      }
    }

    indices
  }
}

/// Squared distance between two points.
#[inline(always)]
fn dist_sq(a: [f32; 3], b: [f32; 3]) -> f32 {
  Vec3A::from_array(a).distance_squared(Vec3A::from_array(b))
}

/// Default bisection iterations for a threshold.
///
/// Small thresholds put the surface far out on the falloff tail where the
/// field is flat, so they get more iterations.
pub fn bisection_iterations_for(threshold: f32) -> u32 {
  if threshold < 0.001 {
    16
  } else if threshold < 0.01 {
    8
  } else if threshold < 0.1 {
    4
  } else {
    2
  }
}

/// Configuration for one polygonization run.
#[derive(Clone, Debug)]
pub struct PolygonizeConfig {
  /// Iso-value of the summed density.
  pub threshold: f32,

  /// Lattice spacing in world units.
  pub cell_size: f32,

  /// Bisection steps per edge crossing before the final linear step.
  pub bisection_iterations: u32,

  /// Cooperative cancel flag, polled during the run.
  pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for PolygonizeConfig {
  fn default() -> Self {
    Self::new(0.6, 0.2)
  }
}

impl PolygonizeConfig {
  /// Config with bisection iterations picked from the threshold tier.
  pub fn new(threshold: f32, cell_size: f32) -> Self {
    Self {
      threshold,
      cell_size,
      bisection_iterations: bisection_iterations_for(threshold),
      cancel: None,
    }
  }

  /// Set the threshold and re-pick the bisection tier.
  pub fn with_threshold(mut self, threshold: f32) -> Self {
    self.threshold = threshold;
    self.bisection_iterations = bisection_iterations_for(threshold);
    self
  }

  pub fn with_cell_size(mut self, cell_size: f32) -> Self {
    self.cell_size = cell_size;
    self
  }

  pub fn with_bisection_iterations(mut self, iterations: u32) -> Self {
    self.bisection_iterations = iterations;
    self
  }

  pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
    self.cancel = Some(cancel);
    self
  }

  /// Check that the config describes a usable lattice.
  pub fn validate(&self) -> PolygonizeResult<()> {
    if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
      return Err(PolygonizeError::InvalidCellSize(self.cell_size));
    }
    if !self.threshold.is_finite() {
      return Err(PolygonizeError::InvalidThreshold(self.threshold));
    }
    Ok(())
  }

  /// True once the caller raised the cancel flag.
  #[inline]
  pub fn is_cancelled(&self) -> bool {
    self
      .cancel
      .as_ref()
      .is_some_and(|flag| flag.load(Ordering::Relaxed))
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
