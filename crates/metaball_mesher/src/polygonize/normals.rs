//! Vertex normals from polygon geometry.
//!
//! Normals are accumulated while polygons are emitted and normalized once
//! when the mesh is finished. Each polygon adds its unit face normal to
//! every vertex, weighted by the interior angle of the polygon at that
//! vertex ("Mean Weighted by Angle", Thürmer & Wüthrich 1998).
//!
//! ```text
//! Triangle face normal:  (p1 - p0) × (p2 - p0)
//! Quad face normal:      (p0 - p2) × (p1 - p3)   (diagonals, robust to
//!                                                  non-planar quads)
//! ```

use glam::Vec3A;

/// Unit face normal of a triangle or quad, `None` when degenerate.
#[inline]
pub fn face_normal(positions: &[Vec3A], polygon: &[u32]) -> Option<Vec3A> {
  let p = |i: usize| positions[polygon[i] as usize];

  let normal = match polygon.len() {
    3 => (p(1) - p(0)).cross(p(2) - p(0)),
    4 => (p(0) - p(2)).cross(p(1) - p(3)),
    _ => return None,
  };

  normal.try_normalize()
}

/// Add the angle-weighted face normal of `polygon` to its vertices.
pub fn accumulate(positions: &[Vec3A], normals: &mut [Vec3A], polygon: &[u32]) {
  let Some(face) = face_normal(positions, polygon) else {
    return;
  };

  let count = polygon.len();
  for i in 0..count {
    let prev = positions[polygon[(i + count - 1) % count] as usize];
    let here = positions[polygon[i] as usize];
    let next = positions[polygon[(i + 1) % count] as usize];

    let angle = vertex_angle(next - here, prev - here);
    normals[polygon[i] as usize] += face * angle;
  }
}

/// Normalize accumulated normals in place.
///
/// Vertices that received no usable contribution fall back to +Y.
pub fn normalize(normals: &mut [Vec3A]) {
  for normal in normals {
    *normal = normal.try_normalize().unwrap_or(Vec3A::Y);
  }
}

/// Angle in radians between two edge vectors at a vertex.
///
/// Zero when either edge has no usable direction. Both edges are
/// normalized first, so the result does not depend on the mesh scale.
#[inline]
fn vertex_angle(e1: Vec3A, e2: Vec3A) -> f32 {
  let (Some(a), Some(b)) = (e1.try_normalize(), e2.try_normalize()) else {
    return 0.0;
  };

  // Clamp to [-1, 1] to handle floating point errors
  a.dot(b).clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
#[path = "normals_test.rs"]
mod normals_test;
