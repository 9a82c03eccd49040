//! Test utilities shared by the polygonizer tests.
//!
//! Provides element fixtures and mesh-analysis helpers (edge incidence,
//! connected components, enclosed volume, concavity).

use std::collections::HashMap;

use glam::{Vec3, Vec3A};

use crate::element::MetaElement;
use crate::types::{MeshOutput, PolygonizeConfig};

// =============================================================================
// Fixtures
// =============================================================================

/// Radius 1, stiffness 1 ball at the origin.
pub fn unit_ball() -> MetaElement {
  MetaElement::ball(Vec3::ZERO, 1.0).with_stiffness(1.0)
}

/// Threshold 0.6, cell 0.2.
pub fn reference_config() -> PolygonizeConfig {
  PolygonizeConfig::new(0.6, 0.2)
}

/// Two unit balls on the X axis at `±offset`.
pub fn ball_pair(offset: f32) -> Vec<MetaElement> {
  vec![
    MetaElement::ball(Vec3::new(-offset, 0.0, 0.0), 1.0).with_stiffness(1.0),
    MetaElement::ball(Vec3::new(offset, 0.0, 0.0), 1.0).with_stiffness(1.0),
  ]
}

/// Radius 2, stiffness 2 ball with a negative ball pressed into its +Z side.
pub fn dimpled_ball() -> Vec<MetaElement> {
  vec![
    MetaElement::ball(Vec3::ZERO, 2.0).with_stiffness(2.0),
    MetaElement::ball(Vec3::new(0.0, 0.0, 1.3), 1.0).with_stiffness(2.0).negative(),
  ]
}

/// Analytic surface radius of a unit-stiffness ball: (1 - r²/R²)³ = t.
pub fn ball_surface_radius(radius: f32, threshold: f32) -> f32 {
  radius * (1.0 - threshold.powf(1.0 / 3.0)).sqrt()
}

// =============================================================================
// Mesh analysis
// =============================================================================

fn position(mesh: &MeshOutput, index: u32) -> Vec3A {
  Vec3A::from_array(mesh.positions[index as usize])
}

/// How many polygons use each directed edge.
pub fn directed_edge_counts(mesh: &MeshOutput) -> HashMap<(u32, u32), u32> {
  let mut counts = HashMap::new();
  for polygon in &mesh.polygons {
    let indices = polygon.indices();
    for i in 0..indices.len() {
      let edge = (indices[i], indices[(i + 1) % indices.len()]);
      *counts.entry(edge).or_insert(0) += 1;
    }
  }
  counts
}

/// Directed edges that are not matched by exactly one opposite edge.
///
/// Zero for a closed, consistently oriented 2-manifold.
pub fn open_or_flipped_edges(mesh: &MeshOutput) -> usize {
  let counts = directed_edge_counts(mesh);
  counts
    .iter()
    .filter(|(edge, count)| **count != 1 || counts.get(&(edge.1, edge.0)) != Some(&1))
    .count()
}

/// Number of connected components (vertices joined by polygons).
pub fn connected_components(mesh: &MeshOutput) -> usize {
  let mut parent: Vec<u32> = (0..mesh.vertex_count() as u32).collect();

  fn find(parent: &mut [u32], mut x: u32) -> u32 {
    while parent[x as usize] != x {
      parent[x as usize] = parent[parent[x as usize] as usize];
      x = parent[x as usize];
    }
    x
  }

  for polygon in &mesh.polygons {
    let indices = polygon.indices();
    for &other in &indices[1..] {
      let a = find(&mut parent, indices[0]);
      let b = find(&mut parent, other);
      parent[a as usize] = b;
    }
  }

  let mut roots: Vec<u32> = (0..mesh.vertex_count() as u32)
    .map(|v| find(&mut parent, v))
    .collect();
  roots.sort_unstable();
  roots.dedup();
  roots.len()
}

/// Signed enclosed volume (positive when polygons wind outward).
pub fn signed_volume(mesh: &MeshOutput) -> f64 {
  let mut volume = 0.0f64;
  for polygon in &mesh.polygons {
    let indices = polygon.indices();
    let p0 = position(mesh, indices[0]).as_dvec3();
    for i in 1..indices.len() - 1 {
      let p1 = position(mesh, indices[i]).as_dvec3();
      let p2 = position(mesh, indices[i + 1]).as_dvec3();
      volume += p0.dot(p1.cross(p2)) / 6.0;
    }
  }
  volume
}

/// Largest height of any vertex above another vertex's tangent plane.
///
/// Zero (up to noise) for a convex surface; clearly positive once the
/// surface has a dent.
pub fn max_tangent_protrusion(mesh: &MeshOutput) -> f32 {
  let mut best = 0.0f32;
  for (x, n) in mesh.positions.iter().zip(&mesh.normals) {
    let x = Vec3A::from_array(*x);
    let n = Vec3A::from_array(*n);
    for y in &mesh.positions {
      best = best.max(n.dot(Vec3A::from_array(*y) - x));
    }
  }
  best
}

/// Min and max distance of the vertices from `center`.
pub fn radius_range(mesh: &MeshOutput, center: Vec3A) -> (f32, f32) {
  mesh
    .positions
    .iter()
    .map(|p| Vec3A::from_array(*p).distance(center))
    .fold((f32::MAX, f32::MIN), |(lo, hi), r| (lo.min(r), hi.max(r)))
}
