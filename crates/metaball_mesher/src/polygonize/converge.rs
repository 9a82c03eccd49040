//! Vertex solver: one vertex per crossing lattice edge.

use glam::Vec3A;

use super::Process;
use crate::cache::{CornerSample, EdgeKey};
use crate::field::FieldSampler;

/// Locate the surface crossing between two corners of opposite sign.
///
/// Bisects `iterations` times, keeping the positive endpoint on one side
/// and the non-positive endpoint on the other, then finishes with one
/// linear interpolation between the final endpoints.
pub fn converge(a: &CornerSample, b: &CornerSample, iterations: u32, sampler: &mut FieldSampler) -> Vec3A {
  let (mut high, mut high_value, mut low, mut low_value) = if a.value < b.value {
    (b.position, b.value, a.position, a.value)
  } else {
    (a.position, a.value, b.position, b.value)
  };

  for _ in 0..iterations {
    let mid = (high + low) * 0.5;
    let value = sampler.sample(mid);
    if value > 0.0 {
      high = mid;
      high_value = value;
    } else {
      low = mid;
      low_value = value;
    }
  }

  let denominator = low_value - high_value;
  let t = if denominator != 0.0 {
    -high_value / denominator
  } else {
    0.5
  };
  high.lerp(low, t)
}

impl Process<'_> {
  /// Vertex id for the edge between two cube corners, solving it on first
  /// use.
  pub(crate) fn vertex_id(&mut self, a: &CornerSample, b: &CornerSample) -> u32 {
    let key = EdgeKey::new(a.coord, b.coord);
    if let Some(id) = self.cache.edge_vertex(key) {
      return id;
    }

    let before = self.sampler.evaluations();
    let position = converge(a, b, self.config.bisection_iterations, &mut self.sampler);
    self.bisection_evaluations += self.sampler.evaluations() - before;

    let id = self.mesh.add_vertex(position);
    self.cache.set_edge_vertex(key, id);
    id
  }
}

#[cfg(test)]
#[path = "converge_test.rs"]
mod converge_test;
