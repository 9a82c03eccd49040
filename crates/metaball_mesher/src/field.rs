//! Scalar field sampling.
//!
//! `value(p) = threshold - Σ density(e, p)`, summed over elements whose box
//! contains `p`. The surface is the zero set; the filled region, where the
//! summed density exceeds the threshold, is negative.

use glam::Vec3A;

use crate::bvh::Bvh;

/// Samples the combined field through a [`Bvh`].
///
/// Holds the traversal scratch queue and counts every evaluation.
pub struct FieldSampler<'a> {
  bvh: &'a Bvh,
  threshold: f32,
  queue: Vec<u32>,
  evaluations: usize,
}

impl<'a> FieldSampler<'a> {
  pub fn new(bvh: &'a Bvh, threshold: f32) -> Self {
    Self {
      bvh,
      threshold,
      queue: Vec::with_capacity(bvh.node_count()),
      evaluations: 0,
    }
  }

  /// Field value at a world-space point.
  #[inline]
  pub fn sample(&mut self, point: Vec3A) -> f32 {
    self.evaluations += 1;
    self.threshold - self.bvh.density(point, &mut self.queue)
  }

  #[inline]
  pub fn threshold(&self) -> f32 {
    self.threshold
  }

  #[inline]
  pub fn bvh(&self) -> &'a Bvh {
    self.bvh
  }

  /// Number of `sample` calls so far.
  #[inline]
  pub fn evaluations(&self) -> usize {
    self.evaluations
  }
}
