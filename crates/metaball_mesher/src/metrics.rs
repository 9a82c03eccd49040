//! Polygonizer statistics.
//!
//! [`RunStats`] is filled by every run and costs a handful of counter
//! increments. [`PolygonizerMetrics`] aggregates runs over time; it is
//! feature-gated and runtime-toggled so it costs nothing when disabled.
//!
//! # Usage
//!
//! ```ignore
//! use metaball_mesher::metrics::{PolygonizerMetrics, COLLECT_METRICS};
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! let (mesh, stats) = polygonize_with_stats(&elements, &config);
//! metrics.record_run(&stats);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;

/// Runtime toggle for metrics collection.
/// Set to false to disable metrics gathering at runtime.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// What a single polygonize run did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
  /// Elements passed in by the caller.
  pub elements_supplied: usize,
  /// Elements that survived preparation (not hidden, not degenerate).
  pub elements_prepared: usize,
  /// BVH internal nodes.
  pub bvh_nodes: usize,
  /// Cubes queued by the seed finder.
  pub seeds: usize,
  /// Cubes popped and polygonized by the tracker.
  pub cubes_visited: usize,
  /// Distinct lattice corners sampled.
  pub corners_cached: usize,
  /// Field evaluations spent on lattice corners.
  pub corner_evaluations: usize,
  /// Field evaluations spent refining edge crossings.
  pub bisection_evaluations: usize,
  pub vertices: usize,
  pub polygons: usize,
  /// Wall time of the run in microseconds.
  pub elapsed_us: u64,
}

impl RunStats {
  /// All field evaluations of the run.
  pub fn field_evaluations(&self) -> usize {
    self.corner_evaluations + self.bisection_evaluations
  }
}

/// Fixed-capacity window over the most recent samples.
#[derive(Debug, Clone)]
pub struct RollingWindow {
  buffer: VecDeque<u64>,
  capacity: usize,
}

impl RollingWindow {
  pub fn new(capacity: usize) -> Self {
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  /// Push a new value, evicting the oldest if at capacity.
  pub fn push(&mut self, value: u64) {
    if self.buffer.len() >= self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value);
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
  }

  /// Mean of the samples in the window, 0 when empty.
  pub fn average(&self) -> f64 {
    if self.buffer.is_empty() {
      return 0.0;
    }
    let sum: u64 = self.buffer.iter().sum();
    sum as f64 / self.buffer.len() as f64
  }
}

/// Aggregated statistics over many polygonize runs.
#[derive(Debug, Clone)]
pub struct PolygonizerMetrics {
  /// Rolling window of run times in microseconds.
  pub run_timings: RollingWindow,
  /// Rolling window of field evaluations per run.
  pub evaluations: RollingWindow,

  pub last_run_us: u64,
  pub total_runs: u64,
  /// Runs that produced no surface.
  pub empty_runs: u64,
  pub total_vertices: u64,
  pub total_polygons: u64,
  pub total_cubes: u64,
}

impl Default for PolygonizerMetrics {
  fn default() -> Self {
    Self {
      run_timings: RollingWindow::new(128),
      evaluations: RollingWindow::new(128),
      last_run_us: 0,
      total_runs: 0,
      empty_runs: 0,
      total_vertices: 0,
      total_polygons: 0,
      total_cubes: 0,
    }
  }
}

impl PolygonizerMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reset the rolling windows. Totals are cumulative and survive.
  pub fn reset(&mut self) {
    self.run_timings.clear();
    self.evaluations.clear();
    self.last_run_us = 0;
  }

  /// Record one run.
  pub fn record_run(&mut self, stats: &RunStats) {
    if !is_enabled() {
      return;
    }

    self.run_timings.push(stats.elapsed_us);
    self.evaluations.push(stats.field_evaluations() as u64);
    self.last_run_us = stats.elapsed_us;

    self.total_runs += 1;
    if stats.polygons == 0 {
      self.empty_runs += 1;
    }
    self.total_vertices += stats.vertices as u64;
    self.total_polygons += stats.polygons as u64;
    self.total_cubes += stats.cubes_visited as u64;
  }

  /// Average run time in microseconds.
  pub fn avg_run_timing_us(&self) -> f64 {
    self.run_timings.average()
  }

  /// Average field evaluations per run.
  pub fn avg_evaluations(&self) -> f64 {
    self.evaluations.average()
  }

  /// Average polygons per non-empty run.
  pub fn avg_polygons(&self) -> f64 {
    let meshed = self.total_runs - self.empty_runs;
    if meshed == 0 {
      0.0
    } else {
      self.total_polygons as f64 / meshed as f64
    }
  }
}
