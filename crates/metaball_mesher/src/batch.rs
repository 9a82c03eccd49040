//! Batch polygonization.
//!
//! Runs independent jobs (one metaball object each) in parallel. Each job is
//! still an ordinary single-threaded run with its own scratch state; jobs
//! share nothing but the immutable case table.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │ Batch                                                                   │
//! │                                                                         │
//! │  PolygonizeJob { id, elements, config }                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────┐            │
//! │  │ polygonize_with_stats(&elements, &config)               │            │
//! │  │ → (Option<MeshOutput>, RunStats)                        │            │
//! │  └─────────────────────────────────────────────────────────┘            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  JobResult { id, output, stats, timing_us }                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use web_time::Instant;

use rayon::prelude::*;

use crate::element::MetaElement;
use crate::metrics::{PolygonizerMetrics, RunStats};
use crate::polygonize::polygonize_with_stats;
use crate::types::{MeshOutput, PolygonizeConfig};

/// One metaball object to polygonize.
#[derive(Clone, Debug)]
pub struct PolygonizeJob {
  /// Caller-chosen identifier, returned unchanged in the result.
  pub id: u64,
  pub elements: Vec<MetaElement>,
  pub config: PolygonizeConfig,
}

impl PolygonizeJob {
  pub fn new(id: u64, elements: Vec<MetaElement>, config: PolygonizeConfig) -> Self {
    Self { id, elements, config }
  }
}

#[derive(Clone, Debug)]
pub struct JobResult {
  pub id: u64,
  /// `None` when the job produced no surface.
  pub output: Option<MeshOutput>,
  pub stats: RunStats,
  /// Wall time of the whole job in microseconds.
  pub timing_us: u64,
}

/// Polygonize a single job with timing.
pub fn polygonize_job(job: PolygonizeJob) -> JobResult {
  let start = Instant::now();
  let (output, stats) = polygonize_with_stats(&job.elements, &job.config);
  let timing_us = start.elapsed().as_micros() as u64;

  JobResult {
    id: job.id,
    output,
    stats,
    timing_us,
  }
}

/// Polygonize jobs in parallel using rayon.
///
/// Results maintain the same order as inputs for deterministic output.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "polygonize::batch"))]
pub fn polygonize_batch(jobs: Vec<PolygonizeJob>) -> Vec<JobResult> {
  if jobs.is_empty() {
    return Vec::new();
  }

  #[cfg(feature = "tracing")]
  tracing::debug!(jobs = jobs.len(), "polygonizing batch");

  jobs.into_par_iter().map(polygonize_job).collect()
}

/// [`polygonize_batch`], recording every run into `metrics`.
pub fn polygonize_batch_with_metrics(
  jobs: Vec<PolygonizeJob>,
  metrics: &mut PolygonizerMetrics,
) -> Vec<JobResult> {
  let results = polygonize_batch(jobs);
  for result in &results {
    metrics.record_run(&result.stats);
  }
  results
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod batch_test;
