//! Surface-following polygonization of a metaball field.
//!
//! Instead of sweeping a fixed grid, the polygonizer walks the surface:
//! it finds a few cubes that straddle the iso-surface, then grows outward
//! cube by cube through the faces the surface leaves through. Only cubes
//! touching the surface are ever evaluated, so the lattice is unbounded.
//!
//! # Processing Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        INPUT                                    │
//! │  elements: &[MetaElement]  - caller's element descriptions      │
//! │  config: PolygonizeConfig  - threshold, cell size, bisection    │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    PHASE 1: Prepare                             │
//! │    Copy elements, drop degenerate ones, clamp stiffness         │
//! │    Build the BVH over element boxes                             │
//! │    Reject lattices finer than MAX_CELLS_PER_AXIS                │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    PHASE 2: Seeds                               │
//! │  Per element, march 26 directions from the box center           │
//! │  The first sign change on each ray seeds a cube                 │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    PHASE 3: Track                               │
//! │  Pop cube → 8 cached corners → 8-bit code                       │
//! │    Push unvisited neighbours across crossed faces               │
//! │    Per edge loop: resolve one vertex per edge (bisection)       │
//! │    Emit triangle / quad fan, accumulate normals                 │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        OUTPUT                                   │
//! │  positions, unit normals, polygons (3 or 4 corners), bounds     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A run is single-threaded and owns all its scratch memory. Every failure
//! mode (no usable elements, no crossing, cancellation, lattice too fine)
//! is reported as `None`.

pub mod converge;
pub mod corner_mask;
pub mod mesh_builder;
pub mod normals;
pub mod seeds;
pub mod tracker;

use glam::IVec3;
use web_time::Instant;

use crate::bvh::Bvh;
use crate::cache::{CornerSample, VoxelCache};
use crate::constants::MAX_CELLS_PER_AXIS;
use crate::element::{prepare_elements, MetaElement};
use crate::error::PolygonizeResult;
use crate::field::FieldSampler;
use crate::metrics::RunStats;
use crate::types::{MeshOutput, PolygonizeConfig};

use mesh_builder::MeshBuilder;

/// Polygonize the field of `elements`.
///
/// Returns `None` for an invalid configuration, when no element is usable,
/// when the field never crosses the threshold, or when the run was
/// cancelled.
pub fn polygonize(elements: &[MetaElement], config: &PolygonizeConfig) -> Option<MeshOutput> {
  polygonize_with_stats(elements, config).0
}

/// Like [`polygonize`], but reports an invalid configuration as an error.
pub fn try_polygonize(
  elements: &[MetaElement],
  config: &PolygonizeConfig,
) -> PolygonizeResult<Option<MeshOutput>> {
  config.validate()?;
  let mut stats = RunStats::default();
  Ok(run(elements, config, &mut stats))
}

/// Polygonize and report what the run did.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "polygonize::run"))]
pub fn polygonize_with_stats(
  elements: &[MetaElement],
  config: &PolygonizeConfig,
) -> (Option<MeshOutput>, RunStats) {
  let mut stats = RunStats::default();

  if let Err(_error) = config.validate() {
    #[cfg(feature = "tracing")]
    tracing::warn!(error = %_error, "invalid polygonize config");
    stats.elements_supplied = elements.len();
    return (None, stats);
  }

  let start = Instant::now();
  let output = run(elements, config, &mut stats);
  stats.elapsed_us = start.elapsed().as_micros() as u64;

  (output, stats)
}

fn run(elements: &[MetaElement], config: &PolygonizeConfig, stats: &mut RunStats) -> Option<MeshOutput> {
  stats.elements_supplied = elements.len();

  let prepared = {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("prepare_elements").entered();
    prepare_elements(elements)
  };
  stats.elements_prepared = prepared.len();

  let bvh = {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("build_bvh").entered();
    Bvh::build(prepared)
  };
  let Some(bvh) = bvh else {
    #[cfg(feature = "tracing")]
    tracing::debug!(supplied = elements.len(), "no usable elements");
    return None;
  };
  stats.bvh_nodes = bvh.node_count();

  let cells = bvh.bounds().size().max_element() / config.cell_size;
  if cells.is_nan() || cells > MAX_CELLS_PER_AXIS {
    #[cfg(feature = "tracing")]
    tracing::warn!(cells, limit = MAX_CELLS_PER_AXIS, "lattice too fine for element bounds");
    return None;
  }

  let mut process = Process::new(&bvh, config);

  let seeded = {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("find_seeds").entered();
    process.find_seeds()
  };

  let tracked = seeded && {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("track_surface").entered();
    process.track_surface()
  };

  process.record(stats);

  if !tracked {
    #[cfg(feature = "tracing")]
    tracing::debug!(cubes = stats.cubes_visited, "polygonize cancelled");
    return None;
  }

  #[cfg(feature = "tracing")]
  let _span = tracing::info_span!("finish_mesh").entered();
  let output = process.mesh.finish();

  #[cfg(feature = "tracing")]
  {
    if output.is_none() {
      tracing::debug!(seeds = stats.seeds, "field never crosses the threshold");
    }
  }

  output
}

/// State of one run, shared by the seed finder, tracker and vertex solver.
pub(crate) struct Process<'a> {
  pub(crate) config: &'a PolygonizeConfig,
  pub(crate) sampler: FieldSampler<'a>,
  pub(crate) cache: VoxelCache,
  pub(crate) mesh: MeshBuilder,
  /// Cubes waiting to be polygonized (LIFO).
  pub(crate) stack: Vec<IVec3>,
  pub(crate) seeds: usize,
  pub(crate) cubes_visited: usize,
  pub(crate) bisection_evaluations: usize,
}

impl<'a> Process<'a> {
  pub(crate) fn new(bvh: &'a Bvh, config: &'a PolygonizeConfig) -> Self {
    Self {
      config,
      sampler: FieldSampler::new(bvh, config.threshold),
      cache: VoxelCache::new(config.cell_size),
      mesh: MeshBuilder::new(),
      stack: Vec::new(),
      seeds: 0,
      cubes_visited: 0,
      bisection_evaluations: 0,
    }
  }

  /// Cached corner sample.
  #[inline]
  pub(crate) fn corner(&mut self, coord: IVec3) -> CornerSample {
    self.cache.corner(coord, &mut self.sampler)
  }

  /// Queue a cube unless it was queued before. Returns `true` if queued.
  #[inline]
  pub(crate) fn add_cube(&mut self, coord: IVec3) -> bool {
    if self.cache.mark_visited(coord) {
      self.stack.push(coord);
      true
    } else {
      false
    }
  }

  fn record(&self, stats: &mut RunStats) {
    let evaluations = self.sampler.evaluations();
    stats.seeds = self.seeds;
    stats.cubes_visited = self.cubes_visited;
    stats.corners_cached = self.cache.corner_count();
    stats.bisection_evaluations = self.bisection_evaluations;
    stats.corner_evaluations = evaluations - self.bisection_evaluations;
    stats.vertices = self.mesh.vertex_count();
    stats.polygons = self.mesh.polygon_count();
  }
}
