//! metaball_mesher - Engine independent metaball polygonization
//!
//! Turns a set of metaball elements (balls, tubes, planes, ellipsoids,
//! cubes) into a closed polygon mesh of their blended iso-surface. The
//! field is the sum of every element's falloff kernel, looked up through a
//! BVH, and the surface is extracted by tracking it cube by cube on an
//! unbounded lattice rather than by sweeping a grid.
//!
//! # Features
//!
//! - **Five element kinds** with per-element transform, stiffness and
//!   negative (subtractive) influence
//! - **Surface tracking**: only cubes that straddle the surface are
//!   evaluated; corners and edge vertices are cached and shared
//! - **Triangles and quads** with outward winding and angle-weighted
//!   vertex normals
//! - **Batch meshing** of independent objects in parallel with rayon
//!
//! # Example
//!
//! ```ignore
//! use glam::Vec3;
//! use metaball_mesher::{polygonize, MetaElement, PolygonizeConfig};
//!
//! let elements = [
//!   MetaElement::ball(Vec3::ZERO, 1.0),
//!   MetaElement::ball(Vec3::new(0.8, 0.0, 0.0), 0.7),
//! ];
//! let config = PolygonizeConfig::new(0.6, 0.1);
//!
//! if let Some(mesh) = polygonize(&elements, &config) {
//!   println!("Generated {} vertices, {} polygons",
//!     mesh.vertex_count(), mesh.polygon_count());
//! }
//! ```

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use error::{PolygonizeError, PolygonizeResult};
pub use types::{bisection_iterations_for, Aabb, MeshOutput, Polygon, PolygonizeConfig};

// Elements and the density field
pub mod bvh;
pub mod element;
pub mod field;
pub use element::{ElementKind, MetaElement};

// Lattice topology and caches
pub mod cache;
pub mod case_table;

// Surface tracking polygonizer
pub mod polygonize;
pub use polygonize::{polygonize, polygonize_with_stats, try_polygonize};

// Host settings and parallel batches
pub mod batch;
pub mod settings;
pub use batch::{polygonize_batch, JobResult, PolygonizeJob};
pub use settings::{EvaluationContext, MetaballSettings, UpdatePolicy};

// Engine-agnostic metrics
pub mod metrics;
pub use metrics::RunStats;

#[cfg(test)]
pub mod test_utils;
