//! Configuration errors.
//!
//! A polygonization run itself never fails: empty inputs, degenerate
//! elements or a field that never crosses the threshold all come back as
//! `None`. Errors are reserved for configurations that cannot describe a
//! lattice at all.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PolygonizeError {
  #[error("Invalid cell size: {0} (must be finite and positive)")]
  InvalidCellSize(f32),

  #[error("Invalid threshold: {0} (must be finite)")]
  InvalidThreshold(f32),
}

pub type PolygonizeResult<T> = Result<T, PolygonizeError>;
