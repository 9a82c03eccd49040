//! Lattice layout constants for the metaball polygonizer.
//!
//! The sampling lattice is unbounded: cubes and corners are addressed by
//! signed integer coordinates `(i, j, k)` and stored in fixed-size chained
//! hash tables. The tables only look at the low 5 bits of each axis, so the
//! bucket count is a power of two and the hash is a pair of shifts.
//!
//! # Lattice Geometry
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           LATTICE LAYOUT                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  corner i:    -1      0       1       2       3                         │
//! │                │      │       │       │       │                         │
//! │  world x:  -1.5s   -0.5s    0.5s    1.5s    2.5s                        │
//! │                │      │       │       │       │                         │
//! │                └cube-1┴─cube 0┴─cube 1┴─cube 2┘                         │
//! │                                                                         │
//! │  Cube (i,j,k) spans corners (i..=i+1, j..=j+1, k..=k+1).                │
//! │  Corner (i,j,k) sits at ((i-0.5)s, (j-0.5)s, (k-0.5)s), s = cell size.  │
//! │  The world origin is the center of cube (0,0,0).                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Hashing
//!
//! ```text
//! hash = (i & 31) << 10 | (j & 31) << 5 | (k & 31)
//!      = (i & 31) * 1024 + (j & 31) * 32 + (k & 31)
//! ```
//!
//! Edge keys hash as the sum of both corner hashes, so the edge table has
//! twice as many buckets.
//!
//! # Coordinate System
//!
//! ```text
//!         +Y (T)
//!          │
//!          │
//!          │
//!          └───────── +X (R)
//!         /
//!        /
//!       +Z (F)
//!
//! Cube corner indices (binary: ZYX):
//!   0 = (0,0,0) LBN    4 = (0,0,1) LBF
//!   1 = (1,0,0) RBN    5 = (1,0,1) RBF
//!   2 = (0,1,0) LTN    6 = (0,1,1) LTF
//!   3 = (1,1,0) RTN    7 = (1,1,1) RTF
//! ```

use glam::IVec3;

/// Bits of each lattice axis used by the spatial hash.
pub const HASH_BITS: u32 = 5;

/// Mask for the hashed bits of one axis (0x1F = 31).
pub const HASH_MASK: i32 = (1 << HASH_BITS) - 1;

/// Bucket count for corner and center tables (32³ = 32768).
pub const HASH_SIZE: usize = 1 << (3 * HASH_BITS);

/// Bucket count for the edge table (sum of two corner hashes).
pub const EDGE_HASH_SIZE: usize = 2 * HASH_SIZE;

/// Bit shift for the J axis inside a hash.
pub const J_SHIFT: u32 = HASH_BITS;

/// Bit shift for the I axis inside a hash.
pub const I_SHIFT: u32 = 2 * HASH_BITS;

/// Stiffness magnitude ceiling. Larger values only make the linear
/// vertex interpolation look worse.
pub const MAX_STIFFNESS: f32 = 10.0;

/// Transform axes shorter than this (squared) mark an element as degenerate.
pub const DEGENERATE_AXIS_LENGTH_SQ: f32 = f32::EPSILON;

/// Largest lattice span (cells along the longest axis of all elements)
/// a run accepts before reporting no output.
pub const MAX_CELLS_PER_AXIS: f32 = 100_000.0;

/// The tracker polls the cancel flag once per this many cubes.
pub const INTERRUPT_CHECK_INTERVAL: usize = 1024;

/// Hash a lattice coordinate into `[0, HASH_SIZE)`.
#[inline(always)]
pub const fn lattice_hash(i: i32, j: i32, k: i32) -> usize {
  (((i & HASH_MASK) as usize) << I_SHIFT)
    | (((j & HASH_MASK) as usize) << J_SHIFT)
    | ((k & HASH_MASK) as usize)
}

/// Hash an `IVec3` lattice coordinate.
#[inline(always)]
pub fn coord_hash(coord: IVec3) -> usize {
  lattice_hash(coord.x, coord.y, coord.z)
}

/// Lattice offsets of the 8 cube corners relative to the cube coordinate.
///
/// Corner layout (binary: ZYX):
/// - 0 = (0,0,0)
/// - 1 = (1,0,0)
/// - 2 = (0,1,0)
/// - 3 = (1,1,0)
/// - 4 = (0,0,1)
/// - 5 = (1,0,1)
/// - 6 = (0,1,1)
/// - 7 = (1,1,1)
pub const CORNER_OFFSETS: [IVec3; 8] = [
  IVec3::new(0, 0, 0),
  IVec3::new(1, 0, 0),
  IVec3::new(0, 1, 0),
  IVec3::new(1, 1, 0),
  IVec3::new(0, 0, 1),
  IVec3::new(1, 0, 1),
  IVec3::new(0, 1, 1),
  IVec3::new(1, 1, 1),
];

/// Lattice offsets of the 6 face neighbours, indexed by face
/// (L, R, B, T, N, F = -X, +X, -Y, +Y, -Z, +Z).
pub const FACE_OFFSETS: [IVec3; 6] = [
  IVec3::new(-1, 0, 0),
  IVec3::new(1, 0, 0),
  IVec3::new(0, -1, 0),
  IVec3::new(0, 1, 0),
  IVec3::new(0, 0, -1),
  IVec3::new(0, 0, 1),
];

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
