//! Voxel cache: the three lattice hash tables of a run.
//!
//! ```text
//! ┌───────────────┬──────────────────┬────────────────┬──────────────────────┐
//! │ Table         │ Key              │ Value          │ Buckets              │
//! ├───────────────┼──────────────────┼────────────────┼──────────────────────┤
//! │ corners       │ corner (i,j,k)   │ position+value │ HASH_SIZE            │
//! │ visited       │ cube (i,j,k)     │ -              │ HASH_SIZE            │
//! │ edges         │ (corner, corner) │ vertex id      │ EDGE_HASH_SIZE       │
//! └───────────────┴──────────────────┴────────────────┴──────────────────────┘
//! ```
//!
//! Each table is a fixed array of bucket heads plus one growing entry arena
//! linked by `u32` indices. Nothing is ever removed; the whole cache is
//! dropped at the end of the run.

use glam::{IVec3, Vec3A};

use crate::constants::{coord_hash, EDGE_HASH_SIZE, HASH_SIZE};
use crate::field::FieldSampler;

/// End-of-chain marker.
const NO_ENTRY: u32 = u32::MAX;

struct Entry<K, V> {
  key: K,
  value: V,
  next: u32,
}

/// Fixed-bucket chained hash table with arena-allocated entries.
struct ChainedTable<K, V> {
  heads: Vec<u32>,
  entries: Vec<Entry<K, V>>,
}

impl<K: PartialEq + Copy, V> ChainedTable<K, V> {
  fn with_buckets(buckets: usize) -> Self {
    Self {
      heads: vec![NO_ENTRY; buckets],
      entries: Vec::new(),
    }
  }

  #[inline]
  fn get(&self, bucket: usize, key: K) -> Option<&V> {
    let mut index = self.heads[bucket];
    while index != NO_ENTRY {
      let entry = &self.entries[index as usize];
      if entry.key == key {
        return Some(&entry.value);
      }
      index = entry.next;
    }
    None
  }

  /// Prepend an entry to the bucket chain. Does not check for duplicates.
  #[inline]
  fn insert(&mut self, bucket: usize, key: K, value: V) {
    let index = self.entries.len() as u32;
    self.entries.push(Entry {
      key,
      value,
      next: self.heads[bucket],
    });
    self.heads[bucket] = index;
  }

  #[inline]
  fn len(&self) -> usize {
    self.entries.len()
  }
}

/// Cached lattice corner sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CornerSample {
  pub coord: IVec3,
  pub position: Vec3A,
  pub value: f32,
}

/// Unordered pair of corner coordinates, stored smaller-first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeKey {
  pub low: IVec3,
  pub high: IVec3,
}

impl EdgeKey {
  /// Canonical key: the lexicographically smaller coordinate comes first.
  pub fn new(a: IVec3, b: IVec3) -> Self {
    if a.to_array() <= b.to_array() {
      Self { low: a, high: b }
    } else {
      Self { low: b, high: a }
    }
  }

  #[inline]
  fn bucket(&self) -> usize {
    coord_hash(self.low) + coord_hash(self.high)
  }
}

/// World position of a lattice corner.
#[inline]
pub fn corner_position(coord: IVec3, cell_size: f32) -> Vec3A {
  (coord.as_vec3a() - Vec3A::splat(0.5)) * cell_size
}

/// Corner, visited-cube and edge-vertex tables of one run.
pub struct VoxelCache {
  cell_size: f32,
  corners: ChainedTable<IVec3, CornerSample>,
  visited: ChainedTable<IVec3, ()>,
  edges: ChainedTable<EdgeKey, u32>,
}

impl VoxelCache {
  pub fn new(cell_size: f32) -> Self {
    Self {
      cell_size,
      corners: ChainedTable::with_buckets(HASH_SIZE),
      visited: ChainedTable::with_buckets(HASH_SIZE),
      edges: ChainedTable::with_buckets(EDGE_HASH_SIZE),
    }
  }

  #[inline]
  pub fn cell_size(&self) -> f32 {
    self.cell_size
  }

  /// Corner sample, evaluated on first access and cached for the run.
  pub fn corner(&mut self, coord: IVec3, sampler: &mut FieldSampler) -> CornerSample {
    let bucket = coord_hash(coord);
    if let Some(corner) = self.corners.get(bucket, coord) {
      return *corner;
    }

    let position = corner_position(coord, self.cell_size);
    let corner = CornerSample {
      coord,
      position,
      value: sampler.sample(position),
    };
    self.corners.insert(bucket, coord, corner);
    corner
  }

  /// Mark a cube as visited. Returns `true` if it was not visited before.
  pub fn mark_visited(&mut self, coord: IVec3) -> bool {
    let bucket = coord_hash(coord);
    if self.visited.get(bucket, coord).is_some() {
      return false;
    }
    self.visited.insert(bucket, coord, ());
    true
  }

  /// Vertex id already resolved for an edge.
  #[inline]
  pub fn edge_vertex(&self, key: EdgeKey) -> Option<u32> {
    self.edges.get(key.bucket(), key).copied()
  }

  /// Record the vertex of an edge. The caller checks `edge_vertex` first.
  #[inline]
  pub fn set_edge_vertex(&mut self, key: EdgeKey, vertex: u32) {
    debug_assert!(self.edge_vertex(key).is_none(), "edge {:?} resolved twice", key);
    self.edges.insert(key.bucket(), key, vertex);
  }

  /// Corners evaluated and cached so far.
  pub fn corner_count(&self) -> usize {
    self.corners.len()
  }

  /// Cubes marked visited so far.
  pub fn visited_count(&self) -> usize {
    self.visited.len()
  }

  pub fn edge_count(&self) -> usize {
    self.edges.len()
  }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;
