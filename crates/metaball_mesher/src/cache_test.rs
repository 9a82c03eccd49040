use glam::Vec3;

use super::*;
use crate::bvh::Bvh;
use crate::element::{prepare_elements, MetaElement};

fn unit_ball() -> Bvh {
  Bvh::build(prepare_elements(&[MetaElement::ball(Vec3::ZERO, 1.0).with_stiffness(1.0)])).unwrap()
}

#[test]
fn test_corner_position() {
  assert_eq!(corner_position(IVec3::ZERO, 0.2), Vec3A::splat(-0.1));
  assert_eq!(corner_position(IVec3::ONE, 2.0), Vec3A::splat(1.0));
  assert_eq!(corner_position(IVec3::new(-1, 2, 0), 1.0), Vec3A::new(-1.5, 1.5, -0.5));
}

#[test]
fn test_warm_corner_is_not_reevaluated() {
  let bvh = unit_ball();
  let mut sampler = FieldSampler::new(&bvh, 0.6);
  let mut cache = VoxelCache::new(0.2);

  let first = cache.corner(IVec3::new(1, 2, 3), &mut sampler);
  assert_eq!(sampler.evaluations(), 1);

  for _ in 0..10 {
    let again = cache.corner(IVec3::new(1, 2, 3), &mut sampler);
    assert_eq!(again, first);
  }
  assert_eq!(sampler.evaluations(), 1, "Cached corner must not be sampled again");
  assert_eq!(cache.corner_count(), 1);
}

#[test]
fn test_corner_value_matches_field() {
  let bvh = unit_ball();
  let mut sampler = FieldSampler::new(&bvh, 0.6);
  let mut cache = VoxelCache::new(0.25);

  let coord = IVec3::new(1, -1, 2);
  let corner = cache.corner(coord, &mut sampler);
  assert_eq!(corner.coord, coord);
  assert_eq!(corner.position, corner_position(coord, 0.25));
  assert_eq!(corner.value, sampler.sample(corner.position));
}

#[test]
fn test_hash_collisions_are_distinct() {
  let bvh = unit_ball();
  let mut sampler = FieldSampler::new(&bvh, 0.6);
  let mut cache = VoxelCache::new(0.1);

  // Same bucket: coordinates differ by multiples of 32
  let a = cache.corner(IVec3::new(0, 0, 0), &mut sampler);
  let b = cache.corner(IVec3::new(32, 0, -32), &mut sampler);
  let c = cache.corner(IVec3::new(64, 32, 0), &mut sampler);

  assert_eq!(cache.corner_count(), 3);
  assert_ne!(a.position, b.position);
  assert_eq!(cache.corner(IVec3::new(32, 0, -32), &mut sampler), b);
  assert_eq!(cache.corner(IVec3::new(64, 32, 0), &mut sampler), c);
  assert_eq!(sampler.evaluations(), 3);
}

#[test]
fn test_mark_visited() {
  let mut cache = VoxelCache::new(1.0);
  let coord = IVec3::new(-3, 4, 5);

  assert!(cache.mark_visited(coord));
  assert!(!cache.mark_visited(coord), "Second mark reports already visited");
  assert_eq!(cache.visited_count(), 1);

  // Same hash bucket, different cube
  assert!(cache.mark_visited(coord + IVec3::new(32, 0, 0)));
  assert_eq!(cache.visited_count(), 2);
}

#[test]
fn test_edge_key_is_canonical() {
  let a = IVec3::new(1, 2, 3);
  let b = IVec3::new(1, 2, 4);
  assert_eq!(EdgeKey::new(a, b), EdgeKey::new(b, a));
  assert_eq!(EdgeKey::new(b, a).low, a);

  // Lexicographic, not component-wise
  let c = IVec3::new(0, 9, 9);
  let d = IVec3::new(1, 0, 0);
  assert_eq!(EdgeKey::new(d, c).low, c);
}

#[test]
fn test_edge_vertex_lookup() {
  let mut cache = VoxelCache::new(1.0);
  let key = EdgeKey::new(IVec3::new(0, 0, 0), IVec3::new(1, 0, 0));
  let other = EdgeKey::new(IVec3::new(0, 0, 0), IVec3::new(0, 1, 0));

  assert_eq!(cache.edge_vertex(key), None);
  cache.set_edge_vertex(key, 7);
  cache.set_edge_vertex(other, 8);

  assert_eq!(cache.edge_vertex(key), Some(7));
  assert_eq!(cache.edge_vertex(EdgeKey::new(IVec3::new(1, 0, 0), IVec3::ZERO)), Some(7));
  assert_eq!(cache.edge_vertex(other), Some(8));
  assert_eq!(cache.edge_count(), 2);
}
