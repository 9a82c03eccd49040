use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use glam::Vec3;

use super::*;
use crate::bvh::Bvh;
use crate::cache::corner_position;
use crate::constants::CORNER_OFFSETS;
use crate::element::{prepare_elements, MetaElement};
use crate::types::PolygonizeConfig;

fn bvh_of(elements: &[MetaElement]) -> Bvh {
  Bvh::build(prepare_elements(elements)).unwrap()
}

#[test]
fn test_seed_directions_are_unique_neighbours() {
  for (i, a) in SEED_DIRECTIONS.iter().enumerate() {
    assert_ne!(*a, IVec3::ZERO);
    assert!(a.abs().max_element() == 1);
    for b in &SEED_DIRECTIONS[i + 1..] {
      assert_ne!(a, b);
    }
  }
}

#[test]
fn test_closest_lattice_point() {
  let s = 0.5;
  for x in [-2.3f32, -0.7, -0.1, 0.1, 0.4, 0.6, 1.9] {
    let p = Vec3A::splat(x);
    let closest = closest_lattice_point(p, s);
    let distance = (corner_position(closest, s) - p).abs().max_element();
    assert!(distance <= s * 0.5 + 1e-6, "{} -> {:?} ({})", x, closest, distance);
  }
}

#[test]
fn test_prev_and_next_lattice_points_bracket() {
  let s = 0.3;
  for x in [-1.7f32, -0.31, 0.0, 0.2, 0.45, 2.05] {
    let p = Vec3A::splat(x);
    let prev = corner_position(prev_lattice_point(p, s), s);
    let next = corner_position(next_lattice_point(p, s), s);
    assert!(prev.x <= p.x + 1e-6 && p.x - prev.x < s + 1e-6, "prev of {}", x);
    assert!(next.x >= p.x - 1e-6 && next.x - p.x < s + 1e-6, "next of {}", x);
  }
}

#[test]
fn test_sign_change_matches_corner_code() {
  let pairs = [
    (0.5, -0.5, true),
    (0.5, 0.0, true),
    (0.0, -0.3, false),
    (0.0, 0.0, false),
    (0.2, 0.7, false),
    // Product of the two underflows to -0.0
    (1e-30, -1e-30, true),
  ];

  for (a, b, expected) in pairs {
    assert_eq!(sign_changes(a, b), expected, "{} -> {}", a, b);
    assert_eq!(sign_changes(b, a), expected, "{} -> {}", b, a);

    let code = crate::polygonize::corner_mask::build(&[a, b, b, b, b, b, b, b]);
    let straddles = code != 0 && code != 0xFF;
    assert_eq!(straddles, expected, "corner code {:08b}", code);
  }
}

#[test]
fn test_seeds_straddle_the_surface() {
  let bvh = bvh_of(&[MetaElement::ball(Vec3::ZERO, 1.0).with_stiffness(1.0)]);
  let config = PolygonizeConfig::new(0.6, 0.2);
  let mut process = Process::new(&bvh, &config);

  assert!(process.find_seeds());
  assert!(process.seeds > 0);
  assert!(process.seeds <= SEED_DIRECTIONS.len());
  assert_eq!(process.stack.len(), process.seeds);

  for cube in process.stack.clone() {
    let values: Vec<f32> = CORNER_OFFSETS.iter().map(|&o| process.corner(cube + o).value).collect();
    let positive = values.iter().filter(|&&v| v > 0.0).count();
    assert!(positive > 0 && positive < 8, "Seed {:?} does not straddle: {:?}", cube, values);
  }
}

#[test]
fn test_coincident_elements_share_seeds() {
  let config = PolygonizeConfig::new(0.6, 0.2);

  let single = bvh_of(&[MetaElement::ball(Vec3::ZERO, 1.0)]);
  let mut single_process = Process::new(&single, &config);
  single_process.find_seeds();

  // Three identical elements march identical rays; repeats are rejected
  let triple = bvh_of(&vec![MetaElement::ball(Vec3::ZERO, 1.0); 3]);
  let mut triple_process = Process::new(&triple, &config);
  triple_process.find_seeds();

  assert!(single_process.seeds > 0);
  assert_eq!(triple_process.seeds, single_process.seeds);
  assert_eq!(triple_process.stack, single_process.stack);
}

#[test]
fn test_no_crossing_no_seeds() {
  // Peak density 1.0 never reaches threshold 2.0
  let bvh = bvh_of(&[MetaElement::ball(Vec3::ZERO, 1.0).with_stiffness(1.0)]);
  let config = PolygonizeConfig::new(2.0, 0.2);
  let mut process = Process::new(&bvh, &config);

  assert!(process.find_seeds());
  assert_eq!(process.seeds, 0);
  assert!(process.stack.is_empty());
}

#[test]
fn test_rays_stop_at_the_element_box() {
  // Threshold above the peak: every ray runs to the lattice box edge
  let bvh = bvh_of(&[MetaElement::ball(Vec3::new(3.0, -2.0, 1.0), 0.5).with_stiffness(1.0)]);
  let config = PolygonizeConfig::new(5.0, 0.1);
  let mut process = Process::new(&bvh, &config);
  process.find_seeds();

  // Box spans 1.0 = 10 cells, so a ray takes at most ~6 steps from the
  // center before it leaves; 26 rays plus the shared center corner.
  let corners = process.cache.corner_count();
  assert!(corners > 26, "{} corners", corners);
  assert!(corners <= 26 * 7 + 1, "{} corners", corners);
  assert_eq!(process.seeds, 0);
}

#[test]
fn test_cancelled_before_seeding() {
  let bvh = bvh_of(&[MetaElement::ball(Vec3::ZERO, 1.0)]);
  let flag = Arc::new(AtomicBool::new(true));
  let config = PolygonizeConfig::new(0.6, 0.2).with_cancel_flag(flag);
  let mut process = Process::new(&bvh, &config);

  assert!(!process.find_seeds());
  assert!(process.stack.is_empty());
}
