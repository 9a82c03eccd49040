use super::*;

fn shares_face(a: u8, b: u8) -> bool {
  let faces_a = [LEFT_FACE[a as usize], RIGHT_FACE[a as usize]];
  let faces_b = [LEFT_FACE[b as usize], RIGHT_FACE[b as usize]];
  faces_a.iter().any(|f| faces_b.contains(f))
}

#[test]
fn test_edge_table_homogeneous() {
  assert_eq!(EDGE_TABLE[0], 0, "All outside should have no edges");
  assert_eq!(EDGE_TABLE[255], 0, "All inside should have no edges");
}

#[test]
fn test_edge_table_single_corner() {
  for corner in 0..8 {
    let code = 1u8 << corner;
    let edge_count = EDGE_TABLE[code as usize].count_ones();
    assert_eq!(edge_count, 3, "Corner {} should have 3 edges, got {}", corner, edge_count);
  }
}

#[test]
fn test_edge_table_symmetry() {
  for i in 0..128 {
    assert_eq!(EDGE_TABLE[i], EDGE_TABLE[255 - i]);
  }
}

#[test]
fn test_edge_corners_validity() {
  for (e, pair) in EDGE_CORNERS.iter().enumerate() {
    assert!(pair[0] < 8 && pair[1] < 8);
    // Each edge moves along exactly one axis
    assert_eq!((pair[0] ^ pair[1]).count_ones(), 1, "Edge {} is not axis aligned", e);
    assert!(pair[0] < pair[1], "Edge {} should go from low to high corner", e);
    assert_ne!(LEFT_FACE[e], RIGHT_FACE[e]);
  }
}

#[test]
fn test_next_cw_edge_stays_on_face() {
  for e in 0..12u8 {
    for face in [LEFT_FACE[e as usize], RIGHT_FACE[e as usize]] {
      let next = next_cw_edge(e, face);
      assert_ne!(next, e);
      assert!(
        LEFT_FACE[next as usize] == face || RIGHT_FACE[next as usize] == face,
        "Edge {} -> {} left face {}",
        e,
        next,
        face
      );
    }
  }
}

#[test]
fn test_walking_a_face_visits_four_edges() {
  for e in 0..12u8 {
    let face = LEFT_FACE[e as usize];
    let mut edge = e;
    for _ in 0..4 {
      edge = next_cw_edge(edge, face);
    }
    assert_eq!(edge, e, "Four clockwise steps around face {} should return", face);
  }
}

#[test]
fn test_other_face() {
  assert_eq!(other_face(edge::LB, face::B), face::L);
  assert_eq!(other_face(edge::LB, face::L), face::B);
  assert_eq!(other_face(edge::TF, face::T), face::F);
}

#[test]
fn test_homogeneous_cases_are_empty() {
  let table = case_table();
  for code in [0u8, 255] {
    let case = table.case(code);
    assert!(case.loops.is_empty());
    assert_eq!(case.face_mask, 0);
  }
}

#[test]
fn test_single_corner_is_one_triangle() {
  let case = case_table().case(1 << corner::LBN);
  assert_eq!(case.loops.len(), 1);
  assert_eq!(case.loops[0].as_slice(), &[edge::LN, edge::BN, edge::LB]);
  assert_eq!(case.face_mask, (1 << face::L) | (1 << face::B) | (1 << face::N));
}

#[test]
fn test_two_adjacent_corners_make_a_quad() {
  let code = (1 << corner::LBN) | (1 << corner::RBN);
  let case = case_table().case(code);
  assert_eq!(case.loops.len(), 1);
  assert_eq!(case.loops[0].as_slice(), &[edge::LN, edge::RN, edge::RB, edge::LB]);
  assert_eq!(
    case.face_mask,
    (1 << face::L) | (1 << face::R) | (1 << face::B) | (1 << face::N)
  );
}

#[test]
fn test_loops_cover_every_crossing_edge_once() {
  let table = case_table();
  for code in 0..=255u8 {
    let mut seen = 0u16;
    for edge_loop in &table.case(code).loops {
      for &e in edge_loop {
        assert_eq!(seen & (1 << e), 0, "Edge {} repeated in case {}", e, code);
        seen |= 1 << e;
      }
    }
    assert_eq!(seen, EDGE_TABLE[code as usize], "Case {} misses crossings", code);
  }
}

#[test]
fn test_loop_sizes_and_adjacency() {
  let table = case_table();
  for code in 0..=255u8 {
    let case = table.case(code);
    assert!(case.loops.len() <= 4);
    for edge_loop in &case.loops {
      assert!((3..=7).contains(&edge_loop.len()), "Case {} loop {:?}", code, edge_loop);
      for i in 0..edge_loop.len() {
        let a = edge_loop[i];
        let b = edge_loop[(i + 1) % edge_loop.len()];
        assert!(shares_face(a, b), "Case {}: edges {} and {} share no face", code, a, b);
      }
    }
  }
}

#[test]
fn test_face_mask_matches_crossing_faces() {
  let table = case_table();
  for code in 0..=255u8 {
    let crossings = EDGE_TABLE[code as usize];
    let mut expected = 0u8;
    for e in 0..12 {
      if crossings & (1 << e) != 0 {
        expected |= (1 << LEFT_FACE[e]) | (1 << RIGHT_FACE[e]);
      }
    }
    assert_eq!(table.case(code).face_mask, expected);
  }
}

#[test]
fn test_case_table_is_shared() {
  assert!(std::ptr::eq(case_table(), case_table()));
}
