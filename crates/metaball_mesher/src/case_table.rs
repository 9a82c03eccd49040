//! Cube polygonization case table.
//!
//! Maps the 8-bit corner sign code of a cube to the closed edge loops that
//! cut through it and to the set of faces the surface leaves through.
//!
//! # Cube Topology
//!
//! ```text
//!       6──────7         Corners (binary ZYX):
//!      /│     /│           0=LBN (0,0,0)  1=RBN (1,0,0)
//!     4─┼────5 │           2=LTN (0,1,0)  3=RTN (1,1,0)
//!     │ 2────┼─3           4=LBF (0,0,1)  5=RBF (1,0,1)
//!     │/     │/            6=LTF (0,1,1)  7=RTF (1,1,1)
//!     0──────1
//!                        L/R = -X/+X, B/T = -Y/+Y, N/F = -Z/+Z
//! ```
//!
//! # Edge Layout
//!
//! Edges are named by the two faces they lie on:
//!
//! ```text
//! Edge  Name  Corners      Left face  Right face
//! ────  ────  ───────────  ─────────  ──────────
//!   0    LB   [LBN, LBF]       B          L
//!   1    LT   [LTN, LTF]       L          T
//!   2    LN   [LBN, LTN]       L          N
//!   3    LF   [LBF, LTF]       F          L
//!   4    RB   [RBN, RBF]       R          B
//!   5    RT   [RTN, RTF]       T          R
//!   6    RN   [RBN, RTN]       N          R
//!   7    RF   [RBF, RTF]       R          F
//!   8    BN   [LBN, RBN]       N          B
//!   9    BF   [LBF, RBF]       B          F
//!  10    TN   [LTN, RTN]       T          N
//!  11    TF   [LTF, RTF]       F          T
//! ```
//!
//! "Left" and "right" are seen when walking from the first corner to the
//! second with the cube interior below.
//!
//! # Loop Construction
//!
//! For every sign-changing edge not yet consumed, start on the face to the
//! right of the edge (walking from the positive corner to the negative one)
//! and keep taking the next clockwise edge around the current face. Each time
//! the walk hits another sign-changing edge it is recorded and the walk
//! continues on the edge's other face, until it returns to the start edge.
//! Ambiguous faces are always resolved the same way, so neighbouring cubes
//! agree on the shared face and the resulting surface is closed.

use std::sync::OnceLock;

use smallvec::SmallVec;

/// Corner indices (binary ZYX).
pub mod corner {
  pub const LBN: u8 = 0;
  pub const RBN: u8 = 1;
  pub const LTN: u8 = 2;
  pub const RTN: u8 = 3;
  pub const LBF: u8 = 4;
  pub const RBF: u8 = 5;
  pub const LTF: u8 = 6;
  pub const RTF: u8 = 7;
}

/// Face indices, matching the bits of [`CubeCase::face_mask`].
pub mod face {
  /// -X
  pub const L: u8 = 0;
  /// +X
  pub const R: u8 = 1;
  /// -Y
  pub const B: u8 = 2;
  /// +Y
  pub const T: u8 = 3;
  /// -Z
  pub const N: u8 = 4;
  /// +Z
  pub const F: u8 = 5;
}

/// Edge indices.
pub mod edge {
  pub const LB: u8 = 0;
  pub const LT: u8 = 1;
  pub const LN: u8 = 2;
  pub const LF: u8 = 3;
  pub const RB: u8 = 4;
  pub const RT: u8 = 5;
  pub const RN: u8 = 6;
  pub const RF: u8 = 7;
  pub const BN: u8 = 8;
  pub const BF: u8 = 9;
  pub const TN: u8 = 10;
  pub const TF: u8 = 11;
}

use corner::*;
use edge::*;
use face::*;

/// Edge endpoint corner indices.
pub const EDGE_CORNERS: [[u8; 2]; 12] = [
  [LBN, LBF], // LB
  [LTN, LTF], // LT
  [LBN, LTN], // LN
  [LBF, LTF], // LF
  [RBN, RBF], // RB
  [RTN, RTF], // RT
  [RBN, RTN], // RN
  [RBF, RTF], // RF
  [LBN, RBN], // BN
  [LBF, RBF], // BF
  [LTN, RTN], // TN
  [LTF, RTF], // TF
];

/// Face on the left when walking an edge from its first to its second corner.
pub const LEFT_FACE: [u8; 12] = [B, L, L, F, R, T, N, R, N, B, T, F];

/// Face on the right when walking an edge from its first to its second corner.
pub const RIGHT_FACE: [u8; 12] = [L, T, N, L, B, R, R, F, B, F, N, T];

/// Precomputed crossing table.
/// Index: 8-bit corner code (bit set = positive field value)
/// Value: 12-bit edge mask (which edges change sign)
pub const EDGE_TABLE: [u16; 256] = generate_edge_table();

/// Generate the crossing table at compile time.
const fn generate_edge_table() -> [u16; 256] {
  let mut table = [0u16; 256];
  let mut code = 0usize;

  while code < 256 {
    let mut edge_mask = 0u16;
    let mut edge = 0;

    while edge < 12 {
      let c0 = EDGE_CORNERS[edge][0] as usize;
      let c1 = EDGE_CORNERS[edge][1] as usize;

      if (code >> c0) & 1 != (code >> c1) & 1 {
        edge_mask |= 1 << edge;
      }

      edge += 1;
    }

    table[code] = edge_mask;
    code += 1;
  }

  table
}

/// Next edge clockwise around `face`, starting from `edge` (which must lie
/// on that face).
pub const fn next_cw_edge(edge: u8, face: u8) -> u8 {
  match edge {
    LB => if face == L { LF } else { BN },
    LT => if face == L { LN } else { TF },
    LN => if face == L { LB } else { TN },
    LF => if face == L { LT } else { BF },
    RB => if face == R { RN } else { BF },
    RT => if face == R { RF } else { TN },
    RN => if face == R { RT } else { BN },
    RF => if face == R { RB } else { TF },
    BN => if face == B { RB } else { LN },
    BF => if face == B { LB } else { RF },
    TN => if face == T { LT } else { RN },
    _ => if face == T { RT } else { LF },
  }
}

/// The face of `edge` that is not `face`.
#[inline]
pub const fn other_face(edge: u8, face: u8) -> u8 {
  let left = LEFT_FACE[edge as usize];
  if face == left {
    RIGHT_FACE[edge as usize]
  } else {
    left
  }
}

/// Edge indices of one closed loop, in winding order (counter-clockwise
/// seen from outside the surface). Never longer than 7.
pub type EdgeLoop = SmallVec<[u8; 8]>;

/// Polygonization recipe for one corner sign code.
#[derive(Clone, Debug, Default)]
pub struct CubeCase {
  /// Closed loops of crossing edges.
  pub loops: SmallVec<[EdgeLoop; 4]>,
  /// Bit `f` set if a crossing edge lies on face `f`; the neighbour across
  /// that face must be visited too.
  pub face_mask: u8,
}

/// Table of all 256 cube cases.
pub struct CaseTable {
  cases: Vec<CubeCase>,
}

impl CaseTable {
  /// Build the table by walking every sign pattern.
  pub fn build() -> Self {
    let cases = (0..256u16).map(|code| build_case(code as u8)).collect();
    Self { cases }
  }

  /// Case for a corner sign code.
  #[inline]
  pub fn case(&self, code: u8) -> &CubeCase {
    &self.cases[code as usize]
  }
}

/// Process-wide case table, built on first use.
pub fn case_table() -> &'static CaseTable {
  static TABLE: OnceLock<CaseTable> = OnceLock::new();
  TABLE.get_or_init(CaseTable::build)
}

fn build_case(code: u8) -> CubeCase {
  let crossings = EDGE_TABLE[code as usize];
  let positive = |corner: u8| (code >> corner) & 1 == 1;

  let mut case = CubeCase::default();
  let mut done = [false; 12];

  for start in 0..12u8 {
    if done[start as usize] || crossings & (1 << start) == 0 {
      continue;
    }

    let mut face = if positive(EDGE_CORNERS[start as usize][0]) {
      RIGHT_FACE[start as usize]
    } else {
      LEFT_FACE[start as usize]
    };

    let mut edge_loop = EdgeLoop::new();
    let mut edge = start;
    loop {
      edge = next_cw_edge(edge, face);
      done[edge as usize] = true;

      if crossings & (1 << edge) != 0 {
        edge_loop.push(edge);
        if edge == start {
          break;
        }
        face = other_face(edge, face);
      }
    }

    for &e in &edge_loop {
      case.face_mask |= 1 << LEFT_FACE[e as usize];
      case.face_mask |= 1 << RIGHT_FACE[e as usize];
    }
    case.loops.push(edge_loop);
  }

  case
}

#[cfg(test)]
#[path = "case_table_test.rs"]
mod case_table_test;
