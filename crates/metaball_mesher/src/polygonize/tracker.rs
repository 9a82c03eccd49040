//! Surface tracker: grows the mesh cube by cube from the seeds.

use smallvec::SmallVec;

use super::corner_mask;
use super::Process;
use crate::cache::CornerSample;
use crate::case_table::{case_table, EDGE_CORNERS};
use crate::constants::{CORNER_OFFSETS, FACE_OFFSETS, INTERRUPT_CHECK_INTERVAL};

impl Process<'_> {
  /// Polygonize cubes until the stack is empty.
  ///
  /// Every popped cube queues the neighbours across the faces its surface
  /// crosses, so the walk covers each connected surface reachable from a
  /// seed. Returns `false` if the run was cancelled.
  pub(crate) fn track_surface(&mut self) -> bool {
    let table = case_table();

    while let Some(coord) = self.stack.pop() {
      self.cubes_visited += 1;
      if self.cubes_visited % INTERRUPT_CHECK_INTERVAL == 0 && self.config.is_cancelled() {
        return false;
      }

      let corners: [CornerSample; 8] = std::array::from_fn(|n| self.corner(coord + CORNER_OFFSETS[n]));
      let code = corner_mask::build(&corners.map(|corner| corner.value));
      let case = table.case(code);

      for (face, offset) in FACE_OFFSETS.iter().enumerate() {
        if case.face_mask & (1 << face) != 0 {
          self.add_cube(coord + *offset);
        }
      }

      for edge_loop in &case.loops {
        let ids: SmallVec<[u32; 8]> = edge_loop
          .iter()
          .map(|&edge| {
            let [c0, c1] = EDGE_CORNERS[edge as usize];
            self.vertex_id(&corners[c0 as usize], &corners[c1 as usize])
          })
          .collect();
        self.mesh.emit_loop(&ids);
      }
    }

    true
  }
}

#[cfg(test)]
#[path = "tracker_test.rs"]
mod tracker_test;
