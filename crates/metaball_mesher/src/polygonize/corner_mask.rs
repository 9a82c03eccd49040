//! Corner code computation using glam SIMD compares.
//!
//! The corner code is an 8-bit value where each bit records whether the
//! field value at one cube corner is positive.

use glam::Vec4;

/// Build the corner code from 8 field values.
///
/// Each bit in the result corresponds to one corner:
/// - Bit 0: corner (0,0,0)
/// - Bit 1: corner (1,0,0)
/// - Bit 2: corner (0,1,0)
/// - Bit 3: corner (1,1,0)
/// - Bit 4: corner (0,0,1)
/// - Bit 5: corner (1,0,1)
/// - Bit 6: corner (0,1,1)
/// - Bit 7: corner (1,1,1)
///
/// A bit is set if the value is strictly positive. Zero and NaN are not.
#[inline]
pub fn build(values: &[f32; 8]) -> u8 {
  let near = Vec4::new(values[0], values[1], values[2], values[3]);
  let far = Vec4::new(values[4], values[5], values[6], values[7]);

  // Compare 4 lanes at a time, each lane becomes 1 bit
  let near_mask = near.cmpgt(Vec4::ZERO).bitmask();
  let far_mask = far.cmpgt(Vec4::ZERO).bitmask();

  (near_mask | (far_mask << 4)) as u8
}

#[cfg(test)]
#[path = "corner_mask_test.rs"]
mod corner_mask_test;
