//! Metaball field elements.
//!
//! Callers describe elements with [`MetaElement`]. Before a run each one is
//! copied into a [`FieldElement`], which caches everything the density
//! kernel needs: the world-to-local transform, the inverse squared radius,
//! the signed and clamped stiffness and the world-space bounds.
//!
//! # Density Kernel
//!
//! ```text
//! local   = world_to_local * p
//! local'  = deflate(local)              per kind, see below
//! dist2   = 1 - |local'|² / radius²
//! density = stiffness * dist2³          (0 when dist2 < 0)
//!
//! Kind        Deflation
//! ──────────  ─────────────────────────────────────────
//! Ball        none
//! Cube        x, y, z by the half-extents
//! Plane       x, y by the half-extents
//! Tube        x by the half-extent
//! Ellipsoid   each axis divided by its half-extent
//! TubeX/Y/Z   one axis by `length`
//! ```
//!
//! Deflating an axis by `e` maps `|v| <= e` to 0 and shrinks the rest by
//! `e`, so the kernel is flat along the element's core.

use glam::{Affine3A, Mat4, Vec3, Vec3A};

use crate::constants::{DEGENERATE_AXIS_LENGTH_SQ, MAX_STIFFNESS};
use crate::types::Aabb;

/// Stiffness of newly built elements.
pub const DEFAULT_STIFFNESS: f32 = 2.0;

/// Shape of an element's core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ElementKind {
  #[default]
  Ball,
  Tube,
  Plane,
  Ellipsoid,
  Cube,
  /// Legacy tube along X, deflated by `length`.
  TubeX,
  /// Legacy tube along Y, deflated by `length`.
  TubeY,
  /// Legacy tube along Z, deflated by `length`.
  TubeZ,
}

/// Caller-facing description of one element.
#[derive(Clone, Debug, PartialEq)]
pub struct MetaElement {
  pub kind: ElementKind,

  /// Local-to-world transform.
  pub transform: Mat4,

  /// Influence radius in local units.
  pub radius: f32,

  /// Density at the core. Clamped to `±MAX_STIFFNESS` when prepared.
  pub stiffness: f32,

  /// Subtract from the field instead of adding.
  pub negative: bool,

  /// Hidden elements are skipped.
  pub hidden: bool,

  /// Per-axis half-extents of the core (Cube, Plane, Tube, Ellipsoid).
  pub extents: Vec3,

  /// Half-length of legacy axis tubes.
  pub length: f32,
}

impl Default for MetaElement {
  fn default() -> Self {
    Self {
      kind: ElementKind::Ball,
      transform: Mat4::IDENTITY,
      radius: 1.0,
      stiffness: DEFAULT_STIFFNESS,
      negative: false,
      hidden: false,
      extents: Vec3::ONE,
      length: 1.0,
    }
  }
}

impl MetaElement {
  fn at(kind: ElementKind, center: Vec3, radius: f32) -> Self {
    Self {
      kind,
      transform: Mat4::from_translation(center),
      radius,
      ..Default::default()
    }
  }

  pub fn ball(center: Vec3, radius: f32) -> Self {
    Self::at(ElementKind::Ball, center, radius)
  }

  pub fn cube(center: Vec3, radius: f32, extents: Vec3) -> Self {
    Self {
      extents,
      ..Self::at(ElementKind::Cube, center, radius)
    }
  }

  /// Tube along local X with core half-length `half_length`.
  pub fn tube(center: Vec3, radius: f32, half_length: f32) -> Self {
    Self {
      extents: Vec3::new(half_length, 0.0, 0.0),
      ..Self::at(ElementKind::Tube, center, radius)
    }
  }

  /// Plane spanning local X and Y.
  pub fn plane(center: Vec3, radius: f32, half_x: f32, half_y: f32) -> Self {
    Self {
      extents: Vec3::new(half_x, half_y, 0.0),
      ..Self::at(ElementKind::Plane, center, radius)
    }
  }

  pub fn ellipsoid(center: Vec3, radius: f32, extents: Vec3) -> Self {
    Self {
      extents,
      ..Self::at(ElementKind::Ellipsoid, center, radius)
    }
  }

  /// Legacy axis tube. `kind` must be one of `TubeX`, `TubeY`, `TubeZ`.
  pub fn axis_tube(kind: ElementKind, center: Vec3, radius: f32, length: f32) -> Self {
    debug_assert!(matches!(
      kind,
      ElementKind::TubeX | ElementKind::TubeY | ElementKind::TubeZ
    ));
    Self {
      length,
      ..Self::at(kind, center, radius)
    }
  }

  pub fn with_transform(mut self, transform: Mat4) -> Self {
    self.transform = transform;
    self
  }

  pub fn with_stiffness(mut self, stiffness: f32) -> Self {
    self.stiffness = stiffness;
    self
  }

  pub fn negative(mut self) -> Self {
    self.negative = true;
    self
  }

  pub fn hidden(mut self) -> Self {
    self.hidden = true;
    self
  }
}

/// Run-owned copy of an element, ready for evaluation.
#[derive(Clone, Debug)]
pub struct FieldElement {
  kind: ElementKind,
  world_to_local: Affine3A,
  inv_radius_sq: f32,
  /// Signed: negative elements subtract.
  stiffness: f32,
  extents: Vec3A,
  length: f32,
  bounds: Aabb,
}

impl FieldElement {
  /// Prepare an element for evaluation.
  ///
  /// Returns `None` for elements that must be skipped: hidden, a transform
  /// axis of (near) zero length, a non-invertible transform, a radius that
  /// is not positive, or an ellipsoid with a non-positive half-extent.
  pub fn prepare(element: &MetaElement) -> Option<FieldElement> {
    if element.hidden || !element.radius.is_finite() || element.radius <= 0.0 {
      return None;
    }

    let local_to_world = element.transform;
    let has_zero_axis = [local_to_world.x_axis, local_to_world.y_axis, local_to_world.z_axis]
      .iter()
      .any(|axis| axis.truncate().length_squared() < DEGENERATE_AXIS_LENGTH_SQ);
    if has_zero_axis {
      return None;
    }

    let local_to_world = Affine3A::from_mat4(local_to_world);
    let world_to_local = local_to_world.inverse();
    if !world_to_local.is_finite() {
      return None;
    }

    let extents = Vec3A::from(element.extents);
    if element.kind == ElementKind::Ellipsoid && extents.cmple(Vec3A::ZERO).any() {
      return None;
    }

    let mut stiffness = element.stiffness.clamp(-MAX_STIFFNESS, MAX_STIFFNESS);
    if element.negative {
      stiffness = -stiffness;
    }

    let extents = if element.kind == ElementKind::Ellipsoid {
      extents
    } else {
      extents.max(Vec3A::ZERO)
    };
    let length = element.length.max(0.0);

    let local_half = local_half_size(element.kind, element.radius, extents, length);
    let bounds = transformed_bounds(&local_to_world, local_half);

    Some(FieldElement {
      kind: element.kind,
      world_to_local,
      inv_radius_sq: 1.0 / (element.radius * element.radius),
      stiffness,
      extents,
      length,
      bounds,
    })
  }

  #[inline]
  pub fn kind(&self) -> ElementKind {
    self.kind
  }

  /// Signed stiffness after clamping.
  #[inline]
  pub fn stiffness(&self) -> f32 {
    self.stiffness
  }

  /// World-space box outside of which the density is zero.
  #[inline]
  pub fn bounds(&self) -> &Aabb {
    &self.bounds
  }

  /// Density contribution at a world-space point.
  #[inline]
  pub fn density(&self, point: Vec3A) -> f32 {
    let local = self.world_to_local.transform_point3a(point);
    let deflated = self.deflate(local);

    let dist2 = 1.0 - deflated.length_squared() * self.inv_radius_sq;
    if dist2 < 0.0 {
      0.0
    } else {
      self.stiffness * dist2 * dist2 * dist2
    }
  }

  #[inline]
  fn deflate(&self, v: Vec3A) -> Vec3A {
    let e = self.extents;
    match self.kind {
      ElementKind::Ball => v,
      ElementKind::Cube => Vec3A::new(shrink(v.x, e.x), shrink(v.y, e.y), shrink(v.z, e.z)),
      ElementKind::Plane => Vec3A::new(shrink(v.x, e.x), shrink(v.y, e.y), v.z),
      ElementKind::Tube => Vec3A::new(shrink(v.x, e.x), v.y, v.z),
      ElementKind::Ellipsoid => v / e,
      ElementKind::TubeX => Vec3A::new(shrink(v.x, self.length), v.y, v.z),
      ElementKind::TubeY => Vec3A::new(v.x, shrink(v.y, self.length), v.z),
      ElementKind::TubeZ => Vec3A::new(v.x, v.y, shrink(v.z, self.length)),
    }
  }
}

/// Move `v` toward zero by `extent`, flattening `[-extent, extent]` to 0.
#[inline(always)]
fn shrink(v: f32, extent: f32) -> f32 {
  if v > extent {
    v - extent
  } else if v < -extent {
    v + extent
  } else {
    0.0
  }
}

/// Half-size of the local box where the kernel is non-zero.
fn local_half_size(kind: ElementKind, radius: f32, extents: Vec3A, length: f32) -> Vec3A {
  let r = Vec3A::splat(radius);
  match kind {
    ElementKind::Ball => r,
    ElementKind::Cube => r + extents,
    ElementKind::Plane => r + Vec3A::new(extents.x, extents.y, 0.0),
    ElementKind::Tube => r + Vec3A::new(extents.x, 0.0, 0.0),
    ElementKind::Ellipsoid => r * extents,
    ElementKind::TubeX => r + Vec3A::new(length, 0.0, 0.0),
    ElementKind::TubeY => r + Vec3A::new(0.0, length, 0.0),
    ElementKind::TubeZ => r + Vec3A::new(0.0, 0.0, length),
  }
}

/// World box of the 8 transformed corners of a local box.
fn transformed_bounds(local_to_world: &Affine3A, half: Vec3A) -> Aabb {
  let mut bounds = Aabb::empty();
  for corner in 0..8 {
    let sign = Vec3A::new(
      if corner & 1 == 0 { -1.0 } else { 1.0 },
      if corner & 2 == 0 { -1.0 } else { 1.0 },
      if corner & 4 == 0 { -1.0 } else { 1.0 },
    );
    bounds.encapsulate(local_to_world.transform_point3a(half * sign));
  }
  bounds
}

/// Prepare all usable elements, dropping the degenerate ones.
pub fn prepare_elements(elements: &[MetaElement]) -> Vec<FieldElement> {
  elements.iter().filter_map(FieldElement::prepare).collect()
}

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;
