//! Host-facing metaball settings.
//!
//! A metaball object carries two lattice resolutions, a coarse one for the
//! interactive viewport and a finer one for final renders, plus a policy for
//! how eagerly the viewport mesh is rebuilt while elements are being moved.
//! [`MetaballSettings::config_for`] turns these into the [`PolygonizeConfig`]
//! for one evaluation, or `None` when the host should keep its previous mesh.

use crate::types::PolygonizeConfig;

/// Viewport rebuild policy while elements are being transformed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum UpdatePolicy {
  /// Rebuild at full viewport resolution.
  #[default]
  Always,
  /// Rebuild with the viewport cell size doubled.
  HalfResolution,
  /// Skip polygonization while transforming; rebuild once it ends.
  Fast,
  /// Never rebuild in the viewport.
  Never,
}

/// Where a mesh is being evaluated for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvaluationContext {
  Viewport { transforming: bool },
  Render,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetaballSettings {
  /// Iso-value the summed density must reach.
  pub threshold: f32,
  /// Lattice cell size in the viewport.
  pub viewport_cell_size: f32,
  /// Lattice cell size for renders.
  pub render_cell_size: f32,
  pub update: UpdatePolicy,
}

impl Default for MetaballSettings {
  fn default() -> Self {
    Self {
      threshold: 0.6,
      viewport_cell_size: 0.4,
      render_cell_size: 0.2,
      update: UpdatePolicy::Always,
    }
  }
}

impl MetaballSettings {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_threshold(mut self, threshold: f32) -> Self {
    self.threshold = threshold;
    self
  }

  pub fn with_viewport_cell_size(mut self, cell_size: f32) -> Self {
    self.viewport_cell_size = cell_size;
    self
  }

  pub fn with_render_cell_size(mut self, cell_size: f32) -> Self {
    self.render_cell_size = cell_size;
    self
  }

  pub fn with_update(mut self, update: UpdatePolicy) -> Self {
    self.update = update;
    self
  }

  /// Cell size for `context`, or `None` if no mesh should be built.
  pub fn cell_size_for(&self, context: EvaluationContext) -> Option<f32> {
    match context {
      EvaluationContext::Render => Some(self.render_cell_size),
      EvaluationContext::Viewport { transforming } => match (self.update, transforming) {
        (UpdatePolicy::Never, _) => None,
        (UpdatePolicy::Fast, true) => None,
        (UpdatePolicy::HalfResolution, true) => Some(self.viewport_cell_size * 2.0),
        _ => Some(self.viewport_cell_size),
      },
    }
  }

  /// Polygonizer configuration for `context`.
  ///
  /// Bisection iterations follow the threshold tier of
  /// [`PolygonizeConfig::new`].
  pub fn config_for(&self, context: EvaluationContext) -> Option<PolygonizeConfig> {
    self
      .cell_size_for(context)
      .map(|cell_size| PolygonizeConfig::new(self.threshold, cell_size))
  }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;
