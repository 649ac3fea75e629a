use crate::grid::DEFAULT_GRID_SPACING;
use crate::node::{NodeKind, SOCKET_RADIUS};
use crate::viewport::DEFAULT_ZOOM_STEP;
use thiserror::Error;

/// Modifier key that turns a primary click on empty canvas into node creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateModifier {
    Control,
    Shift,
    Alt,
    Meta,
}

/// Invalid [`EditorConfig`] values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("zoom step must be greater than 1, got {0}")]
    ZoomStep(f32),
    #[error("zoom range [{min}, {max}] is invalid")]
    ZoomRange { min: f32, max: f32 },
    #[error("grid spacing must be positive, got {0}")]
    GridSpacing(f32),
    #[error("{name} must be positive, got {value}")]
    Tolerance { name: &'static str, value: f32 },
}

/// Tunable editor behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Zoom multiplier per wheel notch.
    pub zoom_step: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Grid spacing in world units.
    pub grid_spacing: f32,
    /// Whether the grid starts visible.
    pub grid_visible: bool,
    /// Socket pick radius in world units.
    pub socket_hit_radius: f32,
    /// Connection pick tolerance in screen pixels.
    pub connection_hover_distance: f32,
    /// Samples per curve when measuring connection distance.
    pub connection_hit_samples: usize,
    /// Kind created by modifier-click and the context menu.
    pub default_node_kind: NodeKind,
    pub create_modifier: CreateModifier,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            zoom_step: DEFAULT_ZOOM_STEP,
            min_zoom: 0.1,
            max_zoom: 10.0,
            grid_spacing: DEFAULT_GRID_SPACING,
            grid_visible: true,
            socket_hit_radius: SOCKET_RADIUS,
            connection_hover_distance: 6.0,
            connection_hit_samples: 20,
            default_node_kind: NodeKind::Input,
            create_modifier: CreateModifier::Control,
        }
    }
}

impl EditorConfig {
    pub fn with_zoom_step(mut self, step: f32) -> Self {
        self.zoom_step = step;
        self
    }

    pub fn with_zoom_range(mut self, min: f32, max: f32) -> Self {
        self.min_zoom = min;
        self.max_zoom = max;
        self
    }

    pub fn with_grid_spacing(mut self, spacing: f32) -> Self {
        self.grid_spacing = spacing;
        self
    }

    pub fn with_grid_visible(mut self, visible: bool) -> Self {
        self.grid_visible = visible;
        self
    }

    pub fn with_socket_hit_radius(mut self, radius: f32) -> Self {
        self.socket_hit_radius = radius;
        self
    }

    pub fn with_connection_hover_distance(mut self, distance: f32) -> Self {
        self.connection_hover_distance = distance;
        self
    }

    pub fn with_default_node_kind(mut self, kind: NodeKind) -> Self {
        self.default_node_kind = kind;
        self
    }

    pub fn with_create_modifier(mut self, modifier: CreateModifier) -> Self {
        self.create_modifier = modifier;
        self
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.zoom_step > 1.0) {
            return Err(ConfigError::ZoomStep(self.zoom_step));
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= 1.0 && self.max_zoom >= 1.0) {
            return Err(ConfigError::ZoomRange {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        if !(self.grid_spacing > 0.0) {
            return Err(ConfigError::GridSpacing(self.grid_spacing));
        }
        for (name, value) in [
            ("socket hit radius", self.socket_hit_radius),
            ("connection hover distance", self.connection_hover_distance),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::Tolerance { name, value });
            }
        }
        Ok(())
    }
}
