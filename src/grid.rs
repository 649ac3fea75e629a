use crate::viewport::ViewTransform;
use std::fmt::Write;

/// Default distance between grid lines in world units.
pub const DEFAULT_GRID_SPACING: f32 = 50.0;

/// Lines closer together than this many screen pixels are not drawn.
pub const MIN_SCREEN_SPACING: f32 = 4.0;

/// Screen-space positions of the visible grid lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridLines {
    /// X coordinates of vertical lines.
    pub vertical: Vec<f32>,
    /// Y coordinates of horizontal lines.
    pub horizontal: Vec<f32>,
}

impl GridLines {
    pub fn is_empty(&self) -> bool {
        self.vertical.is_empty() && self.horizontal.is_empty()
    }
}

/// Compute the grid lines covering a `width` x `height` canvas.
///
/// Lines sit on world coordinates that are multiples of `spacing`, so the
/// grid pans and zooms with the content.
pub fn grid_lines(width: f32, height: f32, view: &ViewTransform, spacing: f32) -> GridLines {
    if !width.is_finite() || !height.is_finite() {
        return GridLines::default();
    }

    let effective_spacing = spacing * view.zoom();

    if !(effective_spacing >= MIN_SCREEN_SPACING) {
        return GridLines::default();
    }

    // World origin lands at `pan` on screen, so offset modulo spacing
    let pan = view.pan();
    let offset_x = pan.x.rem_euclid(effective_spacing);
    let offset_y = pan.y.rem_euclid(effective_spacing);

    let along = |offset: f32, extent: f32| {
        let mut lines = Vec::new();
        let mut i = 0u32;
        loop {
            let pos = offset + effective_spacing * i as f32;
            if pos >= extent + effective_spacing {
                break;
            }
            lines.push(pos);
            i += 1;
        }
        lines
    };

    GridLines {
        vertical: along(offset_x, width),
        horizontal: along(offset_y, height),
    }
}

/// Generate SVG path commands for grid lines
///
/// # Arguments
/// * `width` - Canvas width in pixels
/// * `height` - Canvas height in pixels
/// * `view` - Current view transform
/// * `spacing` - Grid spacing in world units
///
/// # Returns
/// SVG path commands string (e.g., "M 0 0 L 0 600 M 50 0 L 50 600...")
pub fn generate_grid_commands(
    width: f32,
    height: f32,
    view: &ViewTransform,
    spacing: f32,
) -> String {
    let lines = grid_lines(width, height, view, spacing);
    let mut commands = String::with_capacity((lines.vertical.len() + lines.horizontal.len()) * 24);

    for x in &lines.vertical {
        if !commands.is_empty() {
            commands.push(' ');
        }
        let _ = write!(commands, "M {} 0 L {} {}", x, x, height);
    }
    for y in &lines.horizontal {
        if !commands.is_empty() {
            commands.push(' ');
        }
        let _ = write!(commands, "M 0 {} L {} {}", y, width, y);
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::Point;

    fn view(zoom: f32, pan_x: f32, pan_y: f32) -> ViewTransform {
        ViewTransform::new(zoom, Point::new(pan_x, pan_y))
    }

    // ========================================================================
    // Basic Grid Generation
    // ========================================================================

    #[test]
    fn test_grid_commands() {
        let commands = generate_grid_commands(100.0, 100.0, &view(1.0, 0.0, 0.0), 50.0);
        assert!(commands.contains("M 0 0 L 0 100")); // First vertical
        assert!(commands.contains("M 50 0 L 50 100")); // Second vertical
        assert!(commands.contains("M 0 50 L 100 50")); // Second horizontal
    }

    #[test]
    fn test_grid_lines_positions() {
        let lines = grid_lines(100.0, 60.0, &view(1.0, 0.0, 0.0), 50.0);
        assert_eq!(lines.vertical, vec![0.0, 50.0, 100.0]);
        assert_eq!(lines.horizontal, vec![0.0, 50.0, 100.0]);
    }

    // ========================================================================
    // Zoom Behavior
    // ========================================================================

    #[test]
    fn test_grid_zoom_scales_spacing() {
        let lines = grid_lines(200.0, 200.0, &view(2.0, 0.0, 0.0), 50.0);
        assert_eq!(lines.vertical, vec![0.0, 100.0, 200.0]);

        let fewer = generate_grid_commands(200.0, 200.0, &view(2.0, 0.0, 0.0), 50.0);
        let more = generate_grid_commands(200.0, 200.0, &view(1.0, 0.0, 0.0), 50.0);
        assert!(more.matches("M ").count() > fewer.matches("M ").count());
    }

    #[test]
    fn test_grid_hidden_when_lines_too_dense() {
        // 50 * 0.05 = 2.5 px
        let commands = generate_grid_commands(100.0, 100.0, &view(0.05, 0.0, 0.0), 50.0);
        assert!(commands.is_empty());
        assert!(grid_lines(100.0, 100.0, &view(0.05, 0.0, 0.0), 50.0).is_empty());
    }

    #[test]
    fn test_grid_at_spacing_threshold() {
        // 4.0 is not < 4.0, so renders
        assert!(!generate_grid_commands(100.0, 100.0, &view(1.0, 0.0, 0.0), 4.0).is_empty());
        assert!(generate_grid_commands(100.0, 100.0, &view(1.0, 0.0, 0.0), 3.9).is_empty());
    }

    #[test]
    fn test_grid_zero_spacing_is_empty() {
        assert!(generate_grid_commands(100.0, 100.0, &view(1.0, 0.0, 0.0), 0.0).is_empty());
    }

    #[test]
    fn test_grid_non_finite_size_is_empty() {
        let v = view(1.0, 0.0, 0.0);
        assert!(grid_lines(f32::NAN, 100.0, &v, 50.0).is_empty());
        assert!(grid_lines(100.0, f32::INFINITY, &v, 50.0).is_empty());
        assert!(generate_grid_commands(f32::INFINITY, f32::NAN, &v, 50.0).is_empty());
    }

    // ========================================================================
    // Pan Behavior
    // ========================================================================

    #[test]
    fn test_grid_pan_offsets_lines() {
        let lines = grid_lines(100.0, 100.0, &view(1.0, 10.0, 0.0), 50.0);
        assert_eq!(lines.vertical, vec![10.0, 60.0, 110.0]);
    }

    #[test]
    fn test_grid_pan_wraps_with_modulo() {
        let a = generate_grid_commands(100.0, 100.0, &view(1.0, 0.0, 0.0), 50.0);
        let b = generate_grid_commands(100.0, 100.0, &view(1.0, 50.0, 0.0), 50.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_grid_negative_pan() {
        let lines = grid_lines(100.0, 100.0, &view(1.0, -10.0, -10.0), 50.0);
        assert_eq!(lines.vertical, vec![40.0, 90.0, 140.0]);
    }

    #[test]
    fn test_grid_lines_stay_on_world_multiples() {
        let v = view(1.15, 37.0, -12.0);
        let lines = grid_lines(400.0, 300.0, &v, 50.0);
        for x in lines.vertical {
            let world = v.to_world(Point::new(x, 0.0)).x;
            let rem = world.rem_euclid(50.0);
            assert!(rem < 0.01 || rem > 49.99, "x={} world={}", x, world);
        }
    }

    // ========================================================================
    // Output Format Validation
    // ========================================================================

    #[test]
    fn test_grid_commands_no_trailing_space() {
        let commands = generate_grid_commands(100.0, 100.0, &view(1.0, 0.0, 0.0), 25.0);
        assert!(!commands.ends_with(' '));
        assert!(!commands.starts_with(' '));
    }
}
