//! View transform for the canvas.
//!
//! Nodes, sockets and connections live in **world space**. The render surface
//! works in **screen space** (logical pixels). [`ViewTransform`] maps between
//! the two with a uniform zoom and a translation:
//!
//! ```text
//! screen = world * zoom + pan
//! world  = (screen - pan) / zoom
//! ```

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A 2D point or vector. Used for both world and screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance to `other`.
    pub fn distance_sq(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Point) -> f32 {
        self.distance_sq(other).sqrt()
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f32, f32) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;
    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// Axis-aligned rectangle (x, y is the top-left corner).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Build a normalized rect from two arbitrary corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// True if the two rects overlap or touch.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.x + other.width
            && other.x <= self.x + self.width
            && self.y <= other.y + other.height
            && other.y <= self.y + self.height
    }
}

/// Multiplicative zoom applied per wheel notch.
pub const DEFAULT_ZOOM_STEP: f32 = 1.15;

/// Uniform-scale + translation map from world space to screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    zoom: f32,
    pan: Point,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    /// Zoom 1, no translation.
    pub const fn identity() -> Self {
        Self { zoom: 1.0, pan: Point::ZERO }
    }

    /// Construct from explicit values. A non-positive or non-finite zoom
    /// falls back to 1.0.
    pub fn new(zoom: f32, pan: Point) -> Self {
        let zoom = if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 };
        Self { zoom, pan }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    /// World → screen.
    pub fn to_screen(&self, world: Point) -> Point {
        world * self.zoom + self.pan
    }

    /// Screen → world (the inverse transform).
    pub fn to_world(&self, screen: Point) -> Point {
        (screen - self.pan) * (1.0 / self.zoom)
    }

    /// Convert a screen-space length to world units.
    pub fn to_world_length(&self, screen_len: f32) -> f32 {
        screen_len / self.zoom
    }

    /// Translate the view by a screen-space delta.
    pub fn pan_by(&mut self, screen_delta: Point) {
        self.pan += screen_delta;
    }

    /// Zoom around the screen point `anchor` so the world point under it does
    /// not move.
    ///
    /// `wheel_delta > 0` zooms in by `step`, anything else zooms out by
    /// `1 / step`. The resulting zoom is clamped to `[min_zoom, max_zoom]`.
    /// Returns `false` (and leaves the transform untouched) when the clamped
    /// zoom equals the current one.
    pub fn zoom_at(
        &mut self,
        anchor: Point,
        wheel_delta: f32,
        step: f32,
        min_zoom: f32,
        max_zoom: f32,
    ) -> bool {
        let factor = if wheel_delta > 0.0 { step } else { 1.0 / step };
        let new_zoom = (self.zoom * factor).clamp(min_zoom, max_zoom);
        if new_zoom == self.zoom {
            return false;
        }

        let world_before = self.to_world(anchor);
        self.zoom = new_zoom;
        let world_after = self.to_world(anchor);

        // Shift so that `anchor` maps back onto `world_before`.
        self.pan += (world_after - world_before) * self.zoom;
        true
    }

    /// Back to zoom 1 with no translation.
    pub fn reset(&mut self) {
        *self = Self::identity();
    }

    /// World-space rectangle covered by a viewport of the given screen size.
    pub fn visible_world_rect(&self, width: f32, height: f32) -> Rect {
        let top_left = self.to_world(Point::ZERO);
        Rect::new(
            top_left.x,
            top_left.y,
            self.to_world_length(width),
            self.to_world_length(height),
        )
    }

    /// World point at the centre of a viewport of the given screen size.
    pub fn world_center(&self, width: f32, height: f32) -> Point {
        self.to_world(Point::new(width * 0.5, height * 0.5))
    }
}
