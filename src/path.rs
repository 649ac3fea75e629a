use crate::viewport::Point;

/// Horizontal control point offset for a connection between `start` and `end`.
///
/// Half the horizontal span, so the curve leaves the output to the right and
/// enters the input from the left.
pub fn control_offset(start: Point, end: Point) -> f32 {
    (end.x - start.x).abs() * 0.5
}

/// Generate SVG path command for a bezier connection between two points
///
/// Control points extend horizontally from the start (to the right) and the
/// end (to the left). The points can be in world or screen space; the curve
/// shape is the same under the view transform.
///
/// # Returns
/// SVG path command string (e.g., "M 10 20 C 55 20 55 80 100 80")
pub fn generate_bezier_path(start: Point, end: Point) -> String {
    let bezier = CubicBezier::from_endpoints(start, end);
    bezier.to_svg()
}

/// Cubic bezier curve for drawing and distance calculations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point, // Start point
    pub p1: Point, // Control point 1
    pub p2: Point, // Control point 2
    pub p3: Point, // End point
}

impl CubicBezier {
    /// Create the connection curve from its endpoints
    pub fn from_endpoints(start: Point, end: Point) -> Self {
        let offset = control_offset(start, end);
        CubicBezier {
            p0: start,
            p1: Point::new(start.x + offset, start.y),
            p2: Point::new(end.x - offset, end.y),
            p3: end,
        }
    }

    /// Evaluate the bezier curve at parameter t (0.0 to 1.0)
    pub fn eval(&self, t: f32) -> Point {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        self.p0 * mt3 + self.p1 * (3.0 * mt2 * t) + self.p2 * (3.0 * mt * t2) + self.p3 * t3
    }

    /// SVG path text: M (move to), C (cubic bezier)
    pub fn to_svg(&self) -> String {
        format!(
            "M {} {} C {} {} {} {} {} {}",
            self.p0.x, self.p0.y, self.p1.x, self.p1.y, self.p2.x, self.p2.y, self.p3.x, self.p3.y
        )
    }
}

/// Calculate squared distance from a point to a line segment
fn distance_to_line_segment_sq(point: Point, a: Point, b: Point) -> f32 {
    let ab = b - a;
    let ap = point - a;

    let ab_len_sq = ab.x * ab.x + ab.y * ab.y;

    if ab_len_sq < f32::EPSILON {
        // Degenerate segment (a == b)
        return ap.x * ap.x + ap.y * ap.y;
    }

    // Project point onto line, clamped to segment
    let t = ((ap.x * ab.x + ap.y * ab.y) / ab_len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    point.distance_sq(closest)
}

/// Calculate the minimum distance from a point to a cubic bezier curve
///
/// Samples the curve at regular intervals and measures against the polyline
/// through the samples.
///
/// # Arguments
/// * `point` - The point to measure distance from
/// * `bezier` - The bezier curve
/// * `num_samples` - Number of samples for distance calculation (0 means 20)
pub fn distance_to_bezier(point: Point, bezier: &CubicBezier, num_samples: usize) -> f32 {
    let num_samples = if num_samples == 0 { 20 } else { num_samples };

    let mut min_dist_sq = f32::MAX;
    let mut prev_point = bezier.eval(0.0);

    for i in 1..=num_samples {
        let t = i as f32 / num_samples as f32;
        let curr_point = bezier.eval(t);

        let dist_sq = distance_to_line_segment_sq(point, prev_point, curr_point);
        if dist_sq < min_dist_sq {
            min_dist_sq = dist_sq;
        }

        prev_point = curr_point;
    }

    min_dist_sq.sqrt()
}
