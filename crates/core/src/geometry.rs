//! Planar geometry primitives for landmark tracings
//!
//! All coordinates are image pixels at the resolution the landmarks were
//! placed on (rendered size, y axis pointing down). Degenerate inputs such as
//! zero-length rays, coincident line points or parallel lines yield `None`
//! instead of NaN.

use std::f64::consts::PI;

/// Determinant magnitude below which two lines are treated as parallel
pub const PARALLEL_EPSILON: f64 = 1e-9;

/// Image-space point in pixels
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    /// Create a new point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Scale each axis independently (rendered size to native size and back)
    pub fn scaled(&self, sx: f64, sy: f64) -> Point {
        Point::new(self.x * sx, self.y * sy)
    }
}

/// Direction from `from` to `to` as a plain `(dx, dy)` pair
fn delta(from: Point, to: Point) -> (f64, f64) {
    (to.x - from.x, to.y - from.y)
}

fn dot(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.0 + a.1 * b.1
}

fn cross(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.1 - a.1 * b.0
}

fn angle_between_vectors(v1: (f64, f64), v2: (f64, f64)) -> Option<f64> {
    let m1 = v1.0.hypot(v1.1);
    let m2 = v2.0.hypot(v2.1);
    if m1 == 0.0 || m2 == 0.0 {
        return None;
    }

    // Unit vectors first: `m1 * m2` overflows for far-apart coordinates
    let u1 = (v1.0 / m1, v1.1 / m1);
    let u2 = (v2.0 / m2, v2.1 / m2);
    let cos = dot(u1, u2);
    if !cos.is_finite() {
        return None;
    }

    // Rounding can push the cosine slightly outside [-1, 1]
    Some(cos.clamp(-1.0, 1.0).acos().to_degrees())
}

/// Euclidean distance between two points
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance_to(&b)
}

/// Angle in degrees at `vertex` between the rays towards `p1` and `p2`
///
/// Returns a value in `[0, 180]`, or `None` when either ray has zero length.
pub fn angle_at_vertex(p1: Point, vertex: Point, p2: Point) -> Option<f64> {
    angle_between_vectors(delta(vertex, p1), delta(vertex, p2))
}

/// Angle in degrees between the direction vectors `a1→a2` and `b1→b2`
///
/// Only the directions matter, not where the segments sit. Returns a value in
/// `[0, 180]`, or `None` when either segment has zero length.
pub fn angle_between_directions(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<f64> {
    angle_between_vectors(delta(a1, a2), delta(b1, b2))
}

/// Signed perpendicular distance from `p` to the infinite line through `a` and `b`
///
/// The sign follows `((b − a) × (a − p)) / |b − a|`: with y pointing down, a
/// point drawn above a left-to-right line is positive. `None` when `a == b`.
pub fn signed_distance_to_line(p: Point, a: Point, b: Point) -> Option<f64> {
    let den = a.distance_to(&b);
    if den == 0.0 {
        return None;
    }
    let num = (b.x - a.x) * (a.y - p.y) - (a.x - p.x) * (b.y - a.y);
    Some(num / den).filter(|d| d.is_finite())
}

/// Foot of the perpendicular from `p` onto the line through `a` and `b`
pub fn project_onto_line(p: Point, a: Point, b: Point) -> Option<Point> {
    let dir = delta(a, b);
    let len_sq = dot(dir, dir);
    if len_sq == 0.0 {
        return None;
    }
    let t = dot(delta(a, p), dir) / len_sq;
    Some(Point::new(a.x + t * dir.0, a.y + t * dir.1))
}

/// Signed length of `from→to` measured along the unit direction `a→b`
pub fn scalar_projection(from: Point, to: Point, a: Point, b: Point) -> Option<f64> {
    let dir = delta(a, b);
    let len = dir.0.hypot(dir.1);
    if len == 0.0 {
        return None;
    }
    Some(dot(delta(from, to), dir) / len).filter(|d| d.is_finite())
}

/// Intersection of the infinite lines `a1–a2` and `b1–b2`
///
/// Returns `None` when the lines are parallel or nearly so, or when either
/// line is degenerate.
pub fn line_intersection(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<Point> {
    let da = delta(a1, a2);
    let db = delta(b1, b2);
    let det = cross(da, db);
    if det.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = cross(delta(a1, b1), db) / det;
    Some(Point::new(a1.x + t * da.0, a1.y + t * da.1))
}

/// Drawable arc marking an angle at a vertex
///
/// Angles are radians in image space (y down), so a positive sweep turns
/// clockwise on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcPath {
    pub center: Point,
    pub radius: f64,
    /// Direction of the first ray
    pub start_angle: f64,
    /// Signed sweep in (−π, π]
    pub sweep_angle: f64,
}

impl ArcPath {
    /// Radius used by the annotated overlays
    pub const DEFAULT_RADIUS: f64 = 35.0;

    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep_angle
    }

    pub fn start(&self) -> Point {
        self.point_at(self.start_angle)
    }

    pub fn end(&self) -> Point {
        self.point_at(self.end_angle())
    }

    /// Canvas-style `anticlockwise` flag for `arc(x, y, r, start, end, ccw)`
    pub fn anticlockwise(&self) -> bool {
        self.sweep_angle < 0.0
    }

    /// SVG path data (`M … A …`) for the arc
    pub fn to_svg_path(&self) -> String {
        let start = self.start();
        let end = self.end();
        let large_arc = u8::from(self.sweep_angle.abs() > PI);
        let sweep = u8::from(self.sweep_angle > 0.0);
        format!(
            "M {} {} A {r} {r} 0 {large_arc} {sweep} {} {}",
            start.x,
            start.y,
            end.x,
            end.y,
            r = self.radius
        )
    }

    fn point_at(&self, angle: f64) -> Point {
        Point::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }
}

/// Build the arc spanning the shorter path from `vertex→p1` to `vertex→p2`
///
/// Returns `None` when either ray has zero length.
pub fn arc_path(vertex: Point, p1: Point, p2: Point, radius: f64) -> Option<ArcPath> {
    if p1 == vertex || p2 == vertex {
        return None;
    }
    let a1 = (p1.y - vertex.y).atan2(p1.x - vertex.x);
    let a2 = (p2.y - vertex.y).atan2(p2.x - vertex.x);

    let mut sweep = a2 - a1;
    while sweep <= -PI {
        sweep += 2.0 * PI;
    }
    while sweep > PI {
        sweep -= 2.0 * PI;
    }

    Some(ArcPath {
        center: vertex,
        radius,
        start_angle: a1,
        sweep_angle: sweep,
    })
}
