//! Shared geometry utilities.

use std::f64::consts::PI;

use kurbo::{BezPath, CubicBez, PathEl, Point, Vec2};

/// Vectors shorter than this are treated as zero.
pub(crate) const EPSILON: f64 = 1e-9;

/// Signed area of a BezPath via the shoelace formula (on-curve points only).
///
/// Positive = counter-clockwise, negative = clockwise.
pub fn signed_area(path: &BezPath) -> f64 {
    let mut area = 0.0;
    let mut first = Point::ZERO;
    let mut current = Point::ZERO;
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                first = p;
                current = p;
            }
            PathEl::LineTo(p) | PathEl::CurveTo(_, _, p) | PathEl::QuadTo(_, p) => {
                area += current.x * p.y - p.x * current.y;
                current = p;
            }
            PathEl::ClosePath => {
                area += current.x * first.y - first.x * current.y;
            }
        }
    }
    // Implicit closing edge for paths that end without ClosePath.
    if !matches!(path.elements().last(), Some(PathEl::ClosePath)) {
        area += current.x * first.y - first.x * current.y;
    }
    area / 2.0
}

/// Reverse a BezPath's winding direction.
pub fn reverse_path(path: &BezPath) -> BezPath {
    let mut first = Point::ZERO;
    let mut segments: Vec<(Point, Seg)> = Vec::new();
    let mut closed = false;

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => first = p,
            PathEl::LineTo(p) => segments.push((p, Seg::Line)),
            PathEl::CurveTo(a, b, p) => segments.push((p, Seg::Curve(a, b))),
            PathEl::QuadTo(a, p) => segments.push((p, Seg::Quad(a))),
            PathEl::ClosePath => closed = true,
        }
    }

    let mut output = BezPath::new();
    let Some(&(last, _)) = segments.last() else {
        output.move_to(first);
        if closed {
            output.close_path();
        }
        return output;
    };

    output.move_to(last);
    for i in (0..segments.len()).rev() {
        let target = if i == 0 { first } else { segments[i - 1].0 };
        match segments[i].1 {
            Seg::Line => output.line_to(target),
            Seg::Curve(a, b) => output.curve_to(b, a, target),
            Seg::Quad(a) => output.quad_to(a, target),
        }
    }

    if closed {
        output.close_path();
    }
    output
}

#[derive(Clone, Copy)]
enum Seg {
    Line,
    Curve(Point, Point),
    Quad(Point),
}

/// Wrap an angle into the principal range (-π, π].
pub fn normalize_angle(mut angle: f64) -> f64 {
    while angle <= -PI {
        angle += 2.0 * PI;
    }
    while angle > PI {
        angle -= 2.0 * PI;
    }
    angle
}

/// Signed angle turned when going from direction `from` to direction `to`.
pub fn turn_between(from: Vec2, to: Vec2) -> f64 {
    if from.length() < EPSILON || to.length() < EPSILON {
        return 0.0;
    }
    normalize_angle(to.atan2() - from.atan2())
}

/// Leaving tangent of a cubic, skipping coincident control points.
pub fn start_tangent(c: &CubicBez) -> Vec2 {
    [c.p1 - c.p0, c.p2 - c.p0, c.p3 - c.p0]
        .into_iter()
        .find(|v| v.length() >= EPSILON)
        .unwrap_or(Vec2::ZERO)
}

/// Arriving tangent of a cubic, skipping coincident control points.
pub fn end_tangent(c: &CubicBez) -> Vec2 {
    [c.p3 - c.p2, c.p3 - c.p1, c.p3 - c.p0]
        .into_iter()
        .find(|v| v.length() >= EPSILON)
        .unwrap_or(Vec2::ZERO)
}

/// A cubic whose control points lie on the chord at thirds.
pub fn line_cubic(p0: Point, p1: Point) -> CubicBez {
    CubicBez::new(p0, p0.lerp(p1, 1.0 / 3.0), p0.lerp(p1, 2.0 / 3.0), p1)
}
