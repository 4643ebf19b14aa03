//! Directed outline segments: edges and corner markers.
//!
//! An outline is a cyclic sequence of [`Segment`]s. Edges carry real
//! geometry (kept in cubic form so that lines, quadratics and cubics can be
//! subdivided and blended the same way). Corner markers are zero-length
//! pseudo-segments that record the exterior angle at a vertex.

use kurbo::{CubicBez, ParamCurve, ParamCurveArclen, PathSeg, Point, Vec2};

use crate::config::CostModel;
use crate::error::MorphError;
use crate::geom::{end_tangent, line_cubic, start_tangent, turn_between, EPSILON};

/// A directed atomic piece of an outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Edge(Edge),
    Corner(Corner),
}

/// A drawn piece of curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Geometry in cubic form. Lines have their handles at the chord thirds.
    pub curve: CubicBez,
    /// Arc length (exact for straight edges).
    pub length: f64,
    /// True when the piece came from a line.
    pub straight: bool,
}

/// Zero-length marker for the turn between two edges at a vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub at: Point,
    /// Exterior angle in (-π, π], positive for a left (counter-clockwise) turn.
    pub turn: f64,
}

impl Edge {
    /// Build an edge from a path segment.
    ///
    /// Returns `Ok(None)` for degenerate (zero-length) segments, which would
    /// otherwise have no defined direction. Coordinates large enough that the
    /// length or direction overflows fail with [`MorphError::NonFinite`].
    pub fn from_seg(seg: PathSeg, accuracy: f64) -> Result<Option<Self>, MorphError> {
        let edge = match seg {
            PathSeg::Line(line) => Edge {
                curve: line_cubic(line.p0, line.p1),
                length: (line.p1 - line.p0).length(),
                straight: true,
            },
            PathSeg::Quad(q) => Self::curved(q.raise(), accuracy),
            PathSeg::Cubic(c) => Self::curved(c, accuracy),
        };
        if !edge.length.is_finite() {
            return Err(MorphError::NonFinite);
        }
        if edge.length < EPSILON {
            return Ok(None);
        }
        if !(edge.direction().is_finite() && edge.turn().is_finite()) {
            return Err(MorphError::NonFinite);
        }
        Ok(Some(edge))
    }

    fn curved(curve: CubicBez, accuracy: f64) -> Self {
        Edge {
            curve,
            length: curve.arclen(accuracy),
            straight: false,
        }
    }

    /// Chord vector, or the leaving tangent when the chord vanishes
    /// (a piece that returns to its own start).
    pub fn direction(&self) -> Vec2 {
        let chord = self.curve.p3 - self.curve.p0;
        if chord.length() >= EPSILON {
            chord
        } else {
            start_tangent(&self.curve)
        }
    }

    /// Direction change while travelling along the piece. Zero for lines.
    pub fn turn(&self) -> f64 {
        if self.straight {
            0.0
        } else {
            turn_between(start_tangent(&self.curve), end_tangent(&self.curve))
        }
    }

    /// Split into `pieces` children of equal arc length.
    pub fn split(&self, pieces: usize, accuracy: f64) -> Vec<Edge> {
        if pieces <= 1 {
            return vec![*self];
        }
        let step = self.length / pieces as f64;
        let params: Vec<f64> = (0..=pieces)
            .map(|k| {
                if k == 0 {
                    0.0
                } else if k == pieces {
                    1.0
                } else if self.straight {
                    k as f64 / pieces as f64
                } else {
                    self.curve.inv_arclen(step * k as f64, accuracy)
                }
            })
            .collect();
        let (p0, p3) = (self.curve.p0, self.curve.p3);
        params
            .windows(2)
            .map(|w| Edge {
                curve: if self.straight {
                    line_cubic(p0.lerp(p3, w[0]), p0.lerp(p3, w[1]))
                } else {
                    self.curve.subsegment(w[0]..w[1])
                },
                length: step,
                straight: self.straight,
            })
            .collect()
    }
}

impl Segment {
    pub fn start(&self) -> Point {
        match self {
            Segment::Edge(e) => e.curve.p0,
            Segment::Corner(c) => c.at,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Segment::Edge(e) => e.curve.p3,
            Segment::Corner(c) => c.at,
        }
    }

    /// Direction vector; zero for corner markers.
    pub fn direction(&self) -> Vec2 {
        match self {
            Segment::Edge(e) => e.direction(),
            Segment::Corner(_) => Vec2::ZERO,
        }
    }

    /// Arc length; zero for corner markers.
    pub fn length(&self) -> f64 {
        match self {
            Segment::Edge(e) => e.length,
            Segment::Corner(_) => 0.0,
        }
    }

    /// Signed turning angle in (-π, π].
    ///
    /// The exterior angle for corner markers, the in-flight direction
    /// change for edges (zero for straight ones).
    pub fn turn(&self) -> f64 {
        match self {
            Segment::Edge(e) => e.turn(),
            Segment::Corner(c) => c.turn,
        }
    }

    /// The angle compared by the given cost model.
    pub fn angle(&self, model: CostModel) -> f64 {
        match (model, self) {
            (CostModel::Direction, Segment::Edge(e)) => e.direction().atan2(),
            _ => self.turn(),
        }
    }

    /// Scale applied to this segment's mismatch cost.
    pub fn weight(&self, corner_weight: f64) -> f64 {
        match self {
            Segment::Edge(e) => e.length,
            Segment::Corner(_) => corner_weight,
        }
    }

    pub fn is_corner(&self) -> bool {
        matches!(self, Segment::Corner(_))
    }

    /// True when the segment draws as a straight line (corners included).
    pub fn is_straight(&self) -> bool {
        match self {
            Segment::Edge(e) => e.straight,
            Segment::Corner(_) => true,
        }
    }

    /// Cubic form; a corner marker collapses to a point.
    pub fn to_cubic(&self) -> CubicBez {
        match self {
            Segment::Edge(e) => e.curve,
            Segment::Corner(c) => CubicBez::new(c.at, c.at, c.at, c.at),
        }
    }
}
