//! Outline normalization: raw closed contour → comparable segment sequence.
//!
//! 1. Split the contour into edges, dropping zero-length pieces
//! 2. Rotate the cyclic sequence to start at a canonical extremal point
//! 3. Optionally insert corner markers at vertices (turning cost model)
//! 4. Optionally resample edges into pieces of near-uniform length

use kurbo::{BezPath, PathEl, Point};

use crate::config::{CostModel, MorphConfig, StartKey};
use crate::error::MorphError;
use crate::geom::{end_tangent, start_tangent, turn_between};
use crate::segment::{Corner, Edge, Segment};

/// One closed contour as a cyclic, canonically rotated segment sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    segments: Vec<Segment>,
}

impl Outline {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Build a normalized outline from a single closed contour.
    ///
    /// A contour without `ClosePath` is closed by an implicit line back to
    /// its first point. A path with no drawable segment gives an empty
    /// outline.
    pub fn from_path(path: &BezPath, config: &MorphConfig) -> Result<Self, MorphError> {
        let edges = edges_of(path, config.accuracy)?;
        let mut outline = Outline::new(edges.into_iter().map(Segment::Edge).collect())
            .rotate_to(config.start);

        if config.cost == CostModel::Turning {
            outline = outline.with_corners(config.corner_threshold);
        }

        // Counted in f64 so a tiny tolerance cannot overflow the sum.
        let planned: f64 = match config.tolerance {
            Some(tol) => outline
                .segments
                .iter()
                .map(|s| match s {
                    Segment::Edge(e) => (e.length / tol).ceil().max(1.0),
                    Segment::Corner(_) => 1.0,
                })
                .sum(),
            None => outline.len() as f64,
        };
        if planned > config.max_segments as f64 {
            return Err(MorphError::TooLarge {
                segments: planned as usize,
                limit: config.max_segments,
            });
        }

        if let Some(tol) = config.tolerance {
            outline = outline.resample(tol, config.accuracy);
        }
        Ok(outline)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total arc length of all edges.
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(Segment::length).sum()
    }

    /// Normalized position of segment `index` along the outline, in (0, 1).
    pub fn position(&self, index: usize) -> f64 {
        (index as f64 + 0.5) / self.segments.len().max(1) as f64
    }

    /// Cyclic rotation starting at the segment whose start point minimizes
    /// `key`. Ties go to the first occurrence.
    pub fn rotate_to(&self, key: StartKey) -> Outline {
        let starts = self.segments.iter().map(Segment::start);
        let Some(first) = canonical_start(starts, key) else {
            return self.clone();
        };
        let mut segments = self.segments.clone();
        segments.rotate_left(first);
        Outline { segments }
    }

    /// Insert a corner marker before every edge whose incoming turn is at
    /// least `threshold` radians. Existing corner markers are replaced.
    pub fn with_corners(&self, threshold: f64) -> Outline {
        let edges: Vec<&Edge> = self
            .segments
            .iter()
            .filter_map(|s| match s {
                Segment::Edge(e) => Some(e),
                Segment::Corner(_) => None,
            })
            .collect();
        let n = edges.len();
        let mut segments = Vec::with_capacity(n * 2);
        for (k, edge) in edges.iter().enumerate() {
            let prev = edges[(k + n - 1) % n];
            let turn = turn_between(end_tangent(&prev.curve), start_tangent(&edge.curve));
            if turn.abs() >= threshold {
                segments.push(Segment::Corner(Corner {
                    at: edge.curve.p0,
                    turn,
                }));
            }
            segments.push(Segment::Edge(**edge));
        }
        Outline { segments }
    }

    /// Subdivide every edge into `ceil(length / tolerance)` children of equal
    /// arc length. Corner markers pass through unchanged.
    pub fn resample(&self, tolerance: f64, accuracy: f64) -> Outline {
        let segments = self
            .segments
            .iter()
            .flat_map(|s| match s {
                Segment::Edge(e) => e
                    .split(pieces_for(e.length, tolerance), accuracy)
                    .into_iter()
                    .map(Segment::Edge)
                    .collect(),
                Segment::Corner(_) => vec![*s],
            })
            .collect();
        Outline { segments }
    }

    /// Draw the outline as a closed path.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some(first) = self.segments.first() else {
            return path;
        };
        path.move_to(first.start());
        for seg in &self.segments {
            match seg {
                Segment::Edge(e) if e.straight => path.line_to(e.curve.p3),
                Segment::Edge(e) => path.curve_to(e.curve.p1, e.curve.p2, e.curve.p3),
                Segment::Corner(_) => {}
            }
        }
        path.close_path();
        path
    }
}

/// Index of the point minimizing the ranking key (first on ties).
pub fn canonical_start(points: impl IntoIterator<Item = Point>, key: StartKey) -> Option<usize> {
    let rank = |p: Point| match key {
        StartKey::MinX => p.x,
        StartKey::MinY => p.y,
    };
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in points.into_iter().enumerate() {
        let r = rank(p);
        if best.map_or(true, |(_, b)| r < b) {
            best = Some((i, r));
        }
    }
    best.map(|(i, _)| i)
}

/// Number of resampled pieces for an edge of the given length.
/// Callers bound `length / tolerance` first; the cast saturates otherwise.
fn pieces_for(length: f64, tolerance: f64) -> usize {
    ((length / tolerance).ceil() as usize).max(1)
}

/// Split a single-contour path into non-degenerate edges.
fn edges_of(path: &BezPath, accuracy: f64) -> Result<Vec<Edge>, MorphError> {
    let elements = path.elements();
    let mut subpaths = 0;
    for el in elements {
        let finite = match *el {
            PathEl::MoveTo(p) => {
                subpaths += 1;
                p.is_finite()
            }
            PathEl::LineTo(p) => p.is_finite(),
            PathEl::QuadTo(a, p) => a.is_finite() && p.is_finite(),
            PathEl::CurveTo(a, b, p) => a.is_finite() && b.is_finite() && p.is_finite(),
            PathEl::ClosePath => true,
        };
        if !finite {
            return Err(MorphError::NonFinite);
        }
    }
    if subpaths > 1 {
        return Err(MorphError::InvalidPath(format!(
            "expected a single contour, found {} subpaths",
            subpaths
        )));
    }
    if !elements.is_empty() && !matches!(elements[0], PathEl::MoveTo(_)) {
        return Err(MorphError::InvalidPath("path must start with MoveTo".into()));
    }

    let mut edges: Vec<Edge> = Vec::new();
    for seg in path.segments() {
        edges.extend(Edge::from_seg(seg, accuracy)?);
    }

    // Implicit closing segment for contours that stop short of their start.
    if !matches!(elements.last(), Some(PathEl::ClosePath)) {
        if let (Some(first), Some(last)) = (edges.first(), edges.last()) {
            let closing = kurbo::Line::new(last.curve.p3, first.curve.p0);
            if let Some(edge) = Edge::from_seg(kurbo::PathSeg::Line(closing), accuracy)? {
                edges.push(edge);
            }
        }
    }
    Ok(edges)
}
