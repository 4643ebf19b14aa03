//! Pairwise dissimilarity between a segment of outline A and one of outline B.
//!
//! ```text
//!   cost(a, b) = w(a) · ( sqrt(|Δangle|) + phase_weight · sqrt(|pos_a − pos_b|) )
//! ```
//!
//! `w(a)` is the arc length of an edge (or `corner_weight` for a corner
//! marker), so mismatching a long, confidently directed piece costs more
//! than mismatching a short one. `Δangle` is wrapped into [0, π]. The phase
//! term keeps the correspondence from drifting in index space when the
//! local geometry alone is cheap.
//!
//! The cost is not symmetric: the weight comes from the first argument.

use crate::config::{CostModel, MorphConfig};
use crate::geom::normalize_angle;
use crate::outline::Outline;
use crate::segment::Segment;

/// Cost function parameters for one solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentCost {
    pub model: CostModel,
    pub phase_weight: f64,
    pub corner_weight: f64,
}

impl SegmentCost {
    pub fn from_config(config: &MorphConfig) -> Self {
        Self {
            model: config.cost,
            phase_weight: config.phase_weight,
            corner_weight: config.corner_weight,
        }
    }

    /// Local disagreement of `a` against `b`, ignoring position.
    pub fn local(&self, a: &Segment, b: &Segment) -> f64 {
        let delta = normalize_angle(a.angle(self.model) - b.angle(self.model)).abs();
        a.weight(self.corner_weight) * delta.sqrt()
    }

    /// Full cost of `a` (at normalized position `pos_a`) against `b`
    /// (at `pos_b`).
    pub fn pair(&self, a: &Segment, pos_a: f64, b: &Segment, pos_b: f64) -> f64 {
        self.combine(
            a.weight(self.corner_weight),
            a.angle(self.model),
            pos_a,
            b.angle(self.model),
            pos_b,
        )
    }

    /// Same as [`pair`](Self::pair), reading precomputed per-segment values.
    pub(crate) fn profiled(&self, a: &CostProfile, ia: usize, b: &CostProfile, ib: usize) -> f64 {
        self.combine(a.weight[ia], a.angle[ia], a.pos[ia], b.angle[ib], b.pos[ib])
    }

    fn combine(&self, weight: f64, angle_a: f64, pos_a: f64, angle_b: f64, pos_b: f64) -> f64 {
        let delta = normalize_angle(angle_a - angle_b).abs();
        let phase = self.phase_weight * (pos_a - pos_b).abs().sqrt();
        let cost = weight * (delta.sqrt() + phase);
        // May overflow to infinity for huge outlines, never NaN.
        debug_assert!(cost >= 0.0, "bad segment cost {}", cost);
        cost
    }
}

/// Per-segment quantities read by the cost, computed once per outline so the
/// solver's inner loop does no trigonometry.
#[derive(Debug, Clone)]
pub(crate) struct CostProfile {
    angle: Vec<f64>,
    weight: Vec<f64>,
    pos: Vec<f64>,
}

impl CostProfile {
    pub(crate) fn new(outline: &Outline, cost: &SegmentCost) -> Self {
        let segments = outline.segments();
        Self {
            angle: segments.iter().map(|s| s.angle(cost.model)).collect(),
            weight: segments.iter().map(|s| s.weight(cost.corner_weight)).collect(),
            pos: (0..segments.len()).map(|i| outline.position(i)).collect(),
        }
    }
}

impl Segment {
    /// Dissimilarity of this segment against `other` under `cost`, without
    /// the phase penalty.
    pub fn cost(&self, other: &Segment, cost: &SegmentCost) -> f64 {
        cost.local(self, other)
    }
}
