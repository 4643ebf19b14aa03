//! Blending two corresponding outlines into an in-between path.
//!
//! For each step of the correspondence the single-segment side is split into
//! as many equal-parameter pieces as the run on the other side, so both sides
//! have the same cardinality. Matched pieces are then blended control point
//! by control point: `p_i + (q_i − p_i) · t`.

use kurbo::{BezPath, CubicBez, ParamCurve};

use crate::correspond::Correspondence;
use crate::error::MorphError;
use crate::geom::EPSILON;
use crate::outline::Outline;
use crate::segment::Segment;

/// A piece of one side of a step, ready for blending.
#[derive(Debug, Clone, Copy)]
struct Piece {
    curve: CubicBez,
    straight: bool,
}

/// Blend two cubics control point by control point.
pub fn blend_cubic(p: &CubicBez, q: &CubicBez, t: f64) -> CubicBez {
    CubicBez::new(
        p.p0.lerp(q.p0, t),
        p.p1.lerp(q.p1, t),
        p.p2.lerp(q.p2, t),
        p.p3.lerp(q.p3, t),
    )
}

/// Produce the closed in-between path for blend factor `t ∈ [0, 1]`.
///
/// `t = 0` reproduces `a` and `t = 1` reproduces `b`, up to the subdivision
/// used to equalize run lengths. Zero-length pieces (corner markers blended
/// with corner markers) are dropped. A correspondence whose steps fall
/// outside the outlines fails with [`MorphError::Mismatch`].
pub fn interpolate(
    a: &Outline,
    b: &Outline,
    correspondence: &Correspondence,
    t: f64,
) -> Result<BezPath, MorphError> {
    if !(0.0..=1.0).contains(&t) {
        return Err(MorphError::BlendFactor(t));
    }

    let mut path = BezPath::new();
    for step in correspondence.steps() {
        let (Some(run_a), Some(run_b)) = (
            a.segments().get(step.a.clone()),
            b.segments().get(step.b.clone()),
        ) else {
            return Err(MorphError::Mismatch(format!(
                "step {:?} / {:?} outside outlines of {} and {} segments",
                step.a,
                step.b,
                a.len(),
                b.len()
            )));
        };
        let width = step.width();
        let from = pieces(run_a, width);
        let to = pieces(run_b, width);

        for (p, q) in from.iter().zip(&to) {
            let c = blend_cubic(&p.curve, &q.curve, t);
            if path.elements().is_empty() {
                path.move_to(c.p0);
            }
            if is_point(&c) {
                continue;
            }
            if p.straight && q.straight {
                path.line_to(c.p3);
            } else {
                path.curve_to(c.p1, c.p2, c.p3);
            }
        }
    }
    if !path.elements().is_empty() {
        path.close_path();
    }
    Ok(path)
}

/// Bring a side of a step to `width` pieces.
///
/// A run already has `width` segments. A single segment is split into
/// `width` equal-parameter parts.
fn pieces(segments: &[Segment], width: usize) -> Vec<Piece> {
    match segments {
        [single] if width > 1 => {
            let curve = single.to_cubic();
            (0..width)
                .map(|k| Piece {
                    curve: curve.subsegment(k as f64 / width as f64..(k + 1) as f64 / width as f64),
                    straight: single.is_straight(),
                })
                .collect()
        }
        _ => segments
            .iter()
            .map(|s| Piece {
                curve: s.to_cubic(),
                straight: s.is_straight(),
            })
            .collect(),
    }
}

fn is_point(c: &CubicBez) -> bool {
    [c.p1, c.p2, c.p3]
        .iter()
        .all(|p| (*p - c.p0).length() < EPSILON)
}
