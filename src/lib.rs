//! glyphmorph: correspondence and interpolation between two drawings of the
//! same glyph outline.
//!
//! Two closed contours with different point structure (one traced, one hand
//! drawn, or the same glyph from two masters) are normalized into comparable
//! segment sequences, aligned with a bounded-lookback dynamic program, and
//! blended into in-between outlines for any factor `t ∈ [0, 1]`.
//!
//! # Example
//!
//! ```
//! use glyphmorph::{kurbo::BezPath, morph, MorphConfig};
//!
//! let mut a = BezPath::new();
//! a.move_to((0.0, 0.0));
//! a.line_to((100.0, 0.0));
//! a.line_to((50.0, 100.0));
//! a.close_path();
//!
//! let mut b = BezPath::new();
//! b.move_to((20.0, 20.0));
//! b.line_to((120.0, 20.0));
//! b.line_to((70.0, 120.0));
//! b.close_path();
//!
//! let result = morph(&a, &b, &MorphConfig::default())?;
//! let halfway = result.interpolate(0.5)?;
//! assert!(result.cost() < 1e-3);
//! # let _ = halfway;
//! # Ok::<(), glyphmorph::MorphError>(())
//! ```

#![forbid(unsafe_code)]

mod config;
mod geom;

pub mod align;
pub mod correspond;
pub mod cost;
pub mod error;
pub mod interpolate;
pub mod outline;
pub mod render;
pub mod segment;

#[cfg(feature = "ufo")]
pub mod ufo;

// Re-export kurbo so downstream users get the same version
// used by the inputs and outputs (kurbo::BezPath).
pub use kurbo;

pub use align::Alignment;
pub use config::{CostModel, MorphConfig, StartKey};
pub use correspond::{Correspondence, Step};
pub use error::MorphError;
pub use geom::{reverse_path, signed_area};
pub use outline::Outline;
pub use segment::Segment;

use kurbo::{BezPath, Point};
use rayon::prelude::*;

use cost::SegmentCost;

/// A solved correspondence between two contours.
#[derive(Debug, Clone)]
pub struct Morph {
    a: Outline,
    b: Outline,
    correspondence: Correspondence,
}

impl Morph {
    /// Total alignment cost (informational).
    pub fn cost(&self) -> f64 {
        self.correspondence.cost()
    }

    /// Normalized outline A.
    pub fn outline_a(&self) -> &Outline {
        &self.a
    }

    /// Normalized outline B.
    pub fn outline_b(&self) -> &Outline {
        &self.b
    }

    pub fn correspondence(&self) -> &Correspondence {
        &self.correspondence
    }

    /// The in-between contour for blend factor `t`.
    pub fn interpolate(&self, t: f64) -> Result<BezPath, MorphError> {
        interpolate::interpolate(&self.a, &self.b, &self.correspondence, t)
    }

    /// One in-between contour per blend factor.
    pub fn interpolate_many(&self, ts: &[f64]) -> Result<Vec<BezPath>, MorphError> {
        ts.iter().map(|&t| self.interpolate(t)).collect()
    }

    /// Start points of each matched step, for drawing anchor lines.
    pub fn anchors(&self) -> Vec<(Point, Point)> {
        let (sa, sb) = (self.a.segments(), self.b.segments());
        self.correspondence
            .steps()
            .iter()
            .map(|step| (sa[step.a.start].start(), sb[step.b.start].start()))
            .collect()
    }
}

/// Compare two closed contours and solve their correspondence.
///
/// Pipeline: winding check → normalization (rotation, corner markers,
/// resampling) → bounded-lookback alignment → backtracking.
pub fn morph(a: &BezPath, b: &BezPath, config: &MorphConfig) -> Result<Morph, MorphError> {
    config.validate()?;

    let b = if config.fix_direction && winding_disagrees(a, b) {
        tracing::debug!("reversing outline B to match the winding of A");
        reverse_path(b)
    } else {
        b.clone()
    };

    let outline_a = Outline::from_path(a, config)?;
    let outline_b = Outline::from_path(&b, config)?;

    let cost = SegmentCost::from_config(config);
    let alignment = Alignment::solve(&outline_a, &outline_b, &cost, config.window)?;
    let correspondence = Correspondence::from_alignment(&alignment);

    tracing::debug!(
        a = outline_a.len(),
        b = outline_b.len(),
        steps = correspondence.steps().len(),
        cost = correspondence.cost(),
        "contour pair solved"
    );

    Ok(Morph {
        a: outline_a,
        b: outline_b,
        correspondence,
    })
}

fn winding_disagrees(a: &BezPath, b: &BezPath) -> bool {
    let (area_a, area_b) = (signed_area(a), signed_area(b));
    area_a != 0.0 && area_b != 0.0 && area_a.signum() != area_b.signum()
}

/// Solved correspondences for every contour of a glyph.
#[derive(Debug, Clone)]
pub struct GlyphMorph {
    pub contours: Vec<Morph>,
}

impl GlyphMorph {
    /// Sum of the per-contour costs.
    pub fn cost(&self) -> f64 {
        self.contours.iter().map(Morph::cost).sum()
    }

    /// The in-between glyph for blend factor `t`, one path per contour.
    pub fn interpolate(&self, t: f64) -> Result<Vec<BezPath>, MorphError> {
        self.contours.iter().map(|m| m.interpolate(t)).collect()
    }
}

/// Compare two glyphs contour by contour.
///
/// Contours are paired by index; both glyphs must have the same number.
/// Pairs are solved in parallel, each with its own state table.
pub fn morph_glyphs(
    a: &[BezPath],
    b: &[BezPath],
    config: &MorphConfig,
) -> Result<GlyphMorph, MorphError> {
    if a.len() != b.len() {
        return Err(MorphError::ContourCountMismatch {
            a: a.len(),
            b: b.len(),
        });
    }
    let contours = a
        .par_iter()
        .zip(b.par_iter())
        .map(|(pa, pb)| morph(pa, pb, config))
        .collect::<Result<Vec<_>, _>>()?;

    let result = GlyphMorph { contours };
    tracing::info!(
        contours = result.contours.len(),
        cost = result.cost(),
        "glyph compared"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, size: f64, ccw: bool) -> BezPath {
        let mut pts = vec![
            (x, y),
            (x + size, y),
            (x + size, y + size),
            (x, y + size),
        ];
        if !ccw {
            pts.reverse();
        }
        let mut path = BezPath::new();
        path.move_to(pts[0]);
        for &p in &pts[1..] {
            path.line_to(p);
        }
        path.close_path();
        path
    }

    #[test]
    fn opposite_winding_is_fixed() {
        let config = MorphConfig {
            tolerance: None,
            ..MorphConfig::default()
        };
        let m = morph(&square(0.0, 0.0, 10.0, true), &square(0.0, 0.0, 10.0, false), &config)
            .expect("solvable");
        assert_eq!(m.cost(), 0.0);
    }

    #[test]
    fn contour_counts_must_match() {
        let a = vec![square(0.0, 0.0, 10.0, true)];
        let b = vec![square(0.0, 0.0, 10.0, true), square(2.0, 2.0, 3.0, false)];
        assert!(matches!(
            morph_glyphs(&a, &b, &MorphConfig::default()),
            Err(MorphError::ContourCountMismatch { a: 1, b: 2 })
        ));
    }

    #[test]
    fn glyph_cost_sums_contours() {
        let a = vec![square(0.0, 0.0, 100.0, true), square(20.0, 20.0, 40.0, false)];
        let b = vec![square(5.0, 5.0, 100.0, true), square(25.0, 25.0, 40.0, false)];
        let glyph = morph_glyphs(&a, &b, &MorphConfig::default()).expect("solvable");
        assert_eq!(glyph.contours.len(), 2);
        let sum: f64 = glyph.contours.iter().map(Morph::cost).sum();
        assert_eq!(glyph.cost(), sum);
        assert!(glyph.cost() < 1e-3, "cost {}", glyph.cost());
        assert_eq!(glyph.interpolate(0.5).expect("valid t").len(), 2);
    }

    #[test]
    fn anchors_start_at_canonical_points() {
        let m = morph(
            &square(0.0, 0.0, 10.0, true),
            &square(3.0, 4.0, 10.0, true),
            &MorphConfig::default(),
        )
        .expect("solvable");
        let anchors = m.anchors();
        assert_eq!(anchors.first(), Some(&(Point::new(0.0, 0.0), Point::new(3.0, 4.0))));
        assert_eq!(anchors.len(), m.correspondence().steps().len());
    }
}
