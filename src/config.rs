use std::f64::consts::PI;

use crate::error::MorphError;

/// All comparison parameters in one struct.
/// Adjustable at runtime, one instance can drive any number of solves.
#[derive(Debug, Clone)]
pub struct MorphConfig {
    // -- Normalization --
    /// Which extremal point a closed outline is rotated to start at.
    pub start: StartKey,
    /// Resampling tolerance in outline units. Each segment is split into
    /// `ceil(length / tolerance)` pieces of equal arc length.
    /// `None` keeps the segments as drawn.
    pub tolerance: Option<f64>,
    /// If true, outline B is reversed when its winding disagrees with A.
    pub fix_direction: bool,
    /// Accuracy handed to kurbo for arc length queries.
    pub accuracy: f64,

    // -- Cost model --
    /// How two segments are compared.
    pub cost: CostModel,
    /// Multiplier on the phase penalty (`sqrt(|pos_a - pos_b|)`).
    /// 0 disables it.
    pub phase_weight: f64,
    /// Weight given to a corner marker, in outline units.
    /// Corners have no length of their own.
    pub corner_weight: f64,
    /// Minimum absolute turn (radians) at a vertex for a corner marker to be
    /// inserted. Only used by [`CostModel::Turning`].
    pub corner_threshold: f64,

    // -- Solver --
    /// Lookback window: the most consecutive segments of one outline that may
    /// be matched against a single segment of the other.
    pub window: usize,
    /// Largest segment count accepted per outline (after resampling).
    pub max_segments: usize,
}

/// Ranking key for the canonical starting segment of an outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartKey {
    /// Leftmost start point.
    #[default]
    MinX,
    /// Lowest start point.
    MinY,
}

/// Segment dissimilarity variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CostModel {
    /// Compare absolute chord directions of edges.
    #[default]
    Direction,
    /// Compare turning angles: in-flight turn of edges plus corner markers
    /// inserted at vertices. Invariant under rotation of either outline.
    Turning,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            start: StartKey::MinX,
            tolerance: Some(20.0),
            fix_direction: true,
            accuracy: 1e-3,
            cost: CostModel::Direction,
            phase_weight: PI,
            corner_weight: 20.0,
            corner_threshold: 0.05,
            window: 6,
            max_segments: 2000,
        }
    }
}

impl MorphConfig {
    /// Reject parameter combinations the solver cannot work with.
    pub fn validate(&self) -> Result<(), MorphError> {
        if self.window == 0 {
            return Err(MorphError::InvalidConfig("window must be at least 1".into()));
        }
        if let Some(tol) = self.tolerance {
            if !(tol.is_finite() && tol > 0.0) {
                return Err(MorphError::InvalidConfig(format!(
                    "tolerance must be positive, got {}",
                    tol
                )));
            }
        }
        if !(self.accuracy.is_finite() && self.accuracy > 0.0) {
            return Err(MorphError::InvalidConfig(format!(
                "accuracy must be positive, got {}",
                self.accuracy
            )));
        }
        for (name, value) in [
            ("phase_weight", self.phase_weight),
            ("corner_weight", self.corner_weight),
            ("corner_threshold", self.corner_threshold),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(MorphError::InvalidConfig(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        if self.max_segments == 0 {
            return Err(MorphError::InvalidConfig(
                "max_segments must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(MorphConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_window_is_rejected() {
        let config = MorphConfig {
            window: 0,
            ..MorphConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MorphError::InvalidConfig(_))
        ));
    }

    #[test]
    fn bad_tolerance_is_rejected() {
        for tol in [0.0, -1.0, f64::NAN] {
            let config = MorphConfig {
                tolerance: Some(tol),
                ..MorphConfig::default()
            };
            assert!(config.validate().is_err(), "tolerance {} accepted", tol);
        }
    }
}
