//! Correspondence reconstruction from a solved alignment.

use std::ops::Range;

use crate::align::Alignment;

/// One move of the alignment: a run of segments on one outline matched
/// against a single segment on the other.
///
/// At least one of the ranges has length 1; both are non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub a: Range<usize>,
    pub b: Range<usize>,
}

impl Step {
    /// Number of pieces each side is brought to before blending.
    pub fn width(&self) -> usize {
        self.a.len().max(self.b.len())
    }
}

/// Ordered list of moves from the origin to the sink, plus the total cost.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Correspondence {
    steps: Vec<Step>,
    cost: f64,
}

impl Correspondence {
    /// Walk the backtracking map from the sink back to the origin.
    ///
    /// Every predecessor strictly reduces at least one coordinate, so the
    /// walk terminates after at most `n1 + n2` steps.
    pub fn from_alignment(alignment: &Alignment) -> Self {
        let mut steps = Vec::new();
        let mut state = alignment.sink();
        while let Some(prev) = alignment.predecessor(state.0, state.1) {
            steps.push(Step {
                a: prev.0..state.0,
                b: prev.1..state.1,
            });
            state = prev;
        }
        steps.reverse();
        let cost = if steps.is_empty() {
            0.0
        } else {
            alignment.total_cost()
        };
        Self { steps, cost }
    }

    #[cfg(test)]
    pub(crate) fn from_steps(steps: Vec<Step>, cost: f64) -> Self {
        Self { steps, cost }
    }

    /// Moves in source-to-sink order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Total alignment cost.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Every matched `(index_a, index_b)` pair, in outline order.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        self.steps
            .iter()
            .flat_map(|step| {
                step.a
                    .clone()
                    .flat_map(move |ia| step.b.clone().map(move |ib| (ia, ib)))
            })
            .collect()
    }
}
