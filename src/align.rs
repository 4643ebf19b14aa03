//! Bounded-lookback alignment of two outlines via dynamic programming.
//!
//! ## Recurrence
//!
//! A state `(i, j)` means "the first `i` segments of A have been matched
//! against the first `j` segments of B". From the origin `(0, 0)` every move
//! consumes a run of one outline against a single segment of the other:
//!
//! ```text
//!   V(0, 0) = 0
//!   V(i, j) = min(
//!     min_{k ∈ [i−L, i−1]}  V(k, j−1) + Σ_{l=k}^{i−1} cost(A[l], B[j−1]),   // run of A
//!     min_{k ∈ [j−L, j−1]}  V(i−1, k) + Σ_{l=k}^{j−1} cost(B[l], A[i−1]),   // run of B
//!   )
//! ```
//!
//! `L` is the lookback window. It bounds how many segments may collapse onto
//! one, which keeps the solve at `O(n1 · n2 · L)` time and `O(n1 · n2)`
//! space. States with exactly one zero coordinate have no incoming move and
//! stay at infinity; the sink `(n1, n2)` is reachable exactly when
//! `n1 ≤ L · n2` and `n2 ≤ L · n1`.
//!
//! ## Tie-break
//!
//! Candidates are visited run-of-A first, then run-of-B, each with `k`
//! descending from the nearest predecessor. The first strictly smaller
//! candidate wins, so equal-cost alternatives resolve toward the diagonal.
//!
//! ## Backtracking map
//!
//! Each state stores its winning move in two bytes: the run length, with the
//! top bit telling which outline the run was on. The predecessor is rebuilt
//! from `(i, j)` and the move.

use crate::cost::{CostProfile, SegmentCost};
use crate::error::MorphError;
use crate::outline::Outline;

/// A pair of prefix lengths `(i, j)`.
pub type State = (usize, usize);

/// Packed winning move: 0 for none, otherwise the run length, with
/// `RUN_ON_B` set when the run is on outline B.
type Move = u16;

const RUN_ON_B: Move = 0x8000;

/// Largest lookback window the packed backtracking map can record.
pub const MAX_WINDOW: usize = 0x7FFF;

/// Solved state table and backtracking map for one pair of outlines.
#[derive(Debug, Clone)]
pub struct Alignment {
    n1: usize,
    n2: usize,
    window: usize,
    /// Minimal cost per state, row-major over `(n1 + 1) × (n2 + 1)`.
    value: Vec<f64>,
    /// Winning move per state. 0 for the origin and unreachable states.
    back: Vec<Move>,
}

impl Alignment {
    /// Fill the state table for outlines `a` and `b`.
    ///
    /// An empty outline on either side collapses the problem to the origin:
    /// zero cost, no moves. Segment costs that overflow to infinity leave the
    /// sink unreachable and fail with [`MorphError::CostOverflow`].
    pub fn solve(
        a: &Outline,
        b: &Outline,
        cost: &SegmentCost,
        window: usize,
    ) -> Result<Self, MorphError> {
        if window == 0 {
            return Err(MorphError::InvalidConfig("window must be at least 1".into()));
        }
        if window > MAX_WINDOW {
            return Err(MorphError::InvalidConfig(format!(
                "window must be at most {}, got {}",
                MAX_WINDOW, window
            )));
        }
        if a.is_empty() || b.is_empty() {
            tracing::debug!(a = a.len(), b = b.len(), "empty outline, trivial alignment");
            return Ok(Self::origin_only(window));
        }

        let (n1, n2) = (a.len(), b.len());
        if n1 > window.saturating_mul(n2) || n2 > window.saturating_mul(n1) {
            return Err(MorphError::Unbalanced {
                a: n1,
                b: n2,
                window,
            });
        }

        let pa = CostProfile::new(a, cost);
        let pb = CostProfile::new(b, cost);

        let cols = n2 + 1;
        let mut value = vec![f64::INFINITY; (n1 + 1) * cols];
        let mut back: Vec<Move> = vec![0; (n1 + 1) * cols];
        value[0] = 0.0;

        for i in 1..=n1 {
            for j in 1..=n2 {
                let mut best = f64::INFINITY;
                let mut from: Move = 0;

                // Run A[k..i] against B[j-1].
                let mut run = 0.0;
                for k in (i.saturating_sub(window)..i).rev() {
                    run += cost.profiled(&pa, k, &pb, j - 1);
                    let candidate = value[k * cols + j - 1] + run;
                    if candidate < best {
                        best = candidate;
                        from = (i - k) as Move;
                    }
                }

                // Run B[k..j] against A[i-1].
                let mut run = 0.0;
                for k in (j.saturating_sub(window)..j).rev() {
                    run += cost.profiled(&pb, k, &pa, i - 1);
                    let candidate = value[(i - 1) * cols + k] + run;
                    if candidate < best {
                        best = candidate;
                        from = RUN_ON_B | (j - k) as Move;
                    }
                }

                value[i * cols + j] = best;
                back[i * cols + j] = from;
            }
        }

        let alignment = Self {
            n1,
            n2,
            window,
            value,
            back,
        };
        if !alignment.total_cost().is_finite() {
            return Err(MorphError::CostOverflow);
        }
        tracing::debug!(
            a = n1,
            b = n2,
            window,
            cost = alignment.total_cost(),
            "alignment solved"
        );
        Ok(alignment)
    }

    fn origin_only(window: usize) -> Self {
        Self {
            n1: 0,
            n2: 0,
            window,
            value: vec![0.0],
            back: vec![0],
        }
    }

    /// Table dimensions `(n1, n2)`; the sink state.
    pub fn sink(&self) -> State {
        (self.n1, self.n2)
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Minimal cost of reaching `(i, j)`; infinite when unreachable or out of range.
    pub fn value(&self, i: usize, j: usize) -> f64 {
        if i > self.n1 || j > self.n2 {
            return f64::INFINITY;
        }
        self.value[i * (self.n2 + 1) + j]
    }

    /// Chosen predecessor of `(i, j)`.
    pub fn predecessor(&self, i: usize, j: usize) -> Option<State> {
        if i > self.n1 || j > self.n2 {
            return None;
        }
        let code = self.back[i * (self.n2 + 1) + j];
        if code == 0 {
            return None;
        }
        let run = usize::from(code & !RUN_ON_B);
        Some(if code & RUN_ON_B == 0 {
            (i - run, j - 1)
        } else {
            (i - 1, j - run)
        })
    }

    /// Total alignment cost, `V(n1, n2)`.
    pub fn total_cost(&self) -> f64 {
        self.value(self.n1, self.n2)
    }
}
