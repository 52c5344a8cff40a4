//! Deterministic bounded search over two parameters
//!
//! Model fitting in this workspace only ever tunes two smoothing or ARMA
//! coefficients, so an exhaustive coarse grid followed by a few rounds of
//! local refinement is enough and always gives the same answer for the same
//! input.

use crate::{MathError, Result};

/// Best point found by a [`GridSearch`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    /// Winning parameter pair
    pub params: (f64, f64),
    /// Objective value at `params`
    pub objective: f64,
}

/// Coarse-to-fine grid search minimising an objective over a rectangle
#[derive(Debug, Clone)]
pub struct GridSearch {
    first: (f64, f64),
    second: (f64, f64),
    steps: usize,
    refine_rounds: usize,
}

impl GridSearch {
    /// Create a search over `first` x `second` (inclusive bounds)
    pub fn new(first: (f64, f64), second: (f64, f64)) -> Result<Self> {
        for (lo, hi) in [first, second] {
            if !lo.is_finite() || !hi.is_finite() || lo >= hi {
                return Err(MathError::InvalidInput(format!(
                    "Invalid search bounds [{}, {}]",
                    lo, hi
                )));
            }
        }

        Ok(Self {
            first,
            second,
            steps: 50,
            refine_rounds: 3,
        })
    }

    /// Number of grid intervals per axis on every round
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps.max(2);
        self
    }

    /// Number of zoom-in rounds after the coarse pass
    pub fn with_refine_rounds(mut self, rounds: usize) -> Self {
        self.refine_rounds = rounds;
        self
    }

    /// Minimise `objective`. Non-finite objective values never win.
    pub fn minimize<F>(&self, mut objective: F) -> Result<SearchOutcome>
    where
        F: FnMut(f64, f64) -> f64,
    {
        let mut first = self.first;
        let mut second = self.second;
        let mut best: Option<SearchOutcome> = None;

        for _ in 0..=self.refine_rounds {
            let step_a = (first.1 - first.0) / self.steps as f64;
            let step_b = (second.1 - second.0) / self.steps as f64;

            for i in 0..=self.steps {
                let a = first.0 + step_a * i as f64;
                for j in 0..=self.steps {
                    let b = second.0 + step_b * j as f64;
                    let value = objective(a, b);
                    if !value.is_finite() {
                        continue;
                    }
                    // Strict comparison keeps the first point on ties
                    if best.map_or(true, |current| value < current.objective) {
                        best = Some(SearchOutcome {
                            params: (a, b),
                            objective: value,
                        });
                    }
                }
            }

            let Some(current) = best else {
                break;
            };

            // Zoom into the neighbourhood of the current optimum, clamped to the original bounds
            let (a, b) = current.params;
            first = (
                (a - step_a).max(self.first.0),
                (a + step_a).min(self.first.1),
            );
            second = (
                (b - step_b).max(self.second.0),
                (b + step_b).min(self.second.1),
            );
        }

        best.ok_or_else(|| {
            MathError::InvalidInput(
                "Objective was not finite anywhere in the search region".to_string(),
            )
        })
    }
}
