//! Three-point (PERT) duration estimates.
//!
//! Expected duration is the beta-distribution approximation `(O + 4M + P) / 6`
//! and variance is `((P - O) / 6)^2`. The engine schedules whole days, so an
//! estimated task is scheduled for its expected duration rounded up.

use pyo3::prelude::*;

use crate::graph::ScheduleGraph;

/// Tolerance applied before rounding so `5.0000000001` still schedules as 5 days.
const ROUNDING_EPSILON: f64 = 1e-9;

/// Optimistic / most likely / pessimistic duration estimate, in days.
#[pyclass]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThreePointEstimate {
    #[pyo3(get, set)]
    pub optimistic: f64,
    #[pyo3(get, set)]
    pub most_likely: f64,
    #[pyo3(get, set)]
    pub pessimistic: f64,
}

#[pymethods]
impl ThreePointEstimate {
    #[new]
    pub fn new(optimistic: f64, most_likely: f64, pessimistic: f64) -> Self {
        Self {
            optimistic,
            most_likely,
            pessimistic,
        }
    }

    /// Expected duration `(O + 4M + P) / 6`.
    pub fn expected(&self) -> f64 {
        (self.optimistic + 4.0 * self.most_likely + self.pessimistic) / 6.0
    }

    pub fn variance(&self) -> f64 {
        let spread = (self.pessimistic - self.optimistic) / 6.0;
        spread * spread
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    fn __repr__(&self) -> String {
        format!(
            "ThreePointEstimate(o={}, m={}, p={})",
            self.optimistic, self.most_likely, self.pessimistic
        )
    }
}

impl ThreePointEstimate {
    /// Expected duration rounded up to whole days, or `None` when the estimate
    /// is not a finite number.
    pub fn scheduled_days(&self) -> Option<i64> {
        let expected = self.expected();
        if !expected.is_finite() || expected > i64::MAX as f64 {
            return None;
        }
        Some(((expected - ROUNDING_EPSILON).ceil() as i64).max(0))
    }
}

/// Variance of the highest-variance chain of critical tasks.
///
/// Walks the forward topological `order`, accumulating variance only across
/// edges that join two critical tasks. Returns 0 when nothing is critical.
pub fn critical_chain_variance(graph: &ScheduleGraph, order: &[usize], critical: &[bool]) -> f64 {
    let mut path_variance = vec![0.0_f64; graph.len()];
    let mut project_variance = 0.0_f64;

    for &task in order {
        if !critical[task] {
            continue;
        }
        let upstream = graph.incoming[task]
            .iter()
            .filter(|edge| critical[edge.task])
            .map(|edge| path_variance[edge.task])
            .fold(0.0_f64, f64::max);
        path_variance[task] = upstream + graph.nodes[task].variance;
        project_variance = project_variance.max(path_variance[task]);
    }

    project_variance
}
