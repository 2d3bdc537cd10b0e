//! Configuration for the scheduling engine.

use chrono::NaiveDate;
use pyo3::prelude::*;

/// Knobs for a single engine invocation.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScheduleConfig {
    /// Verbosity level: 0=silent, 1=summary, 2=checks, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
    /// Calendar date of day 0, used for the project end date (None = today).
    #[pyo3(get, set)]
    pub reference_date: Option<NaiveDate>,
    /// Fail the computation instead of returning unresolved tasks when the
    /// dependency graph contains a cycle.
    #[pyo3(get, set)]
    pub reject_cycles: bool,
}

#[pymethods]
impl ScheduleConfig {
    #[new]
    #[pyo3(signature = (verbosity=None, reference_date=None, reject_cycles=None))]
    fn new(
        verbosity: Option<u8>,
        reference_date: Option<NaiveDate>,
        reject_cycles: Option<bool>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            verbosity: verbosity.unwrap_or(defaults.verbosity),
            reference_date: reference_date.or(defaults.reference_date),
            reject_cycles: reject_cycles.unwrap_or(defaults.reject_cycles),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "ScheduleConfig(verbosity={}, reference_date={:?}, reject_cycles={})",
            self.verbosity, self.reference_date, self.reject_cycles
        )
    }
}

impl ScheduleConfig {
    /// The reference date, falling back to the local calendar date.
    pub fn resolve_reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}
