//! Core data types for the scheduling engine.

use chrono::NaiveDate;
use pyo3::prelude::*;

use crate::estimate::ThreePointEstimate;

/// Which endpoint of the predecessor constrains which endpoint of the successor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DependencyType {
    /// Successor cannot start before the predecessor finishes.
    #[default]
    FinishToStart,
    /// Successor cannot start before the predecessor starts.
    StartToStart,
    /// Successor cannot finish before the predecessor finishes.
    FinishToFinish,
    /// Successor cannot finish before the predecessor starts.
    StartToFinish,
}

impl DependencyType {
    /// Parse a two-letter code (`FS`, `SS`, `FF`, `SF`), case-insensitive.
    ///
    /// Anything unrecognised is treated as finish-to-start.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "SS" => Self::StartToStart,
            "FF" => Self::FinishToFinish,
            "SF" => Self::StartToFinish,
            _ => Self::FinishToStart,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::FinishToStart => "FS",
            Self::StartToStart => "SS",
            Self::FinishToFinish => "FF",
            Self::StartToFinish => "SF",
        }
    }
}

impl std::fmt::Display for DependencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A precedence relationship between two tasks.
#[pyclass]
#[derive(Clone, Debug)]
pub struct Dependency {
    #[pyo3(get, set)]
    pub predecessor_id: String,
    #[pyo3(get, set)]
    pub successor_id: String,
    pub dependency_type: DependencyType,
    /// Offset in days; negative values are lead time. `None` means 0.
    #[pyo3(get, set)]
    pub lag: Option<i64>,
}

#[pymethods]
impl Dependency {
    #[new]
    #[pyo3(signature = (predecessor_id, successor_id, dependency_type=None, lag=None))]
    fn new(
        predecessor_id: String,
        successor_id: String,
        dependency_type: Option<String>,
        lag: Option<i64>,
    ) -> Self {
        Self {
            predecessor_id,
            successor_id,
            dependency_type: dependency_type
                .as_deref()
                .map(DependencyType::from_code)
                .unwrap_or_default(),
            lag,
        }
    }

    #[getter(dependency_type)]
    fn get_dependency_type(&self) -> &'static str {
        self.dependency_type.code()
    }

    #[setter(dependency_type)]
    fn set_dependency_type(&mut self, code: String) {
        self.dependency_type = DependencyType::from_code(&code);
    }

    fn __repr__(&self) -> String {
        format!(
            "Dependency({:?} -> {:?}, type={}, lag={:?})",
            self.predecessor_id, self.successor_id, self.dependency_type, self.lag
        )
    }
}

impl Dependency {
    /// Build a dependency of the given type with an explicit lag.
    pub fn link(
        predecessor_id: impl Into<String>,
        successor_id: impl Into<String>,
        dependency_type: DependencyType,
        lag: i64,
    ) -> Self {
        Self {
            predecessor_id: predecessor_id.into(),
            successor_id: successor_id.into(),
            dependency_type,
            lag: Some(lag),
        }
    }

    /// Plain finish-to-start dependency with no lag.
    pub fn finish_to_start(
        predecessor_id: impl Into<String>,
        successor_id: impl Into<String>,
    ) -> Self {
        Self::link(
            predecessor_id,
            successor_id,
            DependencyType::FinishToStart,
            0,
        )
    }
}

/// A task to be scheduled.
#[pyclass]
#[derive(Clone, Debug)]
pub struct Task {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub name: String,
    /// Duration in whole days. Missing or negative values fall back to the
    /// estimate (if any) or to 1.
    #[pyo3(get, set)]
    pub duration: Option<i64>,
    #[pyo3(get, set)]
    pub estimate: Option<ThreePointEstimate>,
}

#[pymethods]
impl Task {
    #[new]
    #[pyo3(signature = (id, name=None, duration=None, estimate=None))]
    fn new(
        id: String,
        name: Option<String>,
        duration: Option<i64>,
        estimate: Option<ThreePointEstimate>,
    ) -> Self {
        Self {
            id,
            name: name.unwrap_or_default(),
            duration,
            estimate,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Task(id={:?}, name={:?}, duration={:?}, estimated={})",
            self.id,
            self.name,
            self.duration,
            self.estimate.is_some()
        )
    }
}

impl Task {
    /// Task with a fixed duration; the name defaults to the id.
    pub fn with_duration(id: impl Into<String>, duration: i64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            duration: Some(duration),
            estimate: None,
        }
    }

    /// Task whose duration is derived from a three-point estimate.
    pub fn estimated(id: impl Into<String>, estimate: ThreePointEstimate) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            duration: None,
            estimate: Some(estimate),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// A task enriched with its computed schedule.
///
/// Time fields are day offsets from project start (day 0). They are `None`
/// when the task never became ready in the corresponding pass, which only
/// happens on or around a dependency cycle.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledTask {
    #[pyo3(get)]
    pub id: String,
    #[pyo3(get)]
    pub name: String,
    #[pyo3(get)]
    pub duration: i64,
    #[pyo3(get)]
    pub early_start: Option<i64>,
    #[pyo3(get)]
    pub early_finish: Option<i64>,
    #[pyo3(get)]
    pub late_start: Option<i64>,
    #[pyo3(get)]
    pub late_finish: Option<i64>,
    #[pyo3(get)]
    pub total_float: Option<i64>,
    #[pyo3(get)]
    pub free_float: Option<i64>,
    #[pyo3(get)]
    pub is_critical: bool,
    /// PERT variance of the duration (0 without a three-point estimate).
    #[pyo3(get)]
    pub variance: f64,
}

#[pymethods]
impl ScheduledTask {
    fn __repr__(&self) -> String {
        format!(
            "ScheduledTask(id={:?}, es={:?}, ef={:?}, ls={:?}, lf={:?}, float={:?}, critical={})",
            self.id,
            self.early_start,
            self.early_finish,
            self.late_start,
            self.late_finish,
            self.total_float,
            self.is_critical
        )
    }
}

/// Snapshot produced by one engine invocation.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScheduleResult {
    #[pyo3(get)]
    pub success: bool,
    #[pyo3(get)]
    pub error: Option<String>,
    #[pyo3(get)]
    pub tasks: Vec<ScheduledTask>,
    /// Critical task ids, in input order.
    #[pyo3(get)]
    pub critical_path: Vec<String>,
    /// Critical tasks grouped into dependency-linked chains.
    #[pyo3(get)]
    pub critical_chains: Vec<Vec<String>>,
    #[pyo3(get)]
    pub project_duration: i64,
    #[pyo3(get)]
    pub project_end_date: Option<NaiveDate>,
    #[pyo3(get)]
    pub total_tasks: usize,
    #[pyo3(get)]
    pub critical_tasks: usize,
    #[pyo3(get)]
    pub average_float: f64,
    /// Tasks left without times because of a dependency cycle.
    #[pyo3(get)]
    pub unresolved_tasks: Vec<String>,
    /// Dependencies ignored because they named an unknown task.
    #[pyo3(get)]
    pub dropped_dependencies: usize,
    #[pyo3(get)]
    pub project_variance: f64,
    #[pyo3(get)]
    pub project_std_dev: f64,
}

#[pymethods]
impl ScheduleResult {
    /// Look up a scheduled task by id.
    #[pyo3(name = "task")]
    fn py_task(&self, id: &str) -> Option<ScheduledTask> {
        self.task(id).cloned()
    }

    fn render_table(&self) -> String {
        crate::report::render_schedule_table(self)
    }

    fn __repr__(&self) -> String {
        match &self.error {
            Some(error) => format!("ScheduleResult(success=false, error={:?})", error),
            None => format!(
                "ScheduleResult(tasks={}, critical={}, duration={}, unresolved={})",
                self.tasks.len(),
                self.critical_tasks,
                self.project_duration,
                self.unresolved_tasks.len()
            ),
        }
    }
}

impl ScheduleResult {
    /// Total bail-out result: no partial data survives a failure.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn task(&self, id: &str) -> Option<&ScheduledTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn is_critical(&self, id: &str) -> bool {
        self.critical_path.iter().any(|c| c == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_type_codes() {
        assert_eq!(DependencyType::from_code("FS"), DependencyType::FinishToStart);
        assert_eq!(DependencyType::from_code("ss"), DependencyType::StartToStart);
        assert_eq!(DependencyType::from_code(" FF "), DependencyType::FinishToFinish);
        assert_eq!(DependencyType::from_code("SF"), DependencyType::StartToFinish);
        assert_eq!(DependencyType::StartToFinish.code(), "SF");
    }

    #[test]
    fn test_unknown_dependency_type_is_finish_to_start() {
        assert_eq!(DependencyType::from_code(""), DependencyType::FinishToStart);
        assert_eq!(DependencyType::from_code("XX"), DependencyType::FinishToStart);
        let dep = Dependency::new("a".into(), "b".into(), None, None);
        assert_eq!(dep.dependency_type, DependencyType::FinishToStart);
        assert_eq!(dep.lag, None);
    }

    #[test]
    fn test_failure_result_is_empty() {
        let result = ScheduleResult::failure("boom");
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("boom"));
        assert!(result.tasks.is_empty());
        assert!(result.critical_path.is_empty());
        assert_eq!(result.project_duration, 0);
        assert!(result.project_end_date.is_none());
    }
}
