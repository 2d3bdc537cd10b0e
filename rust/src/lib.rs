//! PERT/CPM scheduling engine.
//!
//! Given tasks and precedence relationships (FS/SS/FF/SF with lag), computes
//! earliest and latest start/finish times, total and free float, and the
//! critical path. Exposed both as a Rust library and as a Python extension
//! module.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;

pub mod backward_pass;
mod config;
pub mod engine;
mod estimate;
pub mod float;
pub mod forward_pass;
pub mod graph;
pub mod interner;
pub mod logging;
mod models;
pub mod report;

pub use config::ScheduleConfig;
pub use engine::{compute_schedule, compute_schedule_with_config, try_compute_schedule, ScheduleError};
pub use estimate::ThreePointEstimate;
pub use models::{Dependency, DependencyType, ScheduleResult, ScheduledTask, Task};
pub use report::{
    analyze_constraints, describe_dependencies, export_schedule_csv, render_schedule_table,
    write_schedule_csv, ConstraintSummary,
};

/// Compute the PERT/CPM schedule for a project.
///
/// # Arguments
/// * `tasks` - Tasks to schedule (ids should be unique; duplicates resolve last-wins)
/// * `dependencies` - Precedence relationships; ones naming unknown tasks are ignored
/// * `config` - Optional engine configuration
///
/// # Returns
/// * ScheduleResult. Never raises: failures set `success=False` and `error`.
#[pyfunction]
#[pyo3(name = "compute_schedule", signature = (tasks, dependencies, config=None))]
fn py_compute_schedule(
    tasks: Vec<Task>,
    dependencies: Vec<Dependency>,
    config: Option<ScheduleConfig>,
) -> ScheduleResult {
    compute_schedule_with_config(&tasks, &dependencies, &config.unwrap_or_default())
}

/// Describe dependencies as `Name --[TYPE]--> Name (lag: n)` lines.
#[pyfunction]
#[pyo3(name = "describe_dependencies")]
fn py_describe_dependencies(tasks: Vec<Task>, dependencies: Vec<Dependency>) -> Vec<String> {
    describe_dependencies(&tasks, &dependencies)
}

/// Render a computed schedule as CSV text.
///
/// # Errors
/// * ValueError if the CSV writer fails
#[pyfunction]
#[pyo3(name = "export_schedule_csv")]
fn py_export_schedule_csv(
    result: &ScheduleResult,
    tasks: Vec<Task>,
    dependencies: Vec<Dependency>,
) -> PyResult<String> {
    match export_schedule_csv(result, &tasks, &dependencies) {
        Ok(csv) => Ok(csv),
        Err(e) => Err(pyo3::exceptions::PyValueError::new_err(e.to_string())),
    }
}

/// Summarize dependency types, lag and lead time, and the critical share.
#[pyfunction]
#[pyo3(name = "analyze_constraints")]
fn py_analyze_constraints(
    result: &ScheduleResult,
    tasks: Vec<Task>,
    dependencies: Vec<Dependency>,
) -> ConstraintSummary {
    analyze_constraints(result, &tasks, &dependencies)
}

/// The pert_engine Python module.
#[pymodule]
fn pert_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Input types
    m.add_class::<Task>()?;
    m.add_class::<Dependency>()?;
    m.add_class::<ThreePointEstimate>()?;

    // Output types
    m.add_class::<ScheduledTask>()?;
    m.add_class::<ScheduleResult>()?;
    m.add_class::<ConstraintSummary>()?;

    m.add_class::<ScheduleConfig>()?;

    m.add_function(wrap_pyfunction!(py_compute_schedule, m)?)?;
    m.add_function(wrap_pyfunction!(py_describe_dependencies, m)?)?;
    m.add_function(wrap_pyfunction!(py_export_schedule_csv, m)?)?;
    m.add_function(wrap_pyfunction!(py_analyze_constraints, m)?)?;

    Ok(())
}
