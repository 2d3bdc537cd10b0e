//! Schedule computation entry points.
//!
//! Runs graph construction, the forward and backward passes, float analysis
//! and metric assembly as one synchronous, side-effect-free computation. Each
//! call builds its own arena; nothing is shared between calls.

use chrono::Days;
use thiserror::Error;

use crate::backward_pass::backward_pass;
use crate::config::ScheduleConfig;
use crate::estimate::critical_chain_variance;
use crate::float::{analyze_float, critical_chains, critical_path};
use crate::forward_pass::forward_pass;
use crate::graph::{offset, ScheduleGraph};
use crate::models::{Dependency, ScheduleResult, ScheduledTask, Task};
use crate::{log_checks, log_failure, log_summary};

/// Faults that abort a schedule computation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Day offset overflow while computing schedule")]
    Overflow,
    #[error("Cyclic dependency graph: {} task(s) could not be scheduled ({})", .0.len(), .0.join(", "))]
    CyclicGraph(Vec<String>),
}

/// Compute the schedule with default configuration.
///
/// Never fails outright: faults are reported through `success`/`error` on the
/// returned result.
pub fn compute_schedule(tasks: &[Task], dependencies: &[Dependency]) -> ScheduleResult {
    compute_schedule_with_config(tasks, dependencies, &ScheduleConfig::default())
}

pub fn compute_schedule_with_config(
    tasks: &[Task],
    dependencies: &[Dependency],
    config: &ScheduleConfig,
) -> ScheduleResult {
    match try_compute_schedule(tasks, dependencies, config) {
        Ok(result) => result,
        Err(e) => {
            log_failure!("Schedule computation failed: {}", e);
            ScheduleResult::failure(e.to_string())
        }
    }
}

/// Compute the schedule, returning faults as a typed error.
///
/// Tasks caught in (or hanging off) a dependency cycle keep `None` times and
/// are listed in `unresolved_tasks`, unless `config.reject_cycles` is set.
pub fn try_compute_schedule(
    tasks: &[Task],
    dependencies: &[Dependency],
    config: &ScheduleConfig,
) -> Result<ScheduleResult, ScheduleError> {
    let verbosity = config.verbosity;
    let graph = ScheduleGraph::build(tasks, dependencies, verbosity);
    if graph.is_empty() {
        log_summary!(verbosity, "No tasks to schedule");
        return Ok(ScheduleResult {
            success: true,
            dropped_dependencies: graph.dropped_dependencies,
            ..Default::default()
        });
    }
    let forward = forward_pass(&graph, verbosity)?;
    let late_start = backward_pass(&graph, &forward.early_start, verbosity)?;

    let unresolved_tasks: Vec<String> = (0..graph.len())
        .filter(|&idx| forward.early_start[idx].is_none() || late_start[idx].is_none())
        .map(|idx| graph.id(idx).to_string())
        .collect();
    if !unresolved_tasks.is_empty() {
        if config.reject_cycles {
            return Err(ScheduleError::CyclicGraph(unresolved_tasks));
        }
        log_summary!(
            verbosity,
            "Dependency cycle: {} task(s) left unscheduled: {:?}",
            unresolved_tasks.len(),
            unresolved_tasks
        );
    }

    let floats = analyze_float(&graph, &forward.early_start, &late_start)?;

    let mut scheduled = Vec::with_capacity(graph.len());
    for (idx, node) in graph.nodes.iter().enumerate() {
        let es = forward.early_start[idx];
        let ls = late_start[idx];
        scheduled.push(ScheduledTask {
            id: node.id.clone(),
            name: node.name.clone(),
            duration: node.duration,
            early_start: es,
            early_finish: es.map(|s| offset(s, node.duration)).transpose()?,
            late_start: ls,
            late_finish: ls.map(|s| offset(s, node.duration)).transpose()?,
            total_float: floats.total_float[idx],
            free_float: floats.free_float[idx],
            is_critical: floats.critical[idx],
            variance: node.variance,
        });
    }

    let critical_path = critical_path(&graph, &floats.critical);
    let critical_chains = critical_chains(&graph, &forward.order, &floats.critical);
    let project_variance = critical_chain_variance(&graph, &forward.order, &floats.critical);

    let project_duration = scheduled
        .iter()
        .filter_map(|t| t.early_finish)
        .fold(0, i64::max);
    let project_end_date = if forward.order.is_empty() {
        None
    } else {
        // project_duration is never negative (folded from 0)
        let reference = config.resolve_reference_date();
        let end = reference.checked_add_days(Days::new(project_duration as u64));
        if end.is_none() {
            log_checks!(
                verbosity,
                "Project end date out of range: {} + {} days",
                reference,
                project_duration
            );
        }
        end
    };

    let floats_known: Vec<i64> = scheduled.iter().filter_map(|t| t.total_float).collect();
    let average_float = if floats_known.is_empty() {
        0.0
    } else {
        floats_known.iter().map(|&f| f as f64).sum::<f64>() / floats_known.len() as f64
    };

    log_summary!(
        verbosity,
        "Schedule: duration {} days, {} of {} tasks critical, average float {:.2}",
        project_duration,
        critical_path.len(),
        scheduled.len(),
        average_float
    );

    Ok(ScheduleResult {
        success: true,
        error: None,
        total_tasks: scheduled.len(),
        critical_tasks: critical_path.len(),
        tasks: scheduled,
        critical_path,
        critical_chains,
        project_duration,
        project_end_date,
        average_float,
        unresolved_tasks,
        dropped_dependencies: graph.dropped_dependencies,
        project_variance,
        project_std_dev: project_variance.sqrt(),
    })
}
