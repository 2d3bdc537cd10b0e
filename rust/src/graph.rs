//! Dependency graph construction and input normalization.
//!
//! Everything the passes rely on is settled here, once:
//! - durations are defaulted (explicit value, else estimate, else 1)
//! - lags are defaulted to 0
//! - dependencies naming an unknown task are dropped
//! - duplicate task ids collapse to one node (last definition wins)

use crate::engine::ScheduleError;
use crate::interner::{TaskIdInterner, TaskIdx};
use crate::models::{Dependency, DependencyType, Task};
use crate::{log_checks, log_summary};

const DEFAULT_DURATION: i64 = 1;

/// Normalized task data, indexed by arena position.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub duration: i64,
    pub variance: f64,
}

/// One end of a dependency, stored on the task at the other end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    /// The task on the far side of the dependency.
    pub task: TaskIdx,
    pub kind: DependencyType,
    pub lag: i64,
}

/// Per-call arena holding the task graph.
#[derive(Clone, Debug)]
pub struct ScheduleGraph {
    pub ids: TaskIdInterner,
    pub nodes: Vec<Node>,
    /// Predecessor edges per task.
    pub incoming: Vec<Vec<Edge>>,
    /// Successor edges per task.
    pub outgoing: Vec<Vec<Edge>>,
    pub dropped_dependencies: usize,
}

impl ScheduleGraph {
    pub fn build(tasks: &[Task], dependencies: &[Dependency], verbosity: u8) -> Self {
        let mut ids = TaskIdInterner::with_capacity(tasks.len());
        let mut nodes: Vec<Node> = Vec::with_capacity(tasks.len());

        for task in tasks {
            let node = normalize_task(task, verbosity);
            let (idx, is_new) = ids.intern(&task.id);
            if is_new {
                nodes.push(node);
            } else {
                log_checks!(
                    verbosity,
                    "Duplicate task id {:?}: later definition replaces the earlier one",
                    task.id
                );
                nodes[idx] = node;
            }
        }

        let n = nodes.len();
        let mut incoming: Vec<Vec<Edge>> = vec![Vec::new(); n];
        let mut outgoing: Vec<Vec<Edge>> = vec![Vec::new(); n];
        let mut dropped_dependencies = 0;

        for dep in dependencies {
            let (Some(pred), Some(succ)) = (ids.get(&dep.predecessor_id), ids.get(&dep.successor_id))
            else {
                log_checks!(
                    verbosity,
                    "Dropping dependency {:?} -> {:?}: unknown task id",
                    dep.predecessor_id,
                    dep.successor_id
                );
                dropped_dependencies += 1;
                continue;
            };
            let kind = dep.dependency_type;
            let lag = dep.lag.unwrap_or(0);
            incoming[succ].push(Edge {
                task: pred,
                kind,
                lag,
            });
            outgoing[pred].push(Edge {
                task: succ,
                kind,
                lag,
            });
        }

        log_summary!(
            verbosity,
            "Built graph: {} tasks, {} dependencies ({} dropped)",
            n,
            dependencies.len() - dropped_dependencies,
            dropped_dependencies
        );

        Self {
            ids,
            nodes,
            incoming,
            outgoing,
            dropped_dependencies,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn duration(&self, idx: TaskIdx) -> i64 {
        self.nodes[idx].duration
    }

    pub fn id(&self, idx: TaskIdx) -> &str {
        &self.nodes[idx].id
    }
}

fn normalize_task(task: &Task, verbosity: u8) -> Node {
    let estimated_days = task.estimate.as_ref().and_then(|e| e.scheduled_days());
    let duration = match task.duration {
        Some(days) if days >= 0 => days,
        explicit => {
            let fallback = estimated_days.unwrap_or(DEFAULT_DURATION);
            log_checks!(
                verbosity,
                "Task {:?}: duration {:?} is missing or invalid, using {}",
                task.id,
                explicit,
                fallback
            );
            fallback
        }
    };
    let variance = task.estimate.as_ref().map_or(0.0, |e| e.variance());

    Node {
        id: task.id.clone(),
        name: task.name.clone(),
        duration,
        variance: if variance.is_finite() { variance } else { 0.0 },
    }
}

/// `base + delta`, failing the computation on overflow.
#[inline]
pub(crate) fn offset(base: i64, delta: i64) -> Result<i64, ScheduleError> {
    base.checked_add(delta).ok_or(ScheduleError::Overflow)
}

/// `base - delta`, failing the computation on overflow.
#[inline]
pub(crate) fn back_off(base: i64, delta: i64) -> Result<i64, ScheduleError> {
    base.checked_sub(delta).ok_or(ScheduleError::Overflow)
}
