//! Forward pass: earliest start times.
//!
//! Kahn's algorithm over predecessor counts. A task becomes ready once every
//! predecessor has been processed; its early start is then the maximum
//! candidate over its incoming edges (sources start at day 0). Tasks on or
//! downstream of a cycle never become ready and keep `None`.

use std::collections::VecDeque;

use crate::engine::ScheduleError;
use crate::graph::{back_off, offset, ScheduleGraph};
use crate::interner::TaskIdx;
use crate::models::DependencyType;
use crate::{log_debug, log_summary};

/// Output of the forward pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ForwardPass {
    /// Early start per task (`None` = never became ready).
    pub early_start: Vec<Option<i64>>,
    /// Tasks in the order they were processed (a topological order).
    pub order: Vec<TaskIdx>,
}

impl ForwardPass {
    pub fn early_finish(&self, graph: &ScheduleGraph, idx: TaskIdx) -> Result<Option<i64>, ScheduleError> {
        self.early_start[idx]
            .map(|start| offset(start, graph.duration(idx)))
            .transpose()
    }
}

/// Earliest start a single dependency allows for its successor.
fn earliest_start_candidate(
    kind: DependencyType,
    pred_start: i64,
    pred_duration: i64,
    succ_duration: i64,
    lag: i64,
) -> Result<i64, ScheduleError> {
    match kind {
        DependencyType::FinishToStart => offset(offset(pred_start, pred_duration)?, lag),
        DependencyType::StartToStart => offset(pred_start, lag),
        DependencyType::FinishToFinish => {
            let pred_finish = offset(pred_start, pred_duration)?;
            offset(back_off(pred_finish, succ_duration)?, lag)
        }
        DependencyType::StartToFinish => offset(back_off(pred_start, succ_duration)?, lag),
    }
}

pub fn forward_pass(graph: &ScheduleGraph, verbosity: u8) -> Result<ForwardPass, ScheduleError> {
    let n = graph.len();
    let mut waiting_on: Vec<usize> = graph.incoming.iter().map(Vec::len).collect();
    let mut best: Vec<Option<i64>> = vec![None; n];
    let mut early_start: Vec<Option<i64>> = vec![None; n];
    let mut order: Vec<TaskIdx> = Vec::with_capacity(n);

    let mut queue: VecDeque<(TaskIdx, i64)> = (0..n)
        .filter(|&idx| waiting_on[idx] == 0)
        .map(|idx| (idx, 0))
        .collect();
    for &(source, start) in &queue {
        early_start[source] = Some(start);
    }

    while let Some((current, start)) = queue.pop_front() {
        order.push(current);

        for edge in &graph.outgoing[current] {
            let succ = edge.task;
            let candidate = earliest_start_candidate(
                edge.kind,
                start,
                graph.duration(current),
                graph.duration(succ),
                edge.lag,
            )?;

            let merged = match best[succ] {
                Some(seen) if seen >= candidate => seen,
                _ => {
                    log_debug!(
                        verbosity,
                        "  ES({}) <- {} via {} from {}",
                        graph.id(succ),
                        candidate,
                        edge.kind,
                        graph.id(current)
                    );
                    candidate
                }
            };
            best[succ] = Some(merged);

            waiting_on[succ] -= 1;
            if waiting_on[succ] == 0 {
                early_start[succ] = Some(merged);
                queue.push_back((succ, merged));
            }
        }
    }

    log_summary!(
        verbosity,
        "Forward pass: {} of {} tasks scheduled",
        order.len(),
        n
    );

    Ok(ForwardPass { early_start, order })
}
