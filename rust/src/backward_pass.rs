//! Backward pass: latest start times.
//!
//! Mirror of the forward pass over successor counts. Every task's late finish
//! is capped at the project finish (the latest early finish), so sinks are
//! anchored there and no task may finish after the project does. A task
//! becomes ready once every successor has been processed; its late finish is
//! then the minimum of the project finish and its outgoing edge candidates.

use std::collections::VecDeque;

use crate::engine::ScheduleError;
use crate::graph::{back_off, offset, ScheduleGraph};
use crate::interner::TaskIdx;
use crate::models::DependencyType;
use crate::{log_debug, log_summary};

/// Latest finish a single dependency allows for its predecessor.
///
/// If task B depends on task A, this computes A's late finish given B's late
/// start and finish.
fn latest_finish_candidate(
    kind: DependencyType,
    succ_late_start: i64,
    succ_late_finish: i64,
    pred_duration: i64,
    lag: i64,
) -> Result<i64, ScheduleError> {
    match kind {
        DependencyType::FinishToStart => back_off(succ_late_start, lag),
        DependencyType::StartToStart => offset(back_off(succ_late_start, lag)?, pred_duration),
        DependencyType::FinishToFinish => back_off(succ_late_finish, lag),
        DependencyType::StartToFinish => back_off(offset(succ_late_finish, pred_duration)?, lag),
    }
}

/// Compute late start per task from the forward pass's early starts.
///
/// A sink that the forward pass could not schedule is not seeded, so it and
/// everything upstream of it stay `None`.
pub fn backward_pass(
    graph: &ScheduleGraph,
    early_start: &[Option<i64>],
    verbosity: u8,
) -> Result<Vec<Option<i64>>, ScheduleError> {
    let n = graph.len();
    let mut waiting_on: Vec<usize> = graph.outgoing.iter().map(Vec::len).collect();
    let mut late_start: Vec<Option<i64>> = vec![None; n];
    let mut processed = 0usize;

    let mut project_finish = 0i64;
    for (idx, start) in early_start.iter().enumerate() {
        if let Some(start) = start {
            project_finish = project_finish.max(offset(*start, graph.duration(idx))?);
        }
    }
    let mut best_finish: Vec<i64> = vec![project_finish; n];

    let mut queue: VecDeque<(TaskIdx, i64)> = VecDeque::new();
    for idx in 0..n {
        if waiting_on[idx] == 0 && early_start[idx].is_some() {
            let start = back_off(project_finish, graph.duration(idx))?;
            late_start[idx] = Some(start);
            queue.push_back((idx, start));
        }
    }

    while let Some((current, start)) = queue.pop_front() {
        processed += 1;
        let finish = offset(start, graph.duration(current))?;

        for edge in &graph.incoming[current] {
            let pred = edge.task;
            let candidate =
                latest_finish_candidate(edge.kind, start, finish, graph.duration(pred), edge.lag)?;

            if candidate < best_finish[pred] {
                log_debug!(
                    verbosity,
                    "  LF({}) <- {} via {} from {}",
                    graph.id(pred),
                    candidate,
                    edge.kind,
                    graph.id(current)
                );
                best_finish[pred] = candidate;
            }

            waiting_on[pred] -= 1;
            if waiting_on[pred] == 0 {
                let pred_start = back_off(best_finish[pred], graph.duration(pred))?;
                late_start[pred] = Some(pred_start);
                queue.push_back((pred, pred_start));
            }
        }
    }

    log_summary!(
        verbosity,
        "Backward pass: {} of {} tasks scheduled",
        processed,
        n
    );

    Ok(late_start)
}
