//! Float (slack) derivation and critical path extraction.

use rustc_hash::FxHashSet;

use crate::engine::ScheduleError;
use crate::graph::{back_off, offset, ScheduleGraph};
use crate::interner::TaskIdx;

/// Float and criticality per task, indexed by arena position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FloatAnalysis {
    /// `late_start - early_start`, when both are known.
    pub total_float: Vec<Option<i64>>,
    /// Slack before the earliest direct successor is delayed.
    pub free_float: Vec<Option<i64>>,
    pub critical: Vec<bool>,
}

pub fn analyze_float(
    graph: &ScheduleGraph,
    early_start: &[Option<i64>],
    late_start: &[Option<i64>],
) -> Result<FloatAnalysis, ScheduleError> {
    let n = graph.len();
    let mut total_float = Vec::with_capacity(n);
    let mut free_float = Vec::with_capacity(n);
    let mut critical = Vec::with_capacity(n);

    for idx in 0..n {
        let total = match (early_start[idx], late_start[idx]) {
            (Some(es), Some(ls)) => Some(back_off(ls, es)?),
            _ => None,
        };

        let free = match early_start[idx] {
            None => None,
            Some(_) if graph.outgoing[idx].is_empty() => total,
            Some(es) => {
                let earliest_successor = graph.outgoing[idx]
                    .iter()
                    .filter_map(|edge| early_start[edge.task])
                    .min();
                match earliest_successor {
                    Some(succ_start) => {
                        let finish = offset(es, graph.duration(idx))?;
                        Some(back_off(succ_start, finish)?)
                    }
                    None => None,
                }
            }
        };

        critical.push(total == Some(0));
        total_float.push(total);
        free_float.push(free);
    }

    Ok(FloatAnalysis {
        total_float,
        free_float,
        critical,
    })
}

/// Ids of all critical tasks, in arena (input) order.
pub fn critical_path(graph: &ScheduleGraph, critical: &[bool]) -> Vec<String> {
    (0..graph.len())
        .filter(|&idx| critical[idx])
        .map(|idx| graph.id(idx).to_string())
        .collect()
}

/// Partition the critical set into chains linked by dependency edges.
///
/// Chains start at critical tasks with no critical predecessor (in topological
/// order) and greedily follow the first unvisited critical successor. Critical
/// tasks left over after a fork start chains of their own, so every critical
/// task appears in exactly one chain.
pub fn critical_chains(graph: &ScheduleGraph, order: &[TaskIdx], critical: &[bool]) -> Vec<Vec<String>> {
    let mut visited: FxHashSet<TaskIdx> = FxHashSet::default();
    let mut chains = Vec::new();

    let heads = order
        .iter()
        .copied()
        .filter(|&idx| critical[idx])
        .filter(|&idx| !graph.incoming[idx].iter().any(|edge| critical[edge.task]));
    let stragglers = order.iter().copied().filter(|&idx| critical[idx]);

    for head in heads.chain(stragglers) {
        if visited.contains(&head) {
            continue;
        }
        let mut chain = Vec::new();
        let mut current = Some(head);
        while let Some(idx) = current {
            visited.insert(idx);
            chain.push(graph.id(idx).to_string());
            current = graph.outgoing[idx]
                .iter()
                .map(|edge| edge.task)
                .find(|&next| critical[next] && !visited.contains(&next));
        }
        chains.push(chain);
    }

    chains
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backward_pass::backward_pass;
    use crate::forward_pass::forward_pass;
    use crate::models::{Dependency, Task};

    fn analyze(tasks: &[Task], deps: &[Dependency]) -> (ScheduleGraph, Vec<TaskIdx>, FloatAnalysis) {
        let graph = ScheduleGraph::build(tasks, deps, 0);
        let forward = forward_pass(&graph, 0).unwrap();
        let late = backward_pass(&graph, &forward.early_start, 0).unwrap();
        let floats = analyze_float(&graph, &forward.early_start, &late).unwrap();
        (graph, forward.order, floats)
    }

    #[test]
    fn test_parallel_paths_with_slack() {
        // a (2d) -> target (1d)
        // b (5d) -> target (1d)
        // b is on critical path, a has 3 days of slack
        let tasks = vec![
            Task::with_duration("a", 2),
            Task::with_duration("b", 5),
            Task::with_duration("target", 1),
        ];
        let deps = vec![
            Dependency::finish_to_start("a", "target"),
            Dependency::finish_to_start("b", "target"),
        ];
        let (graph, _, floats) = analyze(&tasks, &deps);

        assert_eq!(floats.total_float, vec![Some(3), Some(0), Some(0)]);
        assert_eq!(floats.free_float, vec![Some(3), Some(0), Some(0)]);
        assert_eq!(critical_path(&graph, &floats.critical), vec!["b", "target"]);
    }

    #[test]
    fn test_free_float_smaller_than_total() {
        // a (1d) -> b (1d) -> d (1d); c (5d) -> d
        // a and b share 3 days of total float, but only b can slip freely.
        let tasks = vec![
            Task::with_duration("a", 1),
            Task::with_duration("b", 1),
            Task::with_duration("c", 5),
            Task::with_duration("d", 1),
        ];
        let deps = vec![
            Dependency::finish_to_start("a", "b"),
            Dependency::finish_to_start("b", "d"),
            Dependency::finish_to_start("c", "d"),
        ];
        let (_, _, floats) = analyze(&tasks, &deps);

        assert_eq!(floats.total_float[0], Some(3));
        assert_eq!(floats.free_float[0], Some(0));
        assert_eq!(floats.total_float[1], Some(3));
        assert_eq!(floats.free_float[1], Some(3));
    }

    #[test]
    fn test_unresolved_tasks_have_no_float() {
        let tasks = vec![Task::with_duration("x", 1), Task::with_duration("y", 1)];
        let deps = vec![
            Dependency::finish_to_start("x", "y"),
            Dependency::finish_to_start("y", "x"),
        ];
        let (_, _, floats) = analyze(&tasks, &deps);

        assert_eq!(floats.total_float, vec![None, None]);
        assert_eq!(floats.free_float, vec![None, None]);
        assert_eq!(floats.critical, vec![false, false]);
    }

    #[test]
    fn test_critical_chains_cover_parallel_branches() {
        // a -> b -> d and a -> c -> d, both branches equally long
        let tasks = vec![
            Task::with_duration("a", 1),
            Task::with_duration("b", 2),
            Task::with_duration("c", 2),
            Task::with_duration("d", 1),
        ];
        let deps = vec![
            Dependency::finish_to_start("a", "b"),
            Dependency::finish_to_start("a", "c"),
            Dependency::finish_to_start("b", "d"),
            Dependency::finish_to_start("c", "d"),
        ];
        let (graph, order, floats) = analyze(&tasks, &deps);
        let chains = critical_chains(&graph, &order, &floats.critical);

        assert_eq!(chains, vec![vec!["a", "b", "d"], vec!["c"]]);
    }

    #[test]
    fn test_critical_chains_for_independent_tasks() {
        let tasks = vec![Task::with_duration("a", 3), Task::with_duration("b", 3)];
        let (graph, order, floats) = analyze(&tasks, &[]);
        let chains = critical_chains(&graph, &order, &floats.critical);
        assert_eq!(chains, vec![vec!["a"], vec!["b"]]);
    }
}
