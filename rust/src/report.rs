//! Plain-text and CSV rendering of schedules, plus a summary of the
//! dependency constraints that shaped them.

use std::fmt::Write;
use std::io;

use pyo3::prelude::*;
use rustc_hash::FxHashMap;

use crate::models::{Dependency, DependencyType, ScheduleResult, ScheduledTask, Task};

fn cell(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Display name per task id (the id itself when the name is blank).
fn display_names(tasks: &[Task]) -> FxHashMap<&str, &str> {
    tasks
        .iter()
        .map(|t| (t.id.as_str(), if t.name.is_empty() { t.id.as_str() } else { t.name.as_str() }))
        .collect()
}

/// Tasks ordered by early start; unresolved ones last, ties in input order.
fn by_early_start(result: &ScheduleResult) -> Vec<&ScheduledTask> {
    let mut rows: Vec<_> = result.tasks.iter().collect();
    rows.sort_by_key(|t| (t.early_start.is_none(), t.early_start));
    rows
}

/// Render a schedule as a fixed-width table, ordered by early start.
///
/// Unresolved tasks sort last; ties keep input order.
pub fn render_schedule_table(result: &ScheduleResult) -> String {
    let mut out = String::new();
    if let Some(error) = &result.error {
        let _ = writeln!(out, "Schedule failed: {}", error);
        return out;
    }

    let _ = writeln!(
        out,
        "{:<10} {:<24} {:>5} {:>5} {:>5} {:>5} {:>5} {:>5} {:>5} {:<8}",
        "ID", "Name", "Dur", "ES", "EF", "LS", "LF", "TF", "FF", "Critical"
    );
    let _ = writeln!(out, "{}", "-".repeat(88));

    for task in by_early_start(result) {
        let _ = writeln!(
            out,
            "{:<10} {:<24} {:>5} {:>5} {:>5} {:>5} {:>5} {:>5} {:>5} {:<8}",
            task.id,
            task.name,
            task.duration,
            cell(task.early_start),
            cell(task.early_finish),
            cell(task.late_start),
            cell(task.late_finish),
            cell(task.total_float),
            cell(task.free_float),
            if task.is_critical { "yes" } else { "no" }
        );
    }

    let _ = writeln!(
        out,
        "Duration: {} days, critical: {}/{}",
        result.project_duration, result.critical_tasks, result.total_tasks
    );
    for chain in &result.critical_chains {
        let _ = writeln!(out, "Critical chain: {}", chain.join(" -> "));
    }
    if !result.unresolved_tasks.is_empty() {
        let _ = writeln!(out, "Unresolved (cycle): {}", result.unresolved_tasks.join(", "));
    }
    out
}

/// One line per dependency, e.g. `Design --[SS]--> Frontend (lag: 2)`.
///
/// Task names are used where known, falling back to the raw id.
pub fn describe_dependencies(tasks: &[Task], dependencies: &[Dependency]) -> Vec<String> {
    let names = display_names(tasks);
    let label = |id: &str| names.get(id).copied().unwrap_or(id).to_string();

    dependencies
        .iter()
        .map(|dep| {
            let mut line = format!(
                "{} --[{}]--> {}",
                label(&dep.predecessor_id),
                dep.dependency_type,
                label(&dep.successor_id)
            );
            match dep.lag.unwrap_or(0) {
                0 => {}
                lag => {
                    let _ = write!(line, " (lag: {})", lag);
                }
            }
            line
        })
        .collect()
}

const CSV_HEADER: [&str; 11] = [
    "ID",
    "Name",
    "Duration",
    "ES",
    "EF",
    "LS",
    "LF",
    "Total float",
    "Free float",
    "Critical",
    "Predecessors",
];

/// Write the schedule as CSV, one row per task ordered by early start.
///
/// Unresolved times are left empty. The predecessor column lists every
/// known predecessor as `Name(TYPE,lag)`, joined with `; `.
pub fn write_schedule_csv<W: io::Write>(
    result: &ScheduleResult,
    tasks: &[Task],
    dependencies: &[Dependency],
    writer: W,
) -> Result<(), csv::Error> {
    let names = display_names(tasks);
    let mut predecessors: FxHashMap<&str, Vec<String>> = FxHashMap::default();
    for dep in dependencies {
        let Some(pred_name) = names.get(dep.predecessor_id.as_str()) else {
            continue;
        };
        if !names.contains_key(dep.successor_id.as_str()) {
            continue;
        }
        predecessors
            .entry(dep.successor_id.as_str())
            .or_default()
            .push(format!("{}({},{})", pred_name, dep.dependency_type, dep.lag.unwrap_or(0)));
    }

    let field = |value: Option<i64>| value.map(|v| v.to_string()).unwrap_or_default();
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(CSV_HEADER)?;
    for task in by_early_start(result) {
        let preds = predecessors
            .get(task.id.as_str())
            .map(|p| p.join("; "))
            .unwrap_or_default();
        out.write_record([
            task.id.clone(),
            task.name.clone(),
            task.duration.to_string(),
            field(task.early_start),
            field(task.early_finish),
            field(task.late_start),
            field(task.late_finish),
            field(task.total_float),
            field(task.free_float),
            if task.is_critical { "yes" } else { "no" }.to_string(),
            preds,
        ])?;
    }
    out.flush()?;
    Ok(())
}

/// Render the schedule as a CSV document. See [`write_schedule_csv`].
pub fn export_schedule_csv(
    result: &ScheduleResult,
    tasks: &[Task],
    dependencies: &[Dependency],
) -> Result<String, csv::Error> {
    let mut buf = Vec::new();
    write_schedule_csv(result, tasks, dependencies, &mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// How the dependency network constrains a schedule.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConstraintSummary {
    #[pyo3(get)]
    pub finish_to_start: usize,
    #[pyo3(get)]
    pub start_to_start: usize,
    #[pyo3(get)]
    pub finish_to_finish: usize,
    #[pyo3(get)]
    pub start_to_finish: usize,
    /// Sum of absolute lag over all counted dependencies, in days.
    #[pyo3(get)]
    pub total_lag_days: u64,
    /// Dependencies with negative lag, as `Pred -> Succ (lead: n days)`.
    #[pyo3(get)]
    pub lead_times: Vec<String>,
    #[pyo3(get)]
    pub critical_tasks: usize,
    #[pyo3(get)]
    pub total_tasks: usize,
    /// Critical tasks as a percentage of all tasks (0 for an empty schedule).
    #[pyo3(get)]
    pub critical_percent: f64,
}

impl ConstraintSummary {
    pub fn count(&self, kind: DependencyType) -> usize {
        match kind {
            DependencyType::FinishToStart => self.finish_to_start,
            DependencyType::StartToStart => self.start_to_start,
            DependencyType::FinishToFinish => self.finish_to_finish,
            DependencyType::StartToFinish => self.start_to_finish,
        }
    }
}

#[pymethods]
impl ConstraintSummary {
    fn __repr__(&self) -> String {
        format!(
            "ConstraintSummary(FS={}, SS={}, FF={}, SF={}, lag={}, leads={}, critical={:.1}%)",
            self.finish_to_start,
            self.start_to_start,
            self.finish_to_finish,
            self.start_to_finish,
            self.total_lag_days,
            self.lead_times.len(),
            self.critical_percent
        )
    }
}

/// Summarize dependency types, lag and lead time, and the critical share.
///
/// Only dependencies between known tasks are counted, matching what the
/// engine actually scheduled.
pub fn analyze_constraints(
    result: &ScheduleResult,
    tasks: &[Task],
    dependencies: &[Dependency],
) -> ConstraintSummary {
    let names = display_names(tasks);
    let mut summary = ConstraintSummary {
        critical_tasks: result.critical_tasks,
        total_tasks: result.total_tasks,
        ..Default::default()
    };

    for dep in dependencies {
        let (Some(pred), Some(succ)) = (
            names.get(dep.predecessor_id.as_str()),
            names.get(dep.successor_id.as_str()),
        ) else {
            continue;
        };
        match dep.dependency_type {
            DependencyType::FinishToStart => summary.finish_to_start += 1,
            DependencyType::StartToStart => summary.start_to_start += 1,
            DependencyType::FinishToFinish => summary.finish_to_finish += 1,
            DependencyType::StartToFinish => summary.start_to_finish += 1,
        }
        let lag = dep.lag.unwrap_or(0);
        summary.total_lag_days = summary.total_lag_days.saturating_add(lag.unsigned_abs());
        if lag < 0 {
            summary
                .lead_times
                .push(format!("{} -> {} (lead: {} days)", pred, succ, lag.unsigned_abs()));
        }
    }

    if summary.total_tasks > 0 {
        summary.critical_percent =
            summary.critical_tasks as f64 / summary.total_tasks as f64 * 100.0;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute_schedule;

    #[test]
    fn test_table_lists_tasks_by_early_start() {
        let tasks = vec![
            Task::with_duration("late", 2),
            Task::with_duration("first", 3),
        ];
        let deps = vec![Dependency::finish_to_start("first", "late")];
        let table = render_schedule_table(&compute_schedule(&tasks, &deps));

        let first = table.find("first").unwrap();
        let late = table.find("late").unwrap();
        assert!(first < late);
        assert!(table.contains("Duration: 5 days, critical: 2/2"));
        assert!(table.contains("Critical chain: first -> late"));
    }

    #[test]
    fn test_table_marks_unresolved_times() {
        let tasks = vec![Task::with_duration("x", 1), Task::with_duration("y", 1)];
        let deps = vec![
            Dependency::finish_to_start("x", "y"),
            Dependency::finish_to_start("y", "x"),
        ];
        let table = render_schedule_table(&compute_schedule(&tasks, &deps));
        assert!(table.contains("Unresolved (cycle): x, y"));
        assert!(table.contains(" - "));
    }

    #[test]
    fn test_failed_schedule_renders_error() {
        let table = render_schedule_table(&ScheduleResult::failure("overflow"));
        assert_eq!(table, "Schedule failed: overflow\n");
    }

    #[test]
    fn test_describe_dependencies() {
        let tasks = vec![
            Task::with_duration("design", 5).named("Design"),
            Task::with_duration("front", 7).named("Frontend"),
        ];
        let deps = vec![
            Dependency::link("design", "front", DependencyType::StartToStart, 2),
            Dependency::finish_to_start("design", "unknown"),
        ];
        assert_eq!(
            describe_dependencies(&tasks, &deps),
            vec![
                "Design --[SS]--> Frontend (lag: 2)".to_string(),
                "Design --[FS]--> unknown".to_string(),
            ]
        );
    }

    #[test]
    fn test_csv_export_rows_follow_early_start() {
        let tasks = vec![
            Task::with_duration("deploy", 1).named("Deploy"),
            Task::with_duration("design", 5).named("Design"),
            Task::with_duration("front", 7).named("Frontend"),
        ];
        let deps = vec![
            Dependency::link("design", "front", DependencyType::StartToStart, 5),
            Dependency::finish_to_start("front", "deploy"),
            Dependency::finish_to_start("design", "deploy"),
            Dependency::finish_to_start("ghost", "deploy"),
        ];
        let result = compute_schedule(&tasks, &deps);
        let csv = export_schedule_csv(&result, &tasks, &deps).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "ID,Name,Duration,ES,EF,LS,LF,Total float,Free float,Critical,Predecessors"
        );
        assert_eq!(lines[1], "design,Design,5,0,5,0,5,0,0,yes,");
        // Predecessor cells contain commas, so they are quoted
        assert_eq!(lines[2], "front,Frontend,7,5,12,5,12,0,0,yes,\"Design(SS,5)\"");
        assert_eq!(
            lines[3],
            "deploy,Deploy,1,12,13,12,13,0,0,yes,\"Frontend(FS,0); Design(FS,0)\""
        );
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_csv_export_leaves_unresolved_times_empty() {
        let tasks = vec![Task::with_duration("x", 1), Task::with_duration("y", 1)];
        let deps = vec![
            Dependency::finish_to_start("x", "y"),
            Dependency::finish_to_start("y", "x"),
        ];
        let result = compute_schedule(&tasks, &deps);
        let csv = export_schedule_csv(&result, &tasks, &deps).unwrap();

        assert!(csv.contains("x,x,1,,,,,,,no,\"y(FS,0)\""));
        assert!(csv.contains("y,y,1,,,,,,,no,\"x(FS,0)\""));
    }

    #[test]
    fn test_constraint_summary() {
        let tasks = vec![
            Task::with_duration("design", 5).named("Design"),
            Task::with_duration("front", 7).named("Frontend"),
            Task::with_duration("test", 3).named("Testing"),
            Task::with_duration("docs", 2).named("Docs"),
        ];
        let deps = vec![
            Dependency::link("design", "front", DependencyType::StartToStart, 2),
            Dependency::link("front", "test", DependencyType::FinishToFinish, -1),
            Dependency::finish_to_start("design", "docs"),
            Dependency::link("docs", "test", DependencyType::FinishToStart, 3),
            Dependency::finish_to_start("design", "ghost"),
        ];
        let result = compute_schedule(&tasks, &deps);
        let summary = analyze_constraints(&result, &tasks, &deps);

        assert_eq!(summary.count(DependencyType::FinishToStart), 2);
        assert_eq!(summary.count(DependencyType::StartToStart), 1);
        assert_eq!(summary.count(DependencyType::FinishToFinish), 1);
        assert_eq!(summary.count(DependencyType::StartToFinish), 0);
        assert_eq!(summary.total_lag_days, 6);
        assert_eq!(summary.lead_times, vec!["Frontend -> Testing (lead: 1 days)"]);
        assert_eq!(summary.total_tasks, 4);
        assert_eq!(summary.critical_tasks, result.critical_tasks);
        assert!(
            (summary.critical_percent - result.critical_tasks as f64 * 25.0).abs() < 1e-9
        );
    }

    #[test]
    fn test_constraint_summary_of_empty_schedule() {
        let summary = analyze_constraints(&compute_schedule(&[], &[]), &[], &[]);
        assert_eq!(summary, ConstraintSummary::default());
    }
}
