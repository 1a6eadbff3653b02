//! In-memory aggregation behind the `dashboard` command.
//!
//! All figures are computed from already-loaded projects and tasks; nothing
//! here touches the database.

use super::project::{Project, ProjectStatus};
use super::task::{Task, TaskStatus};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Headline counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub projects_in_progress: usize,
    pub pending_tasks: usize,
    pub overdue_tasks: usize,
    pub completed_tasks: usize,
}

impl DashboardSummary {
    pub fn build(projects: &[Project], tasks: &[Task], today: NaiveDate) -> Self {
        DashboardSummary {
            projects_in_progress: projects.iter().filter(|p| p.status == ProjectStatus::InProgress).count(),
            pending_tasks: tasks.iter().filter(|t| t.status == TaskStatus::Pending).count(),
            overdue_tasks: tasks.iter().filter(|t| t.is_overdue(today)).count(),
            completed_tasks: tasks.iter().filter(|t| t.status == TaskStatus::Completed).count(),
        }
    }
}

/// Task counts per project, per status.
pub fn tasks_by_project_and_status(tasks: &[Task]) -> HashMap<i32, HashMap<TaskStatus, usize>> {
    let mut grouped: HashMap<i32, HashMap<TaskStatus, usize>> = HashMap::new();
    for task in tasks {
        *grouped.entry(task.project_id).or_default().entry(task.status).or_insert(0) += 1;
    }
    grouped
}

/// One chart row per project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectProgress {
    pub project_id: i32,
    pub name: String,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl ProjectProgress {
    pub fn total(&self) -> usize {
        self.pending + self.in_progress + self.completed
    }
}

/// Rows follow the order of `projects`; projects without tasks get zeros.
/// Also returns the largest per-project total, used to scale the chart.
pub fn project_progress(projects: &[Project], tasks: &[Task]) -> (Vec<ProjectProgress>, usize) {
    let grouped = tasks_by_project_and_status(tasks);
    let empty = HashMap::new();

    let rows: Vec<ProjectProgress> = projects
        .iter()
        .filter_map(|project| {
            let id = project.id?;
            let counts = grouped.get(&id).unwrap_or(&empty);
            let count = |status: TaskStatus| counts.get(&status).copied().unwrap_or(0);
            Some(ProjectProgress {
                project_id: id,
                name: project.name.clone(),
                pending: count(TaskStatus::Pending),
                in_progress: count(TaskStatus::InProgress),
                completed: count(TaskStatus::Completed),
            })
        })
        .collect();

    let max_total = rows.iter().map(ProjectProgress::total).max().unwrap_or(0);
    (rows, max_total)
}
