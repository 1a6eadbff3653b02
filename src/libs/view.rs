use super::dashboard::{DashboardSummary, ProjectProgress};
use super::project::Project;
use super::task::Task;
use super::team::Team;
use super::user::User;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn users(users: &[User]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "LOGIN", "EMAIL", "JOB TITLE", "PROFILE"]);
        for user in users {
            table.add_row(row![
                user.id.unwrap_or(0),
                user.full_name,
                user.login,
                user.email,
                user.job_title.as_deref().unwrap_or("-"),
                user.profile
            ]);
        }
        table.printstd();
    }

    pub fn teams(teams: &[Team]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "DESCRIPTION"]);
        for team in teams {
            table.add_row(row![team.id.unwrap_or(0), team.name, team.description.as_deref().unwrap_or("")]);
        }
        table.printstd();
    }

    pub fn projects(projects: &[Project]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "START", "PLANNED END", "STATUS", "MANAGER"]);
        for project in projects {
            table.add_row(row![
                project.id.unwrap_or(0),
                project.name,
                project.start_date,
                project.planned_end_date,
                project.status,
                project.manager_id
            ]);
        }
        table.printstd();
    }

    pub fn tasks(tasks: &[Task]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "PROJECT", "RESPONSIBLE", "STATUS", "PLANNED START", "PLANNED END"]);
        for task in tasks {
            table.add_row(row![
                task.id.unwrap_or(0),
                task.title,
                task.project_id,
                task.responsible_id,
                task.status,
                task.planned_start_date,
                task.planned_end_date
            ]);
        }
        table.printstd();
    }

    pub fn summary(summary: &DashboardSummary) {
        let mut table = Table::new();

        table.add_row(row!["PROJECTS IN PROGRESS", "PENDING TASKS", "OVERDUE TASKS", "COMPLETED TASKS"]);
        table.add_row(row![
            summary.projects_in_progress,
            summary.pending_tasks,
            summary.overdue_tasks,
            summary.completed_tasks
        ]);
        table.printstd();
    }

    pub fn progress(rows: &[ProjectProgress]) {
        let mut table = Table::new();

        table.add_row(row!["PROJECT", "PENDING", "IN PROGRESS", "COMPLETED", "TOTAL"]);
        for progress in rows {
            table.add_row(row![progress.name, progress.pending, progress.in_progress, progress.completed, progress.total()]);
        }
        table.printstd();
    }
}
