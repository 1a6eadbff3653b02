use crate::{
    db::{projects::Projects, tasks::Tasks},
    libs::{
        dashboard::{project_progress, DashboardSummary},
        messages::Message,
        task::TaskFilter,
        view::View,
    },
    msg_info, msg_print,
};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Args;

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Reference date (YYYY-MM-DD), today by default
    #[arg(long)]
    date: Option<NaiveDate>,
}

/// Prints the summary counters, tasks per project and the due list.
pub fn cmd(args: DashboardArgs) -> Result<()> {
    let today = args.date.unwrap_or_else(|| Local::now().date_naive());

    let projects = Projects::new()?.list()?;
    let mut tasks_db = Tasks::new()?;
    let tasks = tasks_db.fetch(TaskFilter::All)?;

    msg_print!(Message::DashboardHeader(today.to_string()), true);
    View::summary(&DashboardSummary::build(&projects, &tasks, today));

    let (progress, _) = project_progress(&projects, &tasks);
    if !progress.is_empty() {
        msg_print!(Message::ProjectProgressHeader, true);
        View::progress(&progress);
    }

    let upcoming = tasks_db.upcoming_and_overdue(today)?;
    if upcoming.is_empty() {
        msg_info!(Message::NoUpcomingTasks);
    } else {
        msg_print!(Message::UpcomingTasksHeader, true);
        View::tasks(&upcoming);
    }
    Ok(())
}
