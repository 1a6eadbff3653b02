use super::{confirm_delete, report_store_error};
use crate::{
    db::tasks::Tasks,
    libs::{
        messages::Message,
        task::{Task, TaskFilter, TaskStatus},
        view::View,
    },
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    command: TaskCommand,
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    /// Create a task
    Create {
        title: String,
        #[arg(long)]
        project: i32,
        /// Id of the responsible user
        #[arg(long)]
        responsible: i32,
        /// Planned start (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// Planned end (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List tasks; at most one filter applies
    List {
        #[arg(long, conflicts_with_all = ["status", "responsible"])]
        project: Option<i32>,
        #[arg(long, conflicts_with = "responsible")]
        status: Option<TaskStatus>,
        #[arg(long)]
        responsible: Option<i32>,
    },
    /// Tasks due within a week, overdue ones included
    Upcoming,
    /// Change the status of a task
    Status {
        id: i32,
        /// pending, in-progress or completed
        status: TaskStatus,
    },
    /// Change task fields
    Update {
        id: i32,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        responsible: Option<i32>,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(long)]
        actual_start: Option<NaiveDate>,
        #[arg(long)]
        actual_end: Option<NaiveDate>,
    },
    /// Delete a task
    Delete {
        id: i32,
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: TaskArgs) -> Result<()> {
    match args.command {
        TaskCommand::Create {
            title,
            project,
            responsible,
            start,
            end,
            description,
        } => {
            let mut task = Task::new(&title, project, responsible, start, end);
            task.description = description;
            handle_create(task)
        }
        TaskCommand::List {
            project,
            status,
            responsible,
        } => {
            let filter = match (project, status, responsible) {
                (Some(id), _, _) => TaskFilter::ByProject(id),
                (_, Some(status), _) => TaskFilter::ByStatus(status),
                (_, _, Some(id)) => TaskFilter::ByResponsible(id),
                _ => TaskFilter::All,
            };
            handle_list(filter)
        }
        TaskCommand::Upcoming => handle_upcoming(),
        TaskCommand::Status { id, status } => handle_status(id, status),
        TaskCommand::Update {
            id,
            title,
            description,
            responsible,
            start,
            end,
            actual_start,
            actual_end,
        } => {
            let mut tasks = Tasks::new()?;
            let Some(mut task) = tasks.get_by_id(id)? else {
                msg_error!(Message::TaskNotFound(id));
                return Ok(());
            };
            if let Some(title) = title {
                task.title = title;
            }
            if let Some(description) = description {
                task.description = if description.is_empty() { None } else { Some(description) };
            }
            if let Some(responsible) = responsible {
                task.responsible_id = responsible;
            }
            if let Some(start) = start {
                task.planned_start_date = start;
            }
            if let Some(end) = end {
                task.planned_end_date = end;
            }
            if actual_start.is_some() {
                task.actual_start_date = actual_start;
            }
            if actual_end.is_some() {
                task.actual_end_date = actual_end;
            }
            handle_update(tasks, task)
        }
        TaskCommand::Delete { id, yes } => handle_delete(id, yes),
    }
}

fn dates_are_valid(task: &Task) -> bool {
    if task.planned_end_date < task.planned_start_date {
        msg_error!(Message::InvalidDateRange(
            task.planned_start_date.to_string(),
            task.planned_end_date.to_string()
        ));
        return false;
    }
    true
}

fn handle_create(task: Task) -> Result<()> {
    if !dates_are_valid(&task) {
        return Ok(());
    }

    match Tasks::new()?.insert(&task) {
        Ok(id) => {
            msg_success!(Message::TaskCreated(task.title, id));
            Ok(())
        }
        Err(e) => report_store_error(e),
    }
}

fn handle_list(filter: TaskFilter) -> Result<()> {
    let tasks = Tasks::new()?.fetch(filter)?;

    if tasks.is_empty() {
        msg_info!(Message::NoTasksFound);
        return Ok(());
    }

    msg_print!(Message::TasksHeader, true);
    View::tasks(&tasks);
    Ok(())
}

fn handle_upcoming() -> Result<()> {
    let tasks = Tasks::new()?.upcoming_and_overdue(Local::now().date_naive())?;

    if tasks.is_empty() {
        msg_info!(Message::NoUpcomingTasks);
        return Ok(());
    }

    msg_print!(Message::UpcomingTasksHeader, true);
    View::tasks(&tasks);
    Ok(())
}

fn handle_status(id: i32, status: TaskStatus) -> Result<()> {
    let mut tasks = Tasks::new()?;
    if tasks.get_by_id(id)?.is_none() {
        msg_error!(Message::TaskNotFound(id));
        return Ok(());
    }

    tasks.set_status(id, status)?;
    msg_success!(Message::TaskStatusChanged(id, status.to_string()));
    Ok(())
}

fn handle_update(mut tasks: Tasks, task: Task) -> Result<()> {
    if !dates_are_valid(&task) {
        return Ok(());
    }

    match tasks.update(&task) {
        Ok(()) => {
            msg_success!(Message::TaskUpdated(task.title));
            Ok(())
        }
        Err(e) => report_store_error(e),
    }
}

fn handle_delete(id: i32, yes: bool) -> Result<()> {
    let mut tasks = Tasks::new()?;
    let Some(task) = tasks.get_by_id(id)? else {
        msg_error!(Message::TaskNotFound(id));
        return Ok(());
    };

    if !confirm_delete(format!("task '{}'", task.title), yes)? {
        return Ok(());
    }

    tasks.delete(id)?;
    msg_success!(Message::TaskDeleted(id));
    Ok(())
}
