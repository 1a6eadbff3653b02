use super::{confirm_delete, report_store_error};
use crate::{
    db::{projects::Projects, users::Users},
    libs::{
        messages::Message,
        project::{Project, ProjectStatus},
        view::View,
    },
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ProjectArgs {
    #[command(subcommand)]
    command: ProjectCommand,
}

#[derive(Debug, Subcommand)]
enum ProjectCommand {
    /// Create a project
    Create {
        name: String,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// Planned end date (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
        /// Id of an administrator or manager
        #[arg(long)]
        manager: i32,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List projects
    List,
    /// Show a project and its allocated teams
    Show { id: i32 },
    /// Change project fields
    Update {
        id: i32,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        /// planned, in-progress, completed or cancelled
        #[arg(long)]
        status: Option<ProjectStatus>,
        #[arg(long)]
        manager: Option<i32>,
    },
    /// Allocate a team to a project
    Assign { id: i32, team: i32 },
    /// Remove a team from a project
    Unassign { id: i32, team: i32 },
    /// Delete a project with its tasks
    Delete {
        id: i32,
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: ProjectArgs) -> Result<()> {
    match args.command {
        ProjectCommand::Create {
            name,
            start,
            end,
            manager,
            description,
        } => {
            let mut project = Project::new(&name, start, end, manager);
            project.description = description;
            handle_create(project)
        }
        ProjectCommand::List => handle_list(),
        ProjectCommand::Show { id } => handle_show(id),
        ProjectCommand::Update {
            id,
            name,
            description,
            start,
            end,
            status,
            manager,
        } => {
            let mut projects = Projects::new()?;
            let Some(mut project) = projects.get_by_id(id)? else {
                msg_error!(Message::ProjectNotFound(id));
                return Ok(());
            };
            if let Some(name) = name {
                project.name = name;
            }
            if let Some(description) = description {
                project.description = if description.is_empty() { None } else { Some(description) };
            }
            if let Some(start) = start {
                project.start_date = start;
            }
            if let Some(end) = end {
                project.planned_end_date = end;
            }
            if let Some(status) = status {
                project.status = status;
            }
            if let Some(manager) = manager {
                project.manager_id = manager;
            }
            handle_update(projects, project)
        }
        ProjectCommand::Assign { id, team } => handle_assign(id, team),
        ProjectCommand::Unassign { id, team } => handle_unassign(id, team),
        ProjectCommand::Delete { id, yes } => handle_delete(id, yes),
    }
}

/// Checks the date range and that the manager may lead projects.
fn validate(project: &Project) -> Result<bool> {
    if project.planned_end_date < project.start_date {
        msg_error!(Message::InvalidDateRange(
            project.start_date.to_string(),
            project.planned_end_date.to_string()
        ));
        return Ok(false);
    }

    match Users::new()?.get_by_id(project.manager_id)? {
        Some(user) if user.profile.can_manage() => Ok(true),
        Some(_) => {
            msg_error!(Message::NotAManager(project.manager_id));
            Ok(false)
        }
        None => {
            msg_error!(Message::UserNotFound(project.manager_id));
            Ok(false)
        }
    }
}

fn handle_create(project: Project) -> Result<()> {
    if !validate(&project)? {
        return Ok(());
    }

    match Projects::new()?.create(&project) {
        Ok(id) => {
            msg_success!(Message::ProjectCreated(project.name, id));
            Ok(())
        }
        Err(e) => report_store_error(e),
    }
}

fn handle_list() -> Result<()> {
    let projects = Projects::new()?.list()?;

    if projects.is_empty() {
        msg_info!(Message::NoProjectsFound);
        return Ok(());
    }

    msg_print!(Message::ProjectsHeader, true);
    View::projects(&projects);
    Ok(())
}

fn handle_show(id: i32) -> Result<()> {
    let mut projects = Projects::new()?;
    let Some(project) = projects.get_by_id(id)? else {
        msg_error!(Message::ProjectNotFound(id));
        return Ok(());
    };

    View::projects(std::slice::from_ref(&project));
    if let Some(description) = &project.description {
        msg_print!(description);
    }

    let teams = projects.teams(id)?;
    if teams.is_empty() {
        msg_info!(Message::ProjectHasNoTeams(project.name));
        return Ok(());
    }

    msg_print!(Message::ProjectTeamsHeader(project.name), true);
    View::teams(&teams);
    Ok(())
}

fn handle_update(mut projects: Projects, project: Project) -> Result<()> {
    if !validate(&project)? {
        return Ok(());
    }

    match projects.update(&project) {
        Ok(()) => {
            msg_success!(Message::ProjectUpdated(project.name));
            Ok(())
        }
        Err(e) => report_store_error(e),
    }
}

fn handle_assign(project_id: i32, team_id: i32) -> Result<()> {
    match Projects::new()?.assign_team(project_id, team_id) {
        Ok(true) => msg_success!(Message::TeamAssigned(team_id, project_id)),
        Ok(false) => msg_info!(Message::TeamAlreadyAssigned(team_id, project_id)),
        Err(e) => return report_store_error(e),
    }
    Ok(())
}

fn handle_unassign(project_id: i32, team_id: i32) -> Result<()> {
    if Projects::new()?.unassign_team(project_id, team_id)? {
        msg_success!(Message::TeamUnassigned(team_id, project_id));
    } else {
        msg_info!(Message::TeamNotAssigned(team_id, project_id));
    }
    Ok(())
}

fn handle_delete(id: i32, yes: bool) -> Result<()> {
    let mut projects = Projects::new()?;
    let Some(project) = projects.get_by_id(id)? else {
        msg_error!(Message::ProjectNotFound(id));
        return Ok(());
    };

    if !confirm_delete(format!("project '{}'", project.name), yes)? {
        return Ok(());
    }

    projects.delete(id)?;
    msg_success!(Message::ProjectDeleted(id));
    Ok(())
}
