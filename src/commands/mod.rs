//! Command-line interface.
//!
//! Every subcommand lives in its own module with an `Args` struct and a `cmd`
//! entry point. Each invocation opens its own connection through the DAO it
//! needs and drops it when the command returns.

pub mod dashboard;
pub mod init;
pub mod migrations;
pub mod project;
pub mod task;
pub mod team;
pub mod user;

use crate::{
    libs::{error::StoreError, messages::Message},
    msg_error, msg_info,
};
use anyhow::Result;
use clap::{Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Database schema status")]
    Migrations(migrations::MigrationsArgs),
    #[command(about = "Manage users", arg_required_else_help = true)]
    User(user::UserArgs),
    #[command(about = "Manage teams and their members", arg_required_else_help = true)]
    Team(team::TeamArgs),
    #[command(about = "Manage projects", arg_required_else_help = true)]
    Project(project::ProjectArgs),
    #[command(about = "Manage tasks", arg_required_else_help = true)]
    Task(task::TaskArgs),
    #[command(about = "Show project and task overview")]
    Dashboard(dashboard::DashboardArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Migrations(args) => migrations::cmd(args),
            Commands::User(args) => user::cmd(args),
            Commands::Team(args) => team::cmd(args),
            Commands::Project(args) => project::cmd(args),
            Commands::Task(args) => task::cmd(args),
            Commands::Dashboard(args) => dashboard::cmd(args),
        }
    }
}

/// Prints storage failures the user can act on and passes everything else up.
///
/// Busy databases and constraint rejections leave the stored data unchanged,
/// so they are reported rather than aborting with a backtrace.
pub(crate) fn report_store_error(err: anyhow::Error) -> Result<()> {
    match err.downcast::<StoreError>() {
        Ok(StoreError::Transient(e)) => {
            msg_error!(Message::StorageBusy(e.to_string()));
            Ok(())
        }
        Ok(StoreError::Constraint(e)) => {
            msg_error!(Message::ConstraintRejected(e.to_string()));
            Ok(())
        }
        Ok(StoreError::InvalidTeam(id)) => {
            msg_error!(Message::InvalidTeamId(id));
            Ok(())
        }
        Ok(other) => Err(other.into()),
        Err(err) => Err(err),
    }
}

/// Asks before deleting unless `--yes` was given.
pub(crate) fn confirm_delete(what: String, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::ConfirmDelete(what).to_string())
        .default(false)
        .interact()?;

    if !confirmed {
        msg_info!(Message::OperationCancelled);
    }
    Ok(confirmed)
}
