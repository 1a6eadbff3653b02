//! Team commands.
//!
//! Membership is never edited one row at a time: `set-members` replaces the
//! whole set, and `members --add/--remove` stages the changes on top of the
//! stored set before reconciling it in one go.

use super::{confirm_delete, report_store_error};
use crate::{
    db::teams::Teams,
    libs::{messages::Message, team::Team, view::View},
    msg_error, msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct TeamArgs {
    #[command(subcommand)]
    command: TeamCommand,
}

#[derive(Debug, Subcommand)]
enum TeamCommand {
    /// Create a team, optionally with its initial members
    Create {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
        /// User id of a member; repeat for more
        #[arg(short, long = "member")]
        members: Vec<i32>,
    },
    /// List teams
    List,
    /// Show a team and its members
    Show { id: i32 },
    /// Rename a team or change its description, optionally replacing its members
    Update {
        id: i32,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// User id of a member; repeat for more. Replaces the whole member set
        #[arg(short, long = "member")]
        members: Vec<i32>,
        /// Remove every member
        #[arg(long, conflicts_with = "members")]
        no_members: bool,
    },
    /// Replace the member set; no ids removes every member
    SetMembers {
        id: i32,
        #[arg(num_args = 0..)]
        members: Vec<i32>,
    },
    /// Add or remove individual members
    Members {
        id: i32,
        #[arg(short, long)]
        add: Vec<i32>,
        #[arg(short, long)]
        remove: Vec<i32>,
    },
    /// Delete a team with its memberships and project allocations
    Delete {
        id: i32,
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: TeamArgs) -> Result<()> {
    match args.command {
        TeamCommand::Create { name, description, members } => handle_create(name, description, members),
        TeamCommand::List => handle_list(),
        TeamCommand::Show { id } => handle_show(id),
        TeamCommand::Update {
            id,
            name,
            description,
            members,
            no_members,
        } => handle_update(id, name, description, membership_change(members, no_members)),
        TeamCommand::SetMembers { id, members } => handle_set_members(id, members),
        TeamCommand::Members { id, add, remove } => handle_members(id, add, remove),
        TeamCommand::Delete { id, yes } => handle_delete(id, yes),
    }
}

fn handle_create(name: String, description: Option<String>, members: Vec<i32>) -> Result<()> {
    let mut teams = Teams::new()?;
    let team = Team::new(&name, description.as_deref());

    match teams.create_with_members(&team, members) {
        Ok(id) => {
            msg_success!(Message::TeamCreated(name, id));
            Ok(())
        }
        Err(e) => report_store_error(e.into()),
    }
}

fn handle_list() -> Result<()> {
    let teams = Teams::new()?.list()?;

    if teams.is_empty() {
        msg_info!(Message::NoTeamsFound);
        return Ok(());
    }

    msg_print!(Message::TeamsHeader, true);
    View::teams(&teams);
    Ok(())
}

fn handle_show(id: i32) -> Result<()> {
    let mut teams = Teams::new()?;
    let Some(team) = teams.get_by_id(id)? else {
        msg_error!(Message::TeamNotFound(id));
        return Ok(());
    };

    View::teams(std::slice::from_ref(&team));

    let members = teams.members(id)?;
    if members.is_empty() {
        msg_info!(Message::TeamHasNoMembers(team.name));
        return Ok(());
    }

    msg_print!(Message::TeamMembersHeader(team.name), true);
    View::users(&members);
    Ok(())
}

/// Target member set of `team update`, or `None` to leave membership alone.
fn membership_change(members: Vec<i32>, no_members: bool) -> Option<Vec<i32>> {
    if no_members {
        Some(Vec::new())
    } else if members.is_empty() {
        None
    } else {
        Some(members)
    }
}

fn handle_update(id: i32, name: Option<String>, description: Option<String>, members: Option<Vec<i32>>) -> Result<()> {
    let mut teams = Teams::new()?;
    let Some(mut team) = teams.get_by_id(id)? else {
        msg_error!(Message::TeamNotFound(id));
        return Ok(());
    };

    if let Some(name) = name {
        team.name = name;
    }
    if let Some(description) = description {
        team.description = if description.is_empty() { None } else { Some(description) };
    }

    let updated = match members {
        Some(members) => teams.update_with_members(&team, members),
        None => teams.update(&team),
    };
    match updated {
        Ok(()) => {
            msg_success!(Message::TeamUpdated(team.name));
            Ok(())
        }
        Err(e) => report_store_error(e.into()),
    }
}

fn handle_set_members(id: i32, members: Vec<i32>) -> Result<()> {
    let mut teams = Teams::new()?;
    if teams.get_by_id(id)?.is_none() {
        msg_error!(Message::TeamNotFound(id));
        return Ok(());
    }

    match teams.reconcile_members(id, members) {
        Ok(count) => {
            msg_success!(Message::MembersReconciled(id, count));
            Ok(())
        }
        Err(e) => report_store_error(e.into()),
    }
}

fn handle_members(id: i32, add: Vec<i32>, remove: Vec<i32>) -> Result<()> {
    let mut teams = Teams::new()?;
    if teams.get_by_id(id)?.is_none() {
        msg_error!(Message::TeamNotFound(id));
        return Ok(());
    }

    let stored = teams.selection(id)?;
    let mut staged = stored.clone();
    for user_id in add {
        if !staged.add(user_id) {
            msg_warning!(Message::MemberAlreadyStaged(user_id));
        }
    }
    for user_id in remove {
        if !staged.remove(user_id) {
            msg_warning!(Message::MemberNotStaged(user_id));
        }
    }

    if staged == stored {
        msg_info!(Message::NoMembershipChanges);
        return Ok(());
    }

    match teams.reconcile_members(id, staged.ids()) {
        Ok(count) => {
            msg_success!(Message::MembersReconciled(id, count));
            Ok(())
        }
        Err(e) => report_store_error(e.into()),
    }
}

fn handle_delete(id: i32, yes: bool) -> Result<()> {
    let mut teams = Teams::new()?;
    let Some(team) = teams.get_by_id(id)? else {
        msg_error!(Message::TeamNotFound(id));
        return Ok(());
    };

    if !confirm_delete(format!("team '{}'", team.name), yes)? {
        return Ok(());
    }

    teams.delete(id)?;
    msg_success!(Message::TeamDeleted(id));
    Ok(())
}
