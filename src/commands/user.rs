use super::{confirm_delete, report_store_error};
use crate::{
    db::users::Users,
    libs::{
        messages::Message,
        user::{User, UserProfile},
        view::View,
    },
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Password};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Debug, Subcommand)]
enum UserCommand {
    /// Create a user; the password is prompted for
    Add {
        /// Full name
        full_name: String,
        #[arg(long)]
        cpf: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        login: String,
        /// administrator, manager or collaborator
        #[arg(long, default_value = "collaborator")]
        profile: UserProfile,
        #[arg(long)]
        job_title: Option<String>,
    },
    /// List users
    List {
        /// Only users who can manage projects
        #[arg(long)]
        managers: bool,
    },
    /// Check a login and password
    Login { login: String },
    /// Change a user's password
    Passwd { id: i32 },
    /// Change a user's profile
    Profile { id: i32, profile: UserProfile },
    /// Delete a user and its team memberships
    Delete {
        id: i32,
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: UserArgs) -> Result<()> {
    match args.command {
        UserCommand::Add {
            full_name,
            cpf,
            email,
            login,
            profile,
            job_title,
        } => {
            let mut user = User::new(&full_name, &cpf, &email, &login, profile);
            if let Some(job_title) = job_title {
                user = user.with_job_title(&job_title);
            }
            handle_add(user)
        }
        UserCommand::List { managers } => handle_list(managers),
        UserCommand::Login { login } => handle_login(login),
        UserCommand::Passwd { id } => handle_passwd(id),
        UserCommand::Profile { id, profile } => handle_profile(id, profile),
        UserCommand::Delete { id, yes } => handle_delete(id, yes),
    }
}

fn prompt_new_password() -> Result<String> {
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptPassword.to_string())
        .with_confirmation(Message::PromptPasswordConfirm.to_string(), Message::PasswordMismatch.to_string())
        .interact()?;
    Ok(password)
}

fn handle_add(user: User) -> Result<()> {
    let password = prompt_new_password()?;
    let mut users = Users::new()?;

    match users.create(&user, &password) {
        Ok(_) => {
            msg_success!(Message::UserCreated(user.login));
            Ok(())
        }
        Err(e) => report_store_error(e),
    }
}

fn handle_list(managers_only: bool) -> Result<()> {
    let mut users = Users::new()?;
    let (header, list) = if managers_only {
        (Message::ManagersHeader, users.managers()?)
    } else {
        (Message::UsersHeader, users.list()?)
    };

    if list.is_empty() {
        msg_info!(Message::NoUsersFound);
        return Ok(());
    }

    msg_print!(header, true);
    View::users(&list);
    Ok(())
}

fn handle_login(login: String) -> Result<()> {
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptPassword.to_string())
        .interact()?;

    match Users::new()?.authenticate(&login, &password)? {
        Some(user) => msg_success!(Message::LoginSucceeded(user.full_name, user.profile.to_string())),
        None => msg_error!(Message::LoginFailed),
    }
    Ok(())
}

fn handle_passwd(id: i32) -> Result<()> {
    let mut users = Users::new()?;
    let Some(user) = users.get_by_id(id)? else {
        msg_error!(Message::UserNotFound(id));
        return Ok(());
    };

    let password = prompt_new_password()?;
    users.set_password(id, &password)?;
    msg_success!(Message::PasswordChanged(user.login));
    Ok(())
}

fn handle_profile(id: i32, profile: UserProfile) -> Result<()> {
    let mut users = Users::new()?;
    let Some(mut user) = users.get_by_id(id)? else {
        msg_error!(Message::UserNotFound(id));
        return Ok(());
    };

    user.profile = profile;
    match users.update(&user) {
        Ok(()) => {
            msg_success!(Message::UserUpdated(user.login));
            Ok(())
        }
        Err(e) => report_store_error(e),
    }
}

fn handle_delete(id: i32, yes: bool) -> Result<()> {
    let mut users = Users::new()?;
    let Some(user) = users.get_by_id(id)? else {
        msg_error!(Message::UserNotFound(id));
        return Ok(());
    };

    if !confirm_delete(format!("user '{}'", user.login), yes)? {
        return Ok(());
    }

    match users.delete(id) {
        Ok(()) => {
            msg_success!(Message::UserDeleted(id));
            Ok(())
        }
        Err(e) => report_store_error(e),
    }
}
