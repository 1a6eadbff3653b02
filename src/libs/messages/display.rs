//! Text of every [`Message`].
//!
//! One match arm per variant, so adding a message forces a decision on its
//! wording here.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::ConfigModuleDatabase => "Database settings".to_string(),
            Message::PromptDatabasePath => "Database file".to_string(),
            Message::PromptBusyTimeout => "Busy timeout (milliseconds)".to_string(),
            Message::PromptPasswordCost => "Password hashing cost".to_string(),
            Message::PasswordCostRange => "Cost must be between 4 and 31".to_string(),
            Message::InvalidEnvOverride(var, value) => format!("Invalid value '{}' for {}", value, var),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All migrations completed".to_string(),
            Message::DatabaseVersion(version) => format!("Database schema version: {}", version),
            Message::DatabaseUpToDate => "Database is up to date".to_string(),
            Message::MigrationHistory => "Migration history:".to_string(),
            Message::PendingMigrationsHeader => "Pending migrations:".to_string(),
            Message::PendingMigration(version, name) => format!("  v{}: {}", version, name),
            Message::AppliedMigration(version, name, applied_at) => format!("  v{}: {} (applied: {})", version, name, applied_at),
            Message::MigrationsApplied(count) => format!("Applied {} migration(s)", count),

            // === USER MESSAGES ===
            Message::UserCreated(login) => format!("User '{}' created", login),
            Message::UserUpdated(login) => format!("User '{}' updated", login),
            Message::UserDeleted(id) => format!("User {} deleted", id),
            Message::UserNotFound(id) => format!("User {} not found", id),
            Message::PasswordChanged(login) => format!("Password changed for '{}'", login),
            Message::NoUsersFound => "No users found".to_string(),
            Message::UsersHeader => "Users:".to_string(),
            Message::ManagersHeader => "Users who can manage projects:".to_string(),
            Message::LoginSucceeded(name, profile) => format!("Welcome, {} ({})", name, profile),
            Message::LoginFailed => "Invalid login or password".to_string(),
            Message::PromptPassword => "Password".to_string(),
            Message::PromptPasswordConfirm => "Repeat password".to_string(),
            Message::PasswordMismatch => "Passwords do not match".to_string(),
            Message::NotAManager(id) => format!("User {} is not an administrator or manager", id),

            // === TEAM MESSAGES ===
            Message::TeamCreated(name, id) => format!("Team '{}' created with id {}", name, id),
            Message::TeamUpdated(name) => format!("Team '{}' updated", name),
            Message::TeamDeleted(id) => format!("Team {} deleted", id),
            Message::TeamNotFound(id) => format!("Team {} not found", id),
            Message::NoTeamsFound => "No teams found".to_string(),
            Message::TeamsHeader => "Teams:".to_string(),
            Message::TeamMembersHeader(name) => format!("Members of '{}':", name),
            Message::TeamHasNoMembers(name) => format!("Team '{}' has no members", name),
            Message::MembersReconciled(id, count) => format!("Team {} now has {} member(s)", id, count),
            Message::MemberAlreadyStaged(id) => format!("User {} is already a member", id),
            Message::MemberNotStaged(id) => format!("User {} is not a member", id),
            Message::NoMembershipChanges => "Membership unchanged".to_string(),
            Message::InvalidTeamId(id) => format!("Invalid team id {}", id),

            // === PROJECT MESSAGES ===
            Message::ProjectCreated(name, id) => format!("Project '{}' created with id {}", name, id),
            Message::ProjectUpdated(name) => format!("Project '{}' updated", name),
            Message::ProjectDeleted(id) => format!("Project {} deleted", id),
            Message::ProjectNotFound(id) => format!("Project {} not found", id),
            Message::NoProjectsFound => "No projects found".to_string(),
            Message::ProjectsHeader => "Projects:".to_string(),
            Message::ProjectTeamsHeader(name) => format!("Teams allocated to '{}':", name),
            Message::ProjectHasNoTeams(name) => format!("No teams allocated to '{}'", name),
            Message::TeamAssigned(team, project) => format!("Team {} allocated to project {}", team, project),
            Message::TeamAlreadyAssigned(team, project) => format!("Team {} is already allocated to project {}", team, project),
            Message::TeamUnassigned(team, project) => format!("Team {} removed from project {}", team, project),
            Message::TeamNotAssigned(team, project) => format!("Team {} is not allocated to project {}", team, project),
            Message::InvalidDateRange(start, end) => format!("End date {} is before start date {}", end, start),

            // === TASK MESSAGES ===
            Message::TaskCreated(title, id) => format!("Task '{}' created with id {}", title, id),
            Message::TaskUpdated(title) => format!("Task '{}' updated", title),
            Message::TaskStatusChanged(id, status) => format!("Task {} is now {}", id, status),
            Message::TaskDeleted(id) => format!("Task {} deleted", id),
            Message::TaskNotFound(id) => format!("Task {} not found", id),
            Message::NoTasksFound => "No tasks found".to_string(),
            Message::TasksHeader => "Tasks:".to_string(),
            Message::UpcomingTasksHeader => "Due within a week or overdue:".to_string(),
            Message::NoUpcomingTasks => "Nothing due within a week".to_string(),

            // === DASHBOARD MESSAGES ===
            Message::DashboardHeader(date) => format!("Dashboard for {}", date),
            Message::ProjectProgressHeader => "Tasks per project:".to_string(),

            // === STORAGE MESSAGES ===
            Message::StorageBusy(error) => format!("Database is busy, nothing was changed; try again ({})", error),
            Message::ConstraintRejected(error) => format!("Change rejected, nothing was changed ({})", error),

            // === GENERAL MESSAGES ===
            Message::ConfirmDelete(what) => format!("Delete {}?", what),
            Message::OperationCancelled => "Operation cancelled".to_string(),
        };

        write!(f, "{}", text)
    }
}
