/// Every user-facing message of the application.
///
/// Text lives in the `Display` implementation in `display.rs`.
#[derive(Debug, Clone)]
pub enum Message {
    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigModuleDatabase,
    PromptDatabasePath,
    PromptBusyTimeout,
    PromptPasswordCost,
    PasswordCostRange,
    InvalidEnvOverride(String, String), // variable, value

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
    DatabaseVersion(u32),
    DatabaseUpToDate,
    MigrationHistory,
    PendingMigrationsHeader,
    PendingMigration(u32, String),
    AppliedMigration(u32, String, String), // version, name, applied at
    MigrationsApplied(usize),

    // === USER MESSAGES ===
    UserCreated(String),
    UserUpdated(String),
    UserDeleted(i32),
    UserNotFound(i32),
    PasswordChanged(String),
    NoUsersFound,
    UsersHeader,
    ManagersHeader,
    LoginSucceeded(String, String), // name, profile
    LoginFailed,
    PromptPassword,
    PromptPasswordConfirm,
    PasswordMismatch,
    NotAManager(i32),

    // === TEAM MESSAGES ===
    TeamCreated(String, i32),
    TeamUpdated(String),
    TeamDeleted(i32),
    TeamNotFound(i32),
    NoTeamsFound,
    TeamsHeader,
    TeamMembersHeader(String),
    TeamHasNoMembers(String),
    MembersReconciled(i32, usize), // team id, member count
    MemberAlreadyStaged(i32),
    MemberNotStaged(i32),
    NoMembershipChanges,
    InvalidTeamId(i32),

    // === PROJECT MESSAGES ===
    ProjectCreated(String, i32),
    ProjectUpdated(String),
    ProjectDeleted(i32),
    ProjectNotFound(i32),
    NoProjectsFound,
    ProjectsHeader,
    ProjectTeamsHeader(String),
    ProjectHasNoTeams(String),
    TeamAssigned(i32, i32),        // team, project
    TeamAlreadyAssigned(i32, i32), // team, project
    TeamUnassigned(i32, i32),      // team, project
    TeamNotAssigned(i32, i32),     // team, project
    InvalidDateRange(String, String),

    // === TASK MESSAGES ===
    TaskCreated(String, i32),
    TaskUpdated(String),
    TaskStatusChanged(i32, String),
    TaskDeleted(i32),
    TaskNotFound(i32),
    NoTasksFound,
    TasksHeader,
    UpcomingTasksHeader,
    NoUpcomingTasks,

    // === DASHBOARD MESSAGES ===
    DashboardHeader(String), // date
    ProjectProgressHeader,

    // === STORAGE MESSAGES ===
    StorageBusy(String),
    ConstraintRejected(String),

    // === GENERAL MESSAGES ===
    ConfirmDelete(String),
    OperationCancelled,
}
