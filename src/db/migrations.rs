//! Database schema migration management and versioning.
//!
//! Migrations are forward-only and registered in version order. Every pending
//! migration is applied inside a single transaction when a connection is
//! opened, and each one is recorded in the `migrations` table.
//!
//! ```rust,no_run
//! use ccks::db::migrations::{init_with_migrations, get_db_version};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open("ccks.db")?;
//! init_with_migrations(&mut conn)?;
//! let version = get_db_version(&conn)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::libs::messages::Message;
use crate::{msg_debug, msg_error};
use anyhow::Result;
use rusqlite::{params, Connection, Transaction};
use std::collections::HashSet;

const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

/// Registry of all schema migrations.
///
/// Intended for single-threaded use while a connection is being opened.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: users, teams and the membership association
        self.add_migration(1, "create_users_and_teams", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS users (
                    id INTEGER PRIMARY KEY,
                    full_name TEXT NOT NULL,
                    cpf TEXT NOT NULL UNIQUE,
                    email TEXT NOT NULL UNIQUE,
                    job_title TEXT,
                    login TEXT NOT NULL UNIQUE,
                    password TEXT NOT NULL,
                    profile TEXT NOT NULL CHECK (profile IN ('ADMINISTRADOR', 'GERENTE', 'COLABORADOR'))
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS teams (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    description TEXT
                )",
                [],
            )?;

            // One row per (team, user); removing either side removes the membership
            tx.execute(
                "CREATE TABLE IF NOT EXISTS team_members (
                    team_id INTEGER NOT NULL,
                    user_id INTEGER NOT NULL,
                    PRIMARY KEY (team_id, user_id),
                    FOREIGN KEY (team_id) REFERENCES teams(id) ON DELETE CASCADE,
                    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_team_members_user ON team_members(user_id)", [])?;
            Ok(())
        });

        // Version 2: projects and team allocation
        self.add_migration(2, "add_projects", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS projects (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    description TEXT,
                    start_date DATE NOT NULL,
                    planned_end_date DATE NOT NULL,
                    status TEXT NOT NULL CHECK (status IN ('PLANEJADO', 'EM_ANDAMENTO', 'CONCLUIDO', 'CANCELADO')),
                    manager_id INTEGER NOT NULL,
                    FOREIGN KEY (manager_id) REFERENCES users(id)
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS project_teams (
                    project_id INTEGER NOT NULL,
                    team_id INTEGER NOT NULL,
                    PRIMARY KEY (project_id, team_id),
                    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE,
                    FOREIGN KEY (team_id) REFERENCES teams(id) ON DELETE CASCADE
                )",
                [],
            )?;
            Ok(())
        });

        // Version 3: tasks
        self.add_migration(3, "add_tasks", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS tasks (
                    id INTEGER PRIMARY KEY,
                    title TEXT NOT NULL,
                    description TEXT,
                    project_id INTEGER NOT NULL,
                    responsible_id INTEGER NOT NULL,
                    status TEXT NOT NULL CHECK (status IN ('PENDENTE', 'EM_EXECUCAO', 'CONCLUIDA')),
                    planned_start_date DATE NOT NULL,
                    planned_end_date DATE NOT NULL,
                    actual_start_date DATE,
                    actual_end_date DATE,
                    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE,
                    FOREIGN KEY (responsible_id) REFERENCES users(id)
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_planned_end ON tasks(planned_end_date)", [])?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every migration newer than the stored version in one transaction.
    /// Returns how many were applied.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<usize> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!(Message::DatabaseUpToDate);
            return Ok(0);
        }

        let count = pending.len();
        msg_debug!(Message::MigrationsFound(count));

        let tx = conn.transaction()?;
        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            match (migration.up)(&tx) {
                Ok(()) => {
                    tx.execute(
                        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                        params![migration.version, migration.name],
                    )?;
                }
                Err(e) => {
                    msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                    return Err(e);
                }
            }
        }
        tx.commit()?;
        msg_debug!(Message::AllMigrationsCompleted);

        Ok(count)
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0))?;

        Ok(version.unwrap_or(0))
    }

    /// Registered migrations with no record in `migrations`, as `(version, name)`.
    pub fn pending_migrations(&self, conn: &Connection) -> Result<Vec<(u32, &'static str)>> {
        let applied: HashSet<u32> = self.get_migration_history(conn)?.into_iter().map(|(version, _, _)| version).collect();

        Ok(self
            .migrations
            .iter()
            .filter(|m| !applied.contains(&m.version))
            .map(|m| (m.version, m.name))
            .collect())
    }

    /// Applied migrations as `(version, name, applied_at)`, oldest first.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        conn.execute(MIGRATIONS_TABLE, [])?;
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;

        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(history)
    }
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    let manager = MigrationManager::new();
    manager.run_migrations(conn)?;
    Ok(())
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    let manager = MigrationManager::new();
    conn.execute(MIGRATIONS_TABLE, [])?;
    manager.get_current_version(conn)
}
