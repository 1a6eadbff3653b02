//! Database layer for the ccks application.
//!
//! SQLite persistence through `rusqlite`. Each DAO struct owns its own
//! connection, opened from the configured database with foreign keys enforced
//! and pending migrations applied.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ccks::db::{db::Db, teams::Teams};
//! use ccks::libs::team::Team;
//!
//! let mut teams = Teams::from_db(Db::open("ccks.db")?);
//! let team_id = teams.create_with_members(&Team::new("Platform", None), [1, 2, 3])?;
//! teams.reconcile_members(team_id, [2, 3, 4])?;
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Connection setup and the scoped transaction helper.
pub mod db;

/// Versioned schema migrations.
pub mod migrations;

/// Projects and their team allocations.
pub mod projects;

/// Task records and deadline queries.
pub mod tasks;

/// Teams and atomic replacement of their member sets.
pub mod teams;

/// User accounts and login.
pub mod users;
