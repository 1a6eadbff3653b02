//! # ccks - project, task and team tracking
//!
//! A command-line utility for managing users, teams, projects and tasks stored
//! in a local SQLite database.
//!
//! ## Features
//!
//! - **Users**: Accounts with bcrypt-hashed passwords and access profiles
//! - **Teams**: Atomic replacement of a team's member set
//! - **Projects**: Status tracking and team allocation
//! - **Tasks**: Deadlines, status changes and overdue detection
//! - **Dashboard**: Task counts per project and status
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ccks::commands::Cli;
//!
//! fn main() -> anyhow::Result<()> {
//!     Cli::menu()
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
