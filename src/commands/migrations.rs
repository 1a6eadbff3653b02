//! `ccks migrations`: inspect and apply the schema migrations.
//!
//! Opens the database without migrating it, so `status` reports what the
//! next regular command would apply.

use crate::{
    db::{
        db::Db,
        migrations::{get_db_version, MigrationManager},
    },
    libs::messages::Message,
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct MigrationsArgs {
    #[command(subcommand)]
    command: MigrationsCommand,
}

#[derive(Debug, Subcommand)]
enum MigrationsCommand {
    /// Show the schema version and the migrations not yet applied
    Status,
    /// Show applied migrations
    History,
    /// Apply pending migrations now
    Apply,
}

pub fn cmd(args: MigrationsArgs) -> Result<()> {
    let mut conn = Db::new_without_migrations()?;
    let manager = MigrationManager::new();

    match args.command {
        MigrationsCommand::Status => {
            msg_print!(Message::DatabaseVersion(get_db_version(&conn)?));

            let pending = manager.pending_migrations(&conn)?;
            if pending.is_empty() {
                msg_info!(Message::DatabaseUpToDate);
                return Ok(());
            }
            msg_print!(Message::PendingMigrationsHeader, true);
            for (version, name) in pending {
                msg_print!(Message::PendingMigration(version, name.to_string()));
            }
        }
        MigrationsCommand::History => {
            msg_print!(Message::MigrationHistory, true);
            for (version, name, applied_at) in manager.get_migration_history(&conn)? {
                msg_print!(Message::AppliedMigration(version, name, applied_at));
            }
        }
        MigrationsCommand::Apply => {
            let count = manager.run_migrations(&mut conn)?;
            if count == 0 {
                msg_info!(Message::DatabaseUpToDate);
            } else {
                msg_success!(Message::MigrationsApplied(count));
            }
        }
    }

    Ok(())
}
