#[cfg(test)]
mod tests {
    use ccks::db::db::Db;
    use ccks::db::migrations::{get_db_version, MigrationManager};
    use rusqlite::Connection;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct MigrationTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestContext for MigrationTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("migrations.db");
            MigrationTestContext {
                _temp_dir: temp_dir,
                db_path,
            }
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migrations_run_automatically(ctx: &mut MigrationTestContext) {
        let db = Db::open(&ctx.db_path).unwrap();

        let manager = MigrationManager::new();
        let version = get_db_version(&db.conn).unwrap();
        assert_eq!(version, 3);
        assert!(manager.pending_migrations(&db.conn).unwrap().is_empty());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_fresh_database_needs_migration(ctx: &mut MigrationTestContext) {
        let conn = Connection::open(&ctx.db_path).unwrap();

        assert_eq!(get_db_version(&conn).unwrap(), 0);
        assert_eq!(MigrationManager::new().pending_migrations(&conn).unwrap().len(), 3);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_history(ctx: &mut MigrationTestContext) {
        let mut conn = Connection::open(&ctx.db_path).unwrap();
        let manager = MigrationManager::new();

        manager.run_migrations(&mut conn).unwrap();

        let history = manager.get_migration_history(&conn).unwrap();
        let versions: Vec<u32> = history.iter().map(|(version, _, _)| *version).collect();
        assert_eq!(versions, vec![1, 2, 3]);
        assert_eq!(history[0].1, "create_users_and_teams");
        assert!(manager.pending_migrations(&conn).unwrap().is_empty());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_pending_migrations_by_version_and_name(ctx: &mut MigrationTestContext) {
        let mut conn = Connection::open(&ctx.db_path).unwrap();
        let manager = MigrationManager::new();

        assert_eq!(
            manager.pending_migrations(&conn).unwrap(),
            vec![(1, "create_users_and_teams"), (2, "add_projects"), (3, "add_tasks")]
        );

        assert_eq!(manager.run_migrations(&mut conn).unwrap(), 3);
        assert_eq!(manager.run_migrations(&mut conn).unwrap(), 0);
        assert!(manager.pending_migrations(&conn).unwrap().is_empty());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_pending_after_partial_history(ctx: &mut MigrationTestContext) {
        let db = Db::open(&ctx.db_path).unwrap();
        db.conn.execute("DELETE FROM migrations WHERE version = 3", []).unwrap();

        let pending = MigrationManager::new().pending_migrations(&db.conn).unwrap();
        assert_eq!(pending, vec![(3, "add_tasks")]);
        assert_eq!(get_db_version(&db.conn).unwrap(), 2);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_malformed_migrations_table_is_an_error(ctx: &mut MigrationTestContext) {
        {
            let mut conn = Connection::open(&ctx.db_path).unwrap();
            conn.execute_batch("CREATE TABLE migrations (id INTEGER PRIMARY KEY)").unwrap();

            assert!(get_db_version(&conn).is_err());
            assert!(MigrationManager::new().run_migrations(&mut conn).is_err());
        }

        assert!(Db::open(&ctx.db_path).is_err());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_reopening_is_a_no_op(ctx: &mut MigrationTestContext) {
        drop(Db::open(&ctx.db_path).unwrap());
        let db = Db::open(&ctx.db_path).unwrap();

        let history = MigrationManager::new().get_migration_history(&db.conn).unwrap();
        assert_eq!(history.len(), 3);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_membership_schema(ctx: &mut MigrationTestContext) {
        let db = Db::open(&ctx.db_path).unwrap();

        let foreign_keys: i32 = db.conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0)).unwrap();
        assert_eq!(foreign_keys, 1);

        let mut stmt = db
            .conn
            .prepare("SELECT \"table\", on_delete FROM pragma_foreign_key_list('team_members') ORDER BY \"table\"")
            .unwrap();
        let keys: Vec<(String, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        assert_eq!(
            keys,
            vec![
                ("teams".to_string(), "CASCADE".to_string()),
                ("users".to_string(), "CASCADE".to_string())
            ]
        );
    }
}
