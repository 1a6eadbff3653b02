#[cfg(test)]
mod tests {
    use ccks::db::db::Db;
    use ccks::db::teams::Teams;
    use ccks::db::users::Users;
    use ccks::libs::config::DatabaseConfig;
    use ccks::libs::error::StoreError;
    use ccks::libs::team::Team;
    use ccks::libs::user::{User, UserProfile};
    use rusqlite::{params, Connection};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct TeamTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestContext for TeamTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("teams.db");

            let mut users = Users::from_db(Db::open(&db_path).unwrap()).with_hash_cost(4);
            for n in 1..=5 {
                let user = User::new(
                    &format!("Member {}", n),
                    &format!("000.000.000-0{}", n),
                    &format!("member{}@example.com", n),
                    &format!("member{}", n),
                    UserProfile::Collaborator,
                );
                let id = users.create(&user, "secret").unwrap();
                assert_eq!(id, n);
            }

            TeamTestContext {
                _temp_dir: temp_dir,
                db_path,
            }
        }
    }

    impl TeamTestContext {
        fn teams(&self) -> Teams {
            Teams::from_db(Db::open(&self.db_path).unwrap())
        }

        fn raw(&self) -> Connection {
            Db::open(&self.db_path).unwrap().conn
        }

        /// Makes every insert of `user_id` into a team fail.
        fn reject_member(&self, user_id: i32) {
            self.raw()
                .execute_batch(&format!(
                    "CREATE TRIGGER reject_member_{id} BEFORE INSERT ON team_members
                     WHEN NEW.user_id = {id}
                     BEGIN SELECT RAISE(ABORT, 'member rejected'); END;",
                    id = user_id
                ))
                .unwrap();
        }

        fn stored_members(&self, team_id: i32) -> Vec<i32> {
            let conn = self.raw();
            let mut stmt = conn
                .prepare("SELECT user_id FROM team_members WHERE team_id = ?1 ORDER BY user_id")
                .unwrap();
            stmt.query_map(params![team_id], |row| row.get(0))
                .unwrap()
                .collect::<rusqlite::Result<Vec<i32>>>()
                .unwrap()
        }
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_reconcile_stores_exact_target(ctx: &mut TeamTestContext) {
        let mut teams = ctx.teams();
        let team_id = teams.create(&Team::new("Platform", None)).unwrap();

        let cases: Vec<(Vec<i32>, Vec<i32>)> = vec![
            (vec![3, 1, 2], vec![1, 2, 3]),
            (vec![5, 5, 4, 5], vec![4, 5]),
            (vec![], vec![]),
            (vec![2, 4, 1, 5, 3], vec![1, 2, 3, 4, 5]),
            (vec![2], vec![2]),
        ];

        for (target, expected) in cases {
            let stored = teams.reconcile_members(team_id, target).unwrap();
            assert_eq!(stored, expected.len());
            assert_eq!(teams.member_ids(team_id).unwrap(), expected);
        }
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_reconcile_is_idempotent(ctx: &mut TeamTestContext) {
        let mut teams = ctx.teams();
        let team_id = teams.create(&Team::new("Platform", None)).unwrap();

        teams.reconcile_members(team_id, [1, 3, 5]).unwrap();
        teams.reconcile_members(team_id, [5, 3, 1]).unwrap();

        assert_eq!(teams.member_ids(team_id).unwrap(), vec![1, 3, 5]);
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_replaces_members_scenario(ctx: &mut TeamTestContext) {
        let mut teams = ctx.teams();
        let team_id = teams.create_with_members(&Team::new("Platform", None), [1, 2, 3]).unwrap();
        assert_eq!(ctx.stored_members(team_id), vec![1, 2, 3]);

        teams.reconcile_members(team_id, [2, 3, 4]).unwrap();

        assert_eq!(ctx.stored_members(team_id), vec![2, 3, 4]);
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_failure_on_last_insert_rolls_back(ctx: &mut TeamTestContext) {
        ctx.reject_member(5);
        let mut teams = ctx.teams();
        let team_id = teams.create_with_members(&Team::new("Platform", None), [1, 2]).unwrap();

        // Inserts run in ascending id order, so 3 and 4 are written before 5 fails
        let err = teams.reconcile_members(team_id, [3, 4, 5]).unwrap_err();

        assert!(err.is_constraint());
        assert!(!err.is_retryable());
        assert_eq!(ctx.stored_members(team_id), vec![1, 2]);
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_failure_on_delete_rolls_back(ctx: &mut TeamTestContext) {
        let mut teams = ctx.teams();
        let team_id = teams.create_with_members(&Team::new("Platform", None), [1, 2]).unwrap();
        ctx.raw()
            .execute_batch(
                "CREATE TRIGGER reject_clear BEFORE DELETE ON team_members
                 BEGIN SELECT RAISE(ABORT, 'clear rejected'); END;",
            )
            .unwrap();

        let err = teams.reconcile_members(team_id, [3]).unwrap_err();

        assert!(matches!(err, StoreError::Constraint(_)));
        assert_eq!(ctx.stored_members(team_id), vec![1, 2]);
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_failure_on_first_insert_rolls_back(ctx: &mut TeamTestContext) {
        ctx.reject_member(3);
        let mut teams = ctx.teams();
        let team_id = teams.create_with_members(&Team::new("Platform", None), [1, 2]).unwrap();

        let err = teams.reconcile_members(team_id, [3, 4]).unwrap_err();

        assert!(matches!(err, StoreError::Constraint(_)));
        assert_eq!(ctx.stored_members(team_id), vec![1, 2]);
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_unknown_member_is_constraint_violation(ctx: &mut TeamTestContext) {
        let mut teams = ctx.teams();
        let team_id = teams.create_with_members(&Team::new("Platform", None), [1]).unwrap();

        let err = teams.reconcile_members(team_id, [2, 999]).unwrap_err();

        assert!(err.is_constraint());
        assert_eq!(teams.member_ids(team_id).unwrap(), vec![1]);
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_empty_target_clears_only_that_team(ctx: &mut TeamTestContext) {
        let mut teams = ctx.teams();
        let backend = teams.create_with_members(&Team::new("Backend", None), [1, 2, 3]).unwrap();
        let frontend = teams.create_with_members(&Team::new("Frontend", None), [3, 4]).unwrap();

        let stored = teams.reconcile_members(backend, Vec::new()).unwrap();

        assert_eq!(stored, 0);
        assert!(ctx.stored_members(backend).is_empty());
        assert_eq!(ctx.stored_members(frontend), vec![3, 4]);
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_reconcile_leaves_other_teams_alone(ctx: &mut TeamTestContext) {
        let mut teams = ctx.teams();
        let backend = teams.create_with_members(&Team::new("Backend", None), [1, 2]).unwrap();
        let frontend = teams.create_with_members(&Team::new("Frontend", None), [2, 3]).unwrap();
        let qa = teams.create_with_members(&Team::new("QA", None), [4]).unwrap();

        teams.reconcile_members(backend, [3, 4, 5]).unwrap();

        assert_eq!(ctx.stored_members(backend), vec![3, 4, 5]);
        assert_eq!(ctx.stored_members(frontend), vec![2, 3]);
        assert_eq!(ctx.stored_members(qa), vec![4]);
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_create_with_members_is_atomic(ctx: &mut TeamTestContext) {
        ctx.reject_member(3);
        let mut teams = ctx.teams();

        let err = teams
            .create_with_members(&Team::new("Platform", Some("core services")), [1, 2, 3])
            .unwrap_err();

        assert!(err.is_constraint());
        assert!(teams.list().unwrap().is_empty());
        let rows: i32 = ctx
            .raw()
            .query_row("SELECT COUNT(*) FROM team_members", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_create_with_members(ctx: &mut TeamTestContext) {
        let mut teams = ctx.teams();

        let team_id = teams
            .create_with_members(&Team::new("Platform", Some("core services")), [4, 2, 2])
            .unwrap();

        assert!(team_id > 0);
        let team = teams.get_by_id(team_id).unwrap().unwrap();
        assert_eq!(team.name, "Platform");
        assert_eq!(team.description.as_deref(), Some("core services"));
        assert_eq!(teams.member_ids(team_id).unwrap(), vec![2, 4]);

        let names: Vec<String> = teams.members(team_id).unwrap().into_iter().map(|u| u.full_name).collect();
        assert_eq!(names, vec!["Member 2", "Member 4"]);
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_update_with_members(ctx: &mut TeamTestContext) {
        let mut teams = ctx.teams();
        let team_id = teams.create_with_members(&Team::new("Platform", None), [1, 2]).unwrap();

        let mut team = teams.get_by_id(team_id).unwrap().unwrap();
        team.name = "Infrastructure".to_string();
        teams.update_with_members(&team, [2, 5]).unwrap();

        assert_eq!(teams.get_by_id(team_id).unwrap().unwrap().name, "Infrastructure");
        assert_eq!(teams.member_ids(team_id).unwrap(), vec![2, 5]);
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_failed_update_keeps_name_and_members(ctx: &mut TeamTestContext) {
        ctx.reject_member(4);
        let mut teams = ctx.teams();
        let team_id = teams.create_with_members(&Team::new("Platform", None), [1, 2]).unwrap();

        let mut team = teams.get_by_id(team_id).unwrap().unwrap();
        team.name = "Infrastructure".to_string();
        assert!(teams.update_with_members(&team, [3, 4]).is_err());

        assert_eq!(teams.get_by_id(team_id).unwrap().unwrap().name, "Platform");
        assert_eq!(teams.member_ids(team_id).unwrap(), vec![1, 2]);
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_plain_update_keeps_members(ctx: &mut TeamTestContext) {
        let mut teams = ctx.teams();
        let team_id = teams.create_with_members(&Team::new("Platform", None), [1, 3]).unwrap();

        let mut team = teams.get_by_id(team_id).unwrap().unwrap();
        team.description = Some("renamed".to_string());
        teams.update(&team).unwrap();

        assert_eq!(teams.get_by_id(team_id).unwrap().unwrap().description.as_deref(), Some("renamed"));
        assert_eq!(teams.member_ids(team_id).unwrap(), vec![1, 3]);
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_update_of_missing_team(ctx: &mut TeamTestContext) {
        let mut teams = ctx.teams();
        let mut team = Team::new("Ghost", None);

        assert!(matches!(teams.update_with_members(&team, [1]), Err(StoreError::InvalidTeam(0))));

        team.id = Some(42);
        let err = teams.update_with_members(&team, [1]).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "team", id: 42 }));
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_invalid_team_id_is_rejected(ctx: &mut TeamTestContext) {
        let mut teams = ctx.teams();

        assert!(matches!(teams.reconcile_members(0, [1]), Err(StoreError::InvalidTeam(0))));
        assert!(matches!(teams.reconcile_members(-5, Vec::new()), Err(StoreError::InvalidTeam(-5))));
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_missing_team(ctx: &mut TeamTestContext) {
        let mut teams = ctx.teams();

        // Nothing to delete and nothing to insert
        assert_eq!(teams.reconcile_members(77, Vec::new()).unwrap(), 0);

        let err = teams.reconcile_members(77, [1, 2]).unwrap_err();
        assert!(err.is_constraint());
        assert!(ctx.stored_members(77).is_empty());
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_busy_database_is_retryable(ctx: &mut TeamTestContext) {
        let config = DatabaseConfig {
            path: Some(ctx.db_path.clone()),
            busy_timeout_ms: 0,
        };
        let mut teams = Teams::from_db(Db::connect(&config).unwrap());
        let team_id = teams.create_with_members(&Team::new("Platform", None), [1, 2]).unwrap();

        let blocker = ctx.raw();
        blocker.execute_batch("BEGIN IMMEDIATE").unwrap();

        let err = teams.reconcile_members(team_id, [3]).unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(err, StoreError::Transient(_)));

        blocker.execute_batch("ROLLBACK").unwrap();
        assert_eq!(teams.member_ids(team_id).unwrap(), vec![1, 2]);

        // The caller may simply try again
        teams.reconcile_members(team_id, [3]).unwrap();
        assert_eq!(teams.member_ids(team_id).unwrap(), vec![3]);
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_last_commit_wins(ctx: &mut TeamTestContext) {
        let mut first = ctx.teams();
        let mut second = ctx.teams();
        let team_id = first.create(&Team::new("Platform", None)).unwrap();

        first.reconcile_members(team_id, [1, 2]).unwrap();
        second.reconcile_members(team_id, [4, 5]).unwrap();

        assert_eq!(ctx.stored_members(team_id), vec![4, 5]);
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_concurrent_reconciles_last_commit_wins(ctx: &mut TeamTestContext) {
        let team_id = ctx.teams().create(&Team::new("Platform", None)).unwrap();
        let config = DatabaseConfig {
            path: Some(ctx.db_path.clone()),
            busy_timeout_ms: 30_000,
        };

        let connections: Vec<Teams> = (0..6).map(|_| Teams::from_db(Db::connect(&config).unwrap())).collect();
        let workers: Vec<_> = connections
            .into_iter()
            .map(|mut teams| {
                std::thread::spawn(move || {
                    for i in 0..20 {
                        let target = if i % 2 == 0 { [1, 2, 3] } else { [4, 5, 6] };
                        teams.reconcile_members(team_id, target).unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let stored = ctx.stored_members(team_id);
        assert!(stored == vec![1, 2, 3] || stored == vec![4, 5, 6], "mixed member set {:?}", stored);
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_connection_usable_after_rollback(ctx: &mut TeamTestContext) {
        ctx.reject_member(2);
        let mut teams = ctx.teams();
        let team_id = teams.create(&Team::new("Platform", None)).unwrap();

        assert!(teams.reconcile_members(team_id, [1, 2]).is_err());

        // Back in autocommit mode: a plain write is visible to other connections
        teams.reconcile_members(team_id, [1, 3]).unwrap();
        assert_eq!(ctx.stored_members(team_id), vec![1, 3]);
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_staged_selection(ctx: &mut TeamTestContext) {
        let mut teams = ctx.teams();
        let team_id = teams.create_with_members(&Team::new("Platform", None), [1, 2, 3]).unwrap();

        let mut staged = teams.selection(team_id).unwrap();
        assert!(staged.remove(1));
        assert!(staged.add(5));
        assert!(!staged.add(2));

        // Staging alone does not touch the database
        assert_eq!(ctx.stored_members(team_id), vec![1, 2, 3]);

        teams.reconcile_members(team_id, staged.ids()).unwrap();
        assert_eq!(ctx.stored_members(team_id), vec![2, 3, 5]);
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_team_id_beyond_i32_is_rejected(ctx: &mut TeamTestContext) {
        ctx.raw()
            .execute("INSERT INTO teams (id, name) VALUES (2147483648, 'Huge')", [])
            .unwrap();
        let mut teams = ctx.teams();

        let err = teams.create_with_members(&Team::new("Platform", None), [1]).unwrap_err();

        assert!(matches!(err, StoreError::IdOutOfRange(2_147_483_649)));
        let count: i64 = ctx.raw().query_row("SELECT COUNT(*) FROM teams", [], |row| row.get(0)).unwrap();
        assert_eq!(count, 1);
        let memberships: i64 = ctx
            .raw()
            .query_row("SELECT COUNT(*) FROM team_members", [], |row| row.get(0))
            .unwrap();
        assert_eq!(memberships, 0);
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_delete_team_cascades(ctx: &mut TeamTestContext) {
        let mut teams = ctx.teams();
        let team_id = teams.create_with_members(&Team::new("Platform", None), [1, 2]).unwrap();

        teams.delete(team_id).unwrap();

        assert!(teams.get_by_id(team_id).unwrap().is_none());
        assert!(ctx.stored_members(team_id).is_empty());
        assert!(matches!(teams.delete(team_id), Err(StoreError::NotFound { .. })));

        let users: i32 = ctx.raw().query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0)).unwrap();
        assert_eq!(users, 5);
    }

    #[test_context(TeamTestContext)]
    #[test]
    fn test_delete_user_removes_memberships(ctx: &mut TeamTestContext) {
        let mut teams = ctx.teams();
        let team_id = teams.create_with_members(&Team::new("Platform", None), [1, 2]).unwrap();

        Users::from_db(Db::open(&ctx.db_path).unwrap()).delete(2).unwrap();

        assert_eq!(teams.member_ids(team_id).unwrap(), vec![1]);
    }
}
