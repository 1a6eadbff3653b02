#[cfg(test)]
mod tests {
    use ccks::libs::config::{Config, DatabaseConfig, DB_FILE_NAME};
    use ccks::libs::data_storage::DataStorage;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ConfigTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            ConfigTestContext { temp_dir }
        }
    }

    // Single test: it points HOME at a temp dir, which is process-wide.
    #[test_context(ConfigTestContext)]
    #[test]
    fn test_config_lifecycle(ctx: &mut ConfigTestContext) {
        // Nothing saved yet: defaults, database in the data directory
        let config = Config::read().unwrap();
        assert_eq!(config, Config::default());
        let default_path = config.database.resolve_path().unwrap();
        assert_eq!(default_path, DataStorage::new().base_path().join(DB_FILE_NAME));

        let db_path = ctx.temp_dir.path().join("shared").join("team.db");
        let mut config = Config::default();
        config.database = DatabaseConfig {
            path: Some(db_path.clone()),
            busy_timeout_ms: 1500,
        };
        config.security.password_cost = 10;
        config.save().unwrap();

        let loaded = Config::read().unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.database.resolve_path().unwrap(), db_path);
        assert!(ctx.temp_dir.path().join("shared").is_dir());

        Config::delete().unwrap();
        assert_eq!(Config::read().unwrap(), Config::default());
        Config::delete().unwrap();
    }
}
