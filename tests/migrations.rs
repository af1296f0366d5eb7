#[cfg(test)]
mod tests {
    use deckpulse::db::db::Db;
    use deckpulse::db::migrations::{get_db_version, needs_migration, MigrationManager};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct MigrationTestContext {
        _temp_dir: TempDir,
        path: PathBuf,
    }

    impl TestContext for MigrationTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let path = temp_dir.path().join("deck.db");
            MigrationTestContext { _temp_dir: temp_dir, path }
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_create_applies_all_migrations(ctx: &mut MigrationTestContext) {
        let db = Db::create(&ctx.path).unwrap();

        assert_eq!(get_db_version(&db.conn).unwrap(), 6);
        assert!(!needs_migration(&db.conn).unwrap());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_fresh_store_needs_migration(ctx: &mut MigrationTestContext) {
        let conn = Db::open_without_migrations(&ctx.path).unwrap();
        assert!(needs_migration(&conn).unwrap());
        assert_eq!(get_db_version(&conn).unwrap(), 0);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_history(ctx: &mut MigrationTestContext) {
        let mut conn = Db::open_without_migrations(&ctx.path).unwrap();
        let manager = MigrationManager::new();
        manager.run_migrations(&mut conn).unwrap();

        let history = manager.get_migration_history(&conn).unwrap();
        let versions: Vec<u32> = history.iter().map(|(v, _, _)| *v).collect();
        assert_eq!(versions, [1, 2, 3, 4, 5, 6]);
        assert_eq!(history[1].1, "create_projects");
        assert!(manager.is_migration_applied(&conn, 4).unwrap());
        assert!(!manager.is_migration_applied(&conn, 7).unwrap());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_idempotency(ctx: &mut MigrationTestContext) {
        let mut conn = Db::open_without_migrations(&ctx.path).unwrap();
        let manager = MigrationManager::new();

        manager.run_migrations(&mut conn).unwrap();
        manager.run_migrations(&mut conn).unwrap();

        assert_eq!(get_db_version(&conn).unwrap(), 6);
        assert_eq!(manager.get_migration_history(&conn).unwrap().len(), 6);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_deck_tables_exist(ctx: &mut MigrationTestContext) {
        let db = Db::create(&ctx.path).unwrap();

        for table in ["boards", "stacks", "cards", "projects", "labels", "assigned_labels", "assigned_users", "notifications"] {
            let count: i64 = db
                .conn
                .query_row("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1", [table], |row| row.get(0))
                .unwrap();
            assert_eq!(count, 1, "missing table {}", table);
        }
    }

    #[cfg(debug_assertions)]
    #[test_context(MigrationTestContext)]
    #[test]
    fn test_rollback_forgets_newer_versions(ctx: &mut MigrationTestContext) {
        let mut conn = Db::open_without_migrations(&ctx.path).unwrap();
        let manager = MigrationManager::new();
        manager.run_migrations(&mut conn).unwrap();

        manager.rollback_to(&mut conn, 3).unwrap();
        assert_eq!(get_db_version(&conn).unwrap(), 3);
        assert!(needs_migration(&conn).unwrap());

        manager.run_migrations(&mut conn).unwrap();
        assert_eq!(get_db_version(&conn).unwrap(), 6);
    }
}
