//! Test database utilities using DatabaseManagerSqlx

use tempfile::TempDir;
use tick_stocks::database_sqlx::DatabaseManagerSqlx;

/// A database living in its own temporary directory, removed on drop
pub struct TestDatabase {
    pub manager: DatabaseManagerSqlx,
    pub path: String,
    _dir: TempDir,
}

/// Initialize a completely fresh test database (new file each time)
pub async fn init_fresh_test_database() -> TestDatabase {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("test.db").to_string_lossy().to_string();

    let manager = DatabaseManagerSqlx::new(&path)
        .await
        .expect("Failed to create test database");

    TestDatabase { manager, path, _dir: dir }
}
