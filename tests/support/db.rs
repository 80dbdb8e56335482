use std::sync::Arc;

use diesel::prelude::*;
use roasbot::adapter::outbound::sqlite::{create_pool, run_migrations, DbPool, SqliteStore};
use tempfile::TempDir;

/// Temporary SQLite database for integration tests.
pub struct TempDb {
    _dir: TempDir,
    path: String,
    pool: DbPool,
}

impl TempDb {
    pub fn create(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir
            .path()
            .join(format!("roasbot-{name}.db"))
            .to_string_lossy()
            .to_string();

        let pool = create_pool(&path).expect("create sqlite pool");
        run_migrations(&pool).expect("run migrations");

        // WAL mode improves concurrent writer behavior in tests.
        {
            let mut conn = pool.get().expect("get sqlite connection");
            diesel::sql_query("PRAGMA journal_mode=WAL")
                .execute(&mut conn)
                .expect("enable WAL mode");
        }

        Self {
            _dir: dir,
            path,
            pool,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn store(&self) -> Arc<SqliteStore> {
        Arc::new(SqliteStore::new(self.pool.clone()))
    }
}
