use customer_crm::db::{DbPool, establish_connection_pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// File-backed SQLite database living for the duration of one test.
pub struct TestDb {
    name: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let _ = std::fs::remove_file(name);
        let pool = establish_connection_pool(name).expect("failed to build pool");
        {
            let mut conn = pool.get().expect("failed to get connection");
            conn.run_pending_migrations(MIGRATIONS)
                .expect("failed to run migrations");
        }
        Self {
            name: name.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.name);
        let _ = std::fs::remove_file(format!("{}-wal", self.name));
        let _ = std::fs::remove_file(format!("{}-shm", self.name));
    }
}
