use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

/// SQLite settings applied to every pooled connection. Request workers share
/// one database file, so writers wait out the lock instead of failing with
/// SQLITE_BUSY.
#[derive(Debug)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute("PRAGMA busy_timeout = 5000; PRAGMA journal_mode = WAL;")
            .map_err(r2d2::Error::QueryError)
    }
}

pub fn create_pool(database_url: &str) -> DbPool {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)
        .expect("Failed to create database pool");

    // Run pending migrations on startup
    let mut conn = pool
        .get()
        .expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");

    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_pool_runs_migrations() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("migrate.db");
        let pool = create_pool(db_path.to_str().unwrap());

        let mut conn = pool.get().unwrap();
        let users: i64 = crate::schema::users::table
            .count()
            .get_result(&mut conn)
            .unwrap();
        let recipes: i64 = crate::schema::recipes::table
            .count()
            .get_result(&mut conn)
            .unwrap();

        assert_eq!(users, 0);
        assert_eq!(recipes, 0);
    }
}
