use diesel::QueryableByName;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use rocket::fairing::AdHoc;
use rocket_sync_db_pools::{database, diesel};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[database("sqlite_db")]
pub struct DbConn(diesel::SqliteConnection);

#[derive(QueryableByName)]
struct LastInsertRowId {
    #[diesel(sql_type = BigInt)]
    last_insert_rowid: i64,
}

/// Id of the row most recently inserted on this connection.
pub(crate) fn last_insert_rowid(
    conn: &mut diesel::SqliteConnection,
) -> Result<i32, diesel::result::Error> {
    let row = diesel::sql_query("SELECT last_insert_rowid() as last_insert_rowid")
        .get_result::<LastInsertRowId>(conn)?;
    Ok(row.last_insert_rowid as i32)
}

/// `%term%` for a case-insensitive `LIKE`, with wildcards in the term escaped.
pub(crate) fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Enables foreign key support for SQLite connections.
///
/// # Panics
/// Panics if the PRAGMA command fails to execute
pub fn set_foreign_keys(conn: &mut diesel::SqliteConnection) {
    conn.batch_execute("PRAGMA foreign_keys = ON")
        .expect("Failed to enable foreign keys");
}

/// Creates a Rocket fairing that enables foreign key support on ignition.
pub fn set_foreign_keys_fairing() -> AdHoc {
    AdHoc::on_ignite("Set Foreign Keys", |rocket| async {
        let conn = DbConn::get_one(&rocket).await.expect("database connection for pragmas");
        conn.run(|c| {
            set_foreign_keys(c);
        })
        .await;
        rocket
    })
}

/// Runs all pending database migrations on the provided connection.
///
/// # Panics
/// Panics if any migration fails to run
pub fn run_pending_migrations(conn: &mut diesel::SqliteConnection) {
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run pending migrations");
}

/// Creates a Rocket fairing that runs database migrations on ignition.
pub fn run_migrations_fairing() -> AdHoc {
    AdHoc::on_ignite("Diesel Migrations", |rocket| async {
        let conn = DbConn::get_one(&rocket).await.expect("database connection for migration");
        conn.run(|c| {
            run_pending_migrations(c);
        })
        .await;
        info!("Database migrations are up to date");
        rocket
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("ali"), "%ali%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
    }
}
