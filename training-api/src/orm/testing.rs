use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;
use rocket::figment::{
    util::map,
    value::{Map, Value},
};
use rocket::{Build, Rocket, fairing::AdHoc};
use rocket_sync_db_pools::diesel;

use super::db::{DbConn, run_pending_migrations, set_foreign_keys};
use crate::models::{EmployeeCategory, EmployeeInput};
use crate::orm::company::insert_company;
use crate::orm::project::insert_project;

/// Configures SQLite with performance-optimized settings for testing.
///
/// Sets the following PRAGMAs:
/// - `synchronous = OFF`: Disables synchronous writes for faster performance
/// - `journal_mode = OFF`: Disables rollback journal
///
/// These settings make SQLite faster but less durable - only use for testing.
///
/// # Panics
/// Panics if the PRAGMA commands fail to execute
fn set_sqlite_test_pragmas(conn: &mut diesel::SqliteConnection) {
    conn.batch_execute(
        r#"
        PRAGMA synchronous = OFF;
        PRAGMA journal_mode = OFF;
        "#,
    )
    .expect("Failed to set SQLite PRAGMAs");
}

fn set_sqlite_test_pragmas_fairing() -> AdHoc {
    AdHoc::on_ignite("Set SQLite Test Pragmas", |rocket| async {
        let conn = DbConn::get_one(&rocket)
            .await
            .expect("database connection for test pragmas");
        conn.run(|c| {
            set_sqlite_test_pragmas(c);
        })
        .await;
        rocket
    })
}

/// Creates and configures a Rocket instance for testing with an in-memory SQLite database.
///
/// The returned Rocket instance will have:
/// - A unique shared-cache in-memory SQLite database
/// - Database connection pool attached
/// - Foreign keys enabled
/// - Testing pragmas set
/// - All migrations run
/// - API routes and catchers mounted
pub fn test_rocket() -> Rocket<Build> {
    use uuid::Uuid;

    // Every test gets its own database so tests can run in parallel
    let unique_db_name = format!("file:test_db_{}?mode=memory&cache=shared", Uuid::new_v4());

    let db_config: Map<_, Value> = map! {
        "url" => unique_db_name.into(),
        "pool_size" => 5.into(),
        "timeout" => 5.into(),
    };

    let figment = rocket::Config::figment().merge(("databases", map!["sqlite_db" => db_config]));

    let rocket = rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(super::db::set_foreign_keys_fairing())
        .attach(set_sqlite_test_pragmas_fairing())
        .attach(super::db::run_migrations_fairing());

    crate::mount_api_routes(rocket)
}

/// Creates a synchronous in-memory SQLite database connection for unit tests.
///
/// Runs all embedded migrations and enables foreign keys. Each call returns
/// a new, independent database.
pub fn setup_test_db() -> SqliteConnection {
    use diesel::Connection;

    let mut conn = SqliteConnection::establish(":memory:")
        .expect("Failed to create in-memory SQLite database");
    set_foreign_keys(&mut conn);
    run_pending_migrations(&mut conn);
    conn
}

/// Creates a fresh company and project and returns a registration for
/// "Ahmed Saleh" (Rig) working for them.
pub fn sample_employee_input(
    conn: &mut SqliteConnection,
    mobile_number: &str,
    gate_pass_no: &str,
) -> EmployeeInput {
    let company = insert_company(conn, format!("Company {}", gate_pass_no))
        .expect("Failed to insert sample company");
    let project = insert_project(conn, format!("Project {}", gate_pass_no))
        .expect("Failed to insert sample project");

    EmployeeInput {
        fullname: "Ahmed Saleh".to_string(),
        mobile_number: mobile_number.to_string(),
        designation: "Roustabout".to_string(),
        gate_pass_no: gate_pass_no.to_string(),
        category: EmployeeCategory::Rig,
        company_id: company.id,
        project_id: project.id,
        profile_photo: None,
    }
}
