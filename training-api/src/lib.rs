#[macro_use]
extern crate rocket;

use rocket::figment::value::Map;
use rocket::figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use rocket::request::Request;
use rocket::serde::json::{Json, Value, json};
use rocket::{Build, Rocket};

pub mod admission;
pub mod api;
pub mod date_format;
pub mod error;
pub mod events;
pub mod logged_json;
pub mod models;
pub mod orm;
pub use orm::DbConn;
pub mod report;
pub mod schema;
pub mod validity;

#[cfg(test)]
pub mod generate_types;

#[catch(400)]
fn bad_request(req: &Request) -> Json<Value> {
    Json(json!({
        "error": "Bad Request",
        "path": req.uri().path().to_string(),
        "status": 400
    }))
}

#[catch(404)]
fn not_found(req: &Request) -> Json<Value> {
    Json(json!({
        "error": "Not Found",
        "path": req.uri().path().to_string(),
        "status": 404
    }))
}

#[catch(422)]
fn unprocessable_entity(req: &Request) -> Json<Value> {
    Json(json!({
        "error": "Unprocessable Entity",
        "path": req.uri().path().to_string(),
        "status": 422
    }))
}

#[catch(500)]
fn internal_server_error(req: &Request) -> Json<Value> {
    Json(json!({
        "error": "Internal Server Error",
        "path": req.uri().path().to_string(),
        "status": 500
    }))
}

#[catch(default)]
fn default_catcher(status: rocket::http::Status, req: &Request) -> Json<Value> {
    Json(json!({
        "error": status.reason().unwrap_or("Unknown Error"),
        "path": req.uri().path().to_string(),
        "status": status.code
    }))
}

/// Mounts the API under `/api` and registers the JSON catchers.
pub fn mount_api_routes(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket.mount("/api", api::routes()).register(
        "/",
        catchers![
            bad_request,
            not_found,
            unprocessable_entity,
            internal_server_error,
            default_catcher
        ],
    )
}

fn log_rocket_info(rocket: &Rocket<Build>) {
    let figment = rocket.figment();

    if let Ok(address) = figment.extract_inner::<String>("address") {
        info!("Rocket is running at: {}", address);
    }

    if let Ok(port) = figment.extract_inner::<u16>("port") {
        info!("Rocket is listening on port: {}", port);
    }

    match figment.extract_inner::<Map<String, Value>>("databases.sqlite_db") {
        Ok(db_config) => {
            if let Some(Value::String(url)) = db_config.get("url") {
                info!("Database URL: {}", url);
            } else {
                warn!("Database URL not found in configuration");
            }
        }
        Err(e) => {
            warn!("Failed to extract database configuration: {}", e);
        }
    }
}

/// Builds the production server. Tests use `orm::testing::test_rocket`,
/// which points at an in-memory database instead.
///
/// # Panics
/// Panics if `DATABASE_URL` is not set in the environment or in `.env`.
pub fn rocket() -> Rocket<Build> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let figment = Figment::from(rocket::Config::default())
        .merge(Toml::file("Rocket.toml").nested())
        .merge(Env::prefixed("ROCKET_").global())
        .merge(("databases.sqlite_db.url", database_url));

    let rocket = rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(orm::set_foreign_keys_fairing())
        .attach(orm::run_migrations_fairing());

    log_rocket_info(&rocket);

    mount_api_routes(rocket)
}
