//! Health check endpoint.

use rocket::{Route, serde::json::Json};
use serde::Serialize;
use ts_rs::TS;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Serialize, TS)]
#[ts(export)]
pub struct HealthStatus {
    status: &'static str,
    version: &'static str,
    built: &'static str,
    git_commit: Option<&'static str>,
}

/// Health Status endpoint.
///
/// - **URL:** `/api/1/status`
/// - **Method:** `GET`
///
/// # Response
///
/// **Success (HTTP 200 OK):**
/// ```json
/// {
///   "status": "running",
///   "version": "0.1.0",
///   "built": "Mon, 20 May 2024 09:12:31 +0000",
///   "git_commit": null
/// }
/// ```
#[rocket::get("/1/status")]
pub fn health_status() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "running",
        version: built_info::PKG_VERSION,
        built: built_info::BUILT_TIME_UTC,
        git_commit: built_info::GIT_COMMIT_HASH,
    })
}

pub fn routes() -> Vec<Route> {
    routes![health_status]
}
