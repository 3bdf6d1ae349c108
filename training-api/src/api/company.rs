//! API endpoints for managing companies.
//!
//! Companies are plain named entities. Deleting one removes every employee
//! working for it along with their training assignments.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{not_found, require_name};
use crate::error::{ApiError, TrainingError};
use crate::logged_json::LoggedJson;
use crate::models::{Company, CompanyInput};
use crate::orm::DbConn;
use crate::orm::company::{
    delete_company, get_all_companies, get_company_by_id, insert_company, update_company,
};

/// Create Company endpoint.
///
/// - **URL:** `/api/1/Companies`
/// - **Method:** `POST`
///
/// # Request Format
///
/// ```json
/// { "name": "Delta Drilling" }
/// ```
///
/// # Response
///
/// **Success (HTTP 201 Created):** the stored company.
/// **Failure (HTTP 400 Bad Request):** blank name.
#[post("/1/Companies", data = "<new_company>")]
pub async fn create_company(
    db: DbConn,
    new_company: LoggedJson<CompanyInput>,
) -> Result<status::Created<Json<Company>>, ApiError> {
    let input = new_company.into_inner();
    let company = db
        .run(move |conn| {
            let name = require_name(&input.name, "Company")?;
            Ok::<_, TrainingError>(insert_company(conn, name)?)
        })
        .await?;
    Ok(status::Created::new(format!("/api/1/Companies/{}", company.id)).body(Json(company)))
}

/// List Companies endpoint, ordered by id.
#[get("/1/Companies")]
pub async fn list_companies(db: DbConn) -> Result<Json<Vec<Company>>, ApiError> {
    db.run(|conn| get_all_companies(conn).map(Json).map_err(TrainingError::from))
        .await
        .map_err(ApiError::from)
}

#[get("/1/Companies/<company_id>")]
pub async fn get_company(db: DbConn, company_id: i32) -> Result<Json<Company>, ApiError> {
    db.run(move |conn| {
        get_company_by_id(conn, company_id)?
            .map(Json)
            .ok_or_else(|| not_found("Company", company_id))
    })
    .await
    .map_err(ApiError::from)
}

/// Rename Company endpoint.
///
/// - **URL:** `/api/1/Companies/<company_id>`
/// - **Method:** `PUT`
/// - **Body:** `{ "name": "New Name" }`
#[put("/1/Companies/<company_id>", data = "<update>")]
pub async fn update_company_endpoint(
    db: DbConn,
    company_id: i32,
    update: LoggedJson<CompanyInput>,
) -> Result<Json<Company>, ApiError> {
    let input = update.into_inner();
    db.run(move |conn| {
        let name = require_name(&input.name, "Company")?;
        update_company(conn, company_id, name)?
            .map(Json)
            .ok_or_else(|| not_found("Company", company_id))
    })
    .await
    .map_err(ApiError::from)
}

/// Delete Company endpoint.
///
/// Returns `204 No Content` on success, `404` when the company is unknown.
#[delete("/1/Companies/<company_id>")]
pub async fn delete_company_endpoint(db: DbConn, company_id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_company(conn, company_id)? {
        true => {
            info!("Deleted company {}", company_id);
            Ok(Status::NoContent)
        }
        false => Err(not_found("Company", company_id)),
    })
    .await
    .map_err(ApiError::from)
}

pub fn routes() -> Vec<Route> {
    routes![
        create_company,
        list_companies,
        get_company,
        update_company_endpoint,
        delete_company_endpoint
    ]
}
