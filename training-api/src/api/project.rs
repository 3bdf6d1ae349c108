//! API endpoints for managing projects.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{not_found, require_name};
use crate::error::{ApiError, TrainingError};
use crate::logged_json::LoggedJson;
use crate::models::{Project, ProjectInput};
use crate::orm::DbConn;
use crate::orm::project::{
    delete_project, get_all_projects, get_project_by_id, insert_project, update_project,
};

#[post("/1/Projects", data = "<new_project>")]
pub async fn create_project(
    db: DbConn,
    new_project: LoggedJson<ProjectInput>,
) -> Result<status::Created<Json<Project>>, ApiError> {
    let input = new_project.into_inner();
    let project = db
        .run(move |conn| {
            let name = require_name(&input.name, "Project")?;
            Ok::<_, TrainingError>(insert_project(conn, name)?)
        })
        .await?;
    Ok(status::Created::new(format!("/api/1/Projects/{}", project.id)).body(Json(project)))
}

#[get("/1/Projects")]
pub async fn list_projects(db: DbConn) -> Result<Json<Vec<Project>>, ApiError> {
    db.run(|conn| get_all_projects(conn).map(Json).map_err(TrainingError::from))
        .await
        .map_err(ApiError::from)
}

#[get("/1/Projects/<project_id>")]
pub async fn get_project(db: DbConn, project_id: i32) -> Result<Json<Project>, ApiError> {
    db.run(move |conn| {
        get_project_by_id(conn, project_id)?
            .map(Json)
            .ok_or_else(|| not_found("Project", project_id))
    })
    .await
    .map_err(ApiError::from)
}

#[put("/1/Projects/<project_id>", data = "<update>")]
pub async fn update_project_endpoint(
    db: DbConn,
    project_id: i32,
    update: LoggedJson<ProjectInput>,
) -> Result<Json<Project>, ApiError> {
    let input = update.into_inner();
    db.run(move |conn| {
        let name = require_name(&input.name, "Project")?;
        update_project(conn, project_id, name)?
            .map(Json)
            .ok_or_else(|| not_found("Project", project_id))
    })
    .await
    .map_err(ApiError::from)
}

/// Deletes the project, its employees and their assignments.
#[delete("/1/Projects/<project_id>")]
pub async fn delete_project_endpoint(db: DbConn, project_id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_project(conn, project_id)? {
        true => {
            info!("Deleted project {}", project_id);
            Ok(Status::NoContent)
        }
        false => Err(not_found("Project", project_id)),
    })
    .await
    .map_err(ApiError::from)
}

pub fn routes() -> Vec<Route> {
    routes![
        create_project,
        list_projects,
        get_project,
        update_project_endpoint,
        delete_project_endpoint
    ]
}
