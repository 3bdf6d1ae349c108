//! Assignment endpoints. Dates are `DD-MM-YYYY` on the way in and out.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::not_found;
use crate::error::{ApiError, TrainingError};
use crate::logged_json::LoggedJson;
use crate::models::{Assignment, AssignmentInput, AssignmentUpdate, VerificationInput};
use crate::orm::DbConn;
use crate::orm::assignment::{
    delete_assignment, get_all_assignments, get_assignment_by_id, insert_assignment,
    set_verification, update_assignment,
};
use crate::validity::today;

/// Create Assignment endpoint.
///
/// - **URL:** `/api/1/Assignments`
/// - **Method:** `POST`
///
/// # Request Format
///
/// ```json
/// { "employee_id": 4, "sub_training_id": 9, "start_date": "01-01-2024" }
/// ```
///
/// # Response
///
/// **Success (HTTP 201 Created):**
/// ```json
/// {
///   "id": 12,
///   "employee_id": 4,
///   "sub_training_id": 9,
///   "start_date": "01-01-2024",
///   "expiration_date": "01-07-2024",
///   "warning": false,
///   "verification_document": null,
///   "verification": "unreviewed"
/// }
/// ```
///
/// **Failure (HTTP 400 Bad Request):** missing or unknown `employee_id` /
/// `sub_training_id`, or a `start_date` not in `DD-MM-YYYY` form.
#[post("/1/Assignments", data = "<new_assignment>")]
pub async fn create_assignment(
    db: DbConn,
    new_assignment: LoggedJson<AssignmentInput>,
) -> Result<status::Created<Json<Assignment>>, ApiError> {
    let input = new_assignment.into_inner();
    let assignment = db.run(move |conn| insert_assignment(conn, input, today())).await?;
    Ok(status::Created::new(format!("/api/1/Assignments/{}", assignment.id)).body(Json(assignment)))
}

#[get("/1/Assignments")]
pub async fn list_assignments(db: DbConn) -> Result<Json<Vec<Assignment>>, ApiError> {
    db.run(|conn| get_all_assignments(conn).map(Json).map_err(TrainingError::from))
        .await
        .map_err(ApiError::from)
}

#[get("/1/Assignments/<assignment_id>")]
pub async fn get_assignment(db: DbConn, assignment_id: i32) -> Result<Json<Assignment>, ApiError> {
    db.run(move |conn| {
        get_assignment_by_id(conn, assignment_id)?
            .map(Json)
            .ok_or_else(|| not_found("Assignment", assignment_id))
    })
    .await
    .map_err(ApiError::from)
}

/// Update Assignment endpoint.
///
/// Body fields are optional: `sub_training_id` re-points the assignment,
/// `start_date` replaces the start date (`""` clears it). Expiration and
/// warning are re-derived either way.
#[put("/1/Assignments/<assignment_id>", data = "<update>")]
pub async fn update_assignment_endpoint(
    db: DbConn,
    assignment_id: i32,
    update: LoggedJson<AssignmentUpdate>,
) -> Result<Json<Assignment>, ApiError> {
    let update = update.into_inner();
    db.run(move |conn| update_assignment(conn, assignment_id, update, today()).map(Json))
        .await
        .map_err(ApiError::from)
}

#[delete("/1/Assignments/<assignment_id>")]
pub async fn delete_assignment_endpoint(
    db: DbConn,
    assignment_id: i32,
) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_assignment(conn, assignment_id)? {
        true => Ok(Status::NoContent),
        false => Err(not_found("Assignment", assignment_id)),
    })
    .await
    .map_err(ApiError::from)
}

/// Records a verification decision.
///
/// ```json
/// { "verification_document": "uploads/cert-12.pdf", "verification": "verified" }
/// ```
#[put("/1/Assignments/<assignment_id>/Verification", data = "<verification>")]
pub async fn verify_assignment(
    db: DbConn,
    assignment_id: i32,
    verification: LoggedJson<VerificationInput>,
) -> Result<Json<Assignment>, ApiError> {
    let input = verification.into_inner();
    db.run(move |conn| {
        set_verification(conn, assignment_id, input)?
            .map(Json)
            .ok_or_else(|| not_found("Assignment", assignment_id))
    })
    .await
    .map_err(ApiError::from)
}

pub fn routes() -> Vec<Route> {
    routes![
        create_assignment,
        list_assignments,
        get_assignment,
        update_assignment_endpoint,
        delete_assignment_endpoint,
        verify_assignment
    ]
}
