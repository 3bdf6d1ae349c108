//! Per-employee training progress and completion reports.
//!
//! Completion is binary per assignment: 100 while the training is valid,
//! 0 once it has expired. Averages are rounded to two decimals.

use diesel::SqliteConnection;
use rocket::Route;
use rocket::serde::json::Json;

use crate::api::not_found;
use crate::error::{ApiError, TrainingError};
use crate::models::MainTraining;
use crate::orm::DbConn;
use crate::orm::assignment::load_records;
use crate::orm::employee::get_employee_by_id;
use crate::orm::training::get_main_training_by_id;
use crate::report::{
    AssignmentRecord, EmployeeCompletion, MainTrainingCompletion, TrainingProgress,
    employee_completion, main_training_completion, progress_rows,
};
use crate::validity::today;

fn employee_records(
    conn: &mut SqliteConnection,
    employee_id: i32,
) -> Result<Vec<AssignmentRecord>, TrainingError> {
    if get_employee_by_id(conn, employee_id)?.is_none() {
        return Err(not_found("Employee", employee_id));
    }
    Ok(load_records(conn, Some(employee_id), None)?)
}

fn category_records(
    conn: &mut SqliteConnection,
    employee_id: i32,
    main_training_id: i32,
) -> Result<(MainTraining, Vec<AssignmentRecord>), TrainingError> {
    if get_employee_by_id(conn, employee_id)?.is_none() {
        return Err(not_found("Employee", employee_id));
    }
    let main = get_main_training_by_id(conn, main_training_id)?
        .ok_or_else(|| not_found("Main training", main_training_id))?;
    let records = load_records(conn, Some(employee_id), Some(main_training_id))?;
    Ok((main, records))
}

/// All of an employee's assignments with their current completion.
#[get("/1/Employees/<employee_id>/Trainings")]
pub async fn employee_trainings(
    db: DbConn,
    employee_id: i32,
) -> Result<Json<Vec<TrainingProgress>>, ApiError> {
    db.run(move |conn| {
        let records = employee_records(conn, employee_id)?;
        progress_rows(&records, today()).map(Json)
    })
    .await
    .map_err(ApiError::from)
}

/// Employee Completion endpoint.
///
/// - **URL:** `/api/1/Employees/<employee_id>/Completion`
/// - **Method:** `GET`
///
/// **Success (HTTP 200 OK):**
/// ```json
/// { "employee_id": 4, "average_completion_percentage": 66.67 }
/// ```
///
/// **Failure (HTTP 404 Not Found):** unknown employee, or an employee with
/// no assignments (`"No sub-trainings found for this employee"`).
#[get("/1/Employees/<employee_id>/Completion")]
pub async fn employee_completion_endpoint(
    db: DbConn,
    employee_id: i32,
) -> Result<Json<EmployeeCompletion>, ApiError> {
    db.run(move |conn| {
        let records = employee_records(conn, employee_id)?;
        employee_completion(employee_id, &records, today()).map(Json)
    })
    .await
    .map_err(ApiError::from)
}

#[get("/1/Employees/<employee_id>/MainTrainings/<main_training_id>/Trainings")]
pub async fn category_trainings(
    db: DbConn,
    employee_id: i32,
    main_training_id: i32,
) -> Result<Json<Vec<TrainingProgress>>, ApiError> {
    db.run(move |conn| {
        let (_, records) = category_records(conn, employee_id, main_training_id)?;
        progress_rows(&records, today()).map(Json)
    })
    .await
    .map_err(ApiError::from)
}

/// Average completion of one employee within one main training.
///
/// ```json
/// {
///   "employee_id": 4,
///   "main_training_id": 1,
///   "main_training_name": "Fire Safety",
///   "average_percentage": 50.0
/// }
/// ```
#[get("/1/Employees/<employee_id>/MainTrainings/<main_training_id>/Completion")]
pub async fn category_completion(
    db: DbConn,
    employee_id: i32,
    main_training_id: i32,
) -> Result<Json<MainTrainingCompletion>, ApiError> {
    db.run(move |conn| {
        let (main, records) = category_records(conn, employee_id, main_training_id)?;
        main_training_completion(employee_id, &main, &records, today()).map(Json)
    })
    .await
    .map_err(ApiError::from)
}

pub fn routes() -> Vec<Route> {
    routes![
        employee_trainings,
        employee_completion_endpoint,
        category_trainings,
        category_completion
    ]
}
