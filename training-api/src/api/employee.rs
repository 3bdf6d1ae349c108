//! API endpoints for employees and their admission workflow.
//!
//! Registration and acceptance publish notifications in the same
//! transaction as the write they describe.

use diesel::Connection;
use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::admission::{
    AdmissionInput, AdmissionOutcome, DutyInput, apply_admission, register_employee, set_duty,
};
use crate::api::not_found;
use crate::error::{ApiError, TrainingError};
use crate::events::NotificationWriter;
use crate::logged_json::LoggedJson;
use crate::models::{Employee, EmployeeDetail, EmployeeFilter, EmployeeInput, EmployeeUpdate};
use crate::orm::DbConn;
use crate::orm::assignment::delete_assignment_by_pair;
use crate::orm::employee::{
    delete_employee, get_employee_by_id, get_employee_detail, list_employee_details,
    set_profile_photo, update_employee,
};

/// Photo reference (path or URL); `null` clears it.
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct PhotoInput {
    pub profile_photo: Option<String>,
}

fn detail(
    conn: &mut diesel::SqliteConnection,
    employee_id: i32,
) -> Result<EmployeeDetail, TrainingError> {
    get_employee_detail(conn, employee_id)?.ok_or_else(|| not_found("Employee", employee_id))
}

/// Register Employee endpoint.
///
/// - **URL:** `/api/1/Employees`
/// - **Method:** `POST`
///
/// # Request Format
///
/// ```json
/// {
///   "fullname": "Ahmed Saleh",
///   "mobile_number": "0501234567",
///   "designation": "Roustabout",
///   "gate_pass_no": "GP-1042",
///   "category": "Rig",
///   "company_id": 1,
///   "project_id": 2,
///   "profile_photo": null
/// }
/// ```
///
/// # Response
///
/// - `201 Created` with the employee, company and project embedded.
///   The employee starts pending and off duty.
/// - `400 Bad Request` when the company or project does not exist.
/// - `409 Conflict` when the mobile or gate pass number is taken, with the
///   database constraint message as the error.
#[post("/1/Employees", data = "<new_employee>")]
pub async fn create_employee(
    db: DbConn,
    new_employee: LoggedJson<EmployeeInput>,
) -> Result<status::Created<Json<EmployeeDetail>>, ApiError> {
    let input = new_employee.into_inner();
    let employee = db
        .run(move |conn| {
            conn.transaction::<_, TrainingError, _>(|conn| {
                let registered = register_employee(conn, input)?;
                NotificationWriter::new(conn).publish_all(&registered.events)?;
                detail(conn, registered.value.id)
            })
        })
        .await?;
    Ok(status::Created::new(format!("/api/1/Employees/{}", employee.id)).body(Json(employee)))
}

/// List Employees endpoint.
///
/// Query parameters (all optional): `accepted`, `on_duty` (booleans) and
/// case-insensitive substring filters `fullname`, `mobile_number`,
/// `gate_pass_no`, `designation`, `company_name`, `project_name`.
///
/// `GET /api/1/Employees?accepted=false` lists pending registrations.
#[get("/1/Employees?<filter..>")]
pub async fn list_employees(
    db: DbConn,
    filter: EmployeeFilter,
) -> Result<Json<Vec<EmployeeDetail>>, ApiError> {
    db.run(move |conn| list_employee_details(conn, &filter).map(Json).map_err(TrainingError::from))
        .await
        .map_err(ApiError::from)
}

#[get("/1/Employees/<employee_id>")]
pub async fn get_employee(db: DbConn, employee_id: i32) -> Result<Json<EmployeeDetail>, ApiError> {
    db.run(move |conn| detail(conn, employee_id).map(Json))
        .await
        .map_err(ApiError::from)
}

/// Partial update; absent fields keep their current values.
#[put("/1/Employees/<employee_id>", data = "<update>")]
pub async fn update_employee_endpoint(
    db: DbConn,
    employee_id: i32,
    update: LoggedJson<EmployeeUpdate>,
) -> Result<Json<EmployeeDetail>, ApiError> {
    let update = update.into_inner();
    db.run(move |conn| {
        update_employee(conn, employee_id, update)?;
        detail(conn, employee_id).map(Json)
    })
    .await
    .map_err(ApiError::from)
}

/// Deletes the employee and all of their assignments.
#[delete("/1/Employees/<employee_id>")]
pub async fn delete_employee_endpoint(db: DbConn, employee_id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_employee(conn, employee_id)? {
        true => {
            info!("Deleted employee {}", employee_id);
            Ok(Status::NoContent)
        }
        false => Err(not_found("Employee", employee_id)),
    })
    .await
    .map_err(ApiError::from)
}

#[put("/1/Employees/<employee_id>/Photo", data = "<photo>")]
pub async fn set_photo(
    db: DbConn,
    employee_id: i32,
    photo: LoggedJson<PhotoInput>,
) -> Result<Json<Employee>, ApiError> {
    let photo = photo.into_inner();
    db.run(move |conn| {
        set_profile_photo(conn, employee_id, photo.profile_photo)?
            .map(Json)
            .ok_or_else(|| not_found("Employee", employee_id))
    })
    .await
    .map_err(ApiError::from)
}

/// Admission endpoint.
///
/// - **URL:** `/api/1/Employees/<employee_id>/Admission`
/// - **Method:** `POST`
/// - **Body:** `{ "action": "accept" }` or `{ "action": "reject" }`
///
/// Accepting returns `{"status": "accepted", "employee": {...}}` and, the
/// first time only, records an "Employee accepted" notification. Rejecting
/// a pending employee deletes them and returns
/// `{"status": "rejected", "employee_id": 7}`.
#[post("/1/Employees/<employee_id>/Admission", data = "<admission>")]
pub async fn admission_endpoint(
    db: DbConn,
    employee_id: i32,
    admission: LoggedJson<AdmissionInput>,
) -> Result<Json<AdmissionOutcome>, ApiError> {
    let action = admission.into_inner().action;
    db.run(move |conn| {
        conn.transaction::<_, TrainingError, _>(|conn| {
            let transition = apply_admission(conn, employee_id, action)?;
            NotificationWriter::new(conn).publish_all(&transition.events)?;
            Ok(Json(transition.value))
        })
    })
    .await
    .map_err(ApiError::from)
}

#[put("/1/Employees/<employee_id>/Duty", data = "<duty>")]
pub async fn duty_endpoint(
    db: DbConn,
    employee_id: i32,
    duty: LoggedJson<DutyInput>,
) -> Result<Json<Employee>, ApiError> {
    let on_duty = duty.into_inner().on_duty;
    db.run(move |conn| set_duty(conn, employee_id, on_duty).map(Json))
        .await
        .map_err(ApiError::from)
}

/// Removes the employee's assignment(s) of one sub-training.
#[delete("/1/Employees/<employee_id>/SubTrainings/<sub_training_id>")]
pub async fn remove_sub_training(
    db: DbConn,
    employee_id: i32,
    sub_training_id: i32,
) -> Result<Status, ApiError> {
    db.run(move |conn| {
        if get_employee_by_id(conn, employee_id)?.is_none() {
            return Err(not_found("Employee", employee_id));
        }
        match delete_assignment_by_pair(conn, employee_id, sub_training_id)? {
            0 => Err(TrainingError::not_found(format!(
                "Sub-training with ID {} is not assigned to employee {}",
                sub_training_id, employee_id
            ))),
            _ => Ok(Status::NoContent),
        }
    })
    .await
    .map_err(ApiError::from)
}

pub fn routes() -> Vec<Route> {
    routes![
        create_employee,
        list_employees,
        get_employee,
        update_employee_endpoint,
        delete_employee_endpoint,
        set_photo,
        admission_endpoint,
        duty_endpoint,
        remove_sub_training
    ]
}
