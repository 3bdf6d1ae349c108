//! Training catalog endpoints: main trainings, sub-trainings and the fixed
//! set of validity periods.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::api::{not_found, require_name};
use crate::error::{ApiError, TrainingError};
use crate::logged_json::LoggedJson;
use crate::models::{
    MainTraining, MainTrainingInput, MainTrainingWithSubTrainings, SubTrainingInput,
    SubTrainingUpdate, SubTrainingView,
};
use crate::orm::DbConn;
use crate::orm::training::{
    delete_main_training, delete_sub_training, get_main_training_by_id,
    get_main_trainings_with_sub_trainings, get_sub_training_view, insert_main_training,
    insert_sub_training, list_sub_training_views, update_main_training, update_sub_training,
};
use crate::validity::{ValidityPeriod, today};

/// One entry of `/1/ValidityPeriods`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ValidityPeriodChoice {
    pub label: ValidityPeriod,
    /// `null` for permanent trainings.
    pub days: Option<i32>,
}

#[post("/1/MainTrainings", data = "<new_training>")]
pub async fn create_main_training(
    db: DbConn,
    new_training: LoggedJson<MainTrainingInput>,
) -> Result<status::Created<Json<MainTraining>>, ApiError> {
    let input = new_training.into_inner();
    let training = db
        .run(move |conn| {
            let name = require_name(&input.name, "Main training")?;
            Ok::<_, TrainingError>(insert_main_training(conn, name)?)
        })
        .await?;
    Ok(status::Created::new(format!("/api/1/MainTrainings/{}", training.id)).body(Json(training)))
}

/// Lists every main training with its sub-trainings nested.
///
/// ```json
/// [
///   {
///     "id": 1,
///     "name": "Fire Safety",
///     "sub_trainings": [
///       { "id": 3, "main_training_id": 1, "main_training_name": "Fire Safety",
///         "name": "Extinguishers", "validity_period": "1 year" }
///     ]
///   }
/// ]
/// ```
#[get("/1/MainTrainings")]
pub async fn list_main_trainings(
    db: DbConn,
) -> Result<Json<Vec<MainTrainingWithSubTrainings>>, ApiError> {
    db.run(|conn| get_main_trainings_with_sub_trainings(conn).map(Json))
        .await
        .map_err(ApiError::from)
}

#[get("/1/MainTrainings/<training_id>")]
pub async fn get_main_training(
    db: DbConn,
    training_id: i32,
) -> Result<Json<MainTraining>, ApiError> {
    db.run(move |conn| {
        get_main_training_by_id(conn, training_id)?
            .map(Json)
            .ok_or_else(|| not_found("Main training", training_id))
    })
    .await
    .map_err(ApiError::from)
}

#[put("/1/MainTrainings/<training_id>", data = "<update>")]
pub async fn update_main_training_endpoint(
    db: DbConn,
    training_id: i32,
    update: LoggedJson<MainTrainingInput>,
) -> Result<Json<MainTraining>, ApiError> {
    let input = update.into_inner();
    db.run(move |conn| {
        let name = require_name(&input.name, "Main training")?;
        update_main_training(conn, training_id, name)?
            .map(Json)
            .ok_or_else(|| not_found("Main training", training_id))
    })
    .await
    .map_err(ApiError::from)
}

/// Deletes the main training, its sub-trainings and their assignments.
#[delete("/1/MainTrainings/<training_id>")]
pub async fn delete_main_training_endpoint(
    db: DbConn,
    training_id: i32,
) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_main_training(conn, training_id)? {
        true => Ok(Status::NoContent),
        false => Err(not_found("Main training", training_id)),
    })
    .await
    .map_err(ApiError::from)
}

#[get("/1/ValidityPeriods")]
pub fn list_validity_periods() -> Json<Vec<ValidityPeriodChoice>> {
    Json(
        ValidityPeriod::ALL
            .into_iter()
            .map(|label| ValidityPeriodChoice { label, days: label.days() })
            .collect(),
    )
}

/// Create Sub-training endpoint.
///
/// ```json
/// { "main_training_id": 1, "name": "Extinguishers", "validity_period": "1 year" }
/// ```
///
/// `validity_period` must be one of the labels listed by
/// `/api/1/ValidityPeriods`, otherwise `400 Bad Request`.
#[post("/1/SubTrainings", data = "<new_sub>")]
pub async fn create_sub_training(
    db: DbConn,
    new_sub: LoggedJson<SubTrainingInput>,
) -> Result<status::Created<Json<SubTrainingView>>, ApiError> {
    let mut input = new_sub.into_inner();
    let view = db
        .run(move |conn| {
            input.name = require_name(&input.name, "Sub-training")?;
            insert_sub_training(conn, input)
        })
        .await?;
    Ok(status::Created::new(format!("/api/1/SubTrainings/{}", view.id)).body(Json(view)))
}

/// Lists sub-trainings, optionally only those of `main_training_id`.
#[get("/1/SubTrainings?<main_training_id>")]
pub async fn list_sub_trainings(
    db: DbConn,
    main_training_id: Option<i32>,
) -> Result<Json<Vec<SubTrainingView>>, ApiError> {
    db.run(move |conn| list_sub_training_views(conn, main_training_id).map(Json))
        .await
        .map_err(ApiError::from)
}

#[get("/1/SubTrainings/<sub_id>")]
pub async fn get_sub_training(db: DbConn, sub_id: i32) -> Result<Json<SubTrainingView>, ApiError> {
    db.run(move |conn| {
        get_sub_training_view(conn, sub_id)?
            .map(Json)
            .ok_or_else(|| not_found("Sub-training", sub_id))
    })
    .await
    .map_err(ApiError::from)
}

/// Partial update. Changing `validity_period` re-derives the expiration
/// date and warning flag of every assignment of this sub-training.
#[put("/1/SubTrainings/<sub_id>", data = "<update>")]
pub async fn update_sub_training_endpoint(
    db: DbConn,
    sub_id: i32,
    update: LoggedJson<SubTrainingUpdate>,
) -> Result<Json<SubTrainingView>, ApiError> {
    let mut update = update.into_inner();
    db.run(move |conn| {
        if let Some(name) = update.name.as_deref() {
            update.name = Some(require_name(name, "Sub-training")?);
        }
        update_sub_training(conn, sub_id, update, today()).map(Json)
    })
    .await
    .map_err(ApiError::from)
}

#[delete("/1/SubTrainings/<sub_id>")]
pub async fn delete_sub_training_endpoint(db: DbConn, sub_id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_sub_training(conn, sub_id)? {
        true => Ok(Status::NoContent),
        false => Err(not_found("Sub-training", sub_id)),
    })
    .await
    .map_err(ApiError::from)
}

pub fn routes() -> Vec<Route> {
    routes![
        create_main_training,
        list_main_trainings,
        get_main_training,
        update_main_training_endpoint,
        delete_main_training_endpoint,
        list_validity_periods,
        create_sub_training,
        list_sub_trainings,
        get_sub_training,
        update_sub_training_endpoint,
        delete_sub_training_endpoint
    ]
}
