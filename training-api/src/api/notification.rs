//! Read and dismiss notifications. Notifications are created only by the
//! employee workflow, never through this API.

use rocket::Route;
use rocket::http::Status;
use rocket::serde::json::Json;

use crate::api::not_found;
use crate::error::{ApiError, TrainingError};
use crate::models::Notification;
use crate::orm::DbConn;
use crate::orm::notification::{delete_notification, get_notification_by_id, list_notifications};

/// Newest first.
#[get("/1/Notifications")]
pub async fn list_notifications_endpoint(db: DbConn) -> Result<Json<Vec<Notification>>, ApiError> {
    db.run(|conn| list_notifications(conn).map(Json).map_err(TrainingError::from))
        .await
        .map_err(ApiError::from)
}

#[get("/1/Notifications/<notification_id>")]
pub async fn get_notification(db: DbConn, notification_id: i32) -> Result<Json<Notification>, ApiError> {
    db.run(move |conn| {
        get_notification_by_id(conn, notification_id)?
            .map(Json)
            .ok_or_else(|| not_found("Notification", notification_id))
    })
    .await
    .map_err(ApiError::from)
}

#[delete("/1/Notifications/<notification_id>")]
pub async fn delete_notification_endpoint(db: DbConn, notification_id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_notification(conn, notification_id)? {
        true => Ok(Status::NoContent),
        false => Err(not_found("Notification", notification_id)),
    })
    .await
    .map_err(ApiError::from)
}

pub fn routes() -> Vec<Route> {
    routes![
        list_notifications_endpoint,
        get_notification,
        delete_notification_endpoint
    ]
}
