use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::models::{NewNotification, Notification};
use crate::orm::db::last_insert_rowid;
use crate::schema::notifications;

/// Append a notification. Notifications are never updated afterwards.
pub fn insert_notification(
    conn: &mut SqliteConnection,
    msg: String,
    at: NaiveDateTime,
) -> Result<Notification, diesel::result::Error> {
    diesel::insert_into(notifications::table)
        .values(&NewNotification { message: msg, created_at: at })
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    notifications::table
        .filter(notifications::id.eq(last_id))
        .select(Notification::as_select())
        .first(conn)
}

/// All notifications, newest first.
pub fn list_notifications(
    conn: &mut SqliteConnection,
) -> Result<Vec<Notification>, diesel::result::Error> {
    notifications::table
        .order((notifications::created_at.desc(), notifications::id.desc()))
        .select(Notification::as_select())
        .load(conn)
}

pub fn get_notification_by_id(
    conn: &mut SqliteConnection,
    notification_id: i32,
) -> Result<Option<Notification>, diesel::result::Error> {
    notifications::table
        .filter(notifications::id.eq(notification_id))
        .select(Notification::as_select())
        .first(conn)
        .optional()
}

pub fn delete_notification(
    conn: &mut SqliteConnection,
    notification_id: i32,
) -> Result<bool, diesel::result::Error> {
    let rows = diesel::delete(notifications::table.filter(notifications::id.eq(notification_id)))
        .execute(conn)?;
    Ok(rows > 0)
}
