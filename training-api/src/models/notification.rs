use chrono::NaiveDateTime;
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Append-only log entry produced from an [`crate::events::EmployeeEvent`].
#[derive(Deserialize, Queryable, Selectable, Identifiable, Debug, Clone, Serialize, TS)]
#[diesel(table_name = crate::schema::notifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct Notification {
    pub id: i32,
    pub message: String,
    #[ts(type = "string")]
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::notifications)]
pub struct NewNotification {
    pub message: String,
    pub created_at: NaiveDateTime,
}
