use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Deserialize, Queryable, Selectable, Identifiable, Debug, Clone, Serialize, TS)]
#[diesel(table_name = crate::schema::projects)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct Project {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = crate::schema::projects)]
pub struct NewProject {
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct ProjectInput {
    pub name: String,
}
