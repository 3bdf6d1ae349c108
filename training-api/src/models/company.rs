use diesel::{Identifiable, Insertable, Queryable, QueryableByName, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(
    Deserialize, Queryable, Selectable, Identifiable, QueryableByName, Debug, Clone, Serialize, TS,
)]
#[diesel(table_name = crate::schema::companies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct Company {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = crate::schema::companies)]
pub struct NewCompany {
    pub name: String,
}

// For API inputs and validation
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct CompanyInput {
    pub name: String,
}
