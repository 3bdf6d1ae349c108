use diesel::{
    Associations, Identifiable, Insertable, Queryable, Selectable,
    deserialize::{self, FromSql},
    serialize::{self, Output, ToSql},
    sql_types::Text,
    sqlite::Sqlite,
};
use rocket::form::FromForm;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::{Company, Project};
use crate::schema::employees;

/// Whether an employee works on a rig or on rigless operations.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    TS,
    diesel::expression::AsExpression,
    diesel::deserialize::FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[ts(export)]
pub enum EmployeeCategory {
    Rig,
    Rigless,
}

impl EmployeeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            EmployeeCategory::Rig => "Rig",
            EmployeeCategory::Rigless => "Rigless",
        }
    }
}

impl ToSql<Text, Sqlite> for EmployeeCategory {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for EmployeeCategory {
    fn from_sql(
        bytes: <Sqlite as diesel::backend::Backend>::RawValue<'_>,
    ) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        match s.as_str() {
            "Rig" => Ok(EmployeeCategory::Rig),
            "Rigless" => Ok(EmployeeCategory::Rigless),
            _ => Err(format!("Invalid EmployeeCategory value: {}", s).into()),
        }
    }
}

#[derive(
    Queryable, Selectable, Identifiable, Associations, Debug, Clone, Serialize, Deserialize, TS,
)]
#[diesel(belongs_to(crate::models::company::Company))]
#[diesel(belongs_to(crate::models::project::Project))]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct Employee {
    pub id: i32,
    pub fullname: String,
    pub mobile_number: String,
    pub designation: String,
    pub gate_pass_no: String,
    pub category: EmployeeCategory,
    pub company_id: i32,
    pub project_id: i32,
    /// Reference to the stored photo (path or URL), storage is external.
    pub profile_photo: Option<String>,
    pub is_accepted: bool,
    pub on_duty: bool,
}

#[derive(Insertable)]
#[diesel(table_name = employees)]
pub struct NewEmployee {
    pub fullname: String,
    pub mobile_number: String,
    pub designation: String,
    pub gate_pass_no: String,
    pub category: EmployeeCategory,
    pub company_id: i32,
    pub project_id: i32,
    pub profile_photo: Option<String>,
    pub is_accepted: bool,
    pub on_duty: bool,
}

// For API inputs and validation
#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct EmployeeInput {
    pub fullname: String,
    pub mobile_number: String,
    pub designation: String,
    pub gate_pass_no: String,
    pub category: EmployeeCategory,
    pub company_id: i32,
    pub project_id: i32,
    pub profile_photo: Option<String>,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct EmployeeUpdate {
    pub fullname: Option<String>,
    pub mobile_number: Option<String>,
    pub designation: Option<String>,
    pub gate_pass_no: Option<String>,
    pub category: Option<EmployeeCategory>,
    pub company_id: Option<i32>,
    pub project_id: Option<i32>,
}

/// Employee with its company and project embedded, as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmployeeDetail {
    pub id: i32,
    pub fullname: String,
    pub mobile_number: String,
    pub designation: String,
    pub gate_pass_no: String,
    pub category: EmployeeCategory,
    pub profile_photo: Option<String>,
    pub is_accepted: bool,
    pub on_duty: bool,
    pub company: Company,
    pub project: Project,
}

impl EmployeeDetail {
    pub fn new(employee: Employee, company: Company, project: Project) -> Self {
        EmployeeDetail {
            id: employee.id,
            fullname: employee.fullname,
            mobile_number: employee.mobile_number,
            designation: employee.designation,
            gate_pass_no: employee.gate_pass_no,
            category: employee.category,
            profile_photo: employee.profile_photo,
            is_accepted: employee.is_accepted,
            on_duty: employee.on_duty,
            company,
            project,
        }
    }
}

/// Filters for listing employees. Text filters are case-insensitive
/// substring matches.
#[derive(Debug, Clone, Default, FromForm)]
pub struct EmployeeFilter {
    pub accepted: Option<bool>,
    pub on_duty: Option<bool>,
    pub fullname: Option<String>,
    pub mobile_number: Option<String>,
    pub gate_pass_no: Option<String>,
    pub designation: Option<String>,
    pub company_name: Option<String>,
    pub project_name: Option<String>,
}
