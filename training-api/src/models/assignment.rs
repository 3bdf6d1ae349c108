use chrono::NaiveDate;
use diesel::{
    Associations, Identifiable, Insertable, Queryable, Selectable,
    deserialize::{self, FromSql},
    serialize::{self, Output, ToSql},
    sql_types::Text,
    sqlite::Sqlite,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::employee_sub_trainings;

/// Review state of an assignment's verification document.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[serde(rename_all = "snake_case")]
pub enum Verification {
    #[default]
    Unreviewed,
    Verified,
    Rejected,
}

impl ToSql<Text, Sqlite> for Verification {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        let s = match self {
            Verification::Unreviewed => "unreviewed",
            Verification::Verified => "verified",
            Verification::Rejected => "rejected",
        };
        out.set_value(s);
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for Verification {
    fn from_sql(
        bytes: <Sqlite as diesel::backend::Backend>::RawValue<'_>,
    ) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        match s.as_str() {
            "unreviewed" => Ok(Verification::Unreviewed),
            "verified" => Ok(Verification::Verified),
            "rejected" => Ok(Verification::Rejected),
            _ => Err(format!("Invalid Verification value: {}", s).into()),
        }
    }
}

/// Links one employee to one sub-training.
///
/// `expiration_date` and `warning` are derived on every write from
/// `start_date` and the sub-training's validity period.
#[derive(
    Queryable, Selectable, Identifiable, Associations, Debug, Clone, Serialize, Deserialize, TS,
)]
#[diesel(belongs_to(crate::models::employee::Employee))]
#[diesel(belongs_to(crate::models::training::SubTraining))]
#[diesel(table_name = employee_sub_trainings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct Assignment {
    pub id: i32,
    pub employee_id: i32,
    pub sub_training_id: i32,
    #[serde(default, with = "crate::date_format::option")]
    #[ts(type = "string | null")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "crate::date_format::option")]
    #[ts(type = "string | null")]
    pub expiration_date: Option<NaiveDate>,
    pub warning: bool,
    pub verification_document: Option<String>,
    pub verification: Verification,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = employee_sub_trainings)]
pub struct NewAssignment {
    pub employee_id: i32,
    pub sub_training_id: i32,
    pub start_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub warning: bool,
    pub verification_document: Option<String>,
    pub verification: Verification,
}

/// Identifiers are optional here so that a missing one is reported as a
/// validation failure rather than a malformed body.
#[derive(Debug, Default, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct AssignmentInput {
    pub employee_id: Option<i32>,
    pub sub_training_id: Option<i32>,
    /// `DD-MM-YYYY`
    pub start_date: Option<String>,
}

/// An empty `start_date` clears it, an absent one keeps it.
#[derive(Debug, Default, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct AssignmentUpdate {
    pub sub_training_id: Option<i32>,
    /// `DD-MM-YYYY`
    pub start_date: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct VerificationInput {
    pub verification_document: Option<String>,
    pub verification: Verification,
}
