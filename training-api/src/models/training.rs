use diesel::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::TrainingError;
use crate::schema::{main_trainings, sub_trainings};
use crate::validity::ValidityPeriod;

/// Top-level training category, e.g. "Fire Safety".
#[derive(Deserialize, Queryable, Selectable, Identifiable, Debug, Clone, Serialize, TS)]
#[diesel(table_name = main_trainings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct MainTraining {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = main_trainings)]
pub struct NewMainTraining {
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct MainTrainingInput {
    pub name: String,
}

/// Row of `sub_trainings`. `validity_days` is `None` for permanent trainings.
#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone)]
#[diesel(belongs_to(MainTraining))]
#[diesel(table_name = sub_trainings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SubTraining {
    pub id: i32,
    pub main_training_id: i32,
    pub name: String,
    pub validity_days: Option<i32>,
}

impl SubTraining {
    pub fn validity_period(&self) -> Result<ValidityPeriod, TrainingError> {
        ValidityPeriod::from_days(self.validity_days)
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = sub_trainings)]
pub struct NewSubTraining {
    pub main_training_id: i32,
    pub name: String,
    pub validity_days: Option<i32>,
}

/// `validity_period` is one of the labels of [`ValidityPeriod`].
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct SubTrainingInput {
    pub main_training_id: i32,
    pub name: String,
    pub validity_period: String,
}

#[derive(Debug, Default, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct SubTrainingUpdate {
    pub main_training_id: Option<i32>,
    pub name: Option<String>,
    pub validity_period: Option<String>,
}

/// Sub-training as exposed by the API, with its validity as a label.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubTrainingView {
    pub id: i32,
    pub main_training_id: i32,
    pub main_training_name: String,
    pub name: String,
    pub validity_period: ValidityPeriod,
}

impl SubTrainingView {
    pub fn new(sub: SubTraining, main: &MainTraining) -> Result<Self, TrainingError> {
        Ok(SubTrainingView {
            validity_period: sub.validity_period()?,
            id: sub.id,
            main_training_id: sub.main_training_id,
            main_training_name: main.name.clone(),
            name: sub.name,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MainTrainingWithSubTrainings {
    pub id: i32,
    pub name: String,
    pub sub_trainings: Vec<SubTrainingView>,
}
