//! Completion reporting over loaded assignment records.
//!
//! Every function here works on records already read from the database and
//! takes `today` explicitly. Averages over an empty set are reported as
//! [`TrainingError::NotFound`] rather than as a number.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::TrainingError;
use crate::models::{Assignment, MainTraining, SubTraining, Verification};
use crate::validity::{completion_percentage, is_warning};

/// An assignment joined with everything needed to report on it.
#[derive(Debug, Clone)]
pub struct AssignmentRecord {
    pub assignment: Assignment,
    pub sub_training: SubTraining,
    pub main_training: MainTraining,
    pub employee_name: String,
}

impl AssignmentRecord {
    pub fn completion(&self, today: NaiveDate) -> Result<f64, TrainingError> {
        let period = self.sub_training.validity_period()?;
        Ok(completion_percentage(
            self.assignment.start_date,
            self.assignment.expiration_date,
            period,
            today,
        ))
    }
}

/// Mean of `values` rounded to two decimal places.
pub fn average_completion<I>(values: I) -> Result<f64, TrainingError>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return Err(TrainingError::not_found("No completion values to average"));
    }
    Ok(round2(sum / count as f64))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One row of an employee's training progress listing.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TrainingProgress {
    pub assignment_id: i32,
    pub employee_id: i32,
    pub employee_name: String,
    pub sub_training_id: i32,
    pub sub_training_name: String,
    pub main_training_id: i32,
    pub main_training_name: String,
    #[serde(default, with = "crate::date_format::option")]
    #[ts(type = "string | null")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "crate::date_format::option")]
    #[ts(type = "string | null")]
    pub expiration_date: Option<NaiveDate>,
    pub warning: bool,
    pub verification: Verification,
    pub verification_document: Option<String>,
    pub completion_percentage: f64,
}

impl TrainingProgress {
    pub fn from_record(record: &AssignmentRecord, today: NaiveDate) -> Result<Self, TrainingError> {
        Ok(TrainingProgress {
            assignment_id: record.assignment.id,
            employee_id: record.assignment.employee_id,
            employee_name: record.employee_name.clone(),
            sub_training_id: record.sub_training.id,
            sub_training_name: record.sub_training.name.clone(),
            main_training_id: record.main_training.id,
            main_training_name: record.main_training.name.clone(),
            start_date: record.assignment.start_date,
            expiration_date: record.assignment.expiration_date,
            warning: is_warning(record.assignment.expiration_date, today),
            verification: record.assignment.verification,
            verification_document: record.assignment.verification_document.clone(),
            completion_percentage: record.completion(today)?,
        })
    }
}

pub fn progress_rows(
    records: &[AssignmentRecord],
    today: NaiveDate,
) -> Result<Vec<TrainingProgress>, TrainingError> {
    records.iter().map(|r| TrainingProgress::from_record(r, today)).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmployeeCompletion {
    pub employee_id: i32,
    pub average_completion_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MainTrainingCompletion {
    pub employee_id: i32,
    pub main_training_id: i32,
    pub main_training_name: String,
    pub average_percentage: f64,
}

fn average_of(records: &[AssignmentRecord], today: NaiveDate) -> Result<f64, TrainingError> {
    let values = records
        .iter()
        .map(|r| r.completion(today))
        .collect::<Result<Vec<_>, _>>()?;
    average_completion(values)
}

/// Average over all of one employee's assignments.
pub fn employee_completion(
    employee_id: i32,
    records: &[AssignmentRecord],
    today: NaiveDate,
) -> Result<EmployeeCompletion, TrainingError> {
    if records.is_empty() {
        return Err(TrainingError::not_found("No sub-trainings found for this employee"));
    }
    Ok(EmployeeCompletion {
        employee_id,
        average_completion_percentage: average_of(records, today)?,
    })
}

/// Average over one employee's assignments within a single main training.
pub fn main_training_completion(
    employee_id: i32,
    main_training: &MainTraining,
    records: &[AssignmentRecord],
    today: NaiveDate,
) -> Result<MainTrainingCompletion, TrainingError> {
    if records.is_empty() {
        return Err(TrainingError::not_found(
            "No sub-trainings found for this employee in this main training",
        ));
    }
    Ok(MainTrainingCompletion {
        employee_id,
        main_training_id: main_training.id,
        main_training_name: main_training.name.clone(),
        average_percentage: average_of(records, today)?,
    })
}
