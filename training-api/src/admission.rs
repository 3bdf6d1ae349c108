//! Employee admission and duty workflow.
//!
//! A registered employee starts out pending. Accepting sets `is_accepted`,
//! rejecting deletes the employee together with their assignments. Duty
//! status is an independent flag with no transition rules.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::TrainingError;
use crate::events::EmployeeEvent;
use crate::models::{Employee, EmployeeInput};
use crate::orm::employee::{
    delete_employee, get_employee_by_id, insert_employee, set_accepted, set_on_duty,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum AdmissionAction {
    Accept,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum AdmissionState {
    Pending,
    Accepted,
}

impl AdmissionState {
    pub fn of(employee: &Employee) -> Self {
        if employee.is_accepted {
            AdmissionState::Accepted
        } else {
            AdmissionState::Pending
        }
    }
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct AdmissionInput {
    pub action: AdmissionAction,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct DutyInput {
    pub on_duty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "status", rename_all = "lowercase")]
#[ts(export)]
pub enum AdmissionOutcome {
    Accepted { employee: Employee },
    Rejected { employee_id: i32 },
}

/// Result of a workflow step plus the events it produced.
#[derive(Debug)]
pub struct Transition<T> {
    pub value: T,
    pub events: Vec<EmployeeEvent>,
}

fn require_employee(conn: &mut SqliteConnection, employee_id: i32) -> Result<Employee, TrainingError> {
    get_employee_by_id(conn, employee_id)?
        .ok_or_else(|| TrainingError::not_found(format!("Employee with ID {} not found", employee_id)))
}

/// Registers a pending employee and emits [`EmployeeEvent::Registered`].
pub fn register_employee(
    conn: &mut SqliteConnection,
    input: EmployeeInput,
) -> Result<Transition<Employee>, TrainingError> {
    let employee = insert_employee(conn, input)?;
    let events = vec![EmployeeEvent::registered(&employee)];
    Ok(Transition { value: employee, events })
}

/// Accepts or rejects an employee.
///
/// Accepting an already accepted employee changes nothing and emits no
/// event. Only pending employees can be rejected.
pub fn apply_admission(
    conn: &mut SqliteConnection,
    employee_id: i32,
    action: AdmissionAction,
) -> Result<Transition<AdmissionOutcome>, TrainingError> {
    let employee = require_employee(conn, employee_id)?;

    match (AdmissionState::of(&employee), action) {
        (AdmissionState::Accepted, AdmissionAction::Accept) => Ok(Transition {
            value: AdmissionOutcome::Accepted { employee },
            events: Vec::new(),
        }),
        (AdmissionState::Pending, AdmissionAction::Accept) => {
            let employee = set_accepted(conn, employee_id)?.ok_or_else(|| {
                TrainingError::not_found(format!("Employee with ID {} not found", employee_id))
            })?;
            let events = vec![EmployeeEvent::accepted(&employee)];
            Ok(Transition { value: AdmissionOutcome::Accepted { employee }, events })
        }
        (AdmissionState::Pending, AdmissionAction::Reject) => {
            delete_employee(conn, employee_id)?;
            Ok(Transition {
                value: AdmissionOutcome::Rejected { employee_id },
                events: Vec::new(),
            })
        }
        (AdmissionState::Accepted, AdmissionAction::Reject) => Err(TrainingError::validation(
            format!("Employee with ID {} is already accepted", employee_id),
        )),
    }
}

pub fn set_duty(
    conn: &mut SqliteConnection,
    employee_id: i32,
    on_duty: bool,
) -> Result<Employee, TrainingError> {
    set_on_duty(conn, employee_id, on_duty)?
        .ok_or_else(|| TrainingError::not_found(format!("Employee with ID {} not found", employee_id)))
}
