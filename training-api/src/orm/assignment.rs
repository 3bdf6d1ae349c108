use chrono::NaiveDate;
use diesel::prelude::*;

use crate::date_format::parse_optional_date;
use crate::error::TrainingError;
use crate::models::{
    Assignment, AssignmentInput, AssignmentUpdate, MainTraining, NewAssignment, SubTraining,
    Verification, VerificationInput,
};
use crate::orm::db::last_insert_rowid;
use crate::orm::employee::get_employee_by_id;
use crate::orm::training::get_sub_training_by_id;
use crate::report::AssignmentRecord;
use crate::schema::{employee_sub_trainings, employees, main_trainings, sub_trainings};
use crate::validity::derive;

fn require_sub_training(
    conn: &mut SqliteConnection,
    sub_id: i32,
) -> Result<SubTraining, TrainingError> {
    get_sub_training_by_id(conn, sub_id)?.ok_or_else(|| {
        TrainingError::validation(format!("Sub-training with ID {} does not exist", sub_id))
    })
}

fn fetch_assignment(
    conn: &mut SqliteConnection,
    assignment_id: i32,
) -> Result<Assignment, diesel::result::Error> {
    employee_sub_trainings::table
        .filter(employee_sub_trainings::id.eq(assignment_id))
        .select(Assignment::as_select())
        .first(conn)
}

/// Assigns a sub-training to an employee. The expiration date and warning
/// flag are derived from `start_date` and the sub-training's validity.
pub fn insert_assignment(
    conn: &mut SqliteConnection,
    input: AssignmentInput,
    today: NaiveDate,
) -> Result<Assignment, TrainingError> {
    let employee_id = input
        .employee_id
        .ok_or_else(|| TrainingError::validation("employee_id is required"))?;
    let sub_training_id = input
        .sub_training_id
        .ok_or_else(|| TrainingError::validation("sub_training_id is required"))?;
    let start_date = parse_optional_date(input.start_date.as_deref())?;

    conn.transaction::<_, TrainingError, _>(|conn| {
        if get_employee_by_id(conn, employee_id)?.is_none() {
            return Err(TrainingError::validation(format!(
                "Employee with ID {} does not exist",
                employee_id
            )));
        }
        let sub = require_sub_training(conn, sub_training_id)?;
        let derived = derive(start_date, sub.validity_period()?, today);

        diesel::insert_into(employee_sub_trainings::table)
            .values(&NewAssignment {
                employee_id,
                sub_training_id,
                start_date,
                expiration_date: derived.expiration_date,
                warning: derived.warning,
                verification_document: None,
                verification: Verification::Unreviewed,
            })
            .execute(conn)?;

        let last_id = last_insert_rowid(conn)?;
        Ok(fetch_assignment(conn, last_id)?)
    })
}

pub fn get_assignment_by_id(
    conn: &mut SqliteConnection,
    assignment_id: i32,
) -> Result<Option<Assignment>, diesel::result::Error> {
    fetch_assignment(conn, assignment_id).optional()
}

pub fn get_all_assignments(
    conn: &mut SqliteConnection,
) -> Result<Vec<Assignment>, diesel::result::Error> {
    employee_sub_trainings::table
        .order(employee_sub_trainings::id.asc())
        .select(Assignment::as_select())
        .load(conn)
}

/// Changes the start date and/or re-points the assignment to another
/// sub-training, then re-derives expiration and warning.
pub fn update_assignment(
    conn: &mut SqliteConnection,
    assignment_id: i32,
    update: AssignmentUpdate,
    today: NaiveDate,
) -> Result<Assignment, TrainingError> {
    conn.transaction::<_, TrainingError, _>(|conn| {
        let current = get_assignment_by_id(conn, assignment_id)?.ok_or_else(|| {
            TrainingError::not_found(format!("Assignment with ID {} not found", assignment_id))
        })?;

        let start_date = match update.start_date.as_deref() {
            Some(raw) => parse_optional_date(Some(raw))?,
            None => current.start_date,
        };
        let sub =
            require_sub_training(conn, update.sub_training_id.unwrap_or(current.sub_training_id))?;
        let derived = derive(start_date, sub.validity_period()?, today);

        diesel::update(
            employee_sub_trainings::table.filter(employee_sub_trainings::id.eq(assignment_id)),
        )
        .set((
            employee_sub_trainings::sub_training_id.eq(sub.id),
            employee_sub_trainings::start_date.eq(start_date),
            employee_sub_trainings::expiration_date.eq(derived.expiration_date),
            employee_sub_trainings::warning.eq(derived.warning),
        ))
        .execute(conn)?;

        Ok(fetch_assignment(conn, assignment_id)?)
    })
}

/// Records the outcome of reviewing an assignment's verification document.
pub fn set_verification(
    conn: &mut SqliteConnection,
    assignment_id: i32,
    input: VerificationInput,
) -> Result<Option<Assignment>, diesel::result::Error> {
    let rows = diesel::update(
        employee_sub_trainings::table.filter(employee_sub_trainings::id.eq(assignment_id)),
    )
    .set((
        employee_sub_trainings::verification_document.eq(input.verification_document),
        employee_sub_trainings::verification.eq(input.verification),
    ))
    .execute(conn)?;
    if rows == 0 {
        return Ok(None);
    }
    get_assignment_by_id(conn, assignment_id)
}

pub fn delete_assignment(
    conn: &mut SqliteConnection,
    assignment_id: i32,
) -> Result<bool, diesel::result::Error> {
    let rows = diesel::delete(
        employee_sub_trainings::table.filter(employee_sub_trainings::id.eq(assignment_id)),
    )
    .execute(conn)?;
    Ok(rows > 0)
}

/// Removes every assignment of `sub_id` held by `emp_id`.
/// Returns the number of removed rows.
pub fn delete_assignment_by_pair(
    conn: &mut SqliteConnection,
    emp_id: i32,
    sub_id: i32,
) -> Result<usize, diesel::result::Error> {
    diesel::delete(
        employee_sub_trainings::table
            .filter(employee_sub_trainings::employee_id.eq(emp_id))
            .filter(employee_sub_trainings::sub_training_id.eq(sub_id)),
    )
    .execute(conn)
}

fn recompute_rows(
    conn: &mut SqliteConnection,
    rows: Vec<(Assignment, SubTraining)>,
    today: NaiveDate,
) -> Result<usize, TrainingError> {
    let mut changed = 0;
    for (assignment, sub) in rows {
        let derived = derive(assignment.start_date, sub.validity_period()?, today);
        if derived.expiration_date == assignment.expiration_date && derived.warning == assignment.warning {
            continue;
        }
        diesel::update(employee_sub_trainings::table.filter(employee_sub_trainings::id.eq(assignment.id)))
            .set((
                employee_sub_trainings::expiration_date.eq(derived.expiration_date),
                employee_sub_trainings::warning.eq(derived.warning),
            ))
            .execute(conn)?;
        changed += 1;
    }
    Ok(changed)
}

/// Re-derives expiration and warning for every assignment of a
/// sub-training. Returns how many rows changed.
pub fn recompute_for_sub_training(
    conn: &mut SqliteConnection,
    sub_id: i32,
    today: NaiveDate,
) -> Result<usize, TrainingError> {
    let rows = employee_sub_trainings::table
        .inner_join(sub_trainings::table)
        .filter(employee_sub_trainings::sub_training_id.eq(sub_id))
        .select((Assignment::as_select(), SubTraining::as_select()))
        .load::<(Assignment, SubTraining)>(conn)?;
    recompute_rows(conn, rows, today)
}

/// Re-derives expiration and warning for the whole table.
pub fn recompute_all(conn: &mut SqliteConnection, today: NaiveDate) -> Result<usize, TrainingError> {
    conn.transaction::<_, TrainingError, _>(|conn| {
        let rows = employee_sub_trainings::table
            .inner_join(sub_trainings::table)
            .order(employee_sub_trainings::id.asc())
            .select((Assignment::as_select(), SubTraining::as_select()))
            .load::<(Assignment, SubTraining)>(conn)?;
        recompute_rows(conn, rows, today)
    })
}

/// Loads assignments joined with their sub-training, main training and
/// employee name, optionally narrowed to one employee and/or one main
/// training. Ordered by assignment id.
pub fn load_records(
    conn: &mut SqliteConnection,
    employee_id: Option<i32>,
    main_training_id: Option<i32>,
) -> Result<Vec<AssignmentRecord>, diesel::result::Error> {
    let mut query = employee_sub_trainings::table
        .inner_join(sub_trainings::table.inner_join(main_trainings::table))
        .inner_join(employees::table)
        .select((
            Assignment::as_select(),
            SubTraining::as_select(),
            MainTraining::as_select(),
            employees::fullname,
        ))
        .order(employee_sub_trainings::id.asc())
        .into_boxed();

    if let Some(emp_id) = employee_id {
        query = query.filter(employee_sub_trainings::employee_id.eq(emp_id));
    }
    if let Some(main_id) = main_training_id {
        query = query.filter(sub_trainings::main_training_id.eq(main_id));
    }

    let rows = query.load::<(Assignment, SubTraining, MainTraining, String)>(conn)?;
    Ok(rows
        .into_iter()
        .map(|(assignment, sub_training, main_training, employee_name)| AssignmentRecord {
            assignment,
            sub_training,
            main_training,
            employee_name,
        })
        .collect())
}

/// Records whose expiration date falls on or before `until`, soonest first.
pub fn load_expiring_records(
    conn: &mut SqliteConnection,
    until: NaiveDate,
) -> Result<Vec<AssignmentRecord>, diesel::result::Error> {
    let rows = employee_sub_trainings::table
        .inner_join(sub_trainings::table.inner_join(main_trainings::table))
        .inner_join(employees::table)
        .filter(employee_sub_trainings::expiration_date.le(until))
        .order((employee_sub_trainings::expiration_date.asc(), employee_sub_trainings::id.asc()))
        .select((
            Assignment::as_select(),
            SubTraining::as_select(),
            MainTraining::as_select(),
            employees::fullname,
        ))
        .load::<(Assignment, SubTraining, MainTraining, String)>(conn)?;
    Ok(rows
        .into_iter()
        .map(|(assignment, sub_training, main_training, employee_name)| AssignmentRecord {
            assignment,
            sub_training,
            main_training,
            employee_name,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SubTrainingInput, SubTrainingUpdate};
    use crate::orm::employee::insert_employee;
    use crate::orm::testing::{sample_employee_input, setup_test_db};
    use crate::orm::training::{insert_main_training, insert_sub_training, update_sub_training};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Employee plus a "6 months" and a permanent sub-training.
    fn fixture(conn: &mut SqliteConnection) -> (i32, i32, i32) {
        let input = sample_employee_input(conn, "0520000000", "GP-900");
        let employee = insert_employee(conn, input).unwrap();
        let main = insert_main_training(conn, "Fire Safety".to_string()).unwrap();
        let six_months = insert_sub_training(
            conn,
            SubTrainingInput {
                main_training_id: main.id,
                name: "Extinguishers".to_string(),
                validity_period: "6 months".to_string(),
            },
        )
        .unwrap();
        let permanent = insert_sub_training(
            conn,
            SubTrainingInput {
                main_training_id: main.id,
                name: "Induction".to_string(),
                validity_period: "Permanent".to_string(),
            },
        )
        .unwrap();
        (employee.id, six_months.id, permanent.id)
    }

    #[test]
    fn test_insert_derives_expiration() {
        let mut conn = setup_test_db();
        let (emp, six_months, permanent) = fixture(&mut conn);
        let today = date(2024, 6, 10);

        let a = insert_assignment(
            &mut conn,
            AssignmentInput {
                employee_id: Some(emp),
                sub_training_id: Some(six_months),
                start_date: Some("01-01-2024".to_string()),
            },
            today,
        )
        .unwrap();
        assert_eq!(a.expiration_date, Some(date(2024, 7, 1)));
        assert!(a.warning);
        assert_eq!(a.verification, Verification::Unreviewed);

        let p = insert_assignment(
            &mut conn,
            AssignmentInput {
                employee_id: Some(emp),
                sub_training_id: Some(permanent),
                start_date: Some("01-01-2024".to_string()),
            },
            today,
        )
        .unwrap();
        assert_eq!(p.expiration_date, None);
        assert!(!p.warning);

        let undated = insert_assignment(
            &mut conn,
            AssignmentInput { employee_id: Some(emp), sub_training_id: Some(six_months), start_date: None },
            today,
        )
        .unwrap();
        assert_eq!(undated.start_date, None);
        assert_eq!(undated.expiration_date, None);
    }

    #[test]
    fn test_insert_validation_failures() {
        let mut conn = setup_test_db();
        let (emp, six_months, _) = fixture(&mut conn);
        let today = date(2024, 6, 10);

        let missing_employee = AssignmentInput { sub_training_id: Some(six_months), ..Default::default() };
        assert!(matches!(
            insert_assignment(&mut conn, missing_employee, today),
            Err(TrainingError::Validation(_))
        ));

        let missing_sub = AssignmentInput { employee_id: Some(emp), ..Default::default() };
        assert!(matches!(
            insert_assignment(&mut conn, missing_sub, today),
            Err(TrainingError::Validation(_))
        ));

        let unknown_sub = AssignmentInput { employee_id: Some(emp), sub_training_id: Some(9999), start_date: None };
        assert!(matches!(
            insert_assignment(&mut conn, unknown_sub, today),
            Err(TrainingError::Validation(_))
        ));

        let bad_date = AssignmentInput {
            employee_id: Some(emp),
            sub_training_id: Some(six_months),
            start_date: Some("2024-01-01".to_string()),
        };
        assert!(matches!(
            insert_assignment(&mut conn, bad_date, today),
            Err(TrainingError::InvalidFormat { .. })
        ));

        assert!(get_all_assignments(&mut conn).unwrap().is_empty());
    }

    #[test]
    fn test_update_repoints_and_recomputes() {
        let mut conn = setup_test_db();
        let (emp, six_months, permanent) = fixture(&mut conn);
        let today = date(2024, 3, 1);

        let a = insert_assignment(
            &mut conn,
            AssignmentInput {
                employee_id: Some(emp),
                sub_training_id: Some(six_months),
                start_date: Some("01-01-2024".to_string()),
            },
            today,
        )
        .unwrap();
        assert!(!a.warning);

        let moved = update_assignment(
            &mut conn,
            a.id,
            AssignmentUpdate { start_date: Some("15-02-2024".to_string()), ..Default::default() },
            today,
        )
        .unwrap();
        assert_eq!(moved.start_date, Some(date(2024, 2, 15)));
        assert_eq!(moved.expiration_date, Some(date(2024, 8, 15)));

        let repointed = update_assignment(
            &mut conn,
            a.id,
            AssignmentUpdate { sub_training_id: Some(permanent), ..Default::default() },
            today,
        )
        .unwrap();
        assert_eq!(repointed.sub_training_id, permanent);
        assert_eq!(repointed.start_date, Some(date(2024, 2, 15)));
        assert_eq!(repointed.expiration_date, None);

        let cleared = update_assignment(
            &mut conn,
            a.id,
            AssignmentUpdate { sub_training_id: Some(six_months), start_date: Some(String::new()) },
            today,
        )
        .unwrap();
        assert_eq!(cleared.start_date, None);
        assert_eq!(cleared.expiration_date, None);
    }

    #[test]
    fn test_sub_training_validity_change_recomputes_assignments() {
        let mut conn = setup_test_db();
        let (emp, six_months, _) = fixture(&mut conn);
        let today = date(2024, 6, 10);

        let a = insert_assignment(
            &mut conn,
            AssignmentInput {
                employee_id: Some(emp),
                sub_training_id: Some(six_months),
                start_date: Some("01-01-2024".to_string()),
            },
            today,
        )
        .unwrap();
        assert!(a.warning);

        update_sub_training(
            &mut conn,
            six_months,
            SubTrainingUpdate { validity_period: Some("1 year".to_string()), ..Default::default() },
            today,
        )
        .unwrap();

        let refreshed = get_assignment_by_id(&mut conn, a.id).unwrap().unwrap();
        assert_eq!(refreshed.expiration_date, Some(date(2024, 12, 31)));
        assert!(!refreshed.warning);
    }

    #[test]
    fn test_recompute_all_moves_warning_with_today() {
        let mut conn = setup_test_db();
        let (emp, six_months, _) = fixture(&mut conn);

        let a = insert_assignment(
            &mut conn,
            AssignmentInput {
                employee_id: Some(emp),
                sub_training_id: Some(six_months),
                start_date: Some("01-01-2024".to_string()),
            },
            date(2024, 2, 1),
        )
        .unwrap();
        assert!(!a.warning);

        assert_eq!(recompute_all(&mut conn, date(2024, 6, 15)).unwrap(), 1);
        assert!(get_assignment_by_id(&mut conn, a.id).unwrap().unwrap().warning);
        assert_eq!(recompute_all(&mut conn, date(2024, 6, 15)).unwrap(), 0);
    }

    #[test]
    fn test_verification_and_pair_delete() {
        let mut conn = setup_test_db();
        let (emp, six_months, permanent) = fixture(&mut conn);
        let today = date(2024, 6, 10);
        let a = insert_assignment(
            &mut conn,
            AssignmentInput { employee_id: Some(emp), sub_training_id: Some(six_months), start_date: None },
            today,
        )
        .unwrap();
        insert_assignment(
            &mut conn,
            AssignmentInput { employee_id: Some(emp), sub_training_id: Some(permanent), start_date: None },
            today,
        )
        .unwrap();

        let verified = set_verification(
            &mut conn,
            a.id,
            VerificationInput {
                verification_document: Some("docs/cert-1.pdf".to_string()),
                verification: Verification::Verified,
            },
        )
        .unwrap()
        .expect("assignment exists");
        assert_eq!(verified.verification, Verification::Verified);
        assert_eq!(verified.verification_document.as_deref(), Some("docs/cert-1.pdf"));

        assert_eq!(delete_assignment_by_pair(&mut conn, emp, six_months).unwrap(), 1);
        assert_eq!(delete_assignment_by_pair(&mut conn, emp, six_months).unwrap(), 0);
        assert_eq!(get_all_assignments(&mut conn).unwrap().len(), 1);
    }

    #[test]
    fn test_load_records_filters() {
        let mut conn = setup_test_db();
        let (emp, six_months, permanent) = fixture(&mut conn);
        let today = date(2024, 6, 10);
        let other_main = insert_main_training(&mut conn, "First Aid".to_string()).unwrap();
        let cpr = insert_sub_training(
            &mut conn,
            SubTrainingInput {
                main_training_id: other_main.id,
                name: "CPR".to_string(),
                validity_period: "2 years".to_string(),
            },
        )
        .unwrap();

        for sub in [six_months, permanent, cpr.id] {
            insert_assignment(
                &mut conn,
                AssignmentInput {
                    employee_id: Some(emp),
                    sub_training_id: Some(sub),
                    start_date: Some("01-01-2024".to_string()),
                },
                today,
            )
            .unwrap();
        }

        let all = load_records(&mut conn, Some(emp), None).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].employee_name, "Ahmed Saleh");
        assert_eq!(all[0].main_training.name, "Fire Safety");

        let first_aid = load_records(&mut conn, Some(emp), Some(other_main.id)).unwrap();
        assert_eq!(first_aid.len(), 1);
        assert_eq!(first_aid[0].sub_training.name, "CPR");

        assert!(load_records(&mut conn, Some(9999), None).unwrap().is_empty());

        let expiring = load_expiring_records(&mut conn, date(2024, 7, 10)).unwrap();
        assert_eq!(expiring.len(), 1);
        assert_eq!(expiring[0].sub_training.id, six_months);
    }

    #[test]
    fn test_progress_warning_uses_read_date() {
        let mut conn = setup_test_db();
        let (emp, six_months, _) = fixture(&mut conn);

        let stored = insert_assignment(
            &mut conn,
            AssignmentInput {
                employee_id: Some(emp),
                sub_training_id: Some(six_months),
                start_date: Some("01-01-2024".to_string()),
            },
            date(2024, 2, 1),
        )
        .unwrap();
        assert!(!stored.warning);

        let records = load_records(&mut conn, Some(emp), None).unwrap();
        let rows = crate::report::progress_rows(&records, date(2024, 7, 2)).unwrap();
        assert_eq!(rows[0].expiration_date, Some(date(2024, 7, 1)));
        assert_eq!(rows[0].completion_percentage, 0.0);
        assert!(rows[0].warning);
    }

    #[test]
    fn test_insert_rolls_back_with_caller() {
        let mut conn = setup_test_db();
        let (emp, six_months, _) = fixture(&mut conn);

        let result = conn.transaction::<(), TrainingError, _>(|conn| {
            insert_assignment(
                conn,
                AssignmentInput {
                    employee_id: Some(emp),
                    sub_training_id: Some(six_months),
                    start_date: Some("01-01-2024".to_string()),
                },
                date(2024, 2, 1),
            )?;
            Err(TrainingError::validation("abort"))
        });
        assert!(result.is_err());
        assert!(get_all_assignments(&mut conn).unwrap().is_empty());
    }

    #[test]
    fn test_failed_update_keeps_row() {
        let mut conn = setup_test_db();
        let (emp, six_months, _) = fixture(&mut conn);
        let today = date(2024, 2, 1);

        let a = insert_assignment(
            &mut conn,
            AssignmentInput {
                employee_id: Some(emp),
                sub_training_id: Some(six_months),
                start_date: Some("01-01-2024".to_string()),
            },
            today,
        )
        .unwrap();

        let err = update_assignment(
            &mut conn,
            a.id,
            AssignmentUpdate { sub_training_id: Some(9999), start_date: Some("01-03-2024".to_string()) },
            today,
        )
        .unwrap_err();
        assert!(matches!(err, TrainingError::Validation(_)));

        let unchanged = get_assignment_by_id(&mut conn, a.id).unwrap().unwrap();
        assert_eq!(unchanged.sub_training_id, six_months);
        assert_eq!(unchanged.start_date, Some(date(2024, 1, 1)));
    }
}

