use diesel::prelude::*;

use crate::error::TrainingError;
use crate::models::{
    Company, Employee, EmployeeDetail, EmployeeFilter, EmployeeInput, EmployeeUpdate,
    NewEmployee, Project,
};
use crate::orm::company::get_company_by_id;
use crate::orm::db::{contains_pattern, last_insert_rowid};
use crate::orm::project::get_project_by_id;
use crate::schema::{companies, employee_sub_trainings, employees, projects};

fn ensure_company_and_project(
    conn: &mut SqliteConnection,
    company_id: i32,
    project_id: i32,
) -> Result<(), TrainingError> {
    if get_company_by_id(conn, company_id)?.is_none() {
        return Err(TrainingError::validation(format!(
            "Company with ID {} does not exist",
            company_id
        )));
    }
    if get_project_by_id(conn, project_id)?.is_none() {
        return Err(TrainingError::validation(format!(
            "Project with ID {} does not exist",
            project_id
        )));
    }
    Ok(())
}

/// Registers a new employee. New employees are pending admission and off duty.
///
/// Duplicate mobile or gate pass numbers come back as
/// [`TrainingError::Conflict`] carrying the constraint message.
pub fn insert_employee(
    conn: &mut SqliteConnection,
    input: EmployeeInput,
) -> Result<Employee, TrainingError> {
    ensure_company_and_project(conn, input.company_id, input.project_id)?;

    let new_employee = NewEmployee {
        fullname: input.fullname,
        mobile_number: input.mobile_number,
        designation: input.designation,
        gate_pass_no: input.gate_pass_no,
        category: input.category,
        company_id: input.company_id,
        project_id: input.project_id,
        profile_photo: input.profile_photo,
        is_accepted: false,
        on_duty: false,
    };

    diesel::insert_into(employees::table).values(&new_employee).execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    let employee = employees::table
        .filter(employees::id.eq(last_id))
        .select(Employee::as_select())
        .first(conn)?;
    Ok(employee)
}

pub fn get_employee_by_id(
    conn: &mut SqliteConnection,
    employee_id: i32,
) -> Result<Option<Employee>, diesel::result::Error> {
    employees::table
        .filter(employees::id.eq(employee_id))
        .select(Employee::as_select())
        .first(conn)
        .optional()
}

/// Gets an employee with its company and project.
pub fn get_employee_detail(
    conn: &mut SqliteConnection,
    employee_id: i32,
) -> Result<Option<EmployeeDetail>, diesel::result::Error> {
    let row = employees::table
        .inner_join(companies::table)
        .inner_join(projects::table)
        .filter(employees::id.eq(employee_id))
        .select((Employee::as_select(), Company::as_select(), Project::as_select()))
        .first::<(Employee, Company, Project)>(conn)
        .optional()?;
    Ok(row.map(|(e, c, p)| EmployeeDetail::new(e, c, p)))
}

/// Lists employees matching every filter that is set, ordered by id.
pub fn list_employee_details(
    conn: &mut SqliteConnection,
    filter: &EmployeeFilter,
) -> Result<Vec<EmployeeDetail>, diesel::result::Error> {
    let mut query = employees::table
        .inner_join(companies::table)
        .inner_join(projects::table)
        .select((Employee::as_select(), Company::as_select(), Project::as_select()))
        .order(employees::id.asc())
        .into_boxed();

    if let Some(accepted) = filter.accepted {
        query = query.filter(employees::is_accepted.eq(accepted));
    }
    if let Some(on_duty) = filter.on_duty {
        query = query.filter(employees::on_duty.eq(on_duty));
    }
    if let Some(term) = &filter.fullname {
        query = query.filter(employees::fullname.like(contains_pattern(term)).escape('\\'));
    }
    if let Some(term) = &filter.mobile_number {
        query = query.filter(employees::mobile_number.like(contains_pattern(term)).escape('\\'));
    }
    if let Some(term) = &filter.gate_pass_no {
        query = query.filter(employees::gate_pass_no.like(contains_pattern(term)).escape('\\'));
    }
    if let Some(term) = &filter.designation {
        query = query.filter(employees::designation.like(contains_pattern(term)).escape('\\'));
    }
    if let Some(term) = &filter.company_name {
        query = query.filter(companies::name.like(contains_pattern(term)).escape('\\'));
    }
    if let Some(term) = &filter.project_name {
        query = query.filter(projects::name.like(contains_pattern(term)).escape('\\'));
    }

    let rows = query.load::<(Employee, Company, Project)>(conn)?;
    Ok(rows.into_iter().map(|(e, c, p)| EmployeeDetail::new(e, c, p)).collect())
}

pub fn get_employees_by_company(
    conn: &mut SqliteConnection,
    comp_id: i32,
) -> Result<Vec<Employee>, diesel::result::Error> {
    employees::table
        .filter(employees::company_id.eq(comp_id))
        .order(employees::id.asc())
        .select(Employee::as_select())
        .load(conn)
}

/// Applies a partial update, keeping current values for absent fields.
pub fn update_employee(
    conn: &mut SqliteConnection,
    employee_id: i32,
    update: EmployeeUpdate,
) -> Result<Employee, TrainingError> {
    let current = get_employee_by_id(conn, employee_id)?
        .ok_or_else(|| TrainingError::not_found(format!("Employee with ID {} not found", employee_id)))?;

    let new_company_id = update.company_id.unwrap_or(current.company_id);
    let new_project_id = update.project_id.unwrap_or(current.project_id);
    ensure_company_and_project(conn, new_company_id, new_project_id)?;

    diesel::update(employees::table.filter(employees::id.eq(employee_id)))
        .set((
            employees::fullname.eq(update.fullname.unwrap_or(current.fullname)),
            employees::mobile_number.eq(update.mobile_number.unwrap_or(current.mobile_number)),
            employees::designation.eq(update.designation.unwrap_or(current.designation)),
            employees::gate_pass_no.eq(update.gate_pass_no.unwrap_or(current.gate_pass_no)),
            employees::category.eq(update.category.unwrap_or(current.category)),
            employees::company_id.eq(new_company_id),
            employees::project_id.eq(new_project_id),
        ))
        .execute(conn)?;

    let employee = employees::table
        .filter(employees::id.eq(employee_id))
        .select(Employee::as_select())
        .first(conn)?;
    Ok(employee)
}

pub fn set_profile_photo(
    conn: &mut SqliteConnection,
    employee_id: i32,
    photo: Option<String>,
) -> Result<Option<Employee>, diesel::result::Error> {
    let rows = diesel::update(employees::table.filter(employees::id.eq(employee_id)))
        .set(employees::profile_photo.eq(photo))
        .execute(conn)?;
    if rows == 0 {
        return Ok(None);
    }
    get_employee_by_id(conn, employee_id)
}

pub fn set_on_duty(
    conn: &mut SqliteConnection,
    employee_id: i32,
    on_duty: bool,
) -> Result<Option<Employee>, diesel::result::Error> {
    let rows = diesel::update(employees::table.filter(employees::id.eq(employee_id)))
        .set(employees::on_duty.eq(on_duty))
        .execute(conn)?;
    if rows == 0 {
        return Ok(None);
    }
    get_employee_by_id(conn, employee_id)
}

pub fn set_accepted(
    conn: &mut SqliteConnection,
    employee_id: i32,
) -> Result<Option<Employee>, diesel::result::Error> {
    let rows = diesel::update(employees::table.filter(employees::id.eq(employee_id)))
        .set(employees::is_accepted.eq(true))
        .execute(conn)?;
    if rows == 0 {
        return Ok(None);
    }
    get_employee_by_id(conn, employee_id)
}

/// Deletes the given employees and every assignment that references them.
/// Callers wrap this in their own transaction.
pub(crate) fn delete_employees_with_assignments(
    conn: &mut SqliteConnection,
    employee_ids: &[i32],
) -> Result<usize, diesel::result::Error> {
    if employee_ids.is_empty() {
        return Ok(0);
    }
    diesel::delete(
        employee_sub_trainings::table
            .filter(employee_sub_trainings::employee_id.eq_any(employee_ids)),
    )
    .execute(conn)?;
    diesel::delete(employees::table.filter(employees::id.eq_any(employee_ids))).execute(conn)
}

/// Deletes an employee and their assignments.
/// Returns Ok(true) if the employee existed.
pub fn delete_employee(
    conn: &mut SqliteConnection,
    employee_id: i32,
) -> Result<bool, diesel::result::Error> {
    conn.transaction(|conn| {
        let rows = delete_employees_with_assignments(conn, &[employee_id])?;
        Ok(rows > 0)
    })
}
