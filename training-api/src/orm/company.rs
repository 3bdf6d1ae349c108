use diesel::prelude::*;

use crate::models::{Company, NewCompany};
use crate::orm::db::last_insert_rowid;
use crate::orm::employee::delete_employees_with_assignments;

/// Insert a new company and return it.
pub fn insert_company(
    conn: &mut SqliteConnection,
    comp_name: String,
) -> Result<Company, diesel::result::Error> {
    use crate::schema::companies::dsl::*;

    let new_comp = NewCompany { name: comp_name };

    diesel::insert_into(companies).values(&new_comp).execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    companies.filter(id.eq(last_id)).first::<Company>(conn)
}

/// Try to find a company by id.
/// Returns Ok(Some(Company)) if found, Ok(None) if not, Err on DB error.
pub fn get_company_by_id(
    conn: &mut SqliteConnection,
    company_id: i32,
) -> Result<Option<Company>, diesel::result::Error> {
    use crate::schema::companies::dsl::*;
    companies.filter(id.eq(company_id)).first::<Company>(conn).optional()
}

/// Try to find a company by name (case-insensitive).
pub fn get_company_by_name_case_insensitive(
    conn: &mut SqliteConnection,
    company_name: &str,
) -> Result<Option<Company>, diesel::result::Error> {
    diesel::sql_query("SELECT id, name FROM companies WHERE LOWER(name) = LOWER(?)")
        .bind::<diesel::sql_types::Text, _>(company_name)
        .get_result::<Company>(conn)
        .optional()
}

/// Returns all companies in ascending order by id.
pub fn get_all_companies(
    conn: &mut SqliteConnection,
) -> Result<Vec<Company>, diesel::result::Error> {
    use crate::schema::companies::dsl::*;
    companies.order(id.asc()).load::<Company>(conn)
}

/// Rename a company. Returns Ok(None) if it does not exist.
pub fn update_company(
    conn: &mut SqliteConnection,
    company_id: i32,
    new_name: String,
) -> Result<Option<Company>, diesel::result::Error> {
    use crate::schema::companies::dsl::*;
    let rows = diesel::update(companies.filter(id.eq(company_id)))
        .set(name.eq(new_name))
        .execute(conn)?;
    if rows == 0 {
        return Ok(None);
    }
    get_company_by_id(conn, company_id)
}

/// Delete a company together with its employees and their assignments.
/// Returns Ok(true) if the company was found and deleted, Ok(false) if not found.
pub fn delete_company(
    conn: &mut SqliteConnection,
    company_id: i32,
) -> Result<bool, diesel::result::Error> {
    conn.transaction(|conn| {
        let employee_ids = {
            use crate::schema::employees::dsl as e;
            e::employees
                .filter(e::company_id.eq(company_id))
                .select(e::id)
                .load::<i32>(conn)?
        };
        delete_employees_with_assignments(conn, &employee_ids)?;

        use crate::schema::companies::dsl::*;
        let rows = diesel::delete(companies.filter(id.eq(company_id))).execute(conn)?;
        Ok(rows > 0)
    })
}
