use diesel::prelude::*;

use crate::models::{NewProject, Project};
use crate::orm::db::last_insert_rowid;
use crate::orm::employee::delete_employees_with_assignments;

pub fn insert_project(
    conn: &mut SqliteConnection,
    project_name: String,
) -> Result<Project, diesel::result::Error> {
    use crate::schema::projects::dsl::*;

    diesel::insert_into(projects)
        .values(&NewProject { name: project_name })
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    projects.filter(id.eq(last_id)).first::<Project>(conn)
}

pub fn get_project_by_id(
    conn: &mut SqliteConnection,
    project_id: i32,
) -> Result<Option<Project>, diesel::result::Error> {
    use crate::schema::projects::dsl::*;
    projects.filter(id.eq(project_id)).first::<Project>(conn).optional()
}

/// Returns all projects in ascending order by id.
pub fn get_all_projects(
    conn: &mut SqliteConnection,
) -> Result<Vec<Project>, diesel::result::Error> {
    use crate::schema::projects::dsl::*;
    projects.order(id.asc()).load::<Project>(conn)
}

pub fn update_project(
    conn: &mut SqliteConnection,
    project_id: i32,
    new_name: String,
) -> Result<Option<Project>, diesel::result::Error> {
    use crate::schema::projects::dsl::*;
    let rows = diesel::update(projects.filter(id.eq(project_id)))
        .set(name.eq(new_name))
        .execute(conn)?;
    if rows == 0 {
        return Ok(None);
    }
    get_project_by_id(conn, project_id)
}

/// Delete a project together with the employees staffed on it.
pub fn delete_project(
    conn: &mut SqliteConnection,
    project_id: i32,
) -> Result<bool, diesel::result::Error> {
    conn.transaction(|conn| {
        let employee_ids = {
            use crate::schema::employees::dsl as e;
            e::employees
                .filter(e::project_id.eq(project_id))
                .select(e::id)
                .load::<i32>(conn)?
        };
        delete_employees_with_assignments(conn, &employee_ids)?;

        use crate::schema::projects::dsl::*;
        let rows = diesel::delete(projects.filter(id.eq(project_id))).execute(conn)?;
        Ok(rows > 0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::setup_test_db;

    #[test]
    fn test_project_crud() {
        let mut conn = setup_test_db();
        let created = insert_project(&mut conn, "North Field".to_string()).unwrap();
        assert_eq!(created.name, "North Field");

        let renamed = update_project(&mut conn, created.id, "South Field".to_string())
            .unwrap()
            .expect("project exists");
        assert_eq!(renamed.name, "South Field");

        let all = get_all_projects(&mut conn).unwrap();
        assert_eq!(all.len(), 1);

        assert!(delete_project(&mut conn, created.id).unwrap());
        assert!(get_project_by_id(&mut conn, created.id).unwrap().is_none());
    }
}
