use clap::Subcommand;
use diesel::sqlite::SqliteConnection;
use training_api::orm::project::{get_all_projects, insert_project};

use super::utils::NameMatcher;

#[derive(Subcommand)]
pub enum ProjectAction {
    #[command(about = "List projects, optionally filtered by search term")]
    Ls {
        #[arg(help = "Search term (regex by default, use -F for fixed string)")]
        search_term: Option<String>,
        #[arg(
            short = 'F',
            long = "fixed-string",
            help = "Treat search term as fixed string instead of regex"
        )]
        fixed_string: bool,
    },
    #[command(about = "Add a new project")]
    Add {
        #[arg(short, long, help = "Project name")]
        name: String,
    },
}

pub fn handle_project_command_with_conn(
    conn: &mut SqliteConnection,
    action: ProjectAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ProjectAction::Ls { search_term, fixed_string } => {
            project_ls_impl(conn, search_term, fixed_string)?;
        }
        ProjectAction::Add { name } => {
            project_add_impl(conn, name)?;
        }
    }
    Ok(())
}

pub fn project_ls_impl(
    conn: &mut SqliteConnection,
    search_term: Option<String>,
    fixed_string: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let matcher = NameMatcher::new(search_term, fixed_string)?;
    let projects = get_all_projects(conn)?
        .into_iter()
        .filter(|project| matcher.is_match(&project.name))
        .collect::<Vec<_>>();

    if projects.is_empty() {
        println!("No projects found.");
    } else {
        println!("Projects:");
        for project in projects {
            println!("  ID: {}, Name: {}", project.id, project.name);
        }
    }

    Ok(())
}

pub fn project_add_impl(
    conn: &mut SqliteConnection,
    name: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err("Project name must not be empty".into());
    }

    let project = insert_project(conn, name)?;
    println!("Project created successfully!");
    println!("ID: {}", project.id);
    println!("Name: {}", project.name);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use training_api::orm::testing::setup_test_db;

    #[test]
    fn test_add_project() {
        let mut conn = setup_test_db();

        project_add_impl(&mut conn, "  Rig 12 ".to_string()).unwrap();
        let projects = get_all_projects(&mut conn).unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "Rig 12");

        assert!(project_add_impl(&mut conn, String::new()).is_err());
        assert!(project_ls_impl(&mut conn, Some("Rig".to_string()), true).is_ok());
    }
}
