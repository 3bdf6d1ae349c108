use clap::Subcommand;
use diesel::sqlite::SqliteConnection;
use training_api::orm::company::{
    delete_company, get_all_companies, get_company_by_id, get_company_by_name_case_insensitive,
    insert_company,
};
use training_api::orm::employee::get_employees_by_company;

use super::utils::{NameMatcher, confirm};

#[derive(Subcommand)]
pub enum CompanyAction {
    #[command(about = "List companies, optionally filtered by search term")]
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
    #[command(about = "Add a new company")]
    Add {
        #[arg(short, long, help = "Company name")]
        name: String,
    },
    #[command(about = "Remove a company with its employees and their assignments")]
    Rm {
        #[arg(help = "Company ID")]
        id: i32,
        #[arg(short = 'y', long = "yes", help = "Skip confirmation prompt")]
        yes: bool,
    },
}

pub fn handle_company_command_with_conn(
    conn: &mut SqliteConnection,
    action: CompanyAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CompanyAction::Ls { search_term, fixed_string } => {
            company_ls_impl(conn, search_term, fixed_string)?;
        }
        CompanyAction::Add { name } => {
            company_add_impl(conn, name)?;
        }
        CompanyAction::Rm { id, yes } => {
            company_rm_impl(conn, id, yes)?;
        }
    }
    Ok(())
}

pub fn company_ls_impl(
    conn: &mut SqliteConnection,
    search_term: Option<String>,
    fixed_string: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let matcher = NameMatcher::new(search_term, fixed_string)?;
    let companies = get_all_companies(conn)?
        .into_iter()
        .filter(|company| matcher.is_match(&company.name))
        .collect::<Vec<_>>();

    if companies.is_empty() {
        println!("No companies found.");
    } else {
        println!("Companies:");
        for company in companies {
            let employees = get_employees_by_company(conn, company.id)?;
            println!(
                "  ID: {}, Name: {}, Employees: {}",
                company.id,
                company.name,
                employees.len()
            );
        }
    }

    Ok(())
}

pub fn company_add_impl(
    conn: &mut SqliteConnection,
    name: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err("Company name must not be empty".into());
    }

    if let Some(existing) = get_company_by_name_case_insensitive(conn, &name)? {
        println!("Company already exists!");
        println!("ID: {}", existing.id);
        println!("Name: {}", existing.name);
        return Ok(());
    }

    let company = insert_company(conn, name)?;
    println!("Company created successfully!");
    println!("ID: {}", company.id);
    println!("Name: {}", company.name);

    Ok(())
}

pub fn company_rm_impl(
    conn: &mut SqliteConnection,
    company_id: i32,
    yes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(company) = get_company_by_id(conn, company_id)? else {
        return Err(format!("Company with ID {} not found", company_id).into());
    };
    let employees = get_employees_by_company(conn, company.id)?;

    println!(
        "  ID: {}, Name: {}, Employees: {}",
        company.id,
        company.name,
        employees.len()
    );

    if !yes
        && !confirm("Are you sure you want to delete this company and all associated employees?")?
    {
        println!("Operation cancelled.");
        return Ok(());
    }

    if delete_company(conn, company.id)? {
        println!("Deleted company: {} (ID: {})", company.name, company.id);
    }

    Ok(())
}
