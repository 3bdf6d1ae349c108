use clap::Subcommand;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use training_api::admission::{AdmissionAction, AdmissionOutcome, apply_admission};
use training_api::error::TrainingError;
use training_api::events::NotificationWriter;
use training_api::models::EmployeeFilter;
use training_api::orm::employee::{get_employee_detail, list_employee_details};

use super::utils::confirm;

#[derive(Subcommand)]
pub enum EmployeeAction {
    #[command(about = "List employees")]
    Ls {
        #[arg(long, help = "Only show employees awaiting admission")]
        pending: bool,
    },
    #[command(about = "Accept a pending employee")]
    Accept {
        #[arg(help = "Employee ID")]
        id: i32,
    },
    #[command(about = "Reject a pending employee, deleting the registration")]
    Reject {
        #[arg(help = "Employee ID")]
        id: i32,
        #[arg(short = 'y', long = "yes", help = "Skip confirmation prompt")]
        yes: bool,
    },
}

pub fn handle_employee_command_with_conn(
    conn: &mut SqliteConnection,
    action: EmployeeAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        EmployeeAction::Ls { pending } => {
            employee_ls_impl(conn, pending)?;
        }
        EmployeeAction::Accept { id } => {
            employee_admission_impl(conn, id, AdmissionAction::Accept)?;
        }
        EmployeeAction::Reject { id, yes } => {
            employee_reject_impl(conn, id, yes)?;
        }
    }
    Ok(())
}

pub fn employee_ls_impl(
    conn: &mut SqliteConnection,
    pending: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EmployeeFilter {
        accepted: pending.then_some(false),
        ..EmployeeFilter::default()
    };
    let employees = list_employee_details(conn, &filter)?;

    if employees.is_empty() {
        println!("No employees found.");
        return Ok(());
    }

    println!("Employees:");
    for employee in employees {
        println!(
            "  ID: {}, Name: {}, Gate pass: {}, Company: {}, Project: {}, Accepted: {}, On duty: {}",
            employee.id,
            employee.fullname,
            employee.gate_pass_no,
            employee.company.name,
            employee.project.name,
            employee.is_accepted,
            employee.on_duty
        );
    }

    Ok(())
}

/// Runs an admission action and its notifications in one transaction.
pub fn employee_admission_impl(
    conn: &mut SqliteConnection,
    employee_id: i32,
    action: AdmissionAction,
) -> Result<AdmissionOutcome, Box<dyn std::error::Error>> {
    let outcome = conn.transaction::<_, TrainingError, _>(|conn| {
        let transition = apply_admission(conn, employee_id, action)?;
        NotificationWriter::new(conn).publish_all(&transition.events)?;
        Ok(transition.value)
    })?;

    match &outcome {
        AdmissionOutcome::Accepted { employee } => {
            println!("Accepted employee: {} (ID: {})", employee.fullname, employee.id);
        }
        AdmissionOutcome::Rejected { employee_id } => {
            println!("Rejected employee ID {}", employee_id);
        }
    }

    Ok(outcome)
}

pub fn employee_reject_impl(
    conn: &mut SqliteConnection,
    employee_id: i32,
    yes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(employee) = get_employee_detail(conn, employee_id)? else {
        return Err(format!("Employee with ID {} not found", employee_id).into());
    };

    println!(
        "  ID: {}, Name: {}, Company: {}",
        employee.id, employee.fullname, employee.company.name
    );

    if !yes && !confirm("Reject and delete this registration?")? {
        println!("Operation cancelled.");
        return Ok(());
    }

    employee_admission_impl(conn, employee_id, AdmissionAction::Reject)?;
    Ok(())
}
