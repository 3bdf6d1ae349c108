use chrono::{Duration, NaiveDate};
use clap::Subcommand;
use diesel::sqlite::SqliteConnection;
use training_api::date_format::format_date;
use training_api::orm::assignment::{load_expiring_records, recompute_all};
use training_api::report::AssignmentRecord;
use training_api::validity::today;

#[derive(Subcommand)]
pub enum TrainingAction {
    #[command(about = "List assignments that expire soon or have already expired")]
    Expiring {
        #[arg(short, long, default_value_t = 30, help = "Look-ahead window in days")]
        days: i64,
    },
    #[command(about = "Recompute expiration dates and warnings of all assignments")]
    Recompute,
}

pub fn handle_training_command_with_conn(
    conn: &mut SqliteConnection,
    action: TrainingAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TrainingAction::Expiring { days } => {
            training_expiring_impl(conn, today(), days)?;
        }
        TrainingAction::Recompute => {
            training_recompute_impl(conn, today())?;
        }
    }
    Ok(())
}

pub fn training_expiring_impl(
    conn: &mut SqliteConnection,
    today: NaiveDate,
    days: i64,
) -> Result<Vec<AssignmentRecord>, Box<dyn std::error::Error>> {
    if days < 0 {
        return Err("--days must not be negative".into());
    }

    let until = Duration::try_days(days)
        .and_then(|window| today.checked_add_signed(window))
        .ok_or_else(|| format!("--days {} is out of range", days))?;
    let records = load_expiring_records(conn, until)?;

    if records.is_empty() {
        println!("No assignments expire within {} days.", days);
        return Ok(records);
    }

    println!("Assignments expiring within {} days:", days);
    for record in &records {
        let Some(expiration) = record.assignment.expiration_date else {
            continue;
        };
        let state = if expiration <= today { "EXPIRED" } else { "expiring" };
        println!(
            "  {} | {} / {} | {} ({})",
            record.employee_name,
            record.main_training.name,
            record.sub_training.name,
            format_date(expiration),
            state
        );
    }

    Ok(records)
}

pub fn training_recompute_impl(
    conn: &mut SqliteConnection,
    today: NaiveDate,
) -> Result<usize, Box<dyn std::error::Error>> {
    let changed = recompute_all(conn, today)?;
    println!("Recomputed assignments as of {}: {} changed.", format_date(today), changed);
    Ok(changed)
}
