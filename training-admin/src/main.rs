mod admin_cli;

use clap::{Parser, Subcommand};

use admin_cli::company_commands::{CompanyAction, handle_company_command_with_conn};
use admin_cli::employee_commands::{EmployeeAction, handle_employee_command_with_conn};
use admin_cli::project_commands::{ProjectAction, handle_project_command_with_conn};
use admin_cli::training_commands::{TrainingAction, handle_training_command_with_conn};
use admin_cli::utils::establish_connection;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Parser)]
#[command(name = "training-admin")]
#[command(about = "Operator tool for the employee training database")]
#[command(version)]
struct Cli {
    /// Print detailed version information
    #[arg(long)]
    version_info: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Company management")]
    Company {
        #[command(subcommand)]
        action: CompanyAction,
    },
    #[command(about = "Project management")]
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },
    #[command(about = "Employee admission")]
    Employee {
        #[command(subcommand)]
        action: EmployeeAction,
    },
    #[command(about = "Training validity maintenance")]
    Training {
        #[command(subcommand)]
        action: TrainingAction,
    },
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = establish_connection()?;
    match command {
        Commands::Company { action } => handle_company_command_with_conn(&mut conn, action),
        Commands::Project { action } => handle_project_command_with_conn(&mut conn, action),
        Commands::Employee { action } => handle_employee_command_with_conn(&mut conn, action),
        Commands::Training { action } => handle_training_command_with_conn(&mut conn, action),
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.version_info {
        println!("training-admin {}", built_info::PKG_VERSION);
        println!("Built: {}", built_info::BUILT_TIME_UTC);
        if let Some(commit) = built_info::GIT_COMMIT_HASH {
            println!("Git commit: {}", commit);
        }
        return;
    }

    let Some(command) = cli.command else {
        eprintln!("No command given. Run with --help for usage.");
        std::process::exit(2);
    };

    if let Err(e) = run(command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
