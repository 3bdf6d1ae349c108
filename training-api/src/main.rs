// training-api/src/main.rs

use clap::Parser;
use diesel::{Connection, SqliteConnection};
use rocket::error;
use rocket::info;
use std::env;

use training_api::orm::assignment::recompute_all;
use training_api::orm::{run_pending_migrations, set_foreign_keys};
use training_api::validity::today;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Parser)]
#[command(name = "training-api")]
#[command(about = "Employee training records API server")]
#[command(version)]
struct Cli {
    /// Show extended version information
    #[arg(long, action = clap::ArgAction::SetTrue)]
    version_info: bool,

    /// Re-derive expiration dates and warning flags of every assignment
    /// against today's date before serving
    #[arg(long, action = clap::ArgAction::SetTrue)]
    refresh_warnings: bool,
}

/// Brings stored warnings up to date; returns how many assignments changed.
fn refresh_warnings(conn: &mut SqliteConnection) -> Result<usize, Box<dyn std::error::Error>> {
    set_foreign_keys(conn);
    run_pending_migrations(conn);
    Ok(recompute_all(conn, today())?)
}

fn refresh_warnings_at(database_url: &str) -> Result<usize, Box<dyn std::error::Error>> {
    let mut conn = SqliteConnection::establish(database_url)?;
    refresh_warnings(&mut conn)
}

#[rocket::main]
async fn main() {
    let cli = Cli::parse();

    if cli.version_info {
        println!("training-api {}", built_info::PKG_VERSION);
        println!("Built: {}", built_info::BUILT_TIME_UTC);
        if let Some(commit) = built_info::GIT_COMMIT_HASH {
            println!("Git commit: {}", commit);
        }
        return;
    }

    match env::current_dir() {
        Ok(path) => info!("Current directory: {}", path.display()),
        Err(e) => error!("Error getting current directory: {}", e),
    };

    info!("Training API v{} starting", built_info::PKG_VERSION);
    if let Some(commit) = built_info::GIT_COMMIT_HASH {
        info!("Git commit: {} (built {})", commit, built_info::BUILT_TIME_UTC);
    }

    if cli.refresh_warnings {
        dotenvy::dotenv().ok();
        let Ok(database_url) = env::var("DATABASE_URL") else {
            error!("--refresh-warnings needs DATABASE_URL");
            std::process::exit(1);
        };
        match refresh_warnings_at(&database_url) {
            Ok(changed) => info!("Refreshed {} assignment(s) as of {}", changed, today()),
            Err(e) => {
                error!("Failed to refresh warnings: {}", e);
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = training_api::rocket().launch().await {
        error!("Rocket server failed to launch: {}", e);
        std::process::exit(1);
    }
}
