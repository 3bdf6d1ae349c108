use std::io::{self, Write};

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use dotenvy::dotenv;
use regex::Regex;
use training_api::orm::{run_pending_migrations, set_foreign_keys};

/// Opens the database named by `DATABASE_URL` and brings its schema up to date.
pub fn establish_connection() -> Result<SqliteConnection, Box<dyn std::error::Error>> {
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;
    let mut conn = SqliteConnection::establish(&database_url)
        .map_err(|e| format!("Error connecting to {}: {}", database_url, e))?;
    set_foreign_keys(&mut conn);
    run_pending_migrations(&mut conn);
    Ok(conn)
}

/// Matches names against a search term, either as a regex or a plain substring.
pub enum NameMatcher {
    All,
    Fixed(String),
    Pattern(Regex),
}

impl NameMatcher {
    pub fn new(
        search_term: Option<String>,
        fixed_string: bool,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        match search_term {
            None => Ok(NameMatcher::All),
            Some(term) if fixed_string => Ok(NameMatcher::Fixed(term)),
            Some(term) => {
                let regex = Regex::new(&term)
                    .map_err(|e| format!("Invalid regex pattern '{}': {}", term, e))?;
                Ok(NameMatcher::Pattern(regex))
            }
        }
    }

    pub fn is_match(&self, name: &str) -> bool {
        match self {
            NameMatcher::All => true,
            NameMatcher::Fixed(term) => name.contains(term.as_str()),
            NameMatcher::Pattern(regex) => regex.is_match(name),
        }
    }
}

/// Asks a yes/no question on stdout; anything but "y" or "yes" means no.
pub fn confirm(prompt: &str) -> Result<bool, Box<dyn std::error::Error>> {
    print!("{} [y/N]: ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}
