//! HTTP endpoints, all mounted under `/api` and versioned with `/1/`.

use rocket::Route;

use crate::error::TrainingError;

pub mod assignment;
pub mod company;
pub mod employee;
pub mod notification;
pub mod project;
pub mod report;
pub mod status;
pub mod training;

pub fn routes() -> Vec<Route> {
    let mut routes = status::routes();
    routes.extend(company::routes());
    routes.extend(project::routes());
    routes.extend(employee::routes());
    routes.extend(training::routes());
    routes.extend(assignment::routes());
    routes.extend(report::routes());
    routes.extend(notification::routes());
    routes
}

/// Trimmed `name`, rejecting blank names.
pub(crate) fn require_name(name: &str, entity: &str) -> Result<String, TrainingError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TrainingError::validation(format!("{} name must not be empty", entity)));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn not_found(entity: &str, id: i32) -> TrainingError {
    TrainingError::not_found(format!("{} with ID {} not found", entity, id))
}
