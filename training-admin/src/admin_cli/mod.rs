pub mod company_commands;
pub mod employee_commands;
pub mod project_commands;
pub mod training_commands;
pub mod utils;
