//! TypeScript type generation for the front-end.
//!
//! Running the test suite writes one `.ts` file per exported API type.

#[cfg(test)]
mod tests {
    use std::{env, path::Path};

    use ts_rs::TS;

    #[test]
    fn generate_typescript_types() {
        // TRAINING_TS_OUTPUT_DIR wins, then ../ts-bindings
        let output_dir_str =
            env::var("TRAINING_TS_OUTPUT_DIR").unwrap_or_else(|_| "../ts-bindings".to_string());
        let output_dir = Path::new(&output_dir_str);

        if !output_dir.exists() {
            std::fs::create_dir_all(output_dir).expect("Failed to create output directory");
        }

        // Remove stale bindings so renamed types do not linger
        for entry in std::fs::read_dir(output_dir).expect("Failed to read output directory") {
            let path = entry.expect("Failed to read directory entry").path();
            if path.extension().and_then(|s| s.to_str()) == Some("ts") {
                std::fs::remove_file(&path)
                    .unwrap_or_else(|e| panic!("Failed to remove {:?}: {}", path, e));
            }
        }

        unsafe {
            env::set_var("TS_RS_EXPORT_DIR", output_dir);
        }

        use crate::{
            admission::{AdmissionAction, AdmissionInput, AdmissionOutcome, AdmissionState, DutyInput},
            api::{employee::PhotoInput, status::HealthStatus, training::ValidityPeriodChoice},
            error::ErrorResponse,
            models::*,
            report::{EmployeeCompletion, MainTrainingCompletion, TrainingProgress},
            validity::ValidityPeriod,
        };

        Company::export().expect("Failed to export Company type");
        CompanyInput::export().expect("Failed to export CompanyInput type");
        Project::export().expect("Failed to export Project type");
        ProjectInput::export().expect("Failed to export ProjectInput type");

        Employee::export().expect("Failed to export Employee type");
        EmployeeCategory::export().expect("Failed to export EmployeeCategory type");
        EmployeeInput::export().expect("Failed to export EmployeeInput type");
        EmployeeUpdate::export().expect("Failed to export EmployeeUpdate type");
        EmployeeDetail::export().expect("Failed to export EmployeeDetail type");
        PhotoInput::export().expect("Failed to export PhotoInput type");

        AdmissionAction::export().expect("Failed to export AdmissionAction type");
        AdmissionState::export().expect("Failed to export AdmissionState type");
        AdmissionInput::export().expect("Failed to export AdmissionInput type");
        AdmissionOutcome::export().expect("Failed to export AdmissionOutcome type");
        DutyInput::export().expect("Failed to export DutyInput type");

        MainTraining::export().expect("Failed to export MainTraining type");
        MainTrainingInput::export().expect("Failed to export MainTrainingInput type");
        MainTrainingWithSubTrainings::export()
            .expect("Failed to export MainTrainingWithSubTrainings type");
        SubTrainingInput::export().expect("Failed to export SubTrainingInput type");
        SubTrainingUpdate::export().expect("Failed to export SubTrainingUpdate type");
        SubTrainingView::export().expect("Failed to export SubTrainingView type");
        ValidityPeriod::export().expect("Failed to export ValidityPeriod type");
        ValidityPeriodChoice::export().expect("Failed to export ValidityPeriodChoice type");

        Assignment::export().expect("Failed to export Assignment type");
        AssignmentInput::export().expect("Failed to export AssignmentInput type");
        AssignmentUpdate::export().expect("Failed to export AssignmentUpdate type");
        Verification::export().expect("Failed to export Verification type");
        VerificationInput::export().expect("Failed to export VerificationInput type");

        TrainingProgress::export().expect("Failed to export TrainingProgress type");
        EmployeeCompletion::export().expect("Failed to export EmployeeCompletion type");
        MainTrainingCompletion::export().expect("Failed to export MainTrainingCompletion type");

        Notification::export().expect("Failed to export Notification type");
        ErrorResponse::export().expect("Failed to export ErrorResponse type");
        HealthStatus::export().expect("Failed to export HealthStatus type");

        println!("TypeScript types generated successfully in {:?}", output_dir);
    }
}
