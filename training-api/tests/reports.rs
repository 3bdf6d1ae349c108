use chrono::{Duration, Local};
use rocket::http::Status;
use rocket::local::asynchronous::Client;
use serde_json::{Value, json};

use training_api::date_format::format_date;
use training_api::orm::testing::test_rocket;
use training_api::report::{EmployeeCompletion, MainTrainingCompletion, TrainingProgress};

async fn post_json(client: &Client, path: &str, body: Value) -> Value {
    let response = client.post(path).json(&body).dispatch().await;
    assert_eq!(response.status(), Status::Created, "POST {path} failed");
    response.into_json().await.expect("valid JSON response")
}

async fn id_of(client: &Client, path: &str, body: Value) -> i64 {
    post_json(client, path, body).await["id"].as_i64().expect("id")
}

/// One employee with three assignments: an expired six-month training and a
/// current one-year training under "Fire Safety", plus a permanent one
/// under "First Aid".
async fn seed(client: &Client) -> (i64, i64, i64) {
    let company = id_of(client, "/api/1/Companies", json!({ "name": "Gulf Rigs" })).await;
    let project = id_of(client, "/api/1/Projects", json!({ "name": "Field 3" })).await;
    let employee = id_of(
        client,
        "/api/1/Employees",
        json!({
            "fullname": "Yusuf Ali",
            "mobile_number": "0580000001",
            "designation": "Crane Operator",
            "gate_pass_no": "GR-1",
            "category": "Rig",
            "company_id": company,
            "project_id": project
        }),
    )
    .await;
    let fire = id_of(client, "/api/1/MainTrainings", json!({ "name": "Fire Safety" })).await;
    let first_aid = id_of(client, "/api/1/MainTrainings", json!({ "name": "First Aid" })).await;

    let six_months = id_of(
        client,
        "/api/1/SubTrainings",
        json!({ "main_training_id": fire, "name": "Extinguishers", "validity_period": "6 months" }),
    )
    .await;
    let one_year = id_of(
        client,
        "/api/1/SubTrainings",
        json!({ "main_training_id": fire, "name": "Evacuation", "validity_period": "1 year" }),
    )
    .await;
    let permanent = id_of(
        client,
        "/api/1/SubTrainings",
        json!({ "main_training_id": first_aid, "name": "Basic Life Support", "validity_period": "Permanent" }),
    )
    .await;

    let today = Local::now().date_naive();
    for (sub, start) in [
        (six_months, today - Duration::days(200)),
        (one_year, today - Duration::days(10)),
        (permanent, today - Duration::days(2000)),
    ] {
        post_json(
            client,
            "/api/1/Assignments",
            json!({ "employee_id": employee, "sub_training_id": sub, "start_date": format_date(start) }),
        )
        .await;
    }

    (employee, fire, first_aid)
}

#[rocket::async_test]
async fn test_employee_completion() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let (employee, _, _) = seed(&client).await;

    let response = client.get(format!("/api/1/Employees/{}/Completion", employee)).dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let report: EmployeeCompletion = response.into_json().await.expect("valid report");
    assert_eq!(report.employee_id, employee as i32);
    assert_eq!(report.average_completion_percentage, 66.67);
}

#[rocket::async_test]
async fn test_employee_trainings() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let (employee, _, _) = seed(&client).await;

    let response = client.get(format!("/api/1/Employees/{}/Trainings", employee)).dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let rows: Vec<TrainingProgress> = response.into_json().await.expect("valid rows");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].sub_training_name, "Extinguishers");
    assert_eq!(rows[0].completion_percentage, 0.0);
    assert!(rows[0].warning);
    assert_eq!(rows[1].completion_percentage, 100.0);
    assert_eq!(rows[2].main_training_name, "First Aid");
    assert_eq!(rows[2].expiration_date, None);
}

#[rocket::async_test]
async fn test_main_training_completion() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let (employee, fire, first_aid) = seed(&client).await;

    let response = client
        .get(format!("/api/1/Employees/{}/MainTrainings/{}/Completion", employee, fire))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let report: MainTrainingCompletion = response.into_json().await.expect("valid report");
    assert_eq!(report.main_training_name, "Fire Safety");
    assert_eq!(report.average_percentage, 50.0);

    let response = client
        .get(format!("/api/1/Employees/{}/MainTrainings/{}/Trainings", employee, first_aid))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let rows: Vec<TrainingProgress> = response.into_json().await.expect("valid rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].sub_training_name, "Basic Life Support");
}

#[rocket::async_test]
async fn test_empty_reports_are_not_found() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let (_, fire, _) = seed(&client).await;

    let company = id_of(&client, "/api/1/Companies", json!({ "name": "Empty Co" })).await;
    let project = id_of(&client, "/api/1/Projects", json!({ "name": "Idle" })).await;
    let newcomer = id_of(
        &client,
        "/api/1/Employees",
        json!({
            "fullname": "New Hire",
            "mobile_number": "0580000002",
            "designation": "Trainee",
            "gate_pass_no": "EC-1",
            "category": "Rigless",
            "company_id": company,
            "project_id": project
        }),
    )
    .await;

    let response = client.get(format!("/api/1/Employees/{}/Completion", newcomer)).dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    let body: Value = response.into_json().await.expect("valid error body");
    assert_eq!(body["error"], "No sub-trainings found for this employee");

    let response = client
        .get(format!("/api/1/Employees/{}/MainTrainings/{}/Completion", newcomer, fire))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);

    let response = client.get("/api/1/Employees/9999/Completion").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    let body: Value = response.into_json().await.expect("valid error body");
    assert_eq!(body["error"], "Employee with ID 9999 not found");

    // An employee without assignments still has an (empty) progress list
    let rows: Vec<TrainingProgress> = client
        .get(format!("/api/1/Employees/{}/Trainings", newcomer))
        .dispatch()
        .await
        .into_json()
        .await
        .expect("valid rows");
    assert!(rows.is_empty());
}
