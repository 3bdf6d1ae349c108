use rocket::http::Status;
use rocket::local::asynchronous::Client;
use serde_json::{Value, json};

use training_api::models::{Company, MainTraining, MainTrainingWithSubTrainings, SubTrainingView};
use training_api::orm::testing::test_rocket;
use training_api::validity::ValidityPeriod;

#[rocket::async_test]
async fn test_status() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let response = client.get("/api/1/status").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.expect("valid status");
    assert_eq!(body["status"], "running");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[rocket::async_test]
async fn test_company_crud() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let response = client.post("/api/1/Companies").json(&json!({ "name": "Oasis Wells" })).dispatch().await;
    assert_eq!(response.status(), Status::Created);
    let company: Company = response.into_json().await.expect("valid company");

    let response = client
        .put(format!("/api/1/Companies/{}", company.id))
        .json(&json!({ "name": "Oasis Wells Ltd" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let list: Vec<Company> = client
        .get("/api/1/Companies")
        .dispatch()
        .await
        .into_json()
        .await
        .expect("valid list");
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].name, "Oasis Wells Ltd");

    let response = client.post("/api/1/Companies").json(&json!({ "name": "  " })).dispatch().await;
    assert_eq!(response.status(), Status::BadRequest);

    let response = client.get("/api/1/Companies/999").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
}

#[rocket::async_test]
async fn test_validity_periods() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let response = client.get("/api/1/ValidityPeriods").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.expect("valid list");
    assert_eq!(
        body,
        json!([
            { "label": "6 months", "days": 182 },
            { "label": "1 year", "days": 365 },
            { "label": "2 years", "days": 730 },
            { "label": "3 years", "days": 1095 },
            { "label": "4 years", "days": 1460 },
            { "label": "5 years", "days": 1825 },
            { "label": "Permanent", "days": null }
        ])
    );
}

#[rocket::async_test]
async fn test_main_and_sub_trainings() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let response = client.post("/api/1/MainTrainings").json(&json!({ "name": "Working at Height" })).dispatch().await;
    assert_eq!(response.status(), Status::Created);
    let main: MainTraining = response.into_json().await.expect("valid main training");

    let response = client
        .post("/api/1/SubTrainings")
        .json(&json!({ "main_training_id": main.id, "name": "Harness Inspection", "validity_period": "3 years" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    let sub: SubTrainingView = response.into_json().await.expect("valid sub-training");
    assert_eq!(sub.validity_period, ValidityPeriod::ThreeYears);
    assert_eq!(sub.main_training_name, "Working at Height");

    let response = client
        .post("/api/1/SubTrainings")
        .json(&json!({ "main_training_id": main.id, "name": "Rescue", "validity_period": "18 months" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().await.expect("valid error body");
    assert_eq!(body["error"], "Validation failed: '18 months' is not an allowed validity period");

    let response = client
        .post("/api/1/SubTrainings")
        .json(&json!({ "main_training_id": 999, "name": "Rescue", "validity_period": "1 year" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    let nested: Vec<MainTrainingWithSubTrainings> = client
        .get("/api/1/MainTrainings")
        .dispatch()
        .await
        .into_json()
        .await
        .expect("valid list");
    assert_eq!(nested.len(), 1);
    assert_eq!(nested[0].sub_trainings.len(), 1);
    assert_eq!(nested[0].sub_trainings[0].name, "Harness Inspection");

    let filtered: Vec<SubTrainingView> = client
        .get(format!("/api/1/SubTrainings?main_training_id={}", main.id))
        .dispatch()
        .await
        .into_json()
        .await
        .expect("valid list");
    assert_eq!(filtered.len(), 1);

    let response = client
        .put(format!("/api/1/SubTrainings/{}", sub.id))
        .json(&json!({ "name": "Harness Use", "validity_period": "Permanent" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let updated: SubTrainingView = response.into_json().await.expect("valid sub-training");
    assert_eq!(updated.name, "Harness Use");
    assert_eq!(updated.validity_period, ValidityPeriod::Permanent);

    let response = client.delete(format!("/api/1/MainTrainings/{}", main.id)).dispatch().await;
    assert_eq!(response.status(), Status::NoContent);

    let response = client.get(format!("/api/1/SubTrainings/{}", sub.id)).dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
}
