//! `POST /work-items` tests

use crate::support::{client, test_config};
use gatehouse_domain::ports::LogStore;
use gatehouse_domain::value_objects::{StreamPosition, WorkItemId};
use rocket::http::{ContentType, Status};

#[rocket::async_test]
async fn test_submission_is_appended() {
    let (client, store) = client(test_config()).await;

    let response = client
        .post("/work-items")
        .header(ContentType::JSON)
        .body(r#"{"resourceId": "42", "quantity": "3"}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    let body: serde_json::Value = response.into_json().await.unwrap();
    let id: WorkItemId = body["id"].as_str().unwrap().parse().unwrap();

    let items = store
        .read("work-items", StreamPosition::Start, 10, None)
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, id);
    assert_eq!(items[0].attribute("resourceId"), Some("42"));
    assert_eq!(items[0].attribute("quantity"), Some("3"));
}

#[rocket::async_test]
async fn test_numeric_fields_are_accepted() {
    let (client, store) = client(test_config()).await;

    let response = client
        .post("/work-items")
        .header(ContentType::JSON)
        .body(r#"{"resourceId": 7, "quantity": 2}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);

    let items = store
        .read("work-items", StreamPosition::Start, 10, None)
        .await
        .unwrap();
    assert_eq!(items[0].attribute("resourceId"), Some("7"));
    assert_eq!(items[0].attribute("quantity"), Some("2"));
}

#[rocket::async_test]
async fn test_missing_or_empty_field_is_400() {
    let (client, store) = client(test_config()).await;

    for body in [
        r#"{"resourceId": "42"}"#,
        r#"{"resourceId": "", "quantity": "3"}"#,
        r#"{"resourceId": ["42"], "quantity": "3"}"#,
        "not json",
    ] {
        let response = client
            .post("/work-items")
            .header(ContentType::JSON)
            .body(body)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest, "body: {body}");
        let error: serde_json::Value = response.into_json().await.unwrap();
        assert!(error["message"].is_string());
    }

    assert!(
        store
            .read("work-items", StreamPosition::Start, 10, None)
            .await
            .unwrap()
            .is_empty()
    );
}

#[rocket::async_test]
async fn test_store_outage_is_503() {
    let mut config = test_config();
    config.admission.enabled = false;
    let (client, store) = client(config).await;
    store.set_unavailable(true);

    let response = client
        .post("/work-items")
        .header(ContentType::JSON)
        .body(r#"{"resourceId": "42", "quantity": "3"}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::ServiceUnavailable);
}
