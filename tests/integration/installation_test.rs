//! `POST /1/installation/new`

use axum::http::StatusCode;

use voxtrack_database::UsageStore;

use crate::helpers::TestApp;

const DOSVOX_INFO: &str = r#"{"version": "4.2", "path": "C:\\winvox"}"#;
const MACHINE_INFO: &str = r#"{"system": "Windows", "release": "7"}"#;

fn install_fields<'a>(machine_id: &'a str, version: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("machine_id", machine_id),
        ("xmppvox_version", version),
        ("dosvox_info", DOSVOX_INFO),
        ("machine_info", MACHINE_INFO),
    ]
}

#[tokio::test]
async fn test_install_returns_machine_id() {
    let app = TestApp::new();
    let response = app
        .post_form("/1/installation/new", &install_fields("M1", "1.0"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "M1\n");

    let stored = app.store.find_installation("M1").await.unwrap().unwrap();
    assert_eq!(stored.xmppvox_version, "1.0");
    assert_eq!(stored.dosvox_info.unwrap()["version"], "4.2");
    assert_eq!(stored.machine_info.unwrap()["system"], "Windows");
}

#[tokio::test]
async fn test_duplicate_install_is_rejected_and_not_overwritten() {
    let app = TestApp::new();
    let first = app
        .post_form("/1/installation/new", &install_fields("M1", "1.0"))
        .await;
    let second = app
        .post_form("/1/installation/new", &install_fields("M1", "2.0"))
        .await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert_eq!(second.body, "Installation already registered\n");

    let stored = app.store.find_installation("M1").await.unwrap().unwrap();
    assert_eq!(stored.xmppvox_version, "1.0");
    assert_eq!(app.store.installation_count().await, 1);
}

#[tokio::test]
async fn test_null_info_is_accepted() {
    let app = TestApp::new();
    let response = app
        .post_form(
            "/1/installation/new",
            &[
                ("machine_id", "M2"),
                ("xmppvox_version", "1.0"),
                ("dosvox_info", "null"),
                ("machine_info", "null"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let stored = app.store.find_installation("M2").await.unwrap().unwrap();
    assert!(stored.dosvox_info.is_none());
    assert!(stored.machine_info.is_none());
}

#[tokio::test]
async fn test_invalid_json_is_rejected() {
    let app = TestApp::new();

    let response = app
        .post_form(
            "/1/installation/new",
            &[
                ("machine_id", "M1"),
                ("xmppvox_version", "1.0"),
                ("dosvox_info", "{not json"),
                ("machine_info", MACHINE_INFO),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, "Invalid JSON for dosvox_info\n");

    // Values must be strings.
    let response = app
        .post_form(
            "/1/installation/new",
            &[
                ("machine_id", "M1"),
                ("xmppvox_version", "1.0"),
                ("dosvox_info", DOSVOX_INFO),
                ("machine_info", r#"{"cores": 4}"#),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, "Invalid JSON for machine_info\n");

    assert_eq!(app.store.installation_count().await, 0);
}

#[tokio::test]
async fn test_wrong_field_set_is_rejected_without_writes() {
    let app = TestApp::new();
    let expected = "Retry with POST parameters: machine_id, xmppvox_version, dosvox_info, machine_info\n";

    let full = install_fields("M1", "1.0");
    for skip in 0..full.len() {
        let mut fields = full.clone();
        fields.remove(skip);
        let response = app.post_form("/1/installation/new", &fields).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body, expected);
    }

    let mut extra = full.clone();
    extra.push(("referrer", "web"));
    let response = app.post_form("/1/installation/new", &extra).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, expected);

    let mut empty = full.clone();
    empty[1] = ("xmppvox_version", "");
    let response = app.post_form("/1/installation/new", &empty).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    assert_eq!(app.store.installation_count().await, 0);
}

#[tokio::test]
async fn test_storage_failure_is_internal_error_and_triggers_refresh() {
    let app = TestApp::new();
    app.store.set_available(false).await;

    let response = app
        .post_form("/1/installation/new", &install_fields("M9", "1.0"))
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, "Failed to track install M9\n");

    // The reconnect runs in the background.
    for _ in 0..50 {
        if app.store.refresh_count().await > 0 {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(app.store.refresh_count().await, 1);
}
