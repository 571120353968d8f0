//! `POST /1/session/{new,close,ping}`

use axum::http::StatusCode;

use voxtrack_core::types::SessionId;
use voxtrack_database::UsageStore;

use crate::helpers::{TEST_PEER, TestApp};

async fn stored(app: &TestApp, raw_id: &str) -> voxtrack_entity::session::Session {
    let id: SessionId = raw_id.parse().unwrap();
    app.store.find_session(&id).await.unwrap().unwrap()
}

#[tokio::test]
async fn test_new_session_is_open_and_never_pinged() {
    let app = TestApp::new();
    let id = app.open_session("M1").await;

    let session = stored(&app, &id).await;
    assert!(session.closed_at.is_none());
    assert!(session.last_ping.is_none());
    assert_eq!(session.jid, "user@jabber.org");
    assert_eq!(session.machine_id, "M1");
    assert_eq!(session.xmppvox_version, "1.0");
}

#[tokio::test]
async fn test_new_session_keeps_request_snapshot() {
    let app = TestApp::new();
    let id = app.open_session("M1").await;

    let request = stored(&app, &id).await.request.unwrap();
    assert_eq!(request.method, "POST");
    assert_eq!(request.url, "/1/session/new");
    assert_eq!(request.host, "track.example.org");
    assert_eq!(request.headers["user-agent"], vec!["xmppvox-test"]);
    assert_eq!(request.form["jid"], vec!["user@jabber.org"]);
    assert_eq!(request.remote_addr.as_deref(), Some(TEST_PEER));
}

#[tokio::test]
async fn test_snapshot_includes_query_values() {
    let app = TestApp::new();
    let response = app
        .post_form(
            "/1/session/new?src=tray&jid=ignored@b",
            &[("jid", "a@b"), ("machine_id", "M1"), ("xmppvox_version", "1.0")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let session = stored(&app, response.line()).await;
    assert_eq!(session.jid, "a@b");

    let request = session.request.unwrap();
    assert_eq!(request.url, "/1/session/new?src=tray&jid=ignored@b");
    assert_eq!(request.form["src"], vec!["tray"]);
    assert_eq!(request.form["jid"], vec!["a@b", "ignored@b"]);
}

#[tokio::test]
async fn test_each_session_gets_a_fresh_id() {
    let app = TestApp::new();
    let first = app.open_session("M1").await;
    let second = app.open_session("M1").await;

    assert_ne!(first, second);
    assert_eq!(app.store.session_count().await, 2);
}

#[tokio::test]
async fn test_open_close_close() {
    let app = TestApp::new();
    let response = app
        .post_form(
            "/1/session/new",
            &[("jid", "a@b"), ("machine_id", "M1"), ("xmppvox_version", "1.0")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let id = response.line().to_string();

    let close = [("session_id", id.as_str()), ("machine_id", "M1")];
    let response = app.post_form("/1/session/close", &close).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, format!("{id}\n"));
    let closed_at = stored(&app, &id).await.closed_at;
    assert!(closed_at.is_some());

    let response = app.post_form("/1/session/close", &close).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        format!("Session {id} does not exist or is already closed\n")
    );
    assert_eq!(stored(&app, &id).await.closed_at, closed_at);
}

#[tokio::test]
async fn test_wrong_owner_gets_the_not_found_answer() {
    let app = TestApp::new();
    let id = app.open_session("M1").await;

    for path in ["/1/session/close", "/1/session/ping"] {
        let response = app
            .post_form(path, &[("session_id", id.as_str()), ("machine_id", "M2")])
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response.body,
            format!("Session {id} does not exist or is already closed\n")
        );
    }

    let session = stored(&app, &id).await;
    assert!(session.closed_at.is_none());
    assert!(session.last_ping.is_none());
}

#[tokio::test]
async fn test_ping_advances_last_ping() {
    let app = TestApp::new();
    let id = app.open_session("M1").await;
    let ping = [("session_id", id.as_str()), ("machine_id", "M1")];

    let response = app.post_form("/1/session/ping", &ping).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, format!("{id}\n"));
    let first = stored(&app, &id).await.last_ping.unwrap();

    let response = app.post_form("/1/session/ping", &ping).await;
    assert_eq!(response.status, StatusCode::OK);
    let second = stored(&app, &id).await.last_ping.unwrap();

    assert!(second >= first);
    assert!(stored(&app, &id).await.is_open());
}

#[tokio::test]
async fn test_ping_after_close_is_rejected() {
    let app = TestApp::new();
    let id = app.open_session("M1").await;
    let fields = [("session_id", id.as_str()), ("machine_id", "M1")];

    app.post_form("/1/session/ping", &fields).await;
    let pinged = stored(&app, &id).await.last_ping;
    app.post_form("/1/session/close", &fields).await;

    let response = app.post_form("/1/session/ping", &fields).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(stored(&app, &id).await.last_ping, pinged);
}

#[tokio::test]
async fn test_unknown_and_malformed_ids() {
    let app = TestApp::new();

    let unknown = SessionId::new().to_string();
    let response = app
        .post_form(
            "/1/session/ping",
            &[("session_id", unknown.as_str()), ("machine_id", "M1")],
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        format!("Session {unknown} does not exist or is already closed\n")
    );

    let response = app
        .post_form(
            "/1/session/close",
            &[("session_id", "not-an-id"), ("machine_id", "M1")],
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, "Invalid session id not-an-id\n");
}

#[tokio::test]
async fn test_only_canonical_session_id_spelling_is_accepted() {
    let app = TestApp::new();
    let id = app.open_session("M1").await;

    for raw in [
        format!("{{{id}}}"),
        format!("urn:uuid:{id}"),
        id.replace('-', ""),
        id.to_uppercase(),
    ] {
        let response = app
            .post_form(
                "/1/session/ping",
                &[("session_id", raw.as_str()), ("machine_id", "M1")],
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body, format!("Invalid session id {raw}\n"));
    }

    assert!(stored(&app, &id).await.last_ping.is_none());
}

#[tokio::test]
async fn test_wrong_field_set_is_rejected_without_writes() {
    let app = TestApp::new();

    let response = app
        .post_form("/1/session/new", &[("jid", "a@b"), ("machine_id", "M1")])
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        "Retry with POST parameters: jid, machine_id, xmppvox_version\n"
    );

    let response = app
        .post_form(
            "/1/session/new",
            &[
                ("jid", "a@b"),
                ("machine_id", "M1"),
                ("xmppvox_version", "1.0"),
                ("os", "linux"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.session_count().await, 0);

    let id = app.open_session("M1").await;
    let response = app
        .post_form(
            "/1/session/close",
            &[
                ("session_id", id.as_str()),
                ("machine_id", "M1"),
                ("reason", "quit"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        "Retry with POST parameters: session_id, machine_id\n"
    );
    assert!(stored(&app, &id).await.is_open());
}

#[tokio::test]
async fn test_storage_failure_on_close_is_internal_error() {
    let app = TestApp::new();
    let id = app.open_session("M1").await;
    app.store.set_available(false).await;

    let response = app
        .post_form(
            "/1/session/close",
            &[("session_id", id.as_str()), ("machine_id", "M1")],
        )
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, format!("Failed to close session {id}\n"));

    let response = app
        .post_form(
            "/1/session/new",
            &[("jid", "a@b"), ("machine_id", "M1"), ("xmppvox_version", "1.0")],
        )
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, "Failed to create a new session\n");
}

#[tokio::test]
async fn test_storage_failure_on_ping_is_internal_error() {
    let app = TestApp::new();
    let id = app.open_session("M1").await;
    app.store.set_available(false).await;

    let response = app
        .post_form(
            "/1/session/ping",
            &[("session_id", id.as_str()), ("machine_id", "M1")],
        )
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, format!("Failed to ping session {id}\n"));

    app.store.set_available(true).await;
    assert!(stored(&app, &id).await.last_ping.is_none());
}

#[tokio::test]
async fn test_body_that_is_not_a_form_is_rejected() {
    let app = TestApp::new();
    let expected = "Retry with POST parameters: jid, machine_id, xmppvox_version\n";
    let json = r#"{"jid": "a@b", "machine_id": "M1", "xmppvox_version": "1.0"}"#;
    let urlencoded = "jid=a%40b&machine_id=M1&xmppvox_version=1.0";

    let cases = [
        (Some("application/json"), json),
        (Some("text/plain"), urlencoded),
        (None, urlencoded),
    ];
    for (content_type, body) in cases {
        let response = app.post_raw("/1/session/new", content_type, body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{content_type:?}");
        assert_eq!(response.body, expected);
    }

    assert_eq!(app.store.session_count().await, 0);
}

#[tokio::test]
async fn test_get_on_tracking_route_is_not_allowed() {
    let app = TestApp::new();
    let response = app.get("/1/session/new").await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
}
