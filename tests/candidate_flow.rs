// End-to-end flow tests against a mock LORIS instance: login, token
// propagation, the fixed fields of the submitted record, and the failure
// paths around the two calls.

use cbigr_cli::api::{ApiClient, LoginRequest};
use cbigr_cli::cli::{submit, Args};
use httpmock::prelude::*;
use serde_json::json;

fn demo_args() -> Args {
    Args {
        dob: "2000-01-01".into(),
        sex: "Female".into(),
        edc: "EDC123".into(),
        project: "ProjectA".into(),
        pscid: "ignored".into(),
    }
}

fn demo_login() -> LoginRequest {
    LoginRequest {
        username: "alice".into(),
        password: "hunter2".into(),
    }
}

#[test]
fn bearer_token_from_login_is_used_for_creation() {
    let server = MockServer::start();
    let login_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/login")
            .json_body(json!({"username": "alice", "password": "hunter2"}));
        then.status(200)
            .json_body(json!({"token": "tok-abc123", "expires": 3600}));
    });
    let create_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/candidates/")
            .header("authorization", "Bearer tok-abc123")
            .json_body(json!({
                "Candidate": {
                    "Project": "ProjectA",
                    "PSCID": "CRU0001",
                    "EDC": "EDC123",
                    "DoB": "2000-01-01",
                    "Sex": "Female",
                    "Site": "Clinical Research Unit"
                }
            }));
        then.status(201).json_body(json!({"CandID": 300001}));
    });

    let api = ApiClient::new(&server.base_url()).unwrap();
    let response = submit(&demo_args(), api, &demo_login()).unwrap();

    assert_eq!(response.status, 201);
    assert!(response.body.contains("300001"));
    login_mock.assert();
    create_mock.assert();
}

#[test]
fn supplied_pscid_never_reaches_the_server() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/login");
        then.status(200).json_body(json!({"token": "tok-1"}));
    });
    let create_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/candidates/")
            .json_body_partial(r#"{"Candidate": {"PSCID": "CRU0001"}}"#);
        then.status(201).json_body(json!({"CandID": 300002}));
    });

    let mut args = demo_args();
    args.pscid = "CRU9999".into();

    let api = ApiClient::new(&server.base_url()).unwrap();
    submit(&args, api, &demo_login()).unwrap();

    create_mock.assert();
}

#[test]
fn failed_login_prevents_candidate_creation() {
    let server = MockServer::start();
    let login_mock = server.mock(|when, then| {
        when.method(POST).path("/login");
        then.status(401).json_body(json!({"error": "Unauthorized"}));
    });
    let create_mock = server.mock(|when, then| {
        when.method(POST).path("/candidates/");
        then.status(201);
    });

    let api = ApiClient::new(&server.base_url()).unwrap();
    let err = submit(&demo_args(), api, &demo_login()).unwrap_err();

    assert!(err.to_string().contains("401"));
    login_mock.assert();
    create_mock.assert_hits(0);
}

#[test]
fn tokenless_login_response_prevents_candidate_creation() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/login");
        then.status(200).json_body(json!({"status": "ok"}));
    });
    let create_mock = server.mock(|when, then| {
        when.method(POST).path("/candidates/");
        then.status(201);
    });

    let api = ApiClient::new(&server.base_url()).unwrap();
    assert!(submit(&demo_args(), api, &demo_login()).is_err());
    create_mock.assert_hits(0);
}

#[test]
fn creation_failures_are_reported_not_raised() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/login");
        then.status(200).json_body(json!({"token": "tok-1"}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/candidates/");
        then.status(409)
            .json_body(json!({"error": "PSCID already exists"}));
    });

    let api = ApiClient::new(&server.base_url()).unwrap();
    let response = submit(&demo_args(), api, &demo_login()).unwrap();

    assert_eq!(response.status, 409);
    assert!(response.body.contains("PSCID already exists"));
}

#[test]
fn trailing_slash_on_base_url_is_tolerated() {
    let server = MockServer::start();
    let login_mock = server.mock(|when, then| {
        when.method(POST).path("/login");
        then.status(200).json_body(json!({"token": "tok-1"}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/candidates/");
        then.status(201).json_body(json!({"CandID": 300003}));
    });

    let api = ApiClient::new(&format!("{}/", server.base_url())).unwrap();
    let response = submit(&demo_args(), api, &demo_login()).unwrap();

    assert_eq!(response.status, 201);
    login_mock.assert();
}
