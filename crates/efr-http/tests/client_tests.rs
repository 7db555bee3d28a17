//! HTTP client tests against a local mock server

use std::collections::BTreeMap;

use efr_http::{Error, HttpClient};
use pretty_assertions::assert_eq;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
struct Board {
    name: String,
    identifier: String,
}

fn client() -> HttpClient {
    HttpClient::new("0.0.0-test").unwrap()
}

#[test]
fn test_get_json_decodes_body() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/index.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"boards": [{"name": "MotorGo Mini", "identifier": "motorgo_mini_1"}]}"#)
        .create();

    let url = format!("{}/index.json", server.url());
    let index: BTreeMap<String, Vec<Board>> = client().get_json(&url).unwrap();

    mock.assert();
    assert_eq!(
        index["boards"],
        vec![Board {
            name: "MotorGo Mini".into(),
            identifier: "motorgo_mini_1".into(),
        }]
    );
}

#[test]
fn test_http_error_status() {
    let mut server = mockito::Server::new();
    let _mock = server.mock("GET", "/missing").with_status(404).create();

    let url = format!("{}/missing", server.url());
    let err = client().get_text(&url).unwrap_err();

    assert!(matches!(err, Error::Status { status: 404, .. }));
    assert!(err.to_string().contains("404"));
}

#[test]
fn test_invalid_json_is_decode_error() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/registry.json")
        .with_status(200)
        .with_body("not json")
        .create();

    let url = format!("{}/registry.json", server.url());
    let result: Result<BTreeMap<String, String>, _> = client().get_json(&url);

    assert!(matches!(result, Err(Error::Decode { .. })));
}

#[test]
fn test_token_and_user_agent_headers() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/private")
        .match_header("authorization", "token secret")
        .match_header("user-agent", "efr/0.0.0-test")
        .with_status(200)
        .with_body("ok")
        .create();

    let url = format!("{}/private", server.url());
    let body = client()
        .with_token(Some("secret".into()))
        .get_text(&url)
        .unwrap();

    mock.assert();
    assert_eq!(body, "ok");
}

#[test]
fn test_get_page_reads_link_header() {
    let mut server = mockito::Server::new();
    let next = format!("{}/items?page=2", server.url());
    let _mock = server
        .mock("GET", "/items")
        .with_status(200)
        .with_header("link", &format!("<{next}>; rel=\"next\""))
        .with_body("[1, 2]")
        .create();

    let url = format!("{}/items", server.url());
    let page = client().get_page::<Vec<u32>>(&url).unwrap();

    assert_eq!(page.items, vec![1, 2]);
    assert_eq!(page.next, Some(next));
}

#[test]
fn test_connection_failure_is_request_error() {
    // Port 9 (discard) on localhost is not served during tests
    let result = client().get_text("http://127.0.0.1:9/nothing");
    assert!(matches!(result, Err(Error::Request { .. })));
}
