//! Endpoint and validated-request behavior over real HTTP.
//!
//! # Design
//! Each test starts the stub server on a random port with its own routes and
//! then talks to it through the default ureq transport, so request assembly,
//! header merging and status validation are checked end-to-end.

use mock_server::{Journal, Method, Stub};
use slimpoint::{validated_request, Call, Endpoint, RequestOptions, Session, SlimpointError};

const SUCCESS_STATUS: u16 = 200;
const FAIL_STATUS: u16 = 500;

/// Start a stub server and return its base URL and request journal.
fn serve(stubs: Vec<Stub>) -> (String, Journal) {
    let (router, journal) = mock_server::app(stubs);
    let addr = mock_server::spawn(router).unwrap();
    (format!("http://{addr}"), journal)
}

#[test]
fn validated_request_returns_matching_response() {
    let (base, _journal) = serve(vec![Stub::new(Method::GET, "/", SUCCESS_STATUS).with_body("hi")]);
    let session = Session::new();

    let resp = validated_request(
        "get",
        &format!("{base}/"),
        SUCCESS_STATUS,
        RequestOptions::new().session(&session),
    )
    .unwrap();

    assert_eq!(resp.status, SUCCESS_STATUS);
    assert_eq!(resp.text(), "hi");
}

#[test]
fn validated_request_rejects_unexpected_status() {
    let (base, _journal) = serve(vec![Stub::new(Method::GET, "/", FAIL_STATUS).with_body("nope")]);

    let err = validated_request(
        "GET",
        &format!("{base}/"),
        SUCCESS_STATUS,
        RequestOptions::new().description("Load the home page"),
    )
    .unwrap_err();

    let text = err.to_string();
    assert!(text.contains(&format!(
        "Expected a response of {SUCCESS_STATUS}, got {FAIL_STATUS}"
    )));
    assert!(text.contains("While trying to: Load the home page"));
    assert!(text.contains("Response: nope"));
}

#[test]
fn unreachable_server_is_a_connection_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    drop(listener);

    let err = validated_request("get", &url, SUCCESS_STATUS, RequestOptions::new()).unwrap_err();

    assert!(matches!(err, SlimpointError::ConnectionFailure { .. }), "{err:?}");
    let text = err.to_string();
    assert!(text.contains("Unable to connect"));
    assert!(text.contains(&url));
}

#[test]
fn endpoint_verbs_reach_the_server() {
    let (base, journal) = serve(vec![
        Stub::new(Method::GET, "/items", SUCCESS_STATUS),
        Stub::new(Method::POST, "/items", SUCCESS_STATUS),
        Stub::new(Method::PUT, "/items", SUCCESS_STATUS),
        Stub::new(Method::PATCH, "/items", SUCCESS_STATUS),
        Stub::new(Method::DELETE, "/items", SUCCESS_STATUS),
    ]);
    let endpoint = Endpoint::with_path(&base, "/items").unwrap();

    assert_eq!(endpoint.get(Call::new()).unwrap().status, SUCCESS_STATUS);
    assert_eq!(endpoint.post(Call::new()).unwrap().status, SUCCESS_STATUS);
    assert_eq!(endpoint.put(Call::new()).unwrap().status, SUCCESS_STATUS);
    assert_eq!(endpoint.patch(Call::new()).unwrap().status, SUCCESS_STATUS);
    assert_eq!(endpoint.delete(Call::new()).unwrap().status, SUCCESS_STATUS);

    let methods: Vec<String> = journal
        .blocking_snapshot()
        .into_iter()
        .map(|r| r.method)
        .collect();
    assert_eq!(methods, ["GET", "POST", "PUT", "PATCH", "DELETE"]);
}

#[test]
fn endpoint_sends_session_headers() {
    let (base, journal) = serve(vec![Stub::new(Method::GET, "/", SUCCESS_STATUS)]);
    let session = Session::builder().header("TEST", "UNIMPORTANT").build();
    let endpoint = Endpoint::with_path(&base, "/").unwrap();

    let resp = endpoint.get(Call::new().session(&session)).unwrap();

    assert_eq!(resp.request.header("TEST"), Some("UNIMPORTANT"));
    let seen = journal.blocking_snapshot();
    assert_eq!(seen[0].header("test"), Some("UNIMPORTANT"));
}

#[test]
fn endpoint_failure_names_expected_and_actual() {
    let (base, _journal) = serve(vec![Stub::any(FAIL_STATUS)]);
    let endpoint = Endpoint::with_path(&base, "/").unwrap();

    let err = endpoint.get(Call::new()).unwrap_err();

    assert!(err
        .to_string()
        .contains("Expected a response of 200, got 500"));
}

#[test]
fn endpoint_with_query_string() {
    let arg_key = "arg_key";
    let arg_value = "arg value";
    let (base, journal) = serve(vec![Stub::new(
        Method::GET,
        "/search?arg_key=arg+value",
        SUCCESS_STATUS,
    )]);
    let endpoint = Endpoint::with_path(&base, "/search").unwrap();

    let resp = endpoint
        .get(Call::new().qs_arg(arg_key, arg_value))
        .unwrap();

    assert_eq!(resp.request.url, format!("{}?arg_key=arg+value", endpoint.url()));
    assert_eq!(journal.blocking_snapshot()[0].uri, "/search?arg_key=arg+value");
}

#[test]
fn endpoint_posts_json_and_checks_custom_status() {
    let (base, journal) = serve(vec![
        Stub::new(Method::POST, "/posts", 201).with_body(r#"{"id":7}"#),
    ]);
    let endpoint = Endpoint::with_path(&base, "/posts").unwrap();

    let resp = endpoint
        .post(
            Call::new()
                .expect(201)
                .description("Publish a post")
                .json(&serde_json::json!({"title": "hello"}))
                .unwrap(),
        )
        .unwrap();

    let created: serde_json::Value = resp.json().unwrap();
    assert_eq!(created["id"], 7);

    let seen = journal.blocking_snapshot();
    assert_eq!(seen[0].body, r#"{"title":"hello"}"#);
    assert_eq!(seen[0].header("content-type"), Some("application/json"));
}
