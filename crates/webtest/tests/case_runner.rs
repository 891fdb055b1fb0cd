//! Table-driven cases dispatched in-process.

#![allow(clippy::unwrap_used, missing_docs)]

use std::io::Write;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use bytes::Bytes;
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use webtest::prelude::*;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "User")]
struct User {
    #[serde(alias = "Id")]
    id: String,
}

#[derive(Debug, Default, Deserialize)]
struct Foo {
    foo: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "Account")]
struct Account {
    id: u64,
    owner: String,
    active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    nickname: Option<String>,
}

fn app() -> Router {
    Router::new()
        .route(
            "/users-json",
            get(|| async { ([(CONTENT_TYPE, "application/json")], r#"{"id":"abc"}"#) }),
        )
        .route(
            "/users-xml",
            get(|| async { ([(CONTENT_TYPE, "application/xml")], "<User><Id>abc</Id></User>") }),
        )
        .route(
            "/users-with-no-content-type",
            get(|| async { r#"{"id":"abc"}"#.as_bytes().to_vec().into_response() }),
        )
        .route(
            "/foo",
            get(|| async {
                (
                    [(CONTENT_TYPE, "application/json; charset=utf-8")],
                    r#"{"foo":"bar"}"#,
                )
            }),
        )
        .route("/echo-json", post(echo_json))
        .route("/echo-xml", post(echo_xml))
}

async fn echo_json(body: Bytes) -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/json")], body)
}

async fn echo_xml(body: Bytes) -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/xml")], body)
}

fn runner() -> CaseRunner<ServiceHandler<Router>> {
    CaseRunner::new(ServiceHandler::new(app()).unwrap())
}

fn expect_id_abc(user: &User) -> Result<(), String> {
    if user.id == "abc" {
        Ok(())
    } else {
        Err(format!("expected field user.id == 'abc', got {:?}", user.id))
    }
}

fn expect_foo(want: &'static str) -> impl FnOnce(&Foo) -> Result<(), String> {
    move |entity: &Foo| {
        if entity.foo == want {
            Ok(())
        } else {
            Err(format!("expected field foo to be {want:?}, got {:?}", entity.foo))
        }
    }
}

#[test]
fn json_and_xml_users_pass() {
    init_test_logging();
    let mut from_json = User::default();
    let mut from_xml = User::default();

    runner()
        .run(
            &PanicReporter,
            [
                TestCase::new("retrieve users", "GET", "/users-json")
                    .validated_entity(&mut from_json, expect_id_abc),
                TestCase::new("retrieve users", "GET", "/users-xml")
                    .validated_entity(&mut from_xml, expect_id_abc),
            ],
        )
        .unwrap();

    assert_eq!(from_json.id, "abc");
    assert_eq!(from_xml.id, "abc");
}

#[test]
fn missing_content_type_fails_validated_case() {
    let reporter = RecordingReporter::new();
    let mut user = User::default();

    let failure = runner()
        .run(
            &reporter,
            [TestCase::new("retrieve users", "GET", "/users-with-no-content-type")
                .validated_entity(&mut user, expect_id_abc)],
        )
        .unwrap_err();

    assert_eq!(failure.kind(), FailureKind::MissingContentType);
    assert_eq!(reporter.messages().len(), 1);
    assert!(reporter.last().unwrap().contains("missing Content-Type header"));
}

#[test]
fn validator_decides_on_decoded_field() {
    let mut passing = Foo::default();
    runner()
        .run(
            &PanicReporter,
            [TestCase::new("foo is bar", "GET", "/foo")
                .validated_entity(&mut passing, expect_foo("bar"))],
        )
        .unwrap();
    assert_eq!(passing.foo, "bar");

    let reporter = RecordingReporter::new();
    let mut failing = Foo::default();
    let failure = runner()
        .run(
            &reporter,
            [TestCase::new("foo is baz", "GET", "/foo")
                .validated_entity(&mut failing, expect_foo("baz"))],
        )
        .unwrap_err();

    assert_eq!(failure.kind(), FailureKind::Validation);
    let message = reporter.last().unwrap();
    assert!(message.contains("validation failed"));
    assert!(message.contains("expected field foo"));
    assert!(message.starts_with(r#"failed test case "foo is baz": "#));
}

#[test]
fn cases_without_checks_never_fail() {
    let reporter = RecordingReporter::new();
    let mut hostile = |request: http::Request<Bytes>, recorder: &mut ResponseRecorder| {
        match request.uri().path() {
            "/boom" => {
                recorder.set_status(500);
                recorder.write_all(b"internal error").unwrap();
            }
            "/lying-json" => {
                recorder.set_header("Content-Type", "application/json");
                recorder.write_all(b"<not json>").unwrap();
            }
            "/silent" => {}
            _ => recorder.set_status(404),
        }
    };

    let result = run(
        &reporter,
        &mut hostile,
        ["/boom", "/lying-json", "/silent", "/nowhere"]
            .into_iter()
            .map(|path| TestCase::new("unchecked", "GET", path)),
    );

    assert_eq!(result, Ok(()));
    assert!(reporter.is_empty());
}

#[test]
fn json_round_trip_through_echo() {
    let original = Account {
        id: 42,
        owner: "ada".to_string(),
        active: true,
        nickname: Some("countess".to_string()),
    };
    let mut decoded = Account::default();

    runner()
        .run(
            &PanicReporter,
            [TestCase::new("echo json", "POST", "/echo-json")
                .header("Content-Type", "application/json")
                .body_string(serde_json::to_string(&original).unwrap())
                .response_entity(&mut decoded)],
        )
        .unwrap();

    assert_eq!(decoded, original);
}

#[test]
fn xml_round_trip_through_echo() {
    let original = Account {
        id: 7,
        owner: "grace".to_string(),
        active: false,
        nickname: None,
    };
    let payload = quick_xml::se::to_string(&original).unwrap();
    let mut decoded = Account {
        id: 0,
        owner: String::new(),
        active: true,
        nickname: Some("stale".to_string()),
    };

    runner()
        .run(
            &PanicReporter,
            [TestCase::new("echo xml", "POST", "/echo-xml")
                .body_reader(std::io::Cursor::new(payload.into_bytes()))
                .validated_entity(&mut decoded, |_: &Account| Ok::<(), String>(()))],
        )
        .unwrap();

    assert_eq!(decoded, original);
}

#[test]
fn validate_only_case_sees_the_handler_reached() {
    let reporter = RecordingReporter::new();
    let mut hits = 0_u32;
    let mut counting = |_: http::Request<Bytes>, _: &mut ResponseRecorder| hits += 1;
    let mut runner = CaseRunner::new(&mut counting);

    let failure = runner
        .run(
            &reporter,
            [TestCase::new("never ok", "GET", "/").validate(|| Err("handler not wired"))],
        )
        .unwrap_err();
    drop(runner);

    assert_eq!(hits, 1);
    assert_eq!(failure.kind(), FailureKind::Validation);
    assert_eq!(
        reporter.messages(),
        vec![r#"failed test case "never ok": validation failed: handler not wired"#.to_string()]
    );
}

#[test]
#[should_panic(expected = "missing Content-Type header")]
fn panic_reporter_aborts_the_test() {
    let mut user = User::default();
    let _ = runner().run(
        &PanicReporter,
        [TestCase::new("retrieve users", "GET", "/users-with-no-content-type")
            .validated_entity(&mut user, expect_id_abc)],
    );
}
