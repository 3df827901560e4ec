//! Integration tests for error classification
//!
//! Every failure must surface as exactly one typed error carrying the status
//! code and raw body where there was a response.

use crate::integration::mock_server::MockServerFixture;
use caption_bridge::{Error, ErrorKind, ServiceClient, TranslationRequest};

fn translate_err(fixture: &MockServerFixture) -> Error {
    fixture
        .create_test_client()
        .translate(&fixture.base_url, &TranslationRequest::new("hi"))
        .unwrap_err()
}

#[test]
fn test_success_false_on_200_is_api_error() {
    let mut fixture = MockServerFixture::new();
    let _mock = fixture.mock_json(
        "POST",
        "/translate",
        200,
        r#"{"success":false,"msg":"bad input"}"#,
    );

    let err = translate_err(&fixture);
    assert_eq!(err.kind(), ErrorKind::Api);
    let record = err.record().unwrap();
    assert_eq!(record.message, "bad input");
    assert_eq!(record.status_code, Some(200));
}

#[test]
fn test_success_false_without_msg_is_unknown_error() {
    let mut fixture = MockServerFixture::new();
    let _mock = fixture.mock_json("POST", "/translate", 200, r#"{"success":false}"#);

    let err = translate_err(&fixture);
    assert_eq!(err.record().unwrap().message, "Unknown error");
}

#[test]
fn test_401_is_authentication_error_with_detail() {
    let mut fixture = MockServerFixture::new();
    let _mock = fixture.mock_json("POST", "/translate", 401, r#"{"detail":"invalid token"}"#);

    let err = translate_err(&fixture);
    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(err.status_code(), Some(401));
    let record = err.record().unwrap();
    assert_eq!(record.message, "invalid token");
    assert_eq!(record.raw_body.as_deref(), Some(r#"{"detail":"invalid token"}"#));
}

#[test]
fn test_status_table() {
    let cases = [
        (422, ErrorKind::Validation),
        (429, ErrorKind::RateLimited),
        (404, ErrorKind::Api),
        (500, ErrorKind::ServiceUnavailable),
        (503, ErrorKind::ServiceUnavailable),
    ];

    for (status, kind) in cases {
        let mut fixture = MockServerFixture::new();
        let _mock = fixture.mock_json("POST", "/translate", status, r#"{"detail":"nope"}"#);

        let err = translate_err(&fixture);
        assert_eq!(err.kind(), kind, "status {}", status);
        assert_eq!(err.status_code(), Some(status as u16));
    }
}

#[test]
fn test_unparsable_body_is_validation_error() {
    let mut fixture = MockServerFixture::new();
    let _mock = fixture
        .server
        .mock("POST", "/translate")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>gateway</html>")
        .create();

    let err = translate_err(&fixture);
    assert_eq!(err.kind(), ErrorKind::Validation);
    let record = err.record().unwrap();
    assert!(record.message.starts_with("Invalid JSON response: <html>"));
    assert_eq!(record.raw_body.as_deref(), Some("<html>gateway</html>"));
}

#[test]
fn test_closed_port_is_connection_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client = ServiceClient::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .unwrap();
    let err = client
        .translate(&format!("127.0.0.1:{}", port), &TranslationRequest::new("hi"))
        .unwrap_err();

    assert!(err.is_connection());
    assert_eq!(err.status_code(), None);
}

#[test]
fn test_https_downgrade_reaches_plain_http_server() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture.mock_json("POST", "/translate", 200, r#"{"translated_text":"ok"}"#);

    let client = ServiceClient::builder().downgrade_https(true).build().unwrap();
    let https_url = fixture.base_url.replacen("http://", "https://", 1);
    let text = client
        .translate(&https_url, &TranslationRequest::new("hi"))
        .unwrap();

    assert_eq!(text, "ok");
    mock.assert();
}
