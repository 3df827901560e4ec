//! Translation endpoint round trips

use crate::integration::mock_server::{MockServerFixture, TEST_IP, TEST_USER};
use caption_bridge::{ErrorKind, Identity, TranslationRequest};
use mockito::Matcher;
use serde_json::json;

#[test]
fn test_translate_sends_identity_and_returns_text() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture
        .server
        .mock("POST", "/translate")
        .match_header("content-type", "application/json")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({
                "text": "你好",
                "user_name": TEST_USER,
                "ip_address": TEST_IP,
            })),
            Matcher::Regex(r#""req_id":"[0-9a-f-]{36}""#.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"success":true,"translated_text":"Hello","original_text":"你好","execution_time":0.42}"#,
        )
        .create();

    let client = fixture.create_test_client();
    let text = client
        .translate(&fixture.bare_address(), &TranslationRequest::new("你好"))
        .expect("translation succeeds");

    assert_eq!(text, "Hello");
    mock.assert();
}

#[test]
fn test_translate_keeps_caller_identity() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture
        .server
        .mock("POST", "/translate")
        .match_body(Matcher::PartialJson(json!({
            "req_id": "req-123",
            "user_name": "alice",
            "ip_address": TEST_IP,
        })))
        .with_status(200)
        .with_body(r#"{"translated_text":"你好"}"#)
        .create();

    let request = TranslationRequest::new("Hello").with_identity(
        Identity::default()
            .with_req_id("req-123")
            .with_user_name("alice"),
    );
    let text = fixture
        .create_test_client()
        .translate(&fixture.base_url, &request)
        .unwrap();

    assert_eq!(text, "你好");
    mock.assert();
}

#[test]
fn test_translate_without_translated_text_is_decode_error() {
    let mut fixture = MockServerFixture::new();
    let _mock = fixture.mock_json(
        "POST",
        "/translate",
        200,
        r#"{"success":true,"original_text":"你好"}"#,
    );

    let err = fixture
        .create_test_client()
        .translate(&fixture.base_url, &TranslationRequest::new("你好"))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(err
        .to_string()
        .contains("Invalid response format: missing translated_text field"));
}
