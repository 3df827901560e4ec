//! Health and administration endpoints

use crate::integration::mock_server::{MockServerFixture, TEST_IP, TEST_USER};
use caption_bridge::ErrorKind;
use mockito::Matcher;
use serde_json::json;

#[test]
fn test_health_check_sends_identity_as_query() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture
        .server
        .mock("GET", "/health/direct")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("user_name".into(), TEST_USER.into()),
            Matcher::UrlEncoded("ip_address".into(), TEST_IP.into()),
            Matcher::Regex("req_id=".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"status":"ok","gpu":"available"}"#)
        .create();

    let status = fixture
        .create_test_client()
        .health_check(&fixture.bare_address())
        .unwrap();

    assert!(status.is_healthy());
    assert_eq!(status.extra.get("gpu"), Some(&json!("available")));
    mock.assert();
}

#[test]
fn test_health_check_accepts_plain_string() {
    let mut fixture = MockServerFixture::new();
    let _mock = fixture
        .server
        .mock("GET", "/health/direct")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#""healthy""#)
        .create();

    let status = fixture
        .create_test_client()
        .health_check(&fixture.base_url)
        .unwrap();
    assert_eq!(status.status.as_deref(), Some("healthy"));
}

#[test]
fn test_clear_cache_for_one_service() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture
        .server
        .mock("POST", "/admin/clear-cache")
        .match_body(Matcher::PartialJson(json!({"service": "joycaption"})))
        .with_status(200)
        .with_body(r#"{"success":true,"cleared_count":3,"cleared_services":["joycaption"]}"#)
        .create();

    let cleared = fixture
        .create_test_client()
        .clear_cache(&fixture.base_url, Some("joycaption"))
        .unwrap();

    assert_eq!(cleared.cleared_count, 3);
    assert_eq!(cleared.cleared_services, vec!["joycaption".to_string()]);
    mock.assert();
}

#[test]
fn test_clear_cache_for_all_services_sends_null() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture
        .server
        .mock("POST", "/admin/clear-cache")
        .match_body(Matcher::PartialJson(json!({"service": null})))
        .with_status(200)
        .with_body(r#"{"cleared_count":5,"cleared_services":["joycaption","translate"]}"#)
        .create();

    let cleared = fixture
        .create_test_client()
        .clear_cache(&fixture.base_url, None)
        .unwrap();

    assert_eq!(cleared.cleared_count, 5);
    mock.assert();
}

#[test]
fn test_cleanup_memory() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture
        .server
        .mock("POST", "/admin/cleanup-memory")
        .match_body(Matcher::PartialJson(json!({"service": "joycaption"})))
        .with_status(200)
        .with_body(r#"{"success":true,"freed_memory":true,"cleanup_details":"model unloaded"}"#)
        .create();

    let freed = fixture
        .create_test_client()
        .cleanup_memory(&fixture.base_url, "joycaption")
        .unwrap();

    assert!(freed.freed_memory);
    assert_eq!(freed.cleanup_details, "model unloaded");
    mock.assert();
}

#[test]
fn test_cleanup_memory_requires_service() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture
        .server
        .mock("POST", "/admin/cleanup-memory")
        .expect(0)
        .create();

    let err = fixture
        .create_test_client()
        .cleanup_memory(&fixture.base_url, "  ")
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    mock.assert();
}
