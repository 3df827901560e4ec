//! Caption endpoint round trips

use crate::integration::mock_server::{MockServerFixture, TEST_USER};
use caption_bridge::{CaptionRequest, CaptionSource, ErrorKind, GenerationParams};
use mockito::Matcher;

#[test]
fn test_caption_uploads_multipart_form() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture
        .server
        .mock("POST", "/joycaption/generate")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="image_file"; filename="image.jpg""#.to_string()),
            Matcher::Regex("fake-jpeg-bytes".to_string()),
            Matcher::Regex(format!("name=\"user_name\"\r\n\r\n{}\r\n", TEST_USER)),
            Matcher::Regex("name=\"prompt\"\r\n\r\nWhat is in the picture\\?\r\n".to_string()),
            Matcher::Regex("name=\"max_new_tokens\"\r\n\r\n256\r\n".to_string()),
            Matcher::Regex("name=\"req_id\"".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"enCaption":"A cat on a sofa.","cnCaption":"沙发上的一只猫。"}"#)
        .create();

    let params = GenerationParams::new("What is in the picture?").max_new_tokens(256);
    let request = CaptionRequest::new(b"fake-jpeg-bytes".to_vec(), params);
    let result = fixture
        .create_test_client()
        .generate_caption(&fixture.base_url, &request)
        .expect("caption succeeds");

    assert_eq!(result.as_pair(), ("A cat on a sofa.", "沙发上的一只猫。"));
    assert_eq!(result.source, CaptionSource::Service);
    mock.assert();
}

#[test]
fn test_caption_rejects_out_of_range_params_before_sending() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture
        .server
        .mock("POST", "/joycaption/generate")
        .expect(0)
        .create();

    let params = GenerationParams::default().temperature(3.5);
    let err = fixture
        .create_test_client()
        .generate_caption(&fixture.base_url, &CaptionRequest::new(vec![1u8, 2, 3], params))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    mock.assert();
}
