//! Canonical request construction: URL normalization, identity injection and
//! body encoding.

use crate::config::ClientConfig;
use crate::transport::{FilePart, HttpMethod, MultipartBody, WireBody, WireRequest};
use crate::types::envelope::{RequestEnvelope, IP_ADDRESS, REQ_ID, USER_NAME};
use crate::{Error, ErrorContext, Result};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// One logical call, before it is turned into a [`WireRequest`].
#[derive(Debug, Clone)]
pub struct ServiceCall {
    pub method: HttpMethod,
    pub base_url: String,
    pub endpoint: String,
    pub payload: Map<String, Value>,
    /// Binary attachment; switches the body to multipart.
    pub attachment: Option<FilePart>,
}

impl ServiceCall {
    pub fn new(method: HttpMethod, base_url: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            base_url: base_url.into(),
            endpoint: endpoint.into(),
            payload: Map::new(),
            attachment: None,
        }
    }

    pub fn payload(mut self, payload: Map<String, Value>) -> Self {
        self.payload = payload;
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    pub fn attachment(mut self, file: FilePart) -> Self {
        self.attachment = Some(file);
        self
    }
}

/// Builds wire requests from [`ServiceCall`]s using the client's identity and headers.
pub struct RequestBuilder<'a> {
    config: &'a ClientConfig,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(config: &'a ClientConfig) -> Self {
        Self { config }
    }

    /// Lift identity fields out of `payload`, filling only the absent ones.
    pub fn envelope(&self, mut payload: Map<String, Value>) -> RequestEnvelope {
        let req_id = take_string(&mut payload, REQ_ID).unwrap_or_else(|| Uuid::new_v4().to_string());
        let user_name =
            take_string(&mut payload, USER_NAME).unwrap_or_else(|| self.config.user_name.clone());
        let ip_address =
            take_string(&mut payload, IP_ADDRESS).unwrap_or_else(|| self.config.ip_address.clone());

        RequestEnvelope {
            req_id,
            user_name,
            ip_address,
            payload,
        }
    }

    pub fn build(&self, call: ServiceCall) -> Result<WireRequest> {
        debug!("base_url: {}", call.base_url);
        let base = normalize_base_url(&call.base_url, self.config.downgrade_https)?;
        let url = join_url(&base, &call.endpoint);
        debug!("request url: {}", url);

        let envelope = self.envelope(call.payload);

        let mut headers: Vec<(String, String)> = self
            .config
            .default_headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let (query, body) = match (call.attachment, call.method) {
            (Some(file), _) => {
                // reqwest writes its own multipart content type with the boundary
                headers.retain(|(k, _)| !k.eq_ignore_ascii_case("content-type"));
                let body = MultipartBody {
                    fields: envelope.to_form_fields(),
                    files: vec![file],
                };
                (Vec::new(), WireBody::Multipart(body))
            }
            (None, HttpMethod::Get) => {
                set_json_content_type(&mut headers);
                (envelope.to_form_fields(), WireBody::Empty)
            }
            (None, HttpMethod::Post) => {
                set_json_content_type(&mut headers);
                (Vec::new(), WireBody::Json(envelope.to_json()))
            }
        };

        Ok(WireRequest {
            method: call.method,
            url,
            headers,
            query,
            body,
        })
    }
}

fn set_json_content_type(headers: &mut Vec<(String, String)>) {
    headers.retain(|(k, _)| !k.eq_ignore_ascii_case("content-type"));
    headers.push(("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string()));
}

fn take_string(payload: &mut Map<String, Value>, key: &str) -> Option<String> {
    match payload.remove(key)? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Trim, add `http://` when no scheme is given, optionally downgrade `https://`.
pub fn normalize_base_url(raw: &str, downgrade_https: bool) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::configuration_with_context(
            "base URL is empty",
            ErrorContext::new().with_source("request_builder"),
        ));
    }

    let lower = trimmed.to_ascii_lowercase();
    let url = if lower.starts_with("http://") {
        trimmed.to_string()
    } else if lower.starts_with("https://") {
        if downgrade_https {
            warn!(
                "downgrading {} to plain http; transport encryption is disabled for this call",
                trimmed
            );
            format!("http://{}", &trimmed["https://".len()..])
        } else {
            trimmed.to_string()
        }
    } else if trimmed.contains("://") {
        return Err(Error::configuration_with_context(
            "unsupported URL scheme",
            ErrorContext::new()
                .with_details(trimmed.to_string())
                .with_source("request_builder"),
        ));
    } else {
        format!("http://{}", trimmed)
    };

    let parsed = url::Url::parse(&url).map_err(|e| {
        Error::configuration_with_context(
            format!("invalid base URL: {}", e),
            ErrorContext::new()
                .with_details(url.clone())
                .with_source("request_builder"),
        )
    })?;
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(Error::configuration_with_context(
            "base URL has no host",
            ErrorContext::new()
                .with_details(url)
                .with_source("request_builder"),
        ));
    }

    Ok(url)
}

/// Join on exactly one `/`.
pub fn join_url(base: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use serde_json::json;

    fn config() -> ClientConfig {
        ClientConfig::default()
    }

    #[test]
    fn normalize_adds_scheme_and_trims() {
        assert_eq!(
            normalize_base_url("  10.0.0.5:8000 ", false).unwrap(),
            "http://10.0.0.5:8000"
        );
        assert_eq!(
            normalize_base_url("http://host:1/", false).unwrap(),
            "http://host:1/"
        );
    }

    #[test]
    fn https_is_kept_unless_downgrade_requested() {
        assert_eq!(
            normalize_base_url("https://caption.local", false).unwrap(),
            "https://caption.local"
        );
        assert_eq!(
            normalize_base_url("https://caption.local", true).unwrap(),
            "http://caption.local"
        );
    }

    #[test]
    fn normalize_rejects_empty_and_foreign_schemes() {
        assert!(normalize_base_url("   ", false).is_err());
        assert!(normalize_base_url("ftp://files.local", false).is_err());
    }

    #[test]
    fn join_uses_single_separator() {
        assert_eq!(join_url("http://h/", "/translate"), "http://h/translate");
        assert_eq!(join_url("http://h", "translate"), "http://h/translate");
        assert_eq!(join_url("http://h//", "//health/direct"), "http://h/health/direct");
    }

    #[test]
    fn missing_identity_is_generated() {
        let cfg = config();
        let env = RequestBuilder::new(&cfg).envelope(Map::new());
        assert!(!env.req_id.is_empty());
        assert!(Uuid::parse_str(&env.req_id).is_ok());
        assert_eq!(env.user_name, "anonymous");
        assert_eq!(env.ip_address, "127.0.0.1");
    }

    #[test]
    fn present_identity_passes_through() {
        let cfg = config();
        let mut payload = Map::new();
        payload.insert("req_id".into(), json!("fixed-id"));
        payload.insert("user_name".into(), json!("alice"));
        payload.insert("ip_address".into(), json!("10.1.1.1"));
        payload.insert("text".into(), json!("hi"));
        let env = RequestBuilder::new(&cfg).envelope(payload);
        assert_eq!(env.req_id, "fixed-id");
        assert_eq!(env.user_name, "alice");
        assert_eq!(env.ip_address, "10.1.1.1");
        assert_eq!(env.payload.len(), 1);

        let body = env.to_json();
        assert_eq!(body["req_id"], json!("fixed-id"));
        assert_eq!(body["text"], json!("hi"));
    }

    #[test]
    fn each_request_gets_a_fresh_id() {
        let cfg = config();
        let b = RequestBuilder::new(&cfg);
        assert_ne!(b.envelope(Map::new()).req_id, b.envelope(Map::new()).req_id);
    }

    #[test]
    fn json_post_sets_content_type() {
        let cfg = config();
        let req = RequestBuilder::new(&cfg)
            .build(ServiceCall::new(HttpMethod::Post, "svc:9000", "translate").field("text", "hi"))
            .unwrap();
        assert_eq!(req.url, "http://svc:9000/translate");
        assert_eq!(req.header("content-type"), Some(CONTENT_TYPE_JSON));
        match req.body {
            WireBody::Json(v) => {
                assert_eq!(v["text"], json!("hi"));
                assert!(v.get("req_id").is_some());
            }
            other => panic!("expected JSON body, got {:?}", other),
        }
    }

    #[test]
    fn attachment_switches_to_multipart_without_content_type() {
        let mut cfg = config();
        cfg.default_headers
            .insert("Content-Type".into(), CONTENT_TYPE_JSON.into());
        cfg.default_headers.insert("x-team".into(), "caption".into());
        let file = FilePart {
            field: "image_file".into(),
            file_name: "image.jpg".into(),
            mime: "image/jpeg".into(),
            data: Bytes::from_static(b"\xff\xd8\xff"),
        };
        let req = RequestBuilder::new(&cfg)
            .build(
                ServiceCall::new(HttpMethod::Post, "svc", "joycaption/generate")
                    .field("prompt", "Describe")
                    .attachment(file),
            )
            .unwrap();
        assert_eq!(req.header("content-type"), None);
        assert_eq!(req.header("x-team"), Some("caption"));
        match req.body {
            WireBody::Multipart(body) => {
                assert_eq!(body.files.len(), 1);
                let names: Vec<&str> = body.fields.iter().map(|(k, _)| k.as_str()).collect();
                for key in ["req_id", "user_name", "ip_address", "prompt"] {
                    assert!(names.contains(&key), "missing form field {}", key);
                }
            }
            other => panic!("expected multipart body, got {:?}", other),
        }
    }

    #[test]
    fn get_carries_identity_in_query() {
        let cfg = config();
        let req = RequestBuilder::new(&cfg)
            .build(ServiceCall::new(HttpMethod::Get, "svc", "health/direct"))
            .unwrap();
        assert!(matches!(req.body, WireBody::Empty));
        let keys: Vec<&str> = req.query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["req_id", "user_name", "ip_address"]);
    }
}
