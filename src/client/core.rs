use crate::caption::{CaptionResult, CaptionSource};
use crate::client::endpoint::Endpoint;
use crate::client::error_classification::classify;
use crate::client::request::{RequestBuilder, ServiceCall};
use crate::config::ClientConfig;
use crate::transport::{FilePart, Transport};
use crate::types::{
    CacheClearResponse, CaptionFields, CaptionRequest, HealthStatus, MemoryCleanupResponse,
    ResponseEnvelope, TranslationFields, TranslationRequest,
};
use crate::{Error, ErrorContext, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error, info};

const LOG_BODY_LIMIT: usize = 1000;

/// Typed client for the caption service.
///
/// Blocking; one request per call, no retries. Safe to share across threads.
pub struct ServiceClient {
    pub(crate) config: ClientConfig,
    pub(crate) transport: Arc<dyn Transport>,
}

impl ServiceClient {
    /// Client with defaults plus environment overrides.
    pub fn new() -> Result<Self> {
        crate::client::builder::ServiceClientBuilder::from_env().build()
    }

    pub fn builder() -> crate::client::builder::ServiceClientBuilder {
        crate::client::builder::ServiceClientBuilder::new()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build, send and classify one call. The returned value is the parsed body.
    pub fn call(&self, call: ServiceCall) -> Result<Value> {
        let method = call.method;
        let request = RequestBuilder::new(&self.config).build(call)?;

        info!("Sending {} request to {}", method, request.url);
        debug!("Request headers: {:?}", request.headers);

        let response = self.transport.execute(&request)?;

        info!("Received response with status {}", response.status);
        if tracing::enabled!(tracing::Level::DEBUG) {
            let text = response.text();
            let preview: String = text.chars().take(LOG_BODY_LIMIT).collect();
            debug!("Response content: {}", preview);
        }

        classify(response.status, &response.body)
    }

    fn call_endpoint<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        base_url: &str,
        payload: Map<String, Value>,
        attachment: Option<FilePart>,
    ) -> Result<ResponseEnvelope<T>> {
        let mut call = ServiceCall::new(endpoint.method(), base_url, endpoint.path(&self.config))
            .payload(payload);
        if let Some(file) = attachment {
            call = call.attachment(file);
        }

        let value = self.call(call).map_err(|e| {
            error!("Error in {}: {}", endpoint.name(), e);
            e
        })?;

        decode(value, endpoint.name())
    }

    pub fn health_check(&self, base_url: &str) -> Result<HealthStatus> {
        let endpoint = Endpoint::HealthCheck;
        let call = ServiceCall::new(endpoint.method(), base_url, endpoint.path(&self.config));
        match self.call(call)? {
            Value::String(status) => Ok(HealthStatus {
                status: Some(status),
                ..HealthStatus::default()
            }),
            value => decode(value, endpoint.name()),
        }
    }

    /// Clear the service's caches; `None` clears all of them.
    pub fn clear_cache(&self, base_url: &str, service: Option<&str>) -> Result<CacheClearResponse> {
        let mut payload = Map::new();
        payload.insert(
            "service".into(),
            service.map_or(Value::Null, |s| Value::String(s.to_string())),
        );
        let env: ResponseEnvelope<CacheClearResponse> =
            self.call_endpoint(Endpoint::ClearCache, base_url, payload, None)?;
        Ok(env.data)
    }

    pub fn cleanup_memory(&self, base_url: &str, service: &str) -> Result<MemoryCleanupResponse> {
        if service.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "a service name is required for memory cleanup",
                ErrorContext::new()
                    .with_field_path("service")
                    .with_source(Endpoint::MemoryCleanup.name()),
            ));
        }
        let mut payload = Map::new();
        payload.insert("service".into(), Value::String(service.to_string()));
        let env: ResponseEnvelope<MemoryCleanupResponse> =
            self.call_endpoint(Endpoint::MemoryCleanup, base_url, payload, None)?;
        Ok(env.data)
    }

    /// Upload an image and get the service's English/Chinese caption pair.
    pub fn generate_caption(&self, base_url: &str, request: &CaptionRequest) -> Result<CaptionResult> {
        request.params.validate()?;

        let mut payload = request.params.to_payload();
        request.identity.apply_to(&mut payload);

        let image = FilePart {
            field: "image_file".into(),
            file_name: "image.jpg".into(),
            mime: "image/jpeg".into(),
            data: request.image.clone(),
        };

        let env: ResponseEnvelope<CaptionFields> =
            self.call_endpoint(Endpoint::GenerateCaption, base_url, payload, Some(image))?;

        Ok(CaptionResult {
            english: env.data.en_caption,
            chinese: env.data.cn_caption,
            source: CaptionSource::Service,
        })
    }

    pub fn translate(&self, base_url: &str, request: &TranslationRequest) -> Result<String> {
        let mut payload = Map::new();
        payload.insert("text".into(), Value::String(request.text.clone()));
        request.identity.apply_to(&mut payload);

        let env: ResponseEnvelope<TranslationFields> =
            self.call_endpoint(Endpoint::Translate, base_url, payload, None)?;

        env.data.translated_text.ok_or_else(|| {
            Error::decode_with_context(
                "Invalid response format: missing translated_text field",
                ErrorContext::new()
                    .with_field_path("response.translated_text")
                    .with_source(Endpoint::Translate.name()),
            )
        })
    }
}

fn decode<T: DeserializeOwned>(value: Value, source: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        Error::decode_with_context(
            format!("Unexpected response shape: {}", e),
            ErrorContext::new().with_source(source.to_string()),
        )
    })
}
