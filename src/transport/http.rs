use super::{HttpMethod, RawResponse, Transport, TransportError, WireBody, WireRequest};
use crate::config::ClientConfig;
use crate::{Error, ErrorContext, Result};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::Proxy;
use std::collections::HashMap;
use std::time::Duration;

/// Blocking HTTP transport backed by `reqwest`.
///
/// One attempt per call, bounded by the configured timeout.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs.max(1));

        let mut builder = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(proxy_url) = &config.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    format!("Invalid proxy URL: {}", e),
                    ErrorContext::new()
                        .with_field_path("config.proxy_url")
                        .with_source("http_transport"),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| {
            Error::configuration_with_context(
                format!("Failed to create HTTP client: {}", e),
                ErrorContext::new().with_source("http_transport"),
            )
        })?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn build_form(body: &super::MultipartBody) -> std::result::Result<Form, TransportError> {
        let mut form = Form::new();
        for (name, value) in &body.fields {
            form = form.text(name.clone(), value.clone());
        }
        for file in &body.files {
            let part = Part::bytes(file.data.to_vec())
                .file_name(file.file_name.clone())
                .mime_str(&file.mime)
                .map_err(|e| TransportError::Other(format!("Invalid mime '{}': {}", file.mime, e)))?;
            form = form.part(file.field.clone(), part);
        }
        Ok(form)
    }

    fn map_send_error(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout(format!("no response within {:?}: {}", self.timeout, e))
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Http(e)
        }
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &WireRequest) -> std::result::Result<RawResponse, TransportError> {
        let mut req = match request.method {
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Get => self.client.get(&request.url),
        };

        for (k, v) in &request.headers {
            req = req.header(k.as_str(), v.as_str());
        }

        if !request.query.is_empty() {
            req = req.query(&request.query);
        }

        req = match &request.body {
            WireBody::Empty => req,
            WireBody::Json(value) => req.json(value),
            WireBody::Multipart(body) => req.multipart(Self::build_form(body)?),
        };

        let response = req.send().map_err(|e| self.map_send_error(e))?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response.bytes().map_err(|e| self.map_send_error(e))?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
