//! Error classification logic
//!
//! Turns a received status + body into either the parsed body or one typed
//! [`Error`]. Pure: no I/O, no retries.

use crate::error::{Error, ErrorKind, ErrorRecord};
use crate::types::envelope::is_truthy;
use crate::Result;
use serde_json::Value;

pub(crate) const UNKNOWN_ERROR: &str = "Unknown error";

/// Fixed status table for HTTP failures. `None` below 400.
pub fn kind_for_status(status: u16) -> Option<ErrorKind> {
    match status {
        401 => Some(ErrorKind::Authentication),
        422 => Some(ErrorKind::Validation),
        429 => Some(ErrorKind::RateLimited),
        s if s >= 500 => Some(ErrorKind::ServiceUnavailable),
        s if s >= 400 => Some(ErrorKind::Api),
        _ => None,
    }
}

/// Classify a response.
///
/// Order matters: an unparsable body wins over everything, then an envelope
/// whose `success` is falsy (even on 2xx), then the status table.
pub fn classify(status: u16, body: &[u8]) -> Result<Value> {
    let text = String::from_utf8_lossy(body);

    let data: Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(_) => {
            return Err(Error::Validation(
                ErrorRecord::new(format!("Invalid JSON response: {}", text))
                    .with_status(status)
                    .with_body(text.into_owned()),
            ));
        }
    };

    if let Some(success) = data.get("success") {
        if !is_truthy(success) {
            let msg = data
                .get("msg")
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN_ERROR);
            return Err(Error::Api(
                ErrorRecord::new(msg)
                    .with_status(status)
                    .with_body(text.into_owned()),
            ));
        }
    }

    if let Some(kind) = kind_for_status(status) {
        let record = ErrorRecord::new(detail_message(&data))
            .with_status(status)
            .with_body(text.into_owned());
        return Err(match kind {
            ErrorKind::Authentication => Error::Authentication(record),
            ErrorKind::Validation => Error::Validation(record),
            ErrorKind::RateLimited => Error::RateLimited(record),
            ErrorKind::ServiceUnavailable => Error::ServiceUnavailable(record),
            _ => Error::Api(record),
        });
    }

    Ok(data)
}

/// `detail` as the service sent it; structured details are rendered as compact JSON.
fn detail_message(data: &Value) -> String {
    match data.get("detail") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => UNKNOWN_ERROR.to_string(),
        Some(other) => other.to_string(),
    }
}
