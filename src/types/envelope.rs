//! Request/response envelopes.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const REQ_ID: &str = "req_id";
pub const USER_NAME: &str = "user_name";
pub const IP_ADDRESS: &str = "ip_address";

/// Caller-supplied identity. Any field left `None` is filled by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub req_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

impl Identity {
    pub fn with_req_id(mut self, id: impl Into<String>) -> Self {
        self.req_id = Some(id.into());
        self
    }

    pub fn with_user_name(mut self, name: impl Into<String>) -> Self {
        self.user_name = Some(name.into());
        self
    }

    pub fn with_ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    /// Write the set fields into `payload`, leaving existing keys alone.
    pub fn apply_to(&self, payload: &mut Map<String, Value>) {
        for (key, value) in [
            (REQ_ID, &self.req_id),
            (USER_NAME, &self.user_name),
            (IP_ADDRESS, &self.ip_address),
        ] {
            if let Some(v) = value {
                payload
                    .entry(key.to_string())
                    .or_insert_with(|| Value::String(v.clone()));
            }
        }
    }
}

/// Outbound envelope: the three identity fields plus the endpoint payload.
///
/// Identity keys never appear inside `payload`; the builder lifts them out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestEnvelope {
    pub req_id: String,
    pub user_name: String,
    pub ip_address: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl RequestEnvelope {
    pub fn to_json(&self) -> Value {
        let mut obj = Map::with_capacity(self.payload.len() + 3);
        obj.insert(REQ_ID.to_string(), Value::String(self.req_id.clone()));
        obj.insert(USER_NAME.to_string(), Value::String(self.user_name.clone()));
        obj.insert(IP_ADDRESS.to_string(), Value::String(self.ip_address.clone()));
        for (k, v) in &self.payload {
            obj.insert(k.clone(), v.clone());
        }
        Value::Object(obj)
    }

    /// Flatten into form fields. Strings go out raw, everything else as JSON text.
    pub fn to_form_fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::with_capacity(self.payload.len() + 3);
        fields.push((REQ_ID.to_string(), self.req_id.clone()));
        fields.push((USER_NAME.to_string(), self.user_name.clone()));
        fields.push((IP_ADDRESS.to_string(), self.ip_address.clone()));
        for (k, v) in &self.payload {
            let rendered = match v {
                Value::String(s) => s.clone(),
                Value::Null => continue,
                other => other.to_string(),
            };
            fields.push((k.clone(), rendered));
        }
        fields
    }
}

fn default_success() -> bool {
    true
}

/// Loose truthiness for the `success` flag: `null`, `false`, `0`, `""`,
/// `[]` and `{}` all mean failure.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn truthy_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(is_truthy(&Value::deserialize(deserializer)?))
}

/// `"msg": null` reads as an empty message.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Inbound envelope. Domain fields are flattened into `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    #[serde(default = "default_success", deserialize_with = "truthy_flag")]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub msg: String,
    #[serde(default)]
    pub res_id: Option<String>,
    #[serde(default)]
    pub rel_req_id: Option<String>,
    #[serde(default)]
    pub res_time: Option<String>,
    #[serde(flatten)]
    pub data: T,
}
