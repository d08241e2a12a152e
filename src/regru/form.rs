//! Flattening of request structs into the `application/x-www-form-urlencoded`
//! body the regru2 API accepts.
//!
//! Requests are serialized to a [`serde_json::Value`] tree first and then walked:
//!
//! - scalars become `key=value`
//! - lists repeat their key once per element
//! - nested objects become `parent.child=value`
//! - domain objects (anything carrying a `dname` field) collapse to a single
//!   `domain_name=<dname>` pair and their other fields are dropped
//!
//! The last rule is specific to this API: requests model the target as a list
//! of domain objects, but each call takes exactly one `domain_name` parameter.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{RegruError, Result};

/// Wire key a domain object collapses to.
pub const DOMAIN_NAME_KEY: &str = "domain_name";

/// Field that marks an object as a domain.
const DOMAIN_FIELD: &str = "dname";

/// Keys whose values never reach the logs.
const REDACTED_KEYS: &[&str] = &["password"];

/// Ordered multi-map of form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBody {
    pairs: Vec<(String, String)>,
}

impl FormBody {
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Percent-encoded `k=v&k=v` payload.
    pub fn to_urlencoded(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Human-readable rendering with secrets masked.
    pub fn to_log_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| {
                if REDACTED_KEYS.contains(&k.as_str()) {
                    format!("{k}=***")
                } else {
                    format!("{k}={v}")
                }
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Flatten `request` into a form body.
///
/// Only fails if `request` does not serialize to a JSON object, which means the
/// request type itself is wrong rather than its contents.
pub fn encode_form<T: Serialize>(request: &T) -> Result<FormBody> {
    let value = serde_json::to_value(request).map_err(|e| RegruError::Encoding(e.to_string()))?;
    let fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(RegruError::Encoding(format!(
                "expected a structured request, got {other}"
            )));
        }
    };

    let mut body = FormBody::default();
    for (key, value) in &fields {
        flatten_field(key, value, &mut body);
    }
    Ok(body)
}

fn flatten_field(key: &str, value: &Value, body: &mut FormBody) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                flatten_field(key, item, body);
            }
        }
        Value::Object(map) => flatten_object(key, map, body),
        scalar => body.push(key, stringify(scalar)),
    }
}

fn flatten_object(key: &str, map: &Map<String, Value>, body: &mut FormBody) {
    // Domain collapsing wins over the generic dotted form.
    if let Some(name) = domain_name(map) {
        body.push(DOMAIN_NAME_KEY, name);
        return;
    }
    for (sub, value) in map {
        flatten_field(&format!("{key}.{sub}"), value, body);
    }
}

fn domain_name(map: &Map<String, Value>) -> Option<String> {
    map.get(DOMAIN_FIELD)
        .filter(|v| !v.is_null())
        .map(stringify)
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_domain_collapses_to_domain_name() {
        let body = encode_form(&json!({ "domains": [{ "dname": "example.com" }] })).unwrap();
        assert_eq!(
            body.pairs(),
            &[("domain_name".to_string(), "example.com".to_string())]
        );
        assert!(!body.contains_key("domains.0.dname"));
        assert!(!body.contains_key("domains.dname"));
    }

    #[test]
    fn domain_siblings_are_discarded() {
        let body = encode_form(&json!({
            "domain": { "dname": "example.com", "service_id": 42 }
        }))
        .unwrap();
        assert_eq!(body.len(), 1);
        assert_eq!(body.get("domain_name"), Some("example.com"));
    }

    #[test]
    fn nested_objects_use_dotted_keys() {
        let body = encode_form(&json!({
            "contacts": { "email": "admin@example.com", "phone": "+7.4951234567" }
        }))
        .unwrap();
        assert_eq!(body.get("contacts.email"), Some("admin@example.com"));
        assert_eq!(body.get("contacts.phone"), Some("+7.4951234567"));
        assert_eq!(body.len(), 2);
    }

    #[test]
    fn scalar_lists_repeat_the_key() {
        let body = encode_form(&json!({ "ns": ["ns1.reg.ru", "ns2.reg.ru"] })).unwrap();
        assert_eq!(body.get_all("ns"), vec!["ns1.reg.ru", "ns2.reg.ru"]);
    }

    #[test]
    fn scalars_render_as_plain_text() {
        let body = encode_form(&json!({
            "priority": 10,
            "enabled": true,
            "text": "v=spf1 -all",
            "missing": null
        }))
        .unwrap();
        assert_eq!(body.get("priority"), Some("10"));
        assert_eq!(body.get("enabled"), Some("true"));
        assert_eq!(body.get("text"), Some("v=spf1 -all"));
        assert!(!body.contains_key("missing"));
    }

    #[test]
    fn non_object_requests_are_rejected() {
        let err = encode_form(&json!(["not", "a", "request"])).unwrap_err();
        assert!(matches!(err, RegruError::Encoding(_)));
    }

    #[test]
    fn urlencoded_escapes_reserved_characters() {
        let body = encode_form(&json!({ "text": "v=spf1 -all", "subdomain": "@" })).unwrap();
        let encoded = body.to_urlencoded();
        assert!(encoded.contains("text=v%3Dspf1%20-all"));
        assert!(encoded.contains("subdomain=%40"));
        assert_eq!(encoded.matches('&').count(), 1);
    }

    #[test]
    fn log_string_masks_password() {
        let body = encode_form(&json!({ "username": "test", "password": "hunter2" })).unwrap();
        let logged = body.to_log_string();
        assert!(logged.contains("password=***"));
        assert!(logged.contains("username=test"));
        assert!(!logged.contains("hunter2"));
    }
}
