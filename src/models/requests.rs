//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::Value;

/// Request body for the store operation (POST /data)
///
/// # Fields
/// - `value`: The payload to store — a JSON string, integer or float
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRequest {
    /// The payload to store
    pub value: serde_json::Value,
}

impl StoreRequest {
    /// Converts the JSON payload into a cache value.
    ///
    /// Returns an error message for payload shapes the cache does not
    /// accept (objects, arrays, booleans, null).
    pub fn to_value(&self) -> Result<Value, String> {
        match &self.value {
            serde_json::Value::String(s) => Ok(Value::Str(s.clone())),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::Float(f))
                } else {
                    Err("numeric value out of range".to_string())
                }
            }
            other => Err(format!(
                "value must be a string or number, got {}",
                json_type_name(other)
            )),
        }
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_request_deserialize_string() {
        let json = r#"{"value": "hello"}"#;
        let req: StoreRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.to_value().unwrap(), Value::Str("hello".to_string()));
    }

    #[test]
    fn test_store_request_deserialize_int() {
        let json = r#"{"value": 42}"#;
        let req: StoreRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.to_value().unwrap(), Value::Int(42));
    }

    #[test]
    fn test_store_request_deserialize_float() {
        let json = r#"{"value": 2.5}"#;
        let req: StoreRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.to_value().unwrap(), Value::Float(2.5));
    }

    #[test]
    fn test_store_request_rejects_object() {
        let json = r#"{"value": {"nested": true}}"#;
        let req: StoreRequest = serde_json::from_str(json).unwrap();
        let err = req.to_value().unwrap_err();
        assert!(err.contains("object"));
    }

    #[test]
    fn test_store_request_rejects_null() {
        let json = r#"{"value": null}"#;
        let req: StoreRequest = serde_json::from_str(json).unwrap();
        assert!(req.to_value().is_err());
    }
}
