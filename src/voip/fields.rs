//! Error-accumulating accessor for JSON object fields.
//!
//! Decoders read every field they need, then call [`FieldParser::finish`]
//! once, so a single error reports every broken field of one object.
//! JSON `null` is treated as absent for optional fields.

use super::error::{Result, VoipError};
use serde_json::{Map, Value};

pub struct FieldParser<'a> {
    what: &'static str,
    fields: &'a Map<String, Value>,
    pub errors: Vec<String>,
}

impl<'a> FieldParser<'a> {
    /// Fails right away if `value` is not a JSON object.
    pub fn new(value: &'a Value, what: &'static str) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self {
                what,
                fields,
                errors: Vec::new(),
            }),
            other => Err(VoipError::BadMessage(format!(
                "{what} must be a JSON object, got {}",
                type_name(other)
            ))),
        }
    }

    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(&self) -> Result<()> {
        if self.ok() {
            Ok(())
        } else {
            Err(VoipError::BadMessage(format!(
                "{}: {}",
                self.what,
                self.errors.join("; ")
            )))
        }
    }

    fn get_raw(&mut self, key: &str, require: bool) -> Option<&'a Value> {
        match self.fields.get(key) {
            Some(Value::Null) => {
                if require {
                    self.errors.push(format!("required field '{key}' is null"));
                }
                None
            }
            Some(value) => Some(value),
            None => {
                if require {
                    self.errors.push(format!("missing required field '{key}'"));
                }
                None
            }
        }
    }

    fn mismatch(&mut self, key: &str, expected: &str, got: &Value) {
        self.errors.push(format!(
            "field '{key}' must be {expected}, got {}",
            type_name(got)
        ));
    }

    // --- String ---
    fn get_str(&mut self, key: &str, require: bool) -> Option<&'a str> {
        let value = self.get_raw(key, require)?;
        match value.as_str() {
            Some(s) => Some(s),
            None => {
                self.mismatch(key, "a string", value);
                None
            }
        }
    }

    pub fn optional_string(&mut self, key: &str) -> Option<&'a str> {
        self.get_str(key, false)
    }

    pub fn string(&mut self, key: &str) -> Option<&'a str> {
        self.get_str(key, true)
    }

    // --- Boolean ---
    pub fn optional_bool(&mut self, key: &str) -> Option<bool> {
        let value = self.get_raw(key, false)?;
        match value.as_bool() {
            Some(b) => Some(b),
            None => {
                self.mismatch(key, "a boolean", value);
                None
            }
        }
    }

    pub fn bool(&mut self, key: &str) -> Option<bool> {
        self.get_raw(key, true)?;
        self.optional_bool(key)
    }

    // --- Integers ---
    pub fn optional_i64(&mut self, key: &str) -> Option<i64> {
        let value = self.get_raw(key, false)?;
        match value.as_i64() {
            Some(n) => Some(n),
            None => {
                self.mismatch(key, "a 64-bit integer", value);
                None
            }
        }
    }

    fn get_u64(&mut self, key: &str, require: bool) -> Option<u64> {
        let value = self.get_raw(key, require)?;
        match value.as_u64() {
            Some(n) => Some(n),
            None => {
                self.mismatch(key, "an unsigned integer", value);
                None
            }
        }
    }

    pub fn optional_u32(&mut self, key: &str) -> Option<u32> {
        let n = self.get_u64(key, false)?;
        match u32::try_from(n) {
            Ok(n) => Some(n),
            Err(_) => {
                self.errors.push(format!("field '{key}' is out of range: {n}"));
                None
            }
        }
    }

    pub fn u8(&mut self, key: &str) -> Option<u8> {
        let n = self.get_u64(key, true)?;
        match u8::try_from(n) {
            Ok(n) => Some(n),
            Err(_) => {
                self.errors.push(format!("field '{key}' is out of range: {n}"));
                None
            }
        }
    }

    // --- Containers ---
    pub fn array(&mut self, key: &str) -> Option<&'a [Value]> {
        let value = self.get_raw(key, true)?;
        match value.as_array() {
            Some(items) => Some(items.as_slice()),
            None => {
                self.mismatch(key, "an array", value);
                None
            }
        }
    }

    /// Returns the raw value so it can be handed to a nested parser.
    pub fn optional_object(&mut self, key: &str) -> Option<&'a Value> {
        let value = self.get_raw(key, false)?;
        if value.is_object() {
            Some(value)
        } else {
            self.mismatch(key, "an object", value);
            None
        }
    }

    pub fn object(&mut self, key: &str) -> Option<&'a Value> {
        self.get_raw(key, true)?;
        self.optional_object(key)
    }
}

/// Best-effort `callId` of a payload for log prefixes, `0` when absent or invalid.
pub(crate) fn raw_call_id(value: &Value) -> i64 {
    value.get("callId").and_then(Value::as_i64).unwrap_or(0)
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_non_object() {
        let value = json!([1, 2]);
        let err = FieldParser::new(&value, "call answer").err().unwrap();
        assert_eq!(
            err.to_string(),
            "malformed call message: call answer must be a JSON object, got array"
        );
    }

    #[test]
    fn test_null_is_absent_for_optional_fields() {
        let value = json!({"callId": null, "sdp": null});
        let mut fields = FieldParser::new(&value, "test").unwrap();
        assert_eq!(fields.optional_i64("callId"), None);
        assert_eq!(fields.optional_string("sdp"), None);
        assert!(fields.finish().is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let value = json!({"action": 300, "sdp": 5});
        let mut fields = FieldParser::new(&value, "call answer").unwrap();
        assert_eq!(fields.u8("action"), None);
        assert_eq!(fields.optional_string("sdp"), None);
        assert_eq!(fields.array("candidates"), None);

        assert_eq!(fields.errors.len(), 3);
        let msg = fields.finish().unwrap_err().to_string();
        assert!(msg.contains("field 'action' is out of range: 300"));
        assert!(msg.contains("field 'sdp' must be a string, got number"));
        assert!(msg.contains("missing required field 'candidates'"));
    }

    #[test]
    fn test_required_null_reports_null() {
        let value = json!({"candidates": null});
        let mut fields = FieldParser::new(&value, "ice candidates").unwrap();
        assert!(fields.array("candidates").is_none());
        assert_eq!(fields.errors, vec!["required field 'candidates' is null"]);
    }

    #[test]
    fn test_signed_integers() {
        let value = json!({"a": -1, "b": i64::MIN, "c": i64::MAX});
        let mut fields = FieldParser::new(&value, "test").unwrap();
        assert_eq!(fields.optional_i64("a"), Some(-1));
        assert_eq!(fields.optional_i64("b"), Some(i64::MIN));
        assert_eq!(fields.optional_i64("c"), Some(i64::MAX));
        assert!(fields.finish().is_ok());
    }

    #[test]
    fn test_i64_rejects_out_of_range_and_fractions() {
        let value = json!({"big": u64::MAX, "half": 1.5, "text": "5"});
        let mut fields = FieldParser::new(&value, "test").unwrap();
        assert_eq!(fields.optional_i64("big"), None);
        assert_eq!(fields.optional_i64("half"), None);
        assert_eq!(fields.optional_i64("text"), None);
        assert_eq!(fields.errors.len(), 3);
        assert!(fields.errors[0].contains("field 'big' must be a 64-bit integer"));
    }

    #[test]
    fn test_negative_number_is_out_of_range_for_u8() {
        let value = json!({"action": -1});
        let mut fields = FieldParser::new(&value, "test").unwrap();
        assert_eq!(fields.u8("action"), None);
        assert!(!fields.ok());
    }

    #[test]
    fn test_raw_call_id_for_logging() {
        assert_eq!(raw_call_id(&json!({"callId": -7, "action": "x"})), -7);
        assert_eq!(raw_call_id(&json!({"callId": "7"})), 0);
        assert_eq!(raw_call_id(&json!({})), 0);
        assert_eq!(raw_call_id(&json!([1])), 0);
    }
}
