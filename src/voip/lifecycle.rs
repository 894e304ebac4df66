//! Payloads that only carry the call id: hangup and ringing.

use super::data::{VoipCallData, to_value};
use super::error::Result;
use super::fields::FieldParser;
use crate::config::CodecConfig;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
struct CallIdWire {
    #[serde(rename = "callId", skip_serializing_if = "Option::is_none")]
    call_id: Option<i64>,
}

fn decode_call_id(value: &Value, what: &'static str) -> Result<Option<i64>> {
    let mut fields = FieldParser::new(value, what)?;
    let call_id = fields.optional_i64("callId");
    fields.finish()?;
    Ok(call_id)
}

/// Either side ends the call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallHangup {
    pub call_id: Option<i64>,
}

impl CallHangup {
    pub fn new(call_id: Option<i64>) -> Self {
        Self { call_id }
    }
}

impl VoipCallData for CallHangup {
    fn call_id(&self) -> Option<i64> {
        self.call_id
    }

    fn to_json(&self) -> Result<Value> {
        to_value(&CallIdWire {
            call_id: self.call_id,
        })
    }

    fn from_json(value: &Value, _config: &CodecConfig) -> Result<Self> {
        decode_call_id(value, "call hangup").map(Self::new)
    }
}

/// The callee's device is ringing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallRinging {
    pub call_id: Option<i64>,
}

impl CallRinging {
    pub fn new(call_id: Option<i64>) -> Self {
        Self { call_id }
    }
}

impl VoipCallData for CallRinging {
    fn call_id(&self) -> Option<i64> {
        self.call_id
    }

    fn to_json(&self) -> Result<Value> {
        to_value(&CallIdWire {
            call_id: self.call_id,
        })
    }

    fn from_json(value: &Value, _config: &CodecConfig) -> Result<Self> {
        decode_call_id(value, "call ringing").map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hangup_encoding() {
        assert_eq!(CallHangup::new(Some(5)).to_json_string().unwrap(), r#"{"callId":5}"#);
        assert_eq!(CallHangup::default().to_json_string().unwrap(), "{}");
    }

    #[test]
    fn test_ringing_parse() {
        assert_eq!(CallRinging::parse("{}").unwrap().call_id(), None);
        assert_eq!(
            CallRinging::parse(r#"{"callId":77}"#).unwrap(),
            CallRinging::new(Some(77))
        );
        assert_eq!(CallRinging::parse(r#"{"callId":77}"#).unwrap().call_id_or_default(0), 77);
    }

    #[test]
    fn test_invalid_call_id() {
        assert!(CallHangup::parse(r#"{"callId":"5"}"#).is_err());
        assert!(CallRinging::parse(r#"{"callId":1.5}"#).is_err());
        assert!(CallRinging::parse("null").is_err());
    }

    #[test]
    fn test_signed_call_id() {
        for id in [-5, i64::MIN, i64::MAX] {
            let hangup = CallHangup::new(Some(id));
            assert_eq!(CallHangup::parse(&hangup.to_json_string().unwrap()).unwrap(), hangup);
        }
    }
}
