//! Common behaviour of all call-signaling payloads.

use super::error::{Result, VoipError};
use crate::config::CodecConfig;
use serde_json::Value;
use std::io::Write;

/// A JSON call-signaling payload (offer, answer, ICE candidates, ...).
///
/// Implementors validate in both directions: [`to_json`](Self::to_json)
/// refuses to emit a payload a peer would reject, and
/// [`from_json`](Self::from_json) refuses input that breaks any invariant.
pub trait VoipCallData: Sized {
    /// Optional correlation id of the call this payload belongs to.
    fn call_id(&self) -> Option<i64>;

    /// Validate and build the JSON object.
    fn to_json(&self) -> Result<Value>;

    /// Validate and decode a JSON value.
    fn from_json(value: &Value, config: &CodecConfig) -> Result<Self>;

    fn call_id_or_default(&self, default: i64) -> i64 {
        self.call_id().unwrap_or(default)
    }

    /// Serialize to `out` as compact UTF-8 JSON.
    ///
    /// Nothing is written when validation fails.
    fn write<W: Write>(&self, mut out: W) -> Result<()> {
        let json = self.to_json()?;
        serde_json::to_writer(&mut out, &json)?;
        out.flush()?;
        Ok(())
    }

    fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_json()?)?)
    }

    fn parse(json: &str) -> Result<Self> {
        Self::parse_with_config(json, &CodecConfig::default())
    }

    fn parse_with_config(json: &str, config: &CodecConfig) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json(&value, config)
    }

    fn parse_slice(json: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(json)?;
        Self::from_json(&value, &CodecConfig::default())
    }
}

pub(crate) fn to_value<T: serde::Serialize>(wire: &T) -> Result<Value> {
    serde_json::to_value(wire).map_err(|e| VoipError::BadMessage(format!("cannot encode: {e}")))
}
