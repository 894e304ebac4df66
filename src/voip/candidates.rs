//! ICE candidate exchange payload.
//!
//! ```json
//! {"callId": 9001, "candidates": [{"candidate": "...", "sdpMid": "0",
//!  "sdpMLineIndex": 0, "ufrag": "..."}], "removed": false}
//! ```

use super::data::{VoipCallData, to_value};
use super::error::{Result, VoipError};
use super::fields::{FieldParser, raw_call_id};
use crate::config::CodecConfig;
use log::debug;
use serde::Serialize;
use serde_json::Value;

/// A single ICE candidate.
///
/// Every field but `candidate` is nullable, and all four keys are always
/// emitted, nulls included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub candidate: String,
    #[serde(rename = "sdpMid")]
    pub sdp_mid: Option<String>,
    #[serde(rename = "sdpMLineIndex")]
    pub sdp_m_line_index: Option<u32>,
    pub ufrag: Option<String>,
}

impl Candidate {
    pub fn new(
        candidate: impl Into<String>,
        sdp_mid: Option<String>,
        sdp_m_line_index: Option<u32>,
        ufrag: Option<String>,
    ) -> Self {
        Self {
            candidate: candidate.into(),
            sdp_mid,
            sdp_m_line_index,
            ufrag,
        }
    }

    fn parse(value: &Value) -> Result<Self> {
        let mut fields = FieldParser::new(value, "ice candidate")?;
        let candidate = fields.string("candidate");
        let sdp_mid = fields.optional_string("sdpMid");
        let sdp_m_line_index = fields.optional_u32("sdpMLineIndex");
        let ufrag = fields.optional_string("ufrag");
        fields.finish()?;

        Ok(Self {
            candidate: candidate.unwrap_or_default().to_string(),
            sdp_mid: sdp_mid.map(str::to_string),
            sdp_m_line_index,
            ufrag: ufrag.map(str::to_string),
        })
    }
}

/// A batch of ICE candidates for one call.
///
/// `removed` applies to the whole batch: the candidates are being retracted
/// rather than added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    call_id: Option<i64>,
    candidates: Vec<Candidate>,
    removed: bool,
}

#[derive(Serialize)]
struct CandidateSetWire<'a> {
    #[serde(rename = "callId", skip_serializing_if = "Option::is_none")]
    call_id: Option<i64>,
    candidates: &'a [Candidate],
    removed: bool,
}

impl CandidateSet {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            ..Default::default()
        }
    }

    pub fn with_call_id(mut self, call_id: i64) -> Self {
        self.call_id = Some(call_id);
        self
    }

    pub fn with_removed(mut self, removed: bool) -> Self {
        self.removed = removed;
        self
    }

    pub fn set_call_id(&mut self, call_id: i64) {
        self.call_id = Some(call_id);
    }

    pub fn set_candidates(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates;
    }

    pub fn set_removed(&mut self, removed: bool) {
        self.removed = removed;
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn into_candidates(self) -> Vec<Candidate> {
        self.candidates
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Keep only the candidates matching `predicate`, in their original order.
    pub fn filter<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&Candidate) -> bool,
    {
        self.candidates.retain(|c| predicate(c));
    }
}

impl VoipCallData for CandidateSet {
    fn call_id(&self) -> Option<i64> {
        self.call_id
    }

    fn to_json(&self) -> Result<Value> {
        to_value(&CandidateSetWire {
            call_id: self.call_id,
            candidates: &self.candidates,
            removed: self.removed,
        })
    }

    fn from_json(value: &Value, config: &CodecConfig) -> Result<Self> {
        let mut fields = FieldParser::new(value, "ice candidates")?;
        let call_id = fields.optional_i64("callId");
        let items = fields.array("candidates");
        let removed = if config.require_removed_flag {
            fields.bool("removed")
        } else {
            fields.optional_bool("removed")
        };
        if let Err(e) = fields.finish() {
            debug!("[cid={}]: Rejecting ice candidates: {}", raw_call_id(value), e);
            return Err(e);
        }

        let candidates = items
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(i, item)| {
                if item.is_null() {
                    return Err(VoipError::BadMessage(format!(
                        "ice candidates: candidate {i} is null"
                    )));
                }
                Candidate::parse(item)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            call_id,
            candidates,
            removed: removed.unwrap_or(false),
        })
    }
}
