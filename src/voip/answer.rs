//! Call answer payload.
//!
//! An answer either accepts the call with an SDP answer or rejects it with
//! a reason code; never both.
//!
//! ```json
//! {"callId": 42, "action": 1, "answer": {"sdpType": "answer", "sdp": "..."},
//!  "features": {"video": null}}
//! {"callId": 42, "action": 0, "rejectReason": 1}
//! ```

use super::data::{VoipCallData, to_value};
use super::error::{Result, VoipError};
use super::features::{CallFeature, FeatureList};
use super::fields::{FieldParser, raw_call_id};
use super::sdp::SdpType;
use crate::config::CodecConfig;
use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// What the callee did with the offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Action {
    Reject = 0,
    Accept = 1,
}

impl Action {
    pub const fn code(&self) -> u8 {
        *self as u8
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Reject),
            1 => Some(Self::Accept),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Action {
    type Error = VoipError;

    fn try_from(code: u8) -> Result<Self> {
        Self::from_code(code)
            .ok_or_else(|| VoipError::BadMessage(format!("invalid call answer action: {code}")))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => f.write_str("REJECT"),
            Self::Accept => f.write_str("ACCEPT"),
        }
    }
}

/// Why a call was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum RejectReason {
    #[default]
    Unknown = 0,
    /// Callee is in another call.
    Busy = 1,
    /// Nobody picked up.
    Timeout = 2,
    /// Callee declined.
    Rejected = 3,
    /// Callee has calls disabled.
    Disabled = 4,
    /// Called outside the callee's working hours.
    OffHours = 5,
}

impl RejectReason {
    pub const ALL: [RejectReason; 6] = [
        Self::Unknown,
        Self::Busy,
        Self::Timeout,
        Self::Rejected,
        Self::Disabled,
        Self::OffHours,
    ];

    pub const fn code(&self) -> u8 {
        *self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Busy => "BUSY",
            Self::Timeout => "TIMEOUT",
            Self::Rejected => "REJECTED",
            Self::Disabled => "DISABLED",
            Self::OffHours => "OFF_HOURS",
        }
    }
}

impl TryFrom<u8> for RejectReason {
    type Error = VoipError;

    fn try_from(code: u8) -> Result<Self> {
        Self::from_code(code)
            .ok_or_else(|| VoipError::BadMessage(format!("invalid reject reason: {code}")))
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// SDP carried by an accepting answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerData {
    pub sdp_type: SdpType,
    /// May only be `None` for [`SdpType::Rollback`].
    pub sdp: Option<String>,
}

#[derive(Serialize)]
struct AnswerDataWire<'a> {
    #[serde(rename = "sdpType")]
    sdp_type: &'static str,
    sdp: Option<&'a str>,
}

impl AnswerData {
    pub fn new(sdp_type: SdpType, sdp: Option<String>) -> Self {
        Self { sdp_type, sdp }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self::new(SdpType::Answer, Some(sdp.into()))
    }

    pub fn rollback() -> Self {
        Self::new(SdpType::Rollback, None)
    }

    fn validate(&self) -> Result<()> {
        match self.sdp_type {
            SdpType::Answer | SdpType::Rollback => {}
            other => {
                return Err(VoipError::BadMessage(format!(
                    "answer sdpType must be 'answer' or 'rollback', got '{other}'"
                )));
            }
        }
        if self.sdp_type.requires_sdp() && self.sdp.is_none() {
            return Err(VoipError::BadMessage(format!(
                "answer sdp must not be null for sdpType '{}'",
                self.sdp_type
            )));
        }
        Ok(())
    }

    fn wire(&self) -> AnswerDataWire<'_> {
        AnswerDataWire {
            sdp_type: self.sdp_type.as_str(),
            sdp: self.sdp.as_deref(),
        }
    }

    fn parse(value: &Value) -> Result<Self> {
        let mut fields = FieldParser::new(value, "answer")?;
        let sdp_type = fields.string("sdpType");
        let sdp = fields.optional_string("sdp");
        fields.finish()?;

        let data = Self {
            sdp_type: sdp_type.unwrap_or_default().parse()?,
            sdp: sdp.map(str::to_string),
        };
        data.validate()?;
        Ok(data)
    }
}

/// The callee's reply to a call offer.
#[derive(Debug, Clone, PartialEq)]
pub struct CallAnswer {
    call_id: Option<i64>,
    action: Action,
    answer_data: Option<AnswerData>,
    reject_reason: Option<RejectReason>,
    features: FeatureList,
}

#[derive(Serialize)]
struct CallAnswerWire<'a> {
    #[serde(rename = "callId", skip_serializing_if = "Option::is_none")]
    call_id: Option<i64>,
    action: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    answer: Option<AnswerDataWire<'a>>,
    #[serde(rename = "rejectReason", skip_serializing_if = "Option::is_none")]
    reject_reason: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    features: Option<Value>,
}

impl CallAnswer {
    /// An answer with only the action set. Add answer data or a reject
    /// reason before writing it.
    pub fn new(action: Action) -> Self {
        Self {
            call_id: None,
            action,
            answer_data: None,
            reject_reason: None,
            features: FeatureList::new(),
        }
    }

    /// Like [`new`](Self::new), from the raw wire code.
    pub fn from_action_code(code: u8) -> Result<Self> {
        Action::try_from(code).map(Self::new)
    }

    pub fn accept(answer_data: AnswerData) -> Self {
        Self::new(Action::Accept).with_answer_data(answer_data)
    }

    pub fn reject(reason: RejectReason) -> Self {
        Self::new(Action::Reject).with_reject_reason(reason)
    }

    pub fn with_call_id(mut self, call_id: i64) -> Self {
        self.call_id = Some(call_id);
        self
    }

    pub fn with_answer_data(mut self, answer_data: AnswerData) -> Self {
        self.answer_data = Some(answer_data);
        self
    }

    pub fn with_reject_reason(mut self, reason: RejectReason) -> Self {
        self.reject_reason = Some(reason);
        self
    }

    pub fn with_feature(mut self, feature: CallFeature) -> Self {
        self.features.add_feature(feature);
        self
    }

    pub fn with_features(mut self, features: FeatureList) -> Self {
        self.features = features;
        self
    }

    pub fn set_call_id(&mut self, call_id: i64) {
        self.call_id = Some(call_id);
    }

    pub fn add_feature(&mut self, feature: CallFeature) -> &mut Self {
        self.features.add_feature(feature);
        self
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn answer_data(&self) -> Option<&AnswerData> {
        self.answer_data.as_ref()
    }

    pub fn reject_reason(&self) -> Option<RejectReason> {
        self.reject_reason
    }

    pub fn reject_reason_name(&self) -> Option<&'static str> {
        self.reject_reason.map(|r| r.name())
    }

    pub fn features(&self) -> &FeatureList {
        &self.features
    }

    /// Check the action/payload pairing, the answer SDP and feature names.
    ///
    /// Both [`to_json`](VoipCallData::to_json) and decoding go through here.
    pub fn validate(&self) -> Result<()> {
        self.features.validate()?;
        match (self.action, &self.answer_data, self.reject_reason) {
            (Action::Accept, Some(answer), None) => answer.validate(),
            (Action::Accept, None, _) => Err(VoipError::bad_message(
                "accepting call answer is missing answer data",
            )),
            (Action::Accept, Some(_), Some(_)) => Err(VoipError::bad_message(
                "accepting call answer must not carry a reject reason",
            )),
            (Action::Reject, None, Some(_)) => Ok(()),
            (Action::Reject, _, None) => Err(VoipError::bad_message(
                "rejecting call answer is missing a reject reason",
            )),
            (Action::Reject, Some(_), Some(_)) => Err(VoipError::bad_message(
                "rejecting call answer must not carry answer data",
            )),
        }
    }

    fn decode(value: &Value, config: &CodecConfig) -> Result<Self> {
        let mut fields = FieldParser::new(value, "call answer")?;
        let call_id = fields.optional_i64("callId");
        let action = fields.u8("action");
        let answer = fields.optional_object("answer");
        let reject_reason = fields.optional_i64("rejectReason");
        let features = fields.optional_object("features");
        fields.finish()?;

        let action = action
            .ok_or_else(|| VoipError::bad_message("call answer is missing the action"))
            .and_then(Action::try_from)?;
        let reject_reason = reject_reason
            .map(|code| decode_reject_reason(code, config))
            .transpose()?;
        let answer_data = answer.map(AnswerData::parse).transpose()?;
        let features = features
            .map(FeatureList::parse)
            .transpose()?
            .unwrap_or_default();

        let msg = Self {
            call_id,
            action,
            answer_data,
            reject_reason,
            features,
        };
        msg.validate()?;
        Ok(msg)
    }
}

fn decode_reject_reason(code: i64, config: &CodecConfig) -> Result<RejectReason> {
    match u8::try_from(code).ok().and_then(RejectReason::from_code) {
        Some(reason) => Ok(reason),
        None if config.lenient_reject_reasons => {
            debug!("Mapping unknown reject reason {} to UNKNOWN", code);
            Ok(RejectReason::Unknown)
        }
        None => Err(VoipError::BadMessage(format!(
            "invalid reject reason: {code}"
        ))),
    }
}

impl VoipCallData for CallAnswer {
    fn call_id(&self) -> Option<i64> {
        self.call_id
    }

    fn to_json(&self) -> Result<Value> {
        self.validate()?;
        to_value(&CallAnswerWire {
            call_id: self.call_id,
            action: self.action.code(),
            answer: self.answer_data.as_ref().map(AnswerData::wire),
            reject_reason: self.reject_reason.map(|r| r.code()),
            features: (!self.features.is_empty())
                .then(|| self.features.to_json())
                .transpose()?,
        })
    }

    fn from_json(value: &Value, config: &CodecConfig) -> Result<Self> {
        Self::decode(value, config).inspect_err(|e| {
            debug!("[cid={}]: Rejecting call answer: {}", raw_call_id(value), e)
        })
    }
}
