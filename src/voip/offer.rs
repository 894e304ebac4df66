//! Call offer payload.
//!
//! ```json
//! {"callId": 42, "offer": {"sdpType": "offer", "sdp": "..."}, "features": {"video": null}}
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

/// SDP offer. The type is implied; only the SDP text is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferData {
    pub sdp: String,
}

#[derive(Serialize)]
struct OfferDataWire<'a> {
    #[serde(rename = "sdpType")]
    sdp_type: &'static str,
    sdp: &'a str,
}

impl OfferData {
    pub fn new(sdp: impl Into<String>) -> Self {
        Self { sdp: sdp.into() }
    }

    fn parse(value: &Value) -> Result<Self> {
        let mut fields = FieldParser::new(value, "offer")?;
        let sdp_type = fields.string("sdpType");
        let sdp = fields.string("sdp");
        fields.finish()?;

        let sdp_type: SdpType = sdp_type.unwrap_or_default().parse()?;
        if sdp_type != SdpType::Offer {
            return Err(VoipError::BadMessage(format!(
                "offer sdpType must be 'offer', got '{sdp_type}'"
            )));
        }
        Ok(Self::new(sdp.unwrap_or_default()))
    }
}

/// The caller's call offer.
#[derive(Debug, Clone, PartialEq)]
pub struct CallOffer {
    call_id: Option<i64>,
    offer_data: OfferData,
    features: FeatureList,
}

#[derive(Serialize)]
struct CallOfferWire<'a> {
    #[serde(rename = "callId", skip_serializing_if = "Option::is_none")]
    call_id: Option<i64>,
    offer: OfferDataWire<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    features: Option<Value>,
}

impl CallOffer {
    pub fn new(offer_data: OfferData) -> Self {
        Self {
            call_id: None,
            offer_data,
            features: FeatureList::new(),
        }
    }

    pub fn with_call_id(mut self, call_id: i64) -> Self {
        self.call_id = Some(call_id);
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

    pub fn add_feature(&mut self, feature: CallFeature) -> &mut Self {
        self.features.add_feature(feature);
        self
    }

    pub fn offer_data(&self) -> &OfferData {
        &self.offer_data
    }

    pub fn features(&self) -> &FeatureList {
        &self.features
    }

    fn decode(value: &Value) -> Result<Self> {
        let mut fields = FieldParser::new(value, "call offer")?;
        let call_id = fields.optional_i64("callId");
        let offer = fields.object("offer");
        let features = fields.optional_object("features");
        fields.finish()?;

        let offer_data = offer
            .ok_or_else(|| VoipError::bad_message("call offer is missing offer data"))
            .and_then(OfferData::parse)?;
        let features = features
            .map(FeatureList::parse)
            .transpose()?
            .unwrap_or_default();
        features.validate()?;

        Ok(Self {
            call_id,
            offer_data,
            features,
        })
    }
}

impl VoipCallData for CallOffer {
    fn call_id(&self) -> Option<i64> {
        self.call_id
    }

    fn to_json(&self) -> Result<Value> {
        to_value(&CallOfferWire {
            call_id: self.call_id,
            offer: OfferDataWire {
                sdp_type: SdpType::Offer.as_str(),
                sdp: &self.offer_data.sdp,
            },
            features: (!self.features.is_empty())
                .then(|| self.features.to_json())
                .transpose()?,
        })
    }

    fn from_json(value: &Value, _config: &CodecConfig) -> Result<Self> {
        Self::decode(value)
            .inspect_err(|e| debug!("[cid={}]: Rejecting call offer: {}", raw_call_id(value), e))
    }
}
