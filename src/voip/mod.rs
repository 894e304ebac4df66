//! Peer-to-peer call signaling payloads.
//!
//! This module serializes and validates the JSON bodies of the call control
//! messages exchanged between two peers. The outer message envelope,
//! encryption and delivery are handled elsewhere.
//!
//! # Payloads
//!
//! - [`CallOffer`]: SDP offer plus advertised [`FeatureList`]
//! - [`CallAnswer`]: accept with an SDP answer, or reject with a [`RejectReason`]
//! - [`CandidateSet`]: a batch of ICE [`Candidate`]s being added or removed
//! - [`CallRinging`] / [`CallHangup`]: call id only
//!
//! All of them implement [`VoipCallData`]. Encoding and decoding both
//! validate; any violation is a [`VoipError::BadMessage`].
//!
//! # Forward compatibility
//!
//! Feature lists never reject an unrecognised feature name. Unknown
//! features are kept with their parameters so they re-encode unchanged.

mod answer;
mod candidates;
mod data;
mod error;
mod features;
mod fields;
mod lifecycle;
mod offer;
mod sdp;

pub use answer::{Action, AnswerData, CallAnswer, RejectReason};
pub use candidates::{Candidate, CandidateSet};
pub use data::VoipCallData;
pub use error::{Result, VoipError};
pub use features::{CallFeature, FeatureList, VIDEO_FEATURE};
pub use lifecycle::{CallHangup, CallRinging};
pub use offer::{CallOffer, OfferData};
pub use sdp::SdpType;
