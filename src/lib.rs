//! JSON codec for peer-to-peer call signaling.
//!
//! See [`voip`] for the payload types.

pub mod config;
pub mod voip;

pub use config::CodecConfig;
pub use voip::{VoipCallData, VoipError};
