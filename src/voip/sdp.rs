//! WebRTC session description types.

use super::error::VoipError;
use std::fmt;
use std::str::FromStr;

/// The `sdpType` carried next to an SDP blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SdpType {
    Offer,
    /// Provisional answer.
    Pranswer,
    Answer,
    /// Undo the last offer; the only type that may come without SDP.
    Rollback,
}

impl SdpType {
    pub const ALL: [SdpType; 4] = [Self::Offer, Self::Pranswer, Self::Answer, Self::Rollback];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Offer => "offer",
            Self::Pranswer => "pranswer",
            Self::Answer => "answer",
            Self::Rollback => "rollback",
        }
    }

    /// Case-sensitive, as on the wire.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "offer" => Some(Self::Offer),
            "pranswer" => Some(Self::Pranswer),
            "answer" => Some(Self::Answer),
            "rollback" => Some(Self::Rollback),
            _ => None,
        }
    }

    pub const fn requires_sdp(&self) -> bool {
        !matches!(self, Self::Rollback)
    }
}

impl FromStr for SdpType {
    type Err = VoipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s).ok_or_else(|| VoipError::BadMessage(format!("unknown sdpType '{s}'")))
    }
}

impl fmt::Display for SdpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_roundtrip() {
        for ty in SdpType::ALL {
            assert_eq!(SdpType::from_wire(ty.as_str()), Some(ty));
        }
    }

    #[test]
    fn test_wire_names_are_case_sensitive() {
        assert_eq!(SdpType::from_wire("Answer"), None);
        assert!("OFFER".parse::<SdpType>().is_err());
    }

    #[test]
    fn test_only_rollback_may_omit_sdp() {
        assert!(SdpType::Offer.requires_sdp());
        assert!(SdpType::Answer.requires_sdp());
        assert!(SdpType::Pranswer.requires_sdp());
        assert!(!SdpType::Rollback.requires_sdp());
    }
}
