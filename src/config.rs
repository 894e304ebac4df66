/// Decoder policy for call-signaling payloads.
///
/// The defaults give a strict, validating decoder.
#[derive(Clone, Debug, Default)]
pub struct CodecConfig {
    /// Decode an out-of-range `rejectReason` as [`RejectReason::Unknown`]
    /// instead of failing. Needed only to talk to peers that send reject
    /// codes newer than this codec knows.
    ///
    /// [`RejectReason::Unknown`]: crate::voip::RejectReason::Unknown
    pub lenient_reject_reasons: bool,
    /// Fail ICE candidate payloads that omit the `removed` flag instead of
    /// reading them as `removed = false`.
    pub require_removed_flag: bool,
}

impl CodecConfig {
    pub fn strict() -> Self {
        Self {
            lenient_reject_reasons: false,
            require_removed_flag: true,
        }
    }
}
