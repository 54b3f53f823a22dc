//! Engine error types.

use gcmgate_aead::AeadError;
use thiserror::Error;

/// Errors surfaced by the session engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No key has been configured for the session
    #[error("no key configured for session")]
    MissingKey,

    /// IV/nonce length outside 1..=16
    #[error("invalid IV length: {0}")]
    InvalidIvLength(usize),

    /// Tag length outside the configurable range
    #[error("invalid tag length: {0}")]
    InvalidTagLength(usize),

    /// Decrypt requires a tag before the payload call
    #[error("tag required before decrypt")]
    MissingTag,

    /// Tag bytes requested that were never produced
    #[error("tag not available: {requested} bytes requested, {produced} produced")]
    TagUnavailable {
        /// Bytes requested by the caller
        requested: usize,
        /// Bytes produced by the last encrypt payload call
        produced: usize,
    },

    /// Operation is only valid for the opposite cipher direction
    #[error("operation not valid for this cipher direction")]
    DirectionMismatch,

    /// TLS AAD header must be exactly 13 bytes
    #[error("invalid TLS AAD size: {0}")]
    InvalidTlsAadLength(usize),

    /// Record length encoded in the TLS AAD header is too small
    #[error("record length in TLS AAD too small: {0}")]
    InvalidTlsRecordLength(usize),

    /// TLS record shorter than its explicit IV + tag framing
    #[error("TLS record too short: {0} bytes")]
    RecordTooShort(usize),

    /// Output buffer required for this call
    #[error("output buffer required")]
    MissingOutput,

    /// Output buffer cannot hold the result
    #[error("output buffer too small: need {need}, have {have}")]
    OutputTooSmall {
        /// Bytes required
        need: usize,
        /// Bytes available
        have: usize,
    },

    /// AAD buffer growth failed
    #[error("failed to grow AAD buffer")]
    AadAllocation,

    /// Authentication tag mismatch on decrypt; no plaintext is released
    #[error("decryption failed: authentication failure")]
    AuthenticationFailed,

    /// Failure inside the AEAD primitive
    #[error("AEAD primitive failure: {0}")]
    Primitive(#[from] AeadError),
}
