//! AEAD primitive error types.

use thiserror::Error;

/// Errors surfaced by the AES-GCM primitive facade.
#[derive(Debug, Error)]
pub enum AeadError {
    /// AEAD encryption failed
    #[error("encryption failed")]
    EncryptionFailed,

    /// AEAD decryption failed (authentication failure)
    #[error("decryption failed: authentication failure")]
    DecryptionFailed,

    /// Invalid key length
    #[error("invalid key length: {0} (expected 16, 24 or 32)")]
    InvalidKeyLength(usize),

    /// Invalid nonce length
    #[error("invalid nonce length: {0}")]
    InvalidNonceLength(usize),

    /// Invalid authentication tag length
    #[error("invalid tag length: {0}")]
    InvalidTagLength(usize),

    /// Fixed IV part does not fit in the nonce
    #[error("fixed IV part too long: {fixed} bytes into a {nonce}-byte nonce")]
    FixedPartTooLong {
        /// Length of the fixed part supplied
        fixed: usize,
        /// Length of the nonce being filled
        nonce: usize,
    },

    /// Random number generation failed
    #[error("random number generation failed")]
    RandomFailed,
}
