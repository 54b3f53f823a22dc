//! # gcmgate AEAD
//!
//! AES-GCM primitive facade for the gcmgate engine.
//!
//! This crate wraps the RustCrypto `aes-gcm` implementation behind the small
//! surface the session engine consumes:
//! - keying for AES-128/192/256 with zeroize-on-drop key material
//! - detached in-place seal/open (ciphertext and tag handled separately)
//! - nonce lengths from 1 to 16 bytes (96-bit nominal)
//! - truncated authentication tags down to 96 bits on open
//! - CSPRNG-backed IV fill (fixed prefix + random suffix)
//!
//! ## Cryptographic Suite
//!
//! | Function | Algorithm | Security Level |
//! |----------|-----------|----------------|
//! | AEAD | AES-128/192/256-GCM | 128/192/256-bit key |
//! | Tag | GHASH, 96-128 bit | per NIST SP 800-38D |
//! | Randomness | OS CSPRNG | N/A |

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod error;
pub mod gcm;
pub mod random;

pub use error::AeadError;
pub use gcm::{
    AES_128_KEY_SIZE, AES_192_KEY_SIZE, AES_256_KEY_SIZE, GcmKey, MAX_NONCE_SIZE, MIN_TAG_SIZE,
    NOMINAL_NONCE_SIZE, TAG_SIZE,
};
pub use random::{fill_iv_from_fixed, fill_random};
