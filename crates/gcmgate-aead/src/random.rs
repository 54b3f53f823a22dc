//! Secure random number generation.
//!
//! All randomness comes from the operating system CSPRNG. The OS generator
//! needs no explicit initialization and is safe to use from any number of
//! sessions concurrently.

use crate::AeadError;

/// Fill a buffer with random bytes from the OS CSPRNG.
///
/// # Errors
///
/// Returns [`AeadError::RandomFailed`] if the underlying OS CSPRNG fails.
pub fn fill_random(buf: &mut [u8]) -> Result<(), AeadError> {
    getrandom::fill(buf).map_err(|_| AeadError::RandomFailed)
}

/// Fill a nonce from a fixed prefix, randomizing the remainder.
///
/// Copies `fixed` into the front of `iv` and fills the rest with CSPRNG
/// output. The caller is responsible for keeping the fixed part unique per
/// key (e.g. a per-connection salt).
///
/// # Errors
///
/// Returns [`AeadError::FixedPartTooLong`] if `fixed` does not fit in `iv`,
/// or [`AeadError::RandomFailed`] if the OS CSPRNG fails.
pub fn fill_iv_from_fixed(iv: &mut [u8], fixed: &[u8]) -> Result<(), AeadError> {
    if fixed.len() > iv.len() {
        return Err(AeadError::FixedPartTooLong {
            fixed: fixed.len(),
            nonce: iv.len(),
        });
    }

    iv[..fixed.len()].copy_from_slice(fixed);
    fill_random(&mut iv[fixed.len()..])
}
