//! AES-GCM keying and detached seal/open.
//!
//! [`GcmKey`] owns the raw key material (zeroized on drop) and performs
//! one-shot authenticated encryption/decryption with a detached tag. The
//! cipher instance is built per call, as key setup is cheap relative to the
//! GHASH/CTR work and keeps no per-call state here.
//!
//! GCM parameter sizes are type-level in the underlying implementation, so
//! the runtime key, nonce, and tag lengths are dispatched onto concrete
//! instantiations: keys of 16/24/32 bytes, nonces of 1..=16 bytes (the
//! 96-bit nominal path is the cheap one; other lengths go through the GHASH
//! lengthening defined by SP 800-38D), and verification tags of 12..=16
//! bytes. Tags shorter than 96 bits are rejected, in line with the
//! general-use floor of SP 800-38D.

use aes_gcm::{
    AesGcm,
    aead::{
        AeadInPlace, KeyInit,
        consts::{
            U1, U2, U3, U4, U5, U6, U7, U8, U9, U10, U11, U12, U13, U14, U15, U16,
        },
        generic_array::GenericArray,
    },
    aes::{Aes128, Aes192, Aes256},
};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::AeadError;

/// Authentication tag size (16 bytes / 128 bits).
pub const TAG_SIZE: usize = 16;

/// Smallest tag accepted for verification (12 bytes / 96 bits).
pub const MIN_TAG_SIZE: usize = 12;

/// Nominal nonce size (12 bytes / 96 bits) - used as is; other lengths are
/// GHASH-lengthened.
pub const NOMINAL_NONCE_SIZE: usize = 12;

/// Maximum nonce size (16 bytes).
pub const MAX_NONCE_SIZE: usize = 16;

/// AES-128 key size.
pub const AES_128_KEY_SIZE: usize = 16;

/// AES-192 key size.
pub const AES_192_KEY_SIZE: usize = 24;

/// AES-256 key size.
pub const AES_256_KEY_SIZE: usize = 32;

/// Dispatch a runtime nonce length onto a type-level GCM instantiation,
/// with the AES variant and tag size fixed by the caller.
macro_rules! with_nonce_size {
    ($f:ident::<$aes:ty, $tag:ty>($($arg:expr),* $(,)?), $nonce:expr) => {
        match $nonce.len() {
            1 => $f::<AesGcm<$aes, U1, $tag>>($($arg),*),
            2 => $f::<AesGcm<$aes, U2, $tag>>($($arg),*),
            3 => $f::<AesGcm<$aes, U3, $tag>>($($arg),*),
            4 => $f::<AesGcm<$aes, U4, $tag>>($($arg),*),
            5 => $f::<AesGcm<$aes, U5, $tag>>($($arg),*),
            6 => $f::<AesGcm<$aes, U6, $tag>>($($arg),*),
            7 => $f::<AesGcm<$aes, U7, $tag>>($($arg),*),
            8 => $f::<AesGcm<$aes, U8, $tag>>($($arg),*),
            9 => $f::<AesGcm<$aes, U9, $tag>>($($arg),*),
            10 => $f::<AesGcm<$aes, U10, $tag>>($($arg),*),
            11 => $f::<AesGcm<$aes, U11, $tag>>($($arg),*),
            12 => $f::<AesGcm<$aes, U12, $tag>>($($arg),*),
            13 => $f::<AesGcm<$aes, U13, $tag>>($($arg),*),
            14 => $f::<AesGcm<$aes, U14, $tag>>($($arg),*),
            15 => $f::<AesGcm<$aes, U15, $tag>>($($arg),*),
            16 => $f::<AesGcm<$aes, U16, $tag>>($($arg),*),
            n => Err(AeadError::InvalidNonceLength(n)),
        }
    };
}

/// Dispatch a runtime verification tag length (12..=16), then the nonce
/// length, onto a type-level GCM instantiation.
macro_rules! with_tag_size {
    ($f:ident::<$aes:ty>($($arg:expr),* $(,)?), $nonce:expr, $tag:expr) => {
        match $tag.len() {
            12 => with_nonce_size!($f::<$aes, U12>($($arg),*), $nonce),
            13 => with_nonce_size!($f::<$aes, U13>($($arg),*), $nonce),
            14 => with_nonce_size!($f::<$aes, U14>($($arg),*), $nonce),
            15 => with_nonce_size!($f::<$aes, U15>($($arg),*), $nonce),
            16 => with_nonce_size!($f::<$aes, U16>($($arg),*), $nonce),
            n => Err(AeadError::InvalidTagLength(n)),
        }
    };
}

fn seal_with<C>(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    buf: &mut [u8],
) -> Result<[u8; TAG_SIZE], AeadError>
where
    C: KeyInit + AeadInPlace,
{
    let cipher = C::new_from_slice(key).map_err(|_| AeadError::InvalidKeyLength(key.len()))?;
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(nonce), aad, buf)
        .map_err(|_| AeadError::EncryptionFailed)?;

    let mut out = [0u8; TAG_SIZE];
    out.copy_from_slice(&tag);
    Ok(out)
}

fn open_with<C>(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    buf: &mut [u8],
    tag: &[u8],
) -> Result<(), AeadError>
where
    C: KeyInit + AeadInPlace,
{
    let cipher = C::new_from_slice(key).map_err(|_| AeadError::InvalidKeyLength(key.len()))?;

    // The tag comparison happens before any keystream is applied, so a
    // failed call leaves `buf` holding the untouched ciphertext.
    cipher
        .decrypt_in_place_detached(GenericArray::from_slice(nonce), aad, buf, GenericArray::from_slice(tag))
        .map_err(|_| AeadError::DecryptionFailed)
}

/// AES-GCM key (16, 24 or 32 bytes).
///
/// Wraps the raw key material and provides seal/open with a detached tag.
/// Key bytes are zeroized on drop.
#[derive(Clone, ZeroizeOnDrop)]
pub struct GcmKey {
    key: Vec<u8>,
}

impl GcmKey {
    /// Install key material.
    ///
    /// # Errors
    ///
    /// Returns [`AeadError::InvalidKeyLength`] unless `key` is 16, 24 or 32
    /// bytes.
    pub fn new(key: &[u8]) -> Result<Self, AeadError> {
        match key.len() {
            AES_128_KEY_SIZE | AES_192_KEY_SIZE | AES_256_KEY_SIZE => {
                Ok(Self { key: key.to_vec() })
            }
            n => Err(AeadError::InvalidKeyLength(n)),
        }
    }

    /// Key length in bytes.
    #[must_use]
    pub fn key_len(&self) -> usize {
        self.key.len()
    }

    /// Encrypt `buf` in place, returning the full 16-byte authentication tag.
    ///
    /// `nonce` may be 1..=16 bytes; `aad` is authenticated but not encrypted.
    ///
    /// # Errors
    ///
    /// Returns [`AeadError::InvalidNonceLength`] for an out-of-range nonce
    /// and [`AeadError::EncryptionFailed`] if the underlying cipher rejects
    /// the input.
    pub fn seal_detached(
        &self,
        nonce: &[u8],
        aad: &[u8],
        buf: &mut [u8],
    ) -> Result<[u8; TAG_SIZE], AeadError> {
        match self.key.len() {
            AES_128_KEY_SIZE => {
                with_nonce_size!(seal_with::<Aes128, U16>(&self.key, nonce, aad, buf), nonce)
            }
            AES_192_KEY_SIZE => {
                with_nonce_size!(seal_with::<Aes192, U16>(&self.key, nonce, aad, buf), nonce)
            }
            AES_256_KEY_SIZE => {
                with_nonce_size!(seal_with::<Aes256, U16>(&self.key, nonce, aad, buf), nonce)
            }
            n => Err(AeadError::InvalidKeyLength(n)),
        }
    }

    /// Decrypt `buf` in place after verifying `tag` (12..=16 bytes).
    ///
    /// Verification is constant-time and happens before decryption; on
    /// failure `buf` still holds the ciphertext and no plaintext is exposed.
    ///
    /// # Errors
    ///
    /// Returns [`AeadError::DecryptionFailed`] on authentication failure,
    /// [`AeadError::InvalidTagLength`] for tags outside 12..=16 bytes, and
    /// [`AeadError::InvalidNonceLength`] for an out-of-range nonce.
    pub fn open_detached(
        &self,
        nonce: &[u8],
        aad: &[u8],
        buf: &mut [u8],
        tag: &[u8],
    ) -> Result<(), AeadError> {
        match self.key.len() {
            AES_128_KEY_SIZE => {
                with_tag_size!(open_with::<Aes128>(&self.key, nonce, aad, buf, tag), nonce, tag)
            }
            AES_192_KEY_SIZE => {
                with_tag_size!(open_with::<Aes192>(&self.key, nonce, aad, buf, tag), nonce, tag)
            }
            AES_256_KEY_SIZE => {
                with_tag_size!(open_with::<Aes256>(&self.key, nonce, aad, buf, tag), nonce, tag)
            }
            n => Err(AeadError::InvalidKeyLength(n)),
        }
    }

    /// Encrypt `plaintext`, returning ciphertext with the tag appended
    /// (`plaintext.len()` + 16 bytes).
    ///
    /// # Errors
    ///
    /// Same failure modes as [`GcmKey::seal_detached`].
    pub fn seal(&self, nonce: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, AeadError> {
        let mut out = Vec::with_capacity(plaintext.len() + TAG_SIZE);
        out.extend_from_slice(plaintext);
        let tag = self.seal_detached(nonce, aad, &mut out)?;
        out.extend_from_slice(&tag);
        Ok(out)
    }

    /// Decrypt `data` (ciphertext with the tag appended), returning the
    /// plaintext.
    ///
    /// # Errors
    ///
    /// Returns [`AeadError::DecryptionFailed`] on authentication failure or
    /// when `data` is shorter than a tag.
    pub fn open(&self, nonce: &[u8], aad: &[u8], data: &[u8]) -> Result<Vec<u8>, AeadError> {
        if data.len() < TAG_SIZE {
            return Err(AeadError::DecryptionFailed);
        }

        let (ciphertext, tag) = data.split_at(data.len() - TAG_SIZE);
        let mut out = ciphertext.to_vec();
        match self.open_detached(nonce, aad, &mut out, tag) {
            Ok(()) => Ok(out),
            Err(e) => {
                out.zeroize();
                Err(e)
            }
        }
    }
}
