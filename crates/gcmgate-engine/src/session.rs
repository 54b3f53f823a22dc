//! Per-session cipher state machine.
//!
//! A [`GcmSession`] runs one operation at a time: configure, optionally push
//! associated data, then make exactly one payload call. Payload calls
//! consume the pending AAD unconditionally, so a failed call never leaks the
//! buffer into the next operation. A session must not be driven by more than
//! one logical operation concurrently; it is a single-owner value and all
//! calls are synchronous.

use gcmgate_aead::{AeadError, GcmKey};
use tracing::{debug, warn};
use zeroize::Zeroize;

use crate::aad::AadAccumulator;
use crate::error::EngineError;
use crate::iv::IvState;
use crate::tag::TagStore;

/// Cipher direction, fixed for the lifetime of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Encrypting: the session produces ciphertext and a tag.
    Encrypt,
    /// Decrypting: the session verifies a caller-supplied tag.
    Decrypt,
}

/// Payload-call mode.
///
/// `TlsRecord` is entered through [`crate::Control::SetTlsAad`] and persists
/// for the rest of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Plain one-shot AEAD over caller-framed buffers.
    OneShot,
    /// Wire-format records with explicit IV prefix and trailing tag.
    TlsRecord,
}

/// AES-GCM session: key, IV, tag, and pending-AAD state for one in-flight
/// cipher operation.
pub struct GcmSession {
    pub(crate) key: Option<GcmKey>,
    pub(crate) iv: IvState,
    pub(crate) tag: TagStore,
    pub(crate) aad: AadAccumulator,
    pub(crate) direction: Direction,
    pub(crate) mode: Mode,
    pub(crate) initialized: bool,
}

impl GcmSession {
    /// Create an unconfigured session for the given direction.
    #[must_use]
    pub fn new(direction: Direction) -> Self {
        Self {
            key: None,
            iv: IvState::new(),
            tag: TagStore::new(),
            aad: AadAccumulator::new(),
            direction,
            mode: Mode::OneShot,
            initialized: false,
        }
    }

    /// Initialize or re-initialize the session.
    ///
    /// A fresh session, or a call with neither key nor IV, resets the
    /// IV/tag/AAD/mode state and fixes the direction. A supplied key
    /// replaces the session key; a supplied IV installs a 12-byte nonce.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Primitive`] for a bad key length and
    /// [`EngineError::InvalidIvLength`] for a non-nominal IV.
    pub fn init(
        &mut self,
        key: Option<&[u8]>,
        iv: Option<&[u8]>,
        direction: Direction,
    ) -> Result<(), EngineError> {
        if (key.is_none() && iv.is_none()) || !self.initialized {
            self.iv.reset();
            self.tag.reset();
            self.aad.clear();
            self.direction = direction;
            self.mode = Mode::OneShot;
            self.initialized = true;
        }
        if let Some(key) = key {
            self.key = Some(GcmKey::new(key)?);
        }
        if let Some(iv) = iv {
            self.iv.install_nonce(iv)?;
        }
        Ok(())
    }

    /// One-shot AAD push or payload call, depending on the arguments.
    ///
    /// With `out` absent, `input` is associated data: it is appended to the
    /// pending AAD and 0 is returned. With `out` present, `input` is the
    /// payload: the pending AAD is consumed, the cipher runs in the
    /// session's direction, and the output length is returned. A
    /// zero-length payload call is a no-op that still clears the pending
    /// AAD. In TLS-record mode every call is a payload call on a
    /// wire-format record.
    ///
    /// # Errors
    ///
    /// Payload calls fail with [`EngineError::MissingKey`] before a key is
    /// set, [`EngineError::MissingTag`] for decrypt without a tag,
    /// [`EngineError::AuthenticationFailed`] on tag mismatch (no plaintext
    /// is released), and [`EngineError::OutputTooSmall`] when `out` cannot
    /// hold the result. The pending AAD is cleared on every payload-call
    /// exit path, success or failure.
    pub fn update(
        &mut self,
        out: Option<&mut [u8]>,
        input: &[u8],
    ) -> Result<usize, EngineError> {
        if self.mode == Mode::TlsRecord {
            let out = out.ok_or(EngineError::MissingOutput)?;
            return self.tls_record(out, input);
        }

        match out {
            None => {
                self.aad.push(input)?;
                Ok(0)
            }
            Some(_) if input.is_empty() => {
                // Empty probe: completes the operation without output.
                self.aad.clear();
                Ok(0)
            }
            Some(out) => {
                let aad = self.aad.take();
                self.one_shot(out, input, &aad)
            }
        }
    }

    fn one_shot(
        &mut self,
        out: &mut [u8],
        input: &[u8],
        aad: &[u8],
    ) -> Result<usize, EngineError> {
        let key = self.key.as_ref().ok_or(EngineError::MissingKey)?;
        if out.len() < input.len() {
            return Err(EngineError::OutputTooSmall {
                need: input.len(),
                have: out.len(),
            });
        }
        let out = &mut out[..input.len()];

        match self.direction {
            Direction::Encrypt => {
                if !self.iv.set {
                    // Commit the externally supplied IV for this operation.
                    self.iv.commit();
                }
                out.copy_from_slice(input);
                let tag = key.seal_detached(self.iv.nonce(), aad, out)?;
                self.tag.record_produced(tag);
                self.iv.advance();
                debug!("encrypted {} bytes with {} bytes of AAD", input.len(), aad.len());
                Ok(input.len())
            }
            Direction::Decrypt => {
                if self.tag.len() == 0 {
                    return Err(EngineError::MissingTag);
                }
                out.copy_from_slice(input);
                match key.open_detached(self.iv.nonce(), aad, out, self.tag.as_slice()) {
                    Ok(()) => {
                        self.iv.advance();
                        debug!("decrypted {} bytes with {} bytes of AAD", input.len(), aad.len());
                        Ok(input.len())
                    }
                    Err(e) => {
                        out.zeroize();
                        Err(auth_or_primitive(e))
                    }
                }
            }
        }
    }

    /// Tear the session down, scrubbing key, IV, tag, and pending AAD.
    ///
    /// Safe to call repeatedly and on a session that was never initialized.
    pub fn cleanup(&mut self) {
        self.key = None;
        self.iv.reset();
        self.tag.reset();
        self.aad.clear();
        self.mode = Mode::OneShot;
        self.initialized = false;
    }

    /// The session direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The current payload-call mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// True once the session has been initialized.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The current nonce bytes (`iv_len` of them).
    #[must_use]
    pub fn iv(&self) -> &[u8] {
        self.iv.nonce()
    }

    /// The configured nonce length; 0 until configured.
    #[must_use]
    pub fn iv_len(&self) -> usize {
        self.iv.len
    }

    /// Length of the stored tag (produced or supplied).
    #[must_use]
    pub fn tag_len(&self) -> usize {
        self.tag.len()
    }

    /// Bytes of associated data pending for the next payload call.
    #[must_use]
    pub fn pending_aad_len(&self) -> usize {
        self.aad.len()
    }
}

impl Drop for GcmSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Map a primitive decrypt failure to the engine's error space, logging
/// authentication failures.
pub(crate) fn auth_or_primitive(e: AeadError) -> EngineError {
    match e {
        AeadError::DecryptionFailed => {
            warn!("authentication tag mismatch");
            EngineError::AuthenticationFailed
        }
        other => EngineError::Primitive(other),
    }
}
