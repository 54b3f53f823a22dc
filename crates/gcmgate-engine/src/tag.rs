//! Authentication tag storage.
//!
//! Directionally typed: an encrypt session fills the store from the
//! primitive at each payload call (always the full 16 bytes); a decrypt
//! session is loaded by the caller with the received tag before the payload
//! call. The store is never implicitly cleared; a new payload call
//! overwrites it.

use gcmgate_aead::TAG_SIZE;
use zeroize::Zeroize;

use crate::EngineError;

#[derive(Debug)]
pub(crate) struct TagStore {
    buf: [u8; TAG_SIZE],
    len: usize,
}

impl TagStore {
    pub(crate) fn new() -> Self {
        Self {
            buf: [0u8; TAG_SIZE],
            len: 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.buf.zeroize();
        self.len = 0;
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Store tag bytes supplied for verification (decrypt direction).
    pub(crate) fn set_bytes(&mut self, tag: &[u8]) -> Result<(), EngineError> {
        if tag.is_empty() || tag.len() > TAG_SIZE {
            return Err(EngineError::InvalidTagLength(tag.len()));
        }
        self.buf[..tag.len()].copy_from_slice(tag);
        self.len = tag.len();
        Ok(())
    }

    /// Record a requested tag length without bytes (encrypt direction).
    pub(crate) fn set_len(&mut self, len: usize) -> Result<(), EngineError> {
        if len == 0 || len > TAG_SIZE {
            return Err(EngineError::InvalidTagLength(len));
        }
        self.len = len;
        Ok(())
    }

    /// Store the tag produced by an encrypt payload call (always full size).
    pub(crate) fn record_produced(&mut self, tag: [u8; TAG_SIZE]) {
        self.buf = tag;
        self.len = TAG_SIZE;
    }

    /// Copy out the front of the stored tag, `out.len()` bytes.
    pub(crate) fn get(&self, out: &mut [u8]) -> Result<usize, EngineError> {
        if out.is_empty() {
            return Err(EngineError::InvalidTagLength(0));
        }
        if out.len() > self.len {
            return Err(EngineError::TagUnavailable {
                requested: out.len(),
                produced: self.len,
            });
        }
        out.copy_from_slice(&self.buf[..out.len()]);
        Ok(out.len())
    }

    /// The stored tag bytes.
    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}
