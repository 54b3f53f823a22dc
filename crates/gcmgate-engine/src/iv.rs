//! Nonce/IV lifecycle.
//!
//! The session owns a 16-byte IV buffer and a configured length. Nonces are
//! either supplied whole by the caller, assembled from a fixed prefix plus
//! CSPRNG suffix, or generated from a seed by the big-endian counter
//! increment below. A nonce must never repeat under a key; the increment
//! guarantees that for engine-generated nonces as long as the caller keeps
//! the fixed (high-order) bytes unique per key.

use gcmgate_aead::{MAX_NONCE_SIZE, NOMINAL_NONCE_SIZE, fill_iv_from_fixed};
use zeroize::Zeroize;

use crate::EngineError;

/// Advance a nonce as a big-endian counter over its low 8 bytes.
///
/// Increments from the last byte toward the 8th-from-last, stopping at the
/// first byte that does not wrap. For nonces shorter than 8 bytes the whole
/// nonce is the counter window.
pub fn increment_counter(iv: &mut [u8]) {
    let low = iv.len().saturating_sub(8);
    for i in (low..iv.len()).rev() {
        iv[i] = iv[i].wrapping_add(1);
        if iv[i] != 0 {
            break;
        }
    }
}

/// Session IV state: buffer, configured length, commit flag.
#[derive(Debug)]
pub(crate) struct IvState {
    /// Nonce bytes; only `buf[..len]` is significant.
    pub(crate) buf: [u8; MAX_NONCE_SIZE],
    /// Configured nonce length; 0 until configured.
    pub(crate) len: usize,
    /// True once an external or random IV has been committed for the
    /// current operation.
    pub(crate) set: bool,
}

impl IvState {
    pub(crate) fn new() -> Self {
        Self {
            buf: [0u8; MAX_NONCE_SIZE],
            len: 0,
            set: false,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.buf.zeroize();
        self.len = 0;
        self.set = false;
    }

    /// Configure the nonce length (1..=16).
    pub(crate) fn set_len(&mut self, len: usize) -> Result<(), EngineError> {
        if len == 0 || len > MAX_NONCE_SIZE {
            return Err(EngineError::InvalidIvLength(len));
        }
        self.len = len;
        Ok(())
    }

    /// The current nonce.
    pub(crate) fn nonce(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Cache a caller-supplied nominal (12-byte) nonce, as done at init.
    pub(crate) fn install_nonce(&mut self, nonce: &[u8]) -> Result<(), EngineError> {
        if nonce.len() != NOMINAL_NONCE_SIZE {
            return Err(EngineError::InvalidIvLength(nonce.len()));
        }
        self.len = NOMINAL_NONCE_SIZE;
        self.buf[..self.len].copy_from_slice(nonce);
        Ok(())
    }

    /// Install a complete caller-supplied IV (the "copy everything" form of
    /// the fixed-IV command, used mainly for TLS explicit-IV reconstruction).
    pub(crate) fn install_full(&mut self, data: &[u8]) -> Result<(), EngineError> {
        if self.len == 0 {
            self.len = NOMINAL_NONCE_SIZE;
        }
        if data.len() < self.len {
            return Err(EngineError::InvalidIvLength(data.len()));
        }
        self.buf[..self.len].copy_from_slice(&data[..self.len]);
        Ok(())
    }

    /// Install a fixed prefix and randomize the remainder, committing the
    /// result for the current operation.
    pub(crate) fn install_fixed_prefix(&mut self, fixed: &[u8]) -> Result<(), EngineError> {
        if self.len == 0 {
            self.len = NOMINAL_NONCE_SIZE;
        }
        fill_iv_from_fixed(&mut self.buf[..self.len], fixed)?;
        self.set = true;
        Ok(())
    }

    /// Generate the next nonce from a seed: copy the seed into the front of
    /// the buffer, then run the counter increment over the configured length.
    pub(crate) fn generate(&mut self, seed: &[u8]) -> Result<(), EngineError> {
        if seed.is_empty() || seed.len() > MAX_NONCE_SIZE {
            return Err(EngineError::InvalidIvLength(seed.len()));
        }
        self.buf[..seed.len()].copy_from_slice(seed);
        increment_counter(&mut self.buf[..self.len]);
        Ok(())
    }

    /// Advance the nonce counter after a completed payload call.
    pub(crate) fn advance(&mut self) {
        increment_counter(&mut self.buf[..self.len]);
    }

    /// Mark the current nonce contents as committed for this operation.
    pub(crate) fn commit(&mut self) {
        self.set = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_low_byte() {
        let mut iv = [0u8; 12];
        increment_counter(&mut iv);
        assert_eq!(iv[11], 1);
        assert_eq!(&iv[..11], &[0u8; 11]);
    }

    #[test]
    fn increment_carries() {
        let mut iv = [0u8; 12];
        iv[11] = 0xff;
        increment_counter(&mut iv);
        assert_eq!(iv[11], 0x00);
        assert_eq!(iv[10], 0x01);
    }

    #[test]
    fn increment_stops_at_counter_window() {
        // All-ones: the low 8 bytes wrap to zero, the rest never change.
        let mut iv = [0xffu8; 12];
        increment_counter(&mut iv);
        assert_eq!(&iv[..4], &[0xff; 4]);
        assert_eq!(&iv[4..], &[0x00; 8]);
    }

    #[test]
    fn increment_short_nonce() {
        let mut iv = [0xffu8; 4];
        increment_counter(&mut iv);
        assert_eq!(iv, [0u8; 4]);
    }

    #[test]
    fn generate_is_monotonic() {
        let mut state = IvState::new();
        state.set_len(12).unwrap();
        let seed = [0u8; 8];

        let mut prev = 0u64;
        for _ in 0..1000 {
            state.generate(&seed).unwrap();
            let mut ctr = [0u8; 8];
            ctr.copy_from_slice(&state.nonce()[4..12]);
            let value = u64::from_be_bytes(ctr);
            assert_eq!(value, prev + 1);
            prev = value;
        }
    }

    #[test]
    fn length_validation() {
        let mut state = IvState::new();
        assert!(state.set_len(0).is_err());
        assert!(state.set_len(17).is_err());
        for len in 1..=16 {
            state.set_len(len).unwrap();
            assert_eq!(state.len, len);
        }
    }

    #[test]
    fn install_full_defaults_to_nominal_length() {
        let mut state = IvState::new();
        state.install_full(&[0x5a; 16]).unwrap();
        assert_eq!(state.len, NOMINAL_NONCE_SIZE);
        assert_eq!(state.nonce(), &[0x5a; 12]);
        assert!(!state.set);
    }

    #[test]
    fn install_fixed_prefix_commits() {
        let mut state = IvState::new();
        state.install_fixed_prefix(&[1, 2, 3, 4]).unwrap();
        assert_eq!(state.len, NOMINAL_NONCE_SIZE);
        assert_eq!(&state.nonce()[..4], &[1, 2, 3, 4]);
        assert!(state.set);
    }

    #[test]
    fn reset_scrubs() {
        let mut state = IvState::new();
        state.install_full(&[0x5a; 16]).unwrap();
        state.reset();
        assert_eq!(state.buf, [0u8; MAX_NONCE_SIZE]);
        assert_eq!(state.len, 0);
        assert!(!state.set);
    }
}
