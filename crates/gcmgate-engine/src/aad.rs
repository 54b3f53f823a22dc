//! Associated-data accumulation.
//!
//! Callers may supply AAD across several pre-payload calls; the engine
//! collects it here and hands the whole buffer to the primitive exactly once,
//! at the payload call. The buffer is released after every payload call,
//! success or failure.

use crate::EngineError;

/// Growable owned buffer of pending associated data.
#[derive(Debug, Default)]
pub struct AadAccumulator {
    buf: Vec<u8>,
}

impl AadAccumulator {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `data`, growing the allocation as needed.
    ///
    /// Returns the number of bytes accepted (always `data.len()`).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AadAllocation`] if the buffer cannot grow; the
    /// accumulator is left exactly as it was, never partially appended.
    pub fn push(&mut self, data: &[u8]) -> Result<usize, EngineError> {
        self.buf
            .try_reserve(data.len())
            .map_err(|_| EngineError::AadAllocation)?;
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    /// Replace the pending AAD wholesale (used for synthesized TLS headers).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AadAllocation`] if the buffer cannot grow.
    pub fn replace(&mut self, data: &[u8]) -> Result<(), EngineError> {
        self.buf.clear();
        self.push(data)?;
        Ok(())
    }

    /// Take ownership of the accumulated bytes, resetting to empty.
    #[must_use]
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }

    /// Drop the pending bytes and release the allocation.
    pub fn clear(&mut self) {
        self.buf = Vec::new();
    }

    /// Number of pending bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True when no AAD is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
