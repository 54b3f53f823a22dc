//! Control-command surface.
//!
//! Named operations that configure a session's IV, tag, and AAD state
//! before or between cipher calls, dispatched over a tagged enum rather
//! than an untyped `(command, int, pointer)` triple. Commands that report a
//! value return it as the `usize` result; the rest return 0.

use tracing::debug;

use crate::error::EngineError;
use crate::session::{Direction, GcmSession};

/// Fixed-IV installation forms.
#[derive(Debug)]
pub enum IvFixed<'a> {
    /// The caller supplies the complete IV verbatim (used mainly to
    /// reconstruct a TLS explicit IV).
    Full(&'a [u8]),
    /// The caller supplies the fixed prefix; the engine randomizes the
    /// remainder and commits the result.
    Prefix(&'a [u8]),
}

/// Tag input for [`Control::SetTag`].
#[derive(Debug)]
pub enum TagInput<'a> {
    /// Tag bytes received with the ciphertext. Decrypt sessions store them;
    /// encrypt sessions record only the length.
    Bytes(&'a [u8]),
    /// A requested tag length with no bytes; valid only when encrypting.
    Len(usize),
}

/// Session control commands.
#[derive(Debug)]
pub enum Control<'a> {
    /// Set the IV/nonce length (1..=16).
    SetIvLen(usize),
    /// Install fixed IV material; see [`IvFixed`].
    SetIvFixed(IvFixed<'a>),
    /// Report the configured IV/nonce length.
    GetIvLen,
    /// Generate the next nonce from a seed (1..=16 bytes): the seed is
    /// copied into the IV and the counter increment is run over the
    /// configured length.
    IvGen(&'a [u8]),
    /// Copy the front of the tag produced by the last encrypt payload call
    /// into the buffer; fails if more is requested than was produced.
    GetTag(&'a mut [u8]),
    /// Supply the verification tag (decrypt) or request a tag length
    /// (encrypt); see [`TagInput`].
    SetTag(TagInput<'a>),
    /// Synthesize the effective AAD from a 13-byte TLS record header and
    /// switch the session into TLS-record mode. Returns the tag size.
    SetTlsAad(&'a [u8]),
}

impl GcmSession {
    /// Apply a control command.
    ///
    /// Returns the command's report value: the IV length for
    /// [`Control::GetIvLen`], the copied byte count for
    /// [`Control::GetTag`], the tag size for [`Control::SetTlsAad`], and 0
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Configuration errors are surfaced per command: out-of-range lengths,
    /// direction mismatches, missing decrypt tags, and malformed TLS AAD
    /// headers.
    pub fn control(&mut self, ctrl: Control<'_>) -> Result<usize, EngineError> {
        match ctrl {
            Control::SetIvLen(len) => {
                debug!("set IV length to {len}");
                self.iv.set_len(len)?;
                Ok(0)
            }
            Control::SetIvFixed(IvFixed::Full(data)) => {
                debug!("install complete IV ({} bytes supplied)", data.len());
                self.iv.install_full(data)?;
                Ok(0)
            }
            Control::SetIvFixed(IvFixed::Prefix(fixed)) => {
                debug!("install {}-byte fixed IV prefix", fixed.len());
                self.iv.install_fixed_prefix(fixed)?;
                Ok(0)
            }
            Control::GetIvLen => Ok(self.iv.len),
            Control::IvGen(seed) => {
                debug!("generate nonce from {}-byte seed", seed.len());
                self.iv.generate(seed)?;
                Ok(0)
            }
            Control::GetTag(out) => {
                debug!("read back {}-byte tag", out.len());
                if self.direction != Direction::Encrypt {
                    return Err(EngineError::DirectionMismatch);
                }
                self.tag.get(out)
            }
            Control::SetTag(TagInput::Bytes(bytes)) => {
                debug!("set {}-byte tag", bytes.len());
                match self.direction {
                    Direction::Decrypt => self.tag.set_bytes(bytes)?,
                    // Encrypting: only the requested length is recorded.
                    Direction::Encrypt => self.tag.set_len(bytes.len())?,
                }
                Ok(0)
            }
            Control::SetTag(TagInput::Len(len)) => {
                debug!("set tag length to {len}");
                match self.direction {
                    Direction::Decrypt => Err(EngineError::MissingTag),
                    Direction::Encrypt => {
                        self.tag.set_len(len)?;
                        Ok(0)
                    }
                }
            }
            Control::SetTlsAad(header) => {
                debug!("synthesize TLS AAD from {}-byte header", header.len());
                self.set_tls_aad(header)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcmgate_aead::TAG_SIZE;

    fn session(direction: Direction) -> GcmSession {
        let mut s = GcmSession::new(direction);
        s.init(Some(&[0x42; 16]), None, direction).unwrap();
        s
    }

    #[test]
    fn iv_len_roundtrip() {
        let mut s = session(Direction::Encrypt);
        assert_eq!(s.control(Control::GetIvLen).unwrap(), 0);
        s.control(Control::SetIvLen(12)).unwrap();
        assert_eq!(s.control(Control::GetIvLen).unwrap(), 12);
    }

    #[test]
    fn iv_len_bounds() {
        let mut s = session(Direction::Encrypt);
        assert!(matches!(
            s.control(Control::SetIvLen(0)),
            Err(EngineError::InvalidIvLength(0))
        ));
        assert!(matches!(
            s.control(Control::SetIvLen(17)),
            Err(EngineError::InvalidIvLength(17))
        ));
    }

    #[test]
    fn iv_gen_increments() {
        let mut s = session(Direction::Encrypt);
        s.control(Control::SetIvLen(12)).unwrap();
        s.control(Control::IvGen(&[0u8; 12])).unwrap();
        assert_eq!(s.iv()[11], 1);
    }

    #[test]
    fn iv_gen_seed_bounds() {
        let mut s = session(Direction::Encrypt);
        assert!(s.control(Control::IvGen(&[])).is_err());
        assert!(s.control(Control::IvGen(&[0u8; 17])).is_err());
    }

    #[test]
    fn get_tag_requires_encrypt_direction() {
        let mut s = session(Direction::Decrypt);
        let mut out = [0u8; TAG_SIZE];
        assert!(matches!(
            s.control(Control::GetTag(&mut out)),
            Err(EngineError::DirectionMismatch)
        ));
    }

    #[test]
    fn set_tag_decrypt_stores_bytes() {
        let mut s = session(Direction::Decrypt);
        s.control(Control::SetTag(TagInput::Bytes(&[0xaa; 12])))
            .unwrap();
        assert_eq!(s.tag_len(), 12);
    }

    #[test]
    fn set_tag_decrypt_needs_bytes() {
        let mut s = session(Direction::Decrypt);
        assert!(matches!(
            s.control(Control::SetTag(TagInput::Len(16))),
            Err(EngineError::MissingTag)
        ));
    }

    #[test]
    fn set_tag_encrypt_records_length_only() {
        let mut s = session(Direction::Encrypt);
        s.control(Control::SetTag(TagInput::Bytes(&[0xaa; 12])))
            .unwrap();
        assert_eq!(s.tag_len(), 12);
        s.control(Control::SetTag(TagInput::Len(16))).unwrap();
        assert_eq!(s.tag_len(), 16);
    }

    #[test]
    fn fixed_prefix_randomizes_suffix() {
        let mut a = session(Direction::Encrypt);
        let mut b = session(Direction::Encrypt);
        a.control(Control::SetIvFixed(IvFixed::Prefix(&[1, 2, 3, 4])))
            .unwrap();
        b.control(Control::SetIvFixed(IvFixed::Prefix(&[1, 2, 3, 4])))
            .unwrap();
        assert_eq!(&a.iv()[..4], &[1, 2, 3, 4]);
        assert_eq!(a.iv_len(), 12);
        // Random suffixes collide with probability 2^-64
        assert_ne!(&a.iv()[4..], &b.iv()[4..]);
    }

    #[test]
    fn full_iv_installed_verbatim() {
        let mut s = session(Direction::Encrypt);
        let iv = [0x5a; 12];
        s.control(Control::SetIvFixed(IvFixed::Full(&iv))).unwrap();
        assert_eq!(s.iv(), &iv);
    }
}
