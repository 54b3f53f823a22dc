//! TLS record path: AAD synthesis and wire-format payload calls.
//!
//! TLS 1.2 AEAD records carry an 8-byte explicit IV in front of the
//! ciphertext and a 16-byte tag behind it; the remaining 4 high-order nonce
//! bytes are the fixed per-connection part installed at session setup. The
//! 13-byte record header (sequence context, content type, version, length)
//! is the associated data, with the length field rewritten to cover the
//! inner plaintext only.
//!
//! These sizes are wire-format facts and must stay bit-exact for
//! interoperability.

use tracing::debug;
use zeroize::Zeroize;

use crate::error::EngineError;
use crate::session::{Direction, GcmSession, Mode, auth_or_primitive};

/// TLS AEAD record header size: 8-byte sequence context, 1-byte content
/// type, 2-byte version, 2-byte length.
pub const TLS_AAD_SIZE: usize = 13;

/// Fixed (implicit) part of the record nonce, from session setup.
pub const TLS_FIXED_IV_SIZE: usize = 4;

/// Explicit part of the record nonce, transmitted per record.
pub const TLS_EXPLICIT_IV_SIZE: usize = 8;

/// Authentication tag trailing each record.
pub const TLS_TAG_SIZE: usize = gcmgate_aead::TAG_SIZE;

impl GcmSession {
    /// Synthesize the effective AAD from a 13-byte TLS record header and
    /// switch the session into TLS-record mode.
    ///
    /// The trailing length field is rewritten to exclude the explicit IV
    /// and, for decrypt sessions, the tag. Returns the tag size as the
    /// acknowledgement that that many trailing bytes are authentication
    /// data.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidTlsAadLength`] for a header that is not
    /// 13 bytes and [`EngineError::InvalidTlsRecordLength`] when the encoded
    /// record length cannot cover the IV/tag framing.
    pub(crate) fn set_tls_aad(&mut self, header: &[u8]) -> Result<usize, EngineError> {
        if header.len() != TLS_AAD_SIZE {
            return Err(EngineError::InvalidTlsAadLength(header.len()));
        }

        let mut aad = [0u8; TLS_AAD_SIZE];
        aad.copy_from_slice(header);

        let encoded =
            usize::from(u16::from_be_bytes([aad[TLS_AAD_SIZE - 2], aad[TLS_AAD_SIZE - 1]]));
        let mut len = encoded
            .checked_sub(TLS_EXPLICIT_IV_SIZE)
            .ok_or(EngineError::InvalidTlsRecordLength(encoded))?;
        if self.direction == Direction::Decrypt {
            len = len
                .checked_sub(TLS_TAG_SIZE)
                .ok_or(EngineError::InvalidTlsRecordLength(encoded))?;
        }
        let len = u16::try_from(len).map_err(|_| EngineError::InvalidTlsRecordLength(encoded))?;
        aad[TLS_AAD_SIZE - 2..].copy_from_slice(&len.to_be_bytes());

        self.aad.replace(&aad)?;
        self.mode = Mode::TlsRecord;
        debug!("TLS AAD installed, inner record length {len}");
        Ok(TLS_TAG_SIZE)
    }

    /// One TLS-record payload call over a wire-format buffer.
    ///
    /// Encrypting writes `[explicit IV | ciphertext | tag]` into `out` and
    /// returns the full record length. Decrypting reads the explicit IV and
    /// trailing tag from `input`, writes the plaintext into `out` at the
    /// explicit-IV offset (mirroring the wire layout), and returns the
    /// plaintext length. `out` and `input` are distinct buffers; callers
    /// holding a single record buffer copy it first.
    pub(crate) fn tls_record(
        &mut self,
        out: &mut [u8],
        input: &[u8],
    ) -> Result<usize, EngineError> {
        // AAD is consumed by this call no matter how it ends.
        let aad = self.aad.take();
        self.tls_record_inner(out, input, &aad)
    }

    fn tls_record_inner(
        &mut self,
        out: &mut [u8],
        input: &[u8],
        aad: &[u8],
    ) -> Result<usize, EngineError> {
        if input.is_empty() {
            return Ok(0);
        }
        if input.len() < TLS_EXPLICIT_IV_SIZE + TLS_TAG_SIZE {
            return Err(EngineError::RecordTooShort(input.len()));
        }
        if out.len() < input.len() {
            return Err(EngineError::OutputTooSmall {
                need: input.len(),
                have: out.len(),
            });
        }
        if self.iv.len != TLS_FIXED_IV_SIZE + TLS_EXPLICIT_IV_SIZE {
            return Err(EngineError::InvalidIvLength(self.iv.len));
        }

        let body = TLS_EXPLICIT_IV_SIZE..input.len() - TLS_TAG_SIZE;
        let tail = input.len() - TLS_TAG_SIZE..input.len();

        match self.direction {
            Direction::Encrypt => {
                // Explicit part of the current nonce leads the record.
                out[..TLS_EXPLICIT_IV_SIZE]
                    .copy_from_slice(&self.iv.buf[TLS_FIXED_IV_SIZE..self.iv.len]);
                out[body.clone()].copy_from_slice(&input[body.clone()]);

                let key = self.key.as_ref().ok_or(EngineError::MissingKey)?;
                let tag = key.seal_detached(self.iv.nonce(), aad, &mut out[body.clone()])?;
                out[tail].copy_from_slice(&tag);

                self.iv.advance();
                debug!("sealed TLS record, {} bytes total", input.len());
                Ok(input.len())
            }
            Direction::Decrypt => {
                // Explicit part of the nonce arrives with the record.
                self.iv.buf[TLS_FIXED_IV_SIZE..TLS_FIXED_IV_SIZE + TLS_EXPLICIT_IV_SIZE]
                    .copy_from_slice(&input[..TLS_EXPLICIT_IV_SIZE]);
                out[body.clone()].copy_from_slice(&input[body.clone()]);

                let key = self.key.as_ref().ok_or(EngineError::MissingKey)?;
                match key.open_detached(
                    self.iv.nonce(),
                    aad,
                    &mut out[body.clone()],
                    &input[tail],
                ) {
                    Ok(()) => {
                        debug!("opened TLS record, {} plaintext bytes", body.len());
                        Ok(body.len())
                    }
                    Err(e) => {
                        out[body].zeroize();
                        Err(auth_or_primitive(e))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{Control, IvFixed};

    const KEY: [u8; 16] = [0x42; 16];
    const FIXED: [u8; 4] = [0xde, 0xad, 0xbe, 0xef];

    fn header(seq: u64, len: u16) -> [u8; TLS_AAD_SIZE] {
        let mut hdr = [0u8; TLS_AAD_SIZE];
        hdr[..8].copy_from_slice(&seq.to_be_bytes());
        hdr[8] = 0x17; // application data
        hdr[9] = 0x03;
        hdr[10] = 0x03;
        hdr[11..].copy_from_slice(&len.to_be_bytes());
        hdr
    }

    fn tls_session(direction: Direction) -> GcmSession {
        let mut s = GcmSession::new(direction);
        s.init(Some(&KEY), None, direction).unwrap();
        s.control(Control::SetIvFixed(IvFixed::Prefix(&FIXED)))
            .unwrap();
        s
    }

    #[test]
    fn aad_synthesis_rewrites_length() {
        let mut enc = tls_session(Direction::Encrypt);
        let ack = enc
            .control(Control::SetTlsAad(&header(7, 100 + 8)))
            .unwrap();
        assert_eq!(ack, TLS_TAG_SIZE);
        assert_eq!(enc.mode(), Mode::TlsRecord);

        let mut dec = tls_session(Direction::Decrypt);
        dec.control(Control::SetTlsAad(&header(7, 100 + 8 + 16)))
            .unwrap();
        // Both sides authenticate the same inner length.
        assert_eq!(enc.pending_aad_len(), TLS_AAD_SIZE);
        assert_eq!(dec.pending_aad_len(), TLS_AAD_SIZE);
    }

    #[test]
    fn aad_header_must_be_13_bytes() {
        let mut s = tls_session(Direction::Encrypt);
        assert!(matches!(
            s.control(Control::SetTlsAad(&[0u8; 12])),
            Err(EngineError::InvalidTlsAadLength(12))
        ));
    }

    #[test]
    fn aad_length_underflow_rejected() {
        let mut enc = tls_session(Direction::Encrypt);
        assert!(matches!(
            enc.control(Control::SetTlsAad(&header(0, 7))),
            Err(EngineError::InvalidTlsRecordLength(7))
        ));

        // Decrypt additionally needs room for the tag.
        let mut dec = tls_session(Direction::Decrypt);
        assert!(matches!(
            dec.control(Control::SetTlsAad(&header(0, 20))),
            Err(EngineError::InvalidTlsRecordLength(20))
        ));
    }

    #[test]
    fn record_roundtrip() {
        let plaintext = b"finished handshake, application data follows";
        let body = plaintext.len();
        let record_len = TLS_EXPLICIT_IV_SIZE + body + TLS_TAG_SIZE;

        let mut enc = tls_session(Direction::Encrypt);
        let explicit_iv = enc.iv()[TLS_FIXED_IV_SIZE..].to_vec();
        enc.control(Control::SetTlsAad(&header(1, (body + TLS_EXPLICIT_IV_SIZE) as u16)))
            .unwrap();

        let mut record_in = vec![0u8; record_len];
        record_in[TLS_EXPLICIT_IV_SIZE..TLS_EXPLICIT_IV_SIZE + body].copy_from_slice(plaintext);
        let mut record = vec![0u8; record_len];
        let n = enc.update(Some(&mut record), &record_in).unwrap();
        assert_eq!(n, record_len);

        // Explicit IV leads the record unmodified; tag trails it.
        assert_eq!(&record[..TLS_EXPLICIT_IV_SIZE], &explicit_iv[..]);
        assert_ne!(
            &record[TLS_EXPLICIT_IV_SIZE..TLS_EXPLICIT_IV_SIZE + body],
            plaintext
        );

        let mut dec = tls_session(Direction::Decrypt);
        dec.control(Control::SetTlsAad(&header(1, record_len as u16)))
            .unwrap();
        let mut opened = vec![0u8; record_len];
        let n = dec.update(Some(&mut opened), &record).unwrap();
        assert_eq!(n, body);
        assert_eq!(
            &opened[TLS_EXPLICIT_IV_SIZE..TLS_EXPLICIT_IV_SIZE + body],
            plaintext
        );
    }

    #[test]
    fn tampered_record_fails() {
        let plaintext = b"payload";
        let body = plaintext.len();
        let record_len = TLS_EXPLICIT_IV_SIZE + body + TLS_TAG_SIZE;

        let mut enc = tls_session(Direction::Encrypt);
        enc.control(Control::SetTlsAad(&header(1, (body + TLS_EXPLICIT_IV_SIZE) as u16)))
            .unwrap();
        let mut record_in = vec![0u8; record_len];
        record_in[TLS_EXPLICIT_IV_SIZE..TLS_EXPLICIT_IV_SIZE + body].copy_from_slice(plaintext);
        let mut record = vec![0u8; record_len];
        enc.update(Some(&mut record), &record_in).unwrap();

        for i in 0..record.len() {
            let mut bad = record.clone();
            bad[i] ^= 0x80;
            let mut dec = tls_session(Direction::Decrypt);
            dec.control(Control::SetTlsAad(&header(1, record_len as u16)))
                .unwrap();
            let mut out = vec![0u8; record_len];
            assert!(
                dec.update(Some(&mut out), &bad).is_err(),
                "bit flip at {i} accepted"
            );
        }
    }

    #[test]
    fn wrong_sequence_number_fails() {
        let plaintext = b"payload";
        let body = plaintext.len();
        let record_len = TLS_EXPLICIT_IV_SIZE + body + TLS_TAG_SIZE;

        let mut enc = tls_session(Direction::Encrypt);
        enc.control(Control::SetTlsAad(&header(1, (body + TLS_EXPLICIT_IV_SIZE) as u16)))
            .unwrap();
        let mut record_in = vec![0u8; record_len];
        record_in[TLS_EXPLICIT_IV_SIZE..TLS_EXPLICIT_IV_SIZE + body].copy_from_slice(plaintext);
        let mut record = vec![0u8; record_len];
        enc.update(Some(&mut record), &record_in).unwrap();

        let mut dec = tls_session(Direction::Decrypt);
        dec.control(Control::SetTlsAad(&header(2, record_len as u16)))
            .unwrap();
        let mut out = vec![0u8; record_len];
        assert!(matches!(
            dec.update(Some(&mut out), &record),
            Err(EngineError::AuthenticationFailed)
        ));
    }

    #[test]
    fn explicit_iv_advances_per_record() {
        let body = 4usize;
        let record_len = TLS_EXPLICIT_IV_SIZE + body + TLS_TAG_SIZE;
        let mut enc = tls_session(Direction::Encrypt);

        let mut previous: Option<Vec<u8>> = None;
        for seq in 0..4u64 {
            enc.control(Control::SetTlsAad(&header(seq, (body + TLS_EXPLICIT_IV_SIZE) as u16)))
                .unwrap();
            let record_in = vec![0u8; record_len];
            let mut record = vec![0u8; record_len];
            enc.update(Some(&mut record), &record_in).unwrap();

            let explicit = record[..TLS_EXPLICIT_IV_SIZE].to_vec();
            if let Some(prev) = previous {
                assert_ne!(prev, explicit);
            }
            previous = Some(explicit);
        }
    }

    #[test]
    fn zero_length_record_is_noop() {
        let mut enc = tls_session(Direction::Encrypt);
        enc.control(Control::SetTlsAad(&header(0, 12)))
            .unwrap();
        let mut out = vec![0u8; 32];
        assert_eq!(enc.update(Some(&mut out), &[]).unwrap(), 0);
        // The pending AAD is still consumed by the call.
        assert_eq!(enc.pending_aad_len(), 0);
    }

    #[test]
    fn short_record_rejected() {
        let mut dec = tls_session(Direction::Decrypt);
        dec.control(Control::SetTlsAad(&header(0, 24)))
            .unwrap();
        let mut out = vec![0u8; 32];
        assert!(matches!(
            dec.update(Some(&mut out), &[0u8; 10]),
            Err(EngineError::RecordTooShort(10))
        ));
    }

    #[test]
    fn tls_mode_requires_output() {
        let mut enc = tls_session(Direction::Encrypt);
        enc.control(Control::SetTlsAad(&header(0, 12))).unwrap();
        assert!(matches!(
            enc.update(None, b"aad"),
            Err(EngineError::MissingOutput)
        ));
    }
}
