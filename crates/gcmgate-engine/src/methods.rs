//! Cipher method registry.
//!
//! A fixed table describing the supported AES-GCM variants, populated once
//! at compile time. Host glue that needs to enumerate ciphers or map a key
//! length to a method looks it up here and constructs sessions from the
//! matching entry.

use gcmgate_aead::{
    AES_128_KEY_SIZE, AES_192_KEY_SIZE, AES_256_KEY_SIZE, NOMINAL_NONCE_SIZE, TAG_SIZE,
};

use crate::session::{Direction, GcmSession};

/// Descriptor for one AES-GCM cipher variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherMethod {
    /// Canonical cipher name.
    pub name: &'static str,
    /// Key length in bytes.
    pub key_len: usize,
    /// Default IV/nonce length in bytes.
    pub iv_len: usize,
    /// Authentication tag block size in bytes.
    pub tag_len: usize,
}

static METHODS: [CipherMethod; 3] = [
    CipherMethod {
        name: "AES-128-GCM",
        key_len: AES_128_KEY_SIZE,
        iv_len: NOMINAL_NONCE_SIZE,
        tag_len: TAG_SIZE,
    },
    CipherMethod {
        name: "AES-192-GCM",
        key_len: AES_192_KEY_SIZE,
        iv_len: NOMINAL_NONCE_SIZE,
        tag_len: TAG_SIZE,
    },
    CipherMethod {
        name: "AES-256-GCM",
        key_len: AES_256_KEY_SIZE,
        iv_len: NOMINAL_NONCE_SIZE,
        tag_len: TAG_SIZE,
    },
];

/// All registered cipher methods.
#[must_use]
pub fn methods() -> &'static [CipherMethod] {
    &METHODS
}

impl CipherMethod {
    /// Look up a method by its canonical name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<&'static CipherMethod> {
        METHODS.iter().find(|m| m.name == name)
    }

    /// Look up a method by key length.
    #[must_use]
    pub fn by_key_len(key_len: usize) -> Option<&'static CipherMethod> {
        METHODS.iter().find(|m| m.key_len == key_len)
    }

    /// Create a session for this cipher variant with the method's default
    /// IV length preconfigured.
    #[must_use]
    pub fn session(&self, direction: Direction) -> GcmSession {
        let mut session = GcmSession::new(direction);
        session.iv.len = self.iv_len;
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_all_key_sizes() {
        assert_eq!(methods().len(), 3);
        for (name, key_len) in [
            ("AES-128-GCM", 16),
            ("AES-192-GCM", 24),
            ("AES-256-GCM", 32),
        ] {
            let m = CipherMethod::by_name(name).unwrap();
            assert_eq!(m.key_len, key_len);
            assert_eq!(m.iv_len, 12);
            assert_eq!(m.tag_len, 16);
            assert_eq!(CipherMethod::by_key_len(key_len), Some(m));
        }
    }

    #[test]
    fn unknown_lookups_fail() {
        assert!(CipherMethod::by_name("AES-512-GCM").is_none());
        assert!(CipherMethod::by_key_len(20).is_none());
    }

    #[test]
    fn session_gets_default_iv_len() {
        let m = CipherMethod::by_name("AES-256-GCM").unwrap();
        let s = m.session(Direction::Encrypt);
        assert_eq!(s.iv_len(), 12);
        assert_eq!(s.direction(), Direction::Encrypt);
        assert!(!s.is_initialized());
    }
}
