//! # gcmgate Engine
//!
//! Per-session AES-GCM state machine: associated-data accumulation, nonce/IV
//! lifecycle, tag handling, an EVP-style control-command surface, and the
//! one-shot and TLS-record cipher paths.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        GcmSession                               │
//! │  (one per in-flight cipher operation; init/update/control)      │
//! ├──────────────┬──────────────┬──────────────┬────────────────────┤
//! │ AadAccumulator│   IvState   │   TagStore   │  Control dispatch  │
//! │ (pending AAD) │ (nonce gen) │ (tag in/out) │  (configuration)   │
//! ├──────────────┴──────────────┴──────────────┴────────────────────┤
//! │              gcmgate-aead (AES-GCM primitive facade)            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A session runs one operation at a time: configure via [`Control`]
//! commands, push associated data with tagless [`GcmSession::update`] calls,
//! then make exactly one payload call, which consumes the pending AAD and
//! (for encrypt) produces the authentication tag. The TLS-record mode,
//! entered through [`Control::SetTlsAad`], instead operates on wire-format
//! records with an explicit IV prefix and trailing tag.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod aad;
pub mod control;
pub mod error;
pub mod iv;
pub mod methods;
pub mod session;
pub mod tag;
pub mod tls;

pub use control::{Control, IvFixed, TagInput};
pub use error::EngineError;
pub use iv::increment_counter;
pub use methods::{CipherMethod, methods};
pub use session::{Direction, GcmSession, Mode};
pub use tls::{TLS_AAD_SIZE, TLS_EXPLICIT_IV_SIZE, TLS_FIXED_IV_SIZE, TLS_TAG_SIZE};

/// Authentication tag block size, re-exported from the primitive facade.
pub use gcmgate_aead::TAG_SIZE;

/// Nominal nonce length (12 bytes), re-exported from the primitive facade.
pub use gcmgate_aead::NOMINAL_NONCE_SIZE;

/// Maximum nonce length (16 bytes), re-exported from the primitive facade.
pub use gcmgate_aead::MAX_NONCE_SIZE;
