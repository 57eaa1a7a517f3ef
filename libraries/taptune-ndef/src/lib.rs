//! TapTune NDEF
//!
//! NDEF payload decoding for TapTune.
//!
//! Platform NFC plugins deliver tag reads in wildly different envelopes:
//! raw payload bytes, a single record, a whole message, or a read event
//! with every message on the tag. This crate normalizes all of them into
//! one canonical content string:
//! - NFC Forum URI-record abbreviation codes are expanded to their scheme
//!   prefix (`0x04` becomes `https://`, and so on)
//! - text-record language artifacts (`STX` + `en`) are stripped
//! - the result is trimmed, and anything undecodable becomes `None`
//!
//! # Example
//!
//! ```rust
//! use taptune_core::TagPayload;
//! use taptune_ndef::decode;
//!
//! let payload = TagPayload::Bytes(b"\x04example.com".to_vec());
//! assert_eq!(decode(&payload), Some("https://example.com".to_string()));
//! ```

mod decode;
mod uri;

pub use decode::decode;
pub use uri::{uri_prefix, URI_PREFIXES};
