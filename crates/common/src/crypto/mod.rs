//! Payload decoding for vendor-encrypted blobs.
//!
//! The platform hands out AES-128-CBC ciphertext whose plaintext is a JSON
//! document stamped with the tenant's `watermark.appid`. [`PayloadDecoder`]
//! reverses that and refuses anything that does not carry the expected stamp.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wxkit_common::crypto::PayloadDecoder;
//!
//! let decoder = PayloadDecoder::new("wx1234567890");
//! let payload = decoder.decode(&session_key, &iv, &encrypted_data)?;
//! let phone: PhoneInfo = payload.parse()?;
//! ```

pub mod payload;

pub use payload::{decode_payload, PayloadDecoder};
