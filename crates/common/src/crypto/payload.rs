//! AES-128-CBC payload decoder with watermark verification.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, KeyIvInit};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde_json::Value;
use tracing::debug;
use wxkit_domain::{DecodedPayload, EncryptedPayload, Result, Watermark, WxError};

type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// Standard alphabet, trailing `=` optional.
const PAYLOAD_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Low-level cause of a rejected payload. Logged, never returned.
#[derive(Debug, thiserror::Error)]
enum DecodeFailure {
    #[error("{field} is not valid base64: {source}")]
    Base64 { field: &'static str, source: base64::DecodeError },

    #[error("key or iv has the wrong length (key {key_len}, iv {iv_len})")]
    KeyLength { key_len: usize, iv_len: usize },

    #[error("ciphertext failed PKCS#7 unpadding")]
    Padding,

    #[error("plaintext is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("plaintext is not JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document carries no usable watermark")]
    MissingWatermark,

    #[error("watermark appid {found} does not match {expected}")]
    TenantMismatch { expected: String, found: String },
}

/// Decodes encrypted payloads issued to one tenant.
///
/// Stateless apart from the expected app id; safe to share across threads.
#[derive(Debug, Clone)]
pub struct PayloadDecoder {
    app_id: String,
}

impl PayloadDecoder {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self { app_id: app_id.into() }
    }

    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Decrypt and authenticate a base64 key/iv/ciphertext triplet.
    ///
    /// # Errors
    /// Every failure, whatever its cause, is [`WxError::PayloadIntegrity`].
    pub fn decode(&self, key_b64: &str, iv_b64: &str, cipher_b64: &str) -> Result<DecodedPayload> {
        decode_payload(key_b64, iv_b64, cipher_b64, &self.app_id)
    }

    /// Same as [`decode`](Self::decode) for a bundled [`EncryptedPayload`].
    pub fn decode_payload(&self, payload: &EncryptedPayload) -> Result<DecodedPayload> {
        self.decode(&payload.key_b64, &payload.iv_b64, &payload.cipher_b64)
    }
}

/// Decrypt a payload and check that it was issued to `expected_app_id`.
///
/// # Errors
/// Returns the opaque [`WxError::PayloadIntegrity`] on bad base64, wrong key
/// length, bad padding, non-UTF-8 or non-JSON plaintext, and on a missing or
/// foreign watermark.
pub fn decode_payload(
    key_b64: &str,
    iv_b64: &str,
    cipher_b64: &str,
    expected_app_id: &str,
) -> Result<DecodedPayload> {
    try_decode(key_b64, iv_b64, cipher_b64, expected_app_id).map_err(|cause| {
        debug!(error = %cause, "payload rejected");
        WxError::PayloadIntegrity
    })
}

fn try_decode(
    key_b64: &str,
    iv_b64: &str,
    cipher_b64: &str,
    expected_app_id: &str,
) -> std::result::Result<DecodedPayload, DecodeFailure> {
    let key = base64_field("key", key_b64)?;
    let iv = base64_field("iv", iv_b64)?;
    let ciphertext = base64_field("ciphertext", cipher_b64)?;

    let cipher = Aes128CbcDec::new_from_slices(&key, &iv)
        .map_err(|_| DecodeFailure::KeyLength { key_len: key.len(), iv_len: iv.len() })?;
    let plaintext =
        cipher.decrypt_padded_vec_mut::<Pkcs7>(&ciphertext).map_err(|_| DecodeFailure::Padding)?;

    let text = String::from_utf8(plaintext)?;
    let document: Value = serde_json::from_str(&text)?;

    let watermark = document
        .get("watermark")
        .cloned()
        .and_then(|raw| serde_json::from_value::<Watermark>(raw).ok())
        .ok_or(DecodeFailure::MissingWatermark)?;

    if watermark.appid != expected_app_id {
        return Err(DecodeFailure::TenantMismatch {
            expected: expected_app_id.to_string(),
            found: watermark.appid,
        });
    }

    Ok(DecodedPayload::new(watermark, document))
}

fn base64_field(field: &'static str, encoded: &str) -> std::result::Result<Vec<u8>, DecodeFailure> {
    PAYLOAD_BASE64.decode(encoded).map_err(|source| DecodeFailure::Base64 { field, source })
}

#[cfg(test)]
mod tests {
    use aes::cipher::BlockEncryptMut;
    use base64::engine::general_purpose::{STANDARD as BASE64, STANDARD_NO_PAD};
    use serde_json::json;

    use super::*;

    type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;

    const KEY: [u8; 16] = *b"0123456789abcdef";
    const IV: [u8; 16] = *b"fedcba9876543210";
    const APP_ID: &str = "wx4f4bc4dec97d474b";

    fn encrypt(key: &[u8], iv: &[u8], plaintext: &[u8]) -> String {
        let cipher = Aes128CbcEnc::new_from_slices(key, iv).unwrap();
        BASE64.encode(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
    }

    fn sealed(document: &Value) -> EncryptedPayload {
        let plaintext = serde_json::to_vec(document).unwrap();
        EncryptedPayload::new(BASE64.encode(KEY), BASE64.encode(IV), encrypt(&KEY, &IV, &plaintext))
    }

    fn phone_document(appid: &str) -> Value {
        json!({
            "phoneNumber": "13580006666",
            "purePhoneNumber": "13580006666",
            "countryCode": "86",
            "watermark": { "appid": appid, "timestamp": 1_477_314_187 }
        })
    }

    #[test]
    fn decodes_payload_with_matching_watermark() {
        let document = phone_document(APP_ID);
        let decoded = PayloadDecoder::new(APP_ID).decode_payload(&sealed(&document)).unwrap();

        assert_eq!(decoded.watermark().appid, APP_ID);
        assert_eq!(decoded.watermark().timestamp, 1_477_314_187);
        assert_eq!(decoded.document(), &document);

        #[derive(serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Phone {
            pure_phone_number: String,
        }
        let phone: Phone = decoded.parse().unwrap();
        assert_eq!(phone.pure_phone_number, "13580006666");
    }

    #[test]
    fn rejects_foreign_watermark() {
        let payload = sealed(&phone_document("wx-someone-else"));
        let err = PayloadDecoder::new(APP_ID).decode_payload(&payload).unwrap_err();
        assert_eq!(err, WxError::PayloadIntegrity);
    }

    #[test]
    fn rejects_missing_watermark() {
        let payload = sealed(&json!({ "openId": "o-1" }));
        assert_eq!(
            PayloadDecoder::new(APP_ID).decode_payload(&payload),
            Err(WxError::PayloadIntegrity)
        );
    }

    #[test]
    fn rejects_tampered_ciphertext() {
        let payload = sealed(&phone_document(APP_ID));
        let ciphertext = BASE64.decode(&payload.cipher_b64).unwrap();
        let decoder = PayloadDecoder::new(APP_ID);

        for position in 0..ciphertext.len() {
            let mut tampered = ciphertext.clone();
            tampered[position] ^= 0x5a;
            let result = decoder.decode(&payload.key_b64, &payload.iv_b64, &BASE64.encode(&tampered));
            assert_eq!(result, Err(WxError::PayloadIntegrity), "byte {position} went unnoticed");
        }
    }

    #[test]
    fn rejects_wrong_key() {
        let payload = sealed(&phone_document(APP_ID));
        let wrong_key = BASE64.encode(b"ffffffffffffffff");
        assert_eq!(
            decode_payload(&wrong_key, &payload.iv_b64, &payload.cipher_b64, APP_ID),
            Err(WxError::PayloadIntegrity)
        );
    }

    #[test]
    fn rejects_malformed_inputs() {
        let payload = sealed(&phone_document(APP_ID));
        let decoder = PayloadDecoder::new(APP_ID);

        // not base64
        assert!(decoder.decode("%%%", &payload.iv_b64, &payload.cipher_b64).is_err());
        // 8-byte key
        let short_key = BASE64.encode(b"01234567");
        assert_eq!(
            decoder.decode(&short_key, &payload.iv_b64, &payload.cipher_b64),
            Err(WxError::PayloadIntegrity)
        );
        // ciphertext not a whole number of blocks
        let ragged = BASE64.encode([1u8; 15]);
        assert_eq!(
            decoder.decode(&payload.key_b64, &payload.iv_b64, &ragged),
            Err(WxError::PayloadIntegrity)
        );
        // valid padding around non-JSON plaintext
        let not_json = encrypt(&KEY, &IV, b"plain text, no braces");
        assert_eq!(
            decoder.decode(&payload.key_b64, &payload.iv_b64, &not_json),
            Err(WxError::PayloadIntegrity)
        );
    }

    #[test]
    fn accepts_unpadded_base64_fields() {
        let plaintext = serde_json::to_vec(&phone_document(APP_ID)).unwrap();
        let cipher = Aes128CbcEnc::new_from_slices(&KEY, &IV)
            .unwrap()
            .encrypt_padded_vec_mut::<Pkcs7>(&plaintext);
        let key = STANDARD_NO_PAD.encode(KEY);
        let iv = STANDARD_NO_PAD.encode(IV);
        assert!(!key.ends_with('='));

        let decoded = PayloadDecoder::new(APP_ID)
            .decode(&key, &iv, &STANDARD_NO_PAD.encode(&cipher))
            .unwrap();
        assert_eq!(decoded.document()["countryCode"], "86");
    }

    #[test]
    fn rejects_watermark_without_timestamp() {
        let payload = sealed(&json!({
            "openId": "o-1",
            "watermark": { "appid": APP_ID }
        }));
        assert_eq!(
            PayloadDecoder::new(APP_ID).decode_payload(&payload),
            Err(WxError::PayloadIntegrity)
        );
    }
}
