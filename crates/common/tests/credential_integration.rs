//! Integration tests for the public credential and payload APIs.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockEncryptMut, KeyIvInit};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::json;
use wxkit_common::{
    decode_payload, AccessTokenProvider, CredentialManager, CredentialSource, MockClock,
    PayloadDecoder,
};
use wxkit_domain::{AccessTokenResponse, EncryptedPayload, Result, WxError};

/// Hands out `grant-N` tokens valid for two hours.
struct CountingGrant {
    issued: AtomicU32,
}

#[async_trait]
impl CredentialSource for CountingGrant {
    fn tenant_id(&self) -> &str {
        "wx-integration"
    }

    async fn fetch_credential(&self) -> Result<AccessTokenResponse> {
        tokio::time::sleep(Duration::from_millis(5)).await;
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(AccessTokenResponse { access_token: format!("grant-{n}"), expires_in: 7200 })
    }
}

#[tokio::test]
async fn token_is_reused_until_expiry_then_refreshed_once() {
    let clock = MockClock::at_millis(1_700_000_000_000);
    let manager = Arc::new(CredentialManager::with_clock(
        CountingGrant { issued: AtomicU32::new(0) },
        clock.clone(),
    ));

    assert_eq!(manager.access_token().await.unwrap(), "grant-1");
    clock.advance(Duration::from_secs(3600));
    assert_eq!(manager.access_token().await.unwrap(), "grant-1");

    clock.advance(Duration::from_secs(3601));
    let callers = (0..8).map(|_| {
        let manager = Arc::clone(&manager);
        tokio::spawn(async move { manager.access_token().await })
    });
    for caller in futures::future::join_all(callers).await {
        assert_eq!(caller.unwrap().unwrap(), "grant-2");
    }
    assert_eq!(manager.refresh_count(), 2);
}

fn seal(key: &[u8; 16], iv: &[u8; 16], document: &serde_json::Value) -> EncryptedPayload {
    let plaintext = serde_json::to_vec(document).unwrap();
    let cipher = cbc::Encryptor::<aes::Aes128>::new_from_slices(key, iv)
        .unwrap()
        .encrypt_padded_vec_mut::<Pkcs7>(&plaintext);
    EncryptedPayload::new(BASE64.encode(key), BASE64.encode(iv), BASE64.encode(cipher))
}

#[test]
fn decoder_accepts_own_tenant_and_rejects_others() {
    let key = *b"integration-key!";
    let iv = *b"integration-iv!!";
    let payload = seal(
        &key,
        &iv,
        &json!({
            "phoneNumber": "13800000000",
            "watermark": {"appid": "wx-integration", "timestamp": 1_700_000_000}
        }),
    );

    let decoded = PayloadDecoder::new("wx-integration").decode_payload(&payload).unwrap();
    assert_eq!(decoded.document()["phoneNumber"], "13800000000");
    assert_eq!(decoded.watermark().timestamp, 1_700_000_000);

    let foreign = decode_payload(&payload.key_b64, &payload.iv_b64, &payload.cipher_b64, "wx-other");
    assert_eq!(foreign.unwrap_err(), WxError::PayloadIntegrity);
}
