//! Verification of the gateway's payment-completion callback.
//!
//! When the customer completes a payment, the gateway hands the client a signature over the order
//! and payment identifiers, computed as `HMAC-SHA256(key_secret, "{order_id}|{payment_id}")` and
//! hex-encoded in lowercase. The client relays it verbatim and we recompute it server-side. The
//! comparison is constant-time so the callback endpoint cannot be used as a signature oracle.

use bpg_common::Secret;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_SEPARATOR: &str = "|";

#[derive(Debug, Clone, Error)]
pub enum SignatureError {
    #[error("Invalid signature input. {0}")]
    InvalidInput(String),
}

/// Signs and verifies gateway callback payloads with the shared gateway key secret.
#[derive(Clone)]
pub struct CallbackVerifier {
    secret: Secret<String>,
}

impl CallbackVerifier {
    pub fn new(secret: Secret<String>) -> Self {
        Self { secret }
    }

    /// The expected signature for a completed payment, as a lowercase hex string.
    pub fn sign(&self, order_id: &str, payment_id: &str) -> Result<String, SignatureError> {
        if order_id.is_empty() {
            return Err(SignatureError::InvalidInput("order id is empty".to_string()));
        }
        if payment_id.is_empty() {
            return Err(SignatureError::InvalidInput("payment id is empty".to_string()));
        }
        let secret = self.secret.reveal();
        if secret.is_empty() {
            return Err(SignatureError::InvalidInput("signing secret is empty".to_string()));
        }
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| SignatureError::InvalidInput(e.to_string()))?;
        mac.update(order_id.as_bytes());
        mac.update(SIGNATURE_SEPARATOR.as_bytes());
        mac.update(payment_id.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Whether `signature` matches the expected signature for the pair. Returns `Ok(false)` for a
    /// well-formed but wrong signature; only structurally invalid input is an error.
    pub fn verify(&self, order_id: &str, payment_id: &str, signature: &str) -> Result<bool, SignatureError> {
        if signature.is_empty() {
            return Err(SignatureError::InvalidInput("signature is empty".to_string()));
        }
        let expected = self.sign(order_id, payment_id)?;
        if expected.len() != signature.len() {
            return Ok(false);
        }
        Ok(expected.as_bytes().ct_eq(signature.as_bytes()).into())
    }
}
