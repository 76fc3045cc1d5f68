use base64::{engine::general_purpose::STANDARD, Engine};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::services::{AuthError, Store};

/// Signs challenges with the private key a device registered, so the device
/// can authenticate without a bearer token.
#[derive(Clone)]
pub struct ChallengeResponder {
    store: Arc<dyn Store>,
}

impl ChallengeResponder {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// PKCS#1 v1.5 / SHA-256 signature over `data`, base64 encoded.
    pub async fn sign_challenge(&self, fingerprint: &str, data: &[u8]) -> Result<String, AuthError> {
        let private_key = self
            .store
            .private_key_get(fingerprint)
            .await?
            .ok_or(AuthError::PrivateKeyNotFound)?;

        let key = RsaPrivateKey::from_pkcs1_pem(&private_key.data).map_err(|e| {
            tracing::error!(fingerprint = %fingerprint, error = %e, "Stored private key is not a PKCS#1 PEM");
            AuthError::KeyParse(e.to_string())
        })?;

        let digest = Sha256::digest(data);
        let signature = key
            .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
            .map_err(|e| {
                tracing::error!(fingerprint = %fingerprint, error = %e, "Failed to sign challenge");
                AuthError::Sign(e.to_string())
            })?;

        Ok(STANDARD.encode(signature))
    }
}
