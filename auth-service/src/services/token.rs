use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::Arc;

use crate::config::KeysConfig;
use crate::models::{DeviceUid, User};
use crate::services::AuthError;

/// Lifetime of user tokens. Device tokens never expire.
pub const USER_TOKEN_TTL_HOURS: i64 = 72;

/// Process-wide RS256 key pair, loaded once at startup.
pub struct SigningKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    public_key: RsaPublicKey,
}

impl SigningKeys {
    /// Load the key pair from the configured PEM files.
    pub fn load(config: &KeysConfig) -> Result<Self, anyhow::Error> {
        let private_key_pem = fs::read_to_string(&config.private_key_path).map_err(|e| {
            anyhow::anyhow!(
                "Failed to read private key from {}: {}",
                config.private_key_path,
                e
            )
        })?;

        let public_key_pem = fs::read_to_string(&config.public_key_path).map_err(|e| {
            anyhow::anyhow!(
                "Failed to read public key from {}: {}",
                config.public_key_path,
                e
            )
        })?;

        let keys = Self::from_pem(&private_key_pem, &public_key_pem)?;
        tracing::info!("Signing keys loaded (RS256)");
        Ok(keys)
    }

    /// Build the key pair from PEM text. Both PKCS#1 and PKCS#8 encodings
    /// are accepted; the halves must belong together.
    pub fn from_pem(private_key_pem: &str, public_key_pem: &str) -> Result<Self, anyhow::Error> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| anyhow::anyhow!("Failed to parse private key: {}", e))?;

        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| anyhow::anyhow!("Failed to parse public key: {}", e))?;

        let private_key = RsaPrivateKey::from_pkcs1_pem(private_key_pem)
            .or_else(|_| RsaPrivateKey::from_pkcs8_pem(private_key_pem))
            .map_err(|e| anyhow::anyhow!("Failed to parse private key: {}", e))?;

        let public_key = RsaPublicKey::from_public_key_pem(public_key_pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(public_key_pem))
            .map_err(|e| anyhow::anyhow!("Failed to parse public key: {}", e))?;

        if private_key.to_public_key() != public_key {
            return Err(anyhow::anyhow!(
                "Public key does not match the signing private key"
            ));
        }

        Ok(Self {
            encoding_key,
            decoding_key,
            public_key,
        })
    }
}

/// Token payload. The `claims` field carries the role discriminant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "claims", rename_all = "lowercase")]
pub enum AuthClaims {
    Device(DeviceClaims),
    User(UserClaims),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceClaims {
    pub uid: DeviceUid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    #[serde(rename = "name")]
    pub username: String,
    pub admin: bool,
    pub tenant: String,
    pub id: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl AuthClaims {
    pub fn device(uid: DeviceUid) -> Self {
        AuthClaims::Device(DeviceClaims { uid })
    }

    /// User claims scoped to `tenant`, expiring 72 hours after `issued_at`.
    pub fn user(user: &User, tenant: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        AuthClaims::User(UserClaims {
            username: user.username.clone(),
            admin: true,
            tenant: tenant.into(),
            id: user.id.clone(),
            exp: (issued_at + Duration::hours(USER_TOKEN_TTL_HOURS)).timestamp(),
        })
    }
}

/// Signs and verifies bearer tokens with the shared key pair.
#[derive(Clone)]
pub struct TokenIssuer {
    keys: Arc<SigningKeys>,
}

impl TokenIssuer {
    pub fn new(keys: Arc<SigningKeys>) -> Self {
        Self { keys }
    }

    /// Sign a claim set. Failures are not retried.
    pub fn issue(&self, claims: &AuthClaims) -> Result<String, AuthError> {
        let header = Header::new(Algorithm::RS256);
        encode(&header, claims, &self.keys.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign token");
            AuthError::Sign(e.to_string())
        })
    }

    /// Check signature and, when present, expiry.
    pub fn verify(&self, token: &str) -> Result<AuthClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = true;

        decode::<AuthClaims>(token, &self.keys.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected bearer token");
                AuthError::Unauthorized
            })
    }

    pub fn verifying_key(&self) -> &RsaPublicKey {
        &self.keys.public_key
    }
}
