//! Password digests.
//!
//! Stored digests are the unsalted SHA-256 hex of the plaintext, compared
//! with plain equality. This matches the records existing deployments hold;
//! moving to a salted, slow hash (Argon2) needs a migration of every stored
//! digest and is a separate change.

use sha2::{Digest, Sha256};
use std::fmt;

/// Newtype for password to prevent accidental logging
#[derive(Clone)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Newtype for a stored password digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Digest a password the way stored records are written.
pub fn digest_password(password: &Password) -> PasswordDigest {
    PasswordDigest(hex::encode(Sha256::digest(password.as_str().as_bytes())))
}

/// Verify a password against a stored digest.
///
/// Returns Ok(()) if the digests are equal, Err otherwise.
pub fn verify_password(password: &Password, digest: &PasswordDigest) -> Result<(), anyhow::Error> {
    if digest_password(password) == *digest {
        Ok(())
    } else {
        Err(anyhow::anyhow!("Password verification failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_sha256_hex() {
        let digest = digest_password(&Password::new("secret"));
        assert_eq!(
            digest.as_str(),
            "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b"
        );
    }

    #[test]
    fn test_verify_password_correct() {
        let password = Password::new("mySecurePassword123");
        let digest = digest_password(&password);
        assert!(verify_password(&password, &digest).is_ok());
    }

    #[test]
    fn test_verify_password_incorrect() {
        let digest = digest_password(&Password::new("mySecurePassword123"));
        assert!(verify_password(&Password::new("wrongPassword"), &digest).is_err());
    }

    #[test]
    fn test_verify_is_case_sensitive_on_digest() {
        let password = Password::new("secret");
        let upper = PasswordDigest::new(digest_password(&password).as_str().to_uppercase());
        assert!(verify_password(&password, &upper).is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        assert_eq!(format!("{:?}", Password::new("hunter2")), "Password(***)");
    }
}
