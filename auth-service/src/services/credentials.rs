use std::sync::Arc;

use crate::models::User;
use crate::services::{AuthError, Store};
use crate::utils::{verify_password, Password, PasswordDigest};

/// Checks operator credentials against stored digests.
#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn Store>,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Resolve `login` as a username, then as an email, and check the
    /// password. Unknown logins and wrong passwords are both `Unauthorized`.
    pub async fn verify(&self, login: &str, password: &Password) -> Result<User, AuthError> {
        let login = login.to_lowercase();

        let user = match self.store.user_get_by_username(&login).await? {
            Some(user) => Some(user),
            None => self.store.user_get_by_email(&login).await?,
        };

        let Some(user) = user else {
            tracing::warn!("Login rejected: unknown user");
            return Err(AuthError::Unauthorized);
        };

        verify_password(password, &PasswordDigest::new(user.password.clone())).map_err(|_| {
            tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
            AuthError::Unauthorized
        })?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InMemoryStore;
    use crate::utils::digest_password;

    fn verifier() -> CredentialVerifier {
        let store = InMemoryStore::new();
        store.insert_user(User {
            id: "u1".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            name: "Alice".to_string(),
            password: digest_password(&Password::new("secret")).into_string(),
        });
        CredentialVerifier::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_login_by_username_or_email_case_folded() {
        let verifier = verifier();
        let password = Password::new("secret");

        for login in ["alice", "ALICE", "alice@example.com", "Alice@Example.com"] {
            let user = verifier.verify(login, &password).await.unwrap();
            assert_eq!(user.id, "u1");
        }
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized_for_both_lookups() {
        let verifier = verifier();
        let wrong = Password::new("guess");

        for login in ["alice", "alice@example.com"] {
            assert!(matches!(
                verifier.verify(login, &wrong).await,
                Err(AuthError::Unauthorized)
            ));
        }
    }

    #[tokio::test]
    async fn test_unknown_login_is_unauthorized() {
        assert!(matches!(
            verifier().verify("bob", &Password::new("secret")).await,
            Err(AuthError::Unauthorized)
        ));
    }
}
