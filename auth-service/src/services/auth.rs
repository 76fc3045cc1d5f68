use std::sync::Arc;
use validator::Validate;

use crate::{
    dtos::auth::{
        DeviceAuthRequest, DeviceAuthResponse, PublicKeyAuthRequest, PublicKeyAuthResponse,
        UserAuthRequest, UserAuthResponse,
    },
    models::{Device, User},
    services::{
        identity, AuthClaims, AuthError, ChallengeResponder, CredentialVerifier, SigningKeys,
        Store, StoreError, TenantResolver, TokenIssuer,
    },
    utils::{Clock, Password},
};

/// Outcome of refreshing one session's last-seen stamp.
#[derive(Debug)]
pub struct SessionRefresh {
    pub session_uid: String,
    pub result: Result<(), StoreError>,
}

/// Sequences the auth components into the public operations.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    tokens: TokenIssuer,
    credentials: CredentialVerifier,
    tenants: TenantResolver,
    challenges: ChallengeResponder,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, keys: Arc<SigningKeys>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tokens: TokenIssuer::new(keys),
            credentials: CredentialVerifier::new(store.clone()),
            tenants: TenantResolver::new(store.clone()),
            challenges: ChallengeResponder::new(store.clone()),
            store,
            clock,
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Register or refresh a device and issue its token.
    ///
    /// Nothing is written until the tenant is known to exist and the request
    /// has passed validation. A uid already owned by another tenant or key is
    /// refused with [`AuthError::DeviceConflict`].
    pub async fn auth_device(
        &self,
        req: DeviceAuthRequest,
    ) -> Result<DeviceAuthResponse, AuthError> {
        let namespace = self
            .store
            .namespace_get(&req.tenant_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(tenant_id = %req.tenant_id, "Device auth for unknown namespace");
                AuthError::TenantNotFound(req.tenant_id.clone())
            })?;

        req.validate()?;

        let uid = identity::derive(&req.identity);
        let hostname = req.identity.hostname.to_lowercase();

        let device = Device {
            uid: uid.clone(),
            name: hostname.clone(),
            identity: req.identity,
            info: req.info,
            public_key: req.public_key,
            tenant_id: req.tenant_id,
            last_seen: self.clock.now(),
            online: false,
        };
        self.store
            .device_upsert(&device, &hostname)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => {
                    tracing::warn!(uid = %uid, tenant_id = %device.tenant_id, "Device auth conflicts with registered device");
                    AuthError::DeviceConflict
                }
                e => AuthError::Store(e),
            })?;

        let token = self.tokens.issue(&AuthClaims::device(uid.clone()))?;

        self.store.device_set_online(&uid, true).await?;

        let refreshed = self.refresh_sessions(&req.sessions).await;
        let failed = refreshed.iter().filter(|r| r.result.is_err()).count();
        tracing::debug!(
            uid = %uid,
            sessions = refreshed.len(),
            failed,
            "Refreshed device sessions"
        );

        let stored = self
            .store
            .device_get_by_uid(&uid, &device.tenant_id)
            .await?
            .ok_or(AuthError::DeviceNotFound)?;

        tracing::info!(uid = %uid, tenant_id = %device.tenant_id, "Device authenticated");

        Ok(DeviceAuthResponse {
            uid: uid.into_string(),
            token,
            name: stored.name,
            namespace: namespace.name,
        })
    }

    /// Best-effort: a failure on one session never stops the others.
    async fn refresh_sessions(&self, session_uids: &[String]) -> Vec<SessionRefresh> {
        let mut refreshed = Vec::with_capacity(session_uids.len());
        for session_uid in session_uids {
            let result = self
                .store
                .session_set_last_seen(session_uid, self.clock.now())
                .await;
            if let Err(e) = &result {
                tracing::warn!(session_uid = %session_uid, error = %e, "Failed to refresh session last seen");
            }
            refreshed.push(SessionRefresh {
                session_uid: session_uid.clone(),
                result,
            });
        }
        refreshed
    }

    /// Authenticate an operator by username or email and password.
    pub async fn auth_user(&self, req: UserAuthRequest) -> Result<UserAuthResponse, AuthError> {
        req.validate()?;

        let user = self
            .credentials
            .verify(&req.username, &Password::new(req.password))
            .await?;

        let tenant = self.tenants.default_tenant(&user.id).await?;
        let response = self.user_response(&user, tenant)?;

        tracing::info!(user_id = %user.id, tenant = %response.tenant, "User authenticated");
        Ok(response)
    }

    /// Reissue a user token without credentials, for callers that already
    /// trust the user id.
    pub async fn auth_get_token(&self, user_id: &str) -> Result<UserAuthResponse, AuthError> {
        let user = self
            .store
            .user_get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let tenant = self.tenants.default_tenant(&user.id).await?;
        self.user_response(&user, tenant)
    }

    /// Challenge-response: sign `data` with the device's registered key.
    pub async fn auth_public_key(
        &self,
        req: PublicKeyAuthRequest,
    ) -> Result<PublicKeyAuthResponse, AuthError> {
        req.validate()?;

        let signature = self
            .challenges
            .sign_challenge(&req.fingerprint, req.data.as_bytes())
            .await?;

        Ok(PublicKeyAuthResponse { signature })
    }

    /// Issue a token scoped to another namespace the user belongs to.
    pub async fn auth_swap_token(
        &self,
        user_id: &str,
        tenant_id: &str,
    ) -> Result<UserAuthResponse, AuthError> {
        let namespace = self.tenants.require_membership(tenant_id, user_id).await?;

        let user = self
            .store
            .user_get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        tracing::info!(user_id = %user.id, tenant_id = %namespace.tenant_id, "Swapped user token");
        self.user_response(&user, namespace.tenant_id)
    }

    /// Enrich a token the caller already holds with current profile fields.
    ///
    /// The token is returned as given and is not re-signed.
    pub async fn auth_user_info(
        &self,
        username: &str,
        tenant_id: &str,
        token: &str,
    ) -> Result<UserAuthResponse, AuthError> {
        let user = self
            .store
            .user_get_by_username(username)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !tenant_id.is_empty() && self.store.namespace_get(tenant_id).await?.is_none() {
            tracing::warn!(tenant_id = %tenant_id, "User info for unknown namespace");
            return Err(AuthError::Unauthorized);
        }

        Ok(UserAuthResponse {
            token: token.to_string(),
            name: user.name,
            id: user.id,
            user: user.username,
            tenant: tenant_id.to_string(),
            email: user.email,
        })
    }

    fn user_response(&self, user: &User, tenant: String) -> Result<UserAuthResponse, AuthError> {
        let claims = AuthClaims::user(user, tenant.clone(), self.clock.now());
        let token = self.tokens.issue(&claims)?;

        Ok(UserAuthResponse {
            token,
            name: user.name.clone(),
            id: user.id.clone(),
            user: user.username.clone(),
            tenant,
            email: user.email.clone(),
        })
    }
}
