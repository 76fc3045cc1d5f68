use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{Device, DeviceUid, Namespace, PrivateKey, User};
use crate::services::StoreError;

/// Persistence collaborator required by the auth core.
///
/// Lookups return `Ok(None)` when the record does not exist. Mutations on a
/// missing record fail with [`StoreError::NotFound`].
#[async_trait]
pub trait Store: Send + Sync {
    async fn namespace_get(&self, tenant_id: &str) -> Result<Option<Namespace>, StoreError>;

    /// First namespace listing `user_id` as a member.
    async fn namespace_get_first(&self, user_id: &str) -> Result<Option<Namespace>, StoreError>;

    async fn user_get_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn user_get_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn user_get_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;

    /// Create the device or refresh its mutable fields.
    ///
    /// Must be atomic per `device.uid`. On insert the store assigns the
    /// display name from `hostname`, de-duplicating within the tenant. A uid
    /// already registered under another tenant or public key fails with
    /// [`StoreError::Conflict`] and leaves the existing record untouched.
    async fn device_upsert(&self, device: &Device, hostname: &str) -> Result<(), StoreError>;

    async fn device_set_online(&self, uid: &DeviceUid, online: bool) -> Result<(), StoreError>;

    async fn device_get_by_uid(
        &self,
        uid: &DeviceUid,
        tenant_id: &str,
    ) -> Result<Option<Device>, StoreError>;

    async fn session_set_last_seen(
        &self,
        session_uid: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    async fn private_key_get(&self, fingerprint: &str) -> Result<Option<PrivateKey>, StoreError>;
}
