use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::{Device, DeviceUid, Namespace, PrivateKey, User};
use crate::services::{Store, StoreError};

#[derive(Default)]
struct State {
    /// Insertion order decides which namespace is a user's first.
    namespaces: Vec<Namespace>,
    users: Vec<User>,
    devices: BTreeMap<DeviceUid, Device>,
    sessions: HashMap<String, DateTime<Utc>>,
    private_keys: HashMap<String, PrivateKey>,
    failing_sessions: HashSet<String>,
}

/// Store kept in process memory, for tests and local tooling.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert_namespace(&self, namespace: Namespace) {
        let mut state = self.state();
        state.namespaces.retain(|ns| ns.tenant_id != namespace.tenant_id);
        state.namespaces.push(namespace);
    }

    pub fn insert_user(&self, user: User) {
        let mut state = self.state();
        state.users.retain(|u| u.id != user.id);
        state.users.push(user);
    }

    pub fn insert_session(&self, uid: impl Into<String>, last_seen: DateTime<Utc>) {
        self.state().sessions.insert(uid.into(), last_seen);
    }

    pub fn insert_private_key(&self, key: PrivateKey) {
        self.state()
            .private_keys
            .insert(key.fingerprint.clone(), key);
    }

    /// Make every last-seen update of `uid` fail with a backend error.
    pub fn fail_session(&self, uid: impl Into<String>) {
        self.state().failing_sessions.insert(uid.into());
    }

    pub fn devices(&self) -> Vec<Device> {
        self.state().devices.values().cloned().collect()
    }

    pub fn session_last_seen(&self, uid: &str) -> Option<DateTime<Utc>> {
        self.state().sessions.get(uid).copied()
    }
}

fn unique_name(state: &State, hostname: &str, tenant_id: &str, uid: &DeviceUid) -> String {
    let taken = state
        .devices
        .values()
        .any(|d| d.tenant_id == tenant_id && d.name == hostname);

    if taken {
        format!("{}-{}", hostname, &uid.as_str()[..6])
    } else {
        hostname.to_string()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn namespace_get(&self, tenant_id: &str) -> Result<Option<Namespace>, StoreError> {
        Ok(self
            .state()
            .namespaces
            .iter()
            .find(|ns| ns.tenant_id == tenant_id)
            .cloned())
    }

    async fn namespace_get_first(&self, user_id: &str) -> Result<Option<Namespace>, StoreError> {
        Ok(self
            .state()
            .namespaces
            .iter()
            .find(|ns| ns.has_member(user_id))
            .cloned())
    }

    async fn user_get_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .state()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn user_get_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.state().users.iter().find(|u| u.email == email).cloned())
    }

    async fn user_get_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.state().users.iter().find(|u| u.id == id).cloned())
    }

    async fn device_upsert(&self, device: &Device, hostname: &str) -> Result<(), StoreError> {
        let mut state = self.state();

        if let Some(existing) = state.devices.get_mut(&device.uid) {
            if existing.tenant_id != device.tenant_id || existing.public_key != device.public_key {
                return Err(StoreError::Conflict("device"));
            }
            existing.identity = device.identity.clone();
            existing.info = device.info.clone();
            existing.last_seen = device.last_seen;
            return Ok(());
        }

        let mut record = device.clone();
        record.name = unique_name(&state, hostname, &device.tenant_id, &device.uid);
        state.devices.insert(record.uid.clone(), record);
        Ok(())
    }

    async fn device_set_online(&self, uid: &DeviceUid, online: bool) -> Result<(), StoreError> {
        let mut state = self.state();
        let device = state
            .devices
            .get_mut(uid)
            .ok_or(StoreError::NotFound("device"))?;
        device.online = online;
        Ok(())
    }

    async fn device_get_by_uid(
        &self,
        uid: &DeviceUid,
        tenant_id: &str,
    ) -> Result<Option<Device>, StoreError> {
        Ok(self
            .state()
            .devices
            .get(uid)
            .filter(|d| d.tenant_id == tenant_id)
            .cloned())
    }

    async fn session_set_last_seen(
        &self,
        session_uid: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut state = self.state();
        if state.failing_sessions.contains(session_uid) {
            return Err(StoreError::Backend(anyhow::anyhow!(
                "session {} is unavailable",
                session_uid
            )));
        }

        let last_seen = state
            .sessions
            .get_mut(session_uid)
            .ok_or(StoreError::NotFound("session"))?;
        *last_seen = at;
        Ok(())
    }

    async fn private_key_get(&self, fingerprint: &str) -> Result<Option<PrivateKey>, StoreError> {
        Ok(self.state().private_keys.get(fingerprint).cloned())
    }
}
