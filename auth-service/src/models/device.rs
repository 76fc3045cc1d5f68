//! Device model - devices registered under a namespace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use validator::Validate;

use crate::utils::{validate_attributes, validate_hostname};

/// Attributes a device reports to distinguish itself.
///
/// Maps are ordered so that two identities holding the same attributes are
/// equal and serialize identically, whatever order they were built in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DeviceIdentity {
    #[validate(custom(function = "validate_hostname"))]
    pub hostname: String,
    /// Hardware identifiers such as `mac` or `serial`.
    #[serde(default)]
    #[validate(custom(function = "validate_attributes"))]
    pub hardware: BTreeMap<String, String>,
    #[serde(default)]
    #[validate(custom(function = "validate_attributes"))]
    pub metadata: BTreeMap<String, String>,
}

impl DeviceIdentity {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            ..Default::default()
        }
    }

    pub fn with_hardware(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.hardware.insert(key.into(), value.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Informational fields about the agent; not part of the identity hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub pretty_name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub arch: String,
    #[serde(default)]
    pub platform: String,
}

/// Stable device identifier: lowercase hex SHA-256 of the canonical identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceUid(String);

impl DeviceUid {
    pub(crate) fn from_digest(digest: &[u8]) -> Self {
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DeviceUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Device record as persisted by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub uid: DeviceUid,
    /// Display name, assigned by the store on first insert.
    pub name: String,
    pub identity: DeviceIdentity,
    pub info: DeviceInfo,
    pub public_key: String,
    pub tenant_id: String,
    pub last_seen: DateTime<Utc>,
    #[serde(default)]
    pub online: bool,
}
