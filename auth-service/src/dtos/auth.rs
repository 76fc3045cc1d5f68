use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{DeviceIdentity, DeviceInfo};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeviceAuthRequest {
    #[validate(nested)]
    pub identity: DeviceIdentity,

    #[serde(default)]
    pub info: DeviceInfo,

    #[validate(length(min = 1, message = "Public key is required"))]
    pub public_key: String,

    #[validate(length(min = 1, message = "Tenant id is required"))]
    pub tenant_id: String,

    /// Sessions the device still holds open.
    #[serde(default)]
    pub sessions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceAuthResponse {
    pub uid: String,
    pub token: String,
    pub name: String,
    pub namespace: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserAuthRequest {
    /// Username or email.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAuthResponse {
    pub token: String,
    pub name: String,
    pub id: String,
    pub user: String,
    pub tenant: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PublicKeyAuthRequest {
    #[validate(length(min = 1, message = "Fingerprint is required"))]
    pub fingerprint: String,

    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicKeyAuthResponse {
    pub signature: String,
}
