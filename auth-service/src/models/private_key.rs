use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// PEM-encoded RSA private key registered for a device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivateKey {
    pub fingerprint: String,
    pub data: String,
    pub created_at: DateTime<Utc>,
}
