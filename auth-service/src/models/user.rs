//! User model - human operators.

use serde::{Deserialize, Serialize};

/// User entity.
///
/// `password` holds the unsalted SHA-256 hex digest of the plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub password: String,
}
