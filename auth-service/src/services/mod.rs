//! Services layer for the auth core.
//!
//! Identity derivation, credential and tenant checks, token issuance and
//! challenge signing, sequenced by [`AuthService`].

mod auth;
mod challenge;
mod credentials;
mod database;
pub mod error;
pub mod identity;
mod memory_store;
mod store;
mod tenant;
mod token;

pub use auth::{AuthService, SessionRefresh};
pub use challenge::ChallengeResponder;
pub use credentials::CredentialVerifier;
pub use database::MongoDb;
pub use error::{AuthError, StoreError};
pub use memory_store::InMemoryStore;
pub use store::Store;
pub use tenant::TenantResolver;
pub use token::{
    AuthClaims, DeviceClaims, SigningKeys, TokenIssuer, UserClaims, USER_TOKEN_TTL_HOURS,
};
