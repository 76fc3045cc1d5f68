use service_core::error::AppError;
use thiserror::Error;

/// Failure reported by a store adapter.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A mutation targeted a record that does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A write would take over a record owned by someone else.
    #[error("{0} conflicts with an existing record")]
    Conflict(&'static str),

    #[error("Store error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Backend(anyhow::Error::new(err))
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Namespace {0} not found")]
    TenantNotFound(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Device not found")]
    DeviceNotFound,

    #[error("Private key not found")]
    PrivateKeyNotFound,

    #[error("Device is registered under another namespace or key")]
    DeviceConflict,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("User is not a member of the namespace")]
    NotAMember,

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Failed to parse private key: {0}")]
    KeyParse(String),

    #[error("Failed to sign: {0}")]
    Sign(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TenantNotFound(tenant) => {
                AppError::NotFound(anyhow::anyhow!("Namespace {} not found", tenant))
            }
            AuthError::UserNotFound => AppError::NotFound(anyhow::anyhow!("User not found")),
            AuthError::DeviceNotFound => AppError::NotFound(anyhow::anyhow!("Device not found")),
            AuthError::PrivateKeyNotFound => {
                AppError::NotFound(anyhow::anyhow!("Private key not found"))
            }
            AuthError::DeviceConflict => AppError::Forbidden(anyhow::anyhow!(
                "Device is registered under another namespace or key"
            )),
            AuthError::Unauthorized => AppError::Unauthorized(anyhow::anyhow!("Unauthorized")),
            AuthError::NotAMember => AppError::Forbidden(anyhow::anyhow!(
                "User is not a member of the namespace"
            )),
            AuthError::Validation(e) => AppError::ValidationError(e),
            AuthError::KeyParse(e) => {
                AppError::InternalError(anyhow::anyhow!("Failed to parse private key: {}", e))
            }
            AuthError::Sign(e) => AppError::InternalError(anyhow::anyhow!("Failed to sign: {}", e)),
            AuthError::Store(StoreError::NotFound(entity)) => {
                AppError::NotFound(anyhow::anyhow!("{} not found", entity))
            }
            AuthError::Store(StoreError::Conflict(entity)) => {
                AppError::Forbidden(anyhow::anyhow!("{} conflicts with an existing record", entity))
            }
            AuthError::Store(StoreError::Backend(e)) => AppError::DatabaseError(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_map_to_app_errors() {
        assert!(matches!(
            AppError::from(AuthError::TenantNotFound("t9".into())),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(AuthError::Unauthorized),
            AppError::Unauthorized(_)
        ));
        assert!(matches!(
            AppError::from(AuthError::NotAMember),
            AppError::Forbidden(_)
        ));
        assert!(matches!(
            AppError::from(AuthError::DeviceConflict),
            AppError::Forbidden(_)
        ));
        assert!(matches!(
            AppError::from(AuthError::KeyParse("bad pem".into())),
            AppError::InternalError(_)
        ));
        assert!(matches!(
            AppError::from(AuthError::Store(StoreError::Backend(anyhow::anyhow!("down")))),
            AppError::DatabaseError(_)
        ));
    }
}
