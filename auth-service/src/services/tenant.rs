use std::sync::Arc;

use crate::models::Namespace;
use crate::services::{AuthError, Store};

/// Resolves which namespace a user acts in.
#[derive(Clone)]
pub struct TenantResolver {
    store: Arc<dyn Store>,
}

impl TenantResolver {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Tenant of the user's first namespace, or an empty string for users
    /// not yet invited anywhere.
    pub async fn default_tenant(&self, user_id: &str) -> Result<String, AuthError> {
        let namespace = self.store.namespace_get_first(user_id).await?;
        Ok(namespace.map(|ns| ns.tenant_id).unwrap_or_default())
    }

    /// The namespace `tenant_id`, provided `user_id` is one of its members.
    ///
    /// Fails with [`AuthError::TenantNotFound`] when the namespace does not
    /// exist and [`AuthError::NotAMember`] when it exists without the user.
    pub async fn require_membership(
        &self,
        tenant_id: &str,
        user_id: &str,
    ) -> Result<Namespace, AuthError> {
        let namespace = self
            .store
            .namespace_get(tenant_id)
            .await?
            .ok_or_else(|| AuthError::TenantNotFound(tenant_id.to_string()))?;

        if !namespace.has_member(user_id) {
            tracing::warn!(tenant_id = %tenant_id, user_id = %user_id, "User is not a member of namespace");
            return Err(AuthError::NotAMember);
        }

        Ok(namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InMemoryStore;

    fn resolver() -> TenantResolver {
        let store = InMemoryStore::new();
        let mut first = Namespace::new("t1", "t1-name", "owner");
        first.add_member("u1");
        let mut second = Namespace::new("t2", "t2-name", "owner");
        second.add_member("u1");
        second.add_member("u2");
        store.insert_namespace(first);
        store.insert_namespace(second);
        TenantResolver::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_default_tenant_is_first_namespace() {
        let resolver = resolver();
        assert_eq!(resolver.default_tenant("u1").await.unwrap(), "t1");
        assert_eq!(resolver.default_tenant("u2").await.unwrap(), "t2");
    }

    #[tokio::test]
    async fn test_default_tenant_is_empty_without_namespace() {
        assert_eq!(resolver().default_tenant("nobody").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_require_membership() {
        let resolver = resolver();

        let ns = resolver.require_membership("t2", "u2").await.unwrap();
        assert_eq!(ns.name, "t2-name");

        assert!(matches!(
            resolver.require_membership("t1", "u2").await,
            Err(AuthError::NotAMember)
        ));
        assert!(matches!(
            resolver.require_membership("t9", "u1").await,
            Err(AuthError::TenantNotFound(t)) if t == "t9"
        ));
    }
}
