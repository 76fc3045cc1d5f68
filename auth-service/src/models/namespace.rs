//! Namespace model - the tenant isolation boundary.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceSettings {
    #[serde(default)]
    pub session_record: bool,
}

/// Namespace entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Namespace {
    pub tenant_id: String,
    pub name: String,
    #[serde(default)]
    pub owner: String,
    /// Member user ids, in the order they joined.
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub settings: NamespaceSettings,
}

impl Namespace {
    pub fn new(tenant_id: impl Into<String>, name: impl Into<String>, owner: impl Into<String>) -> Self {
        let owner = owner.into();
        Self {
            tenant_id: tenant_id.into(),
            name: name.into(),
            members: vec![owner.clone()],
            owner,
            settings: NamespaceSettings::default(),
        }
    }

    /// Add a member; joining twice keeps the original position.
    pub fn add_member(&mut self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        if !self.has_member(&user_id) {
            self.members.push(user_id);
        }
    }

    pub fn has_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|member| member == user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_is_first_member() {
        let ns = Namespace::new("t1", "t1-name", "u1");
        assert_eq!(ns.members, vec!["u1".to_string()]);
        assert!(ns.has_member("u1"));
    }

    #[test]
    fn test_add_member_keeps_order_and_ignores_duplicates() {
        let mut ns = Namespace::new("t1", "t1-name", "u1");
        ns.add_member("u2");
        ns.add_member("u1");
        ns.add_member("u3");
        assert_eq!(ns.members, vec!["u1", "u2", "u3"]);
        assert!(!ns.has_member("u4"));
    }
}
