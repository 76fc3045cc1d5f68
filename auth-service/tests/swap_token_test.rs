mod common;

use auth_service::services::AuthError;
use common::{token_payload, TestApp};

#[tokio::test]
async fn test_member_swaps_into_other_namespace() {
    let app = TestApp::spawn();

    let res = app
        .service
        .auth_swap_token("u-alice", "t2")
        .await
        .expect("alice is a member of t2");

    assert_eq!(res.tenant, "t2");
    assert_eq!(res.user, "alice");

    let payload = token_payload(&res.token);
    assert_eq!(payload["tenant"], "t2");
    assert_eq!(payload["id"], "u-alice");
}

#[tokio::test]
async fn test_non_member_is_rejected() {
    let app = TestApp::spawn();

    let res = app.service.auth_swap_token("u-bob", "t1").await;
    assert!(matches!(res, Err(AuthError::NotAMember)));
}

#[tokio::test]
async fn test_unknown_namespace() {
    let app = TestApp::spawn();

    let res = app.service.auth_swap_token("u-alice", "t9").await;
    assert!(matches!(res, Err(AuthError::TenantNotFound(t)) if t == "t9"));
}

#[tokio::test]
async fn test_membership_is_checked_before_user_lookup() {
    let app = TestApp::spawn();

    let res = app.service.auth_swap_token("u-ghost", "t1").await;
    assert!(matches!(res, Err(AuthError::NotAMember)));
}
