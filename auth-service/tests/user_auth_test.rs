mod common;

use auth_service::{
    dtos::auth::UserAuthRequest,
    services::{AuthClaims, AuthError, UserClaims},
};
use chrono::Duration;
use common::{token_payload, TestApp};

fn login(username: &str, password: &str) -> UserAuthRequest {
    UserAuthRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_login_by_username() {
    let app = TestApp::spawn();

    let res = app
        .service
        .auth_user(login("alice", "secret"))
        .await
        .expect("login succeeds");

    assert_eq!(res.user, "alice");
    assert_eq!(res.name, "Alice");
    assert_eq!(res.id, "u-alice");
    assert_eq!(res.email, "alice@example.com");
    assert_eq!(res.tenant, "t1");

    let claims = app.service.tokens().verify(&res.token).unwrap();
    assert_eq!(
        claims,
        AuthClaims::User(UserClaims {
            username: "alice".to_string(),
            admin: true,
            tenant: "t1".to_string(),
            id: "u-alice".to_string(),
            exp: (app.now + Duration::hours(72)).timestamp(),
        })
    );

    let payload = token_payload(&res.token);
    assert_eq!(payload["claims"], "user");
    assert_eq!(payload["name"], "alice");
}

#[tokio::test]
async fn test_login_by_email_is_case_insensitive() {
    let app = TestApp::spawn();

    let res = app
        .service
        .auth_user(login("Alice@Example.com", "secret"))
        .await
        .expect("login by email succeeds");

    assert_eq!(res.id, "u-alice");
    assert_eq!(res.tenant, "t1");
}

#[tokio::test]
async fn test_user_without_namespace_gets_empty_tenant() {
    let app = TestApp::spawn();

    let res = app.service.auth_user(login("bob", "hunter2")).await.unwrap();

    assert_eq!(res.tenant, "");
    assert_eq!(token_payload(&res.token)["tenant"], "");
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = TestApp::spawn();

    let by_name = app.service.auth_user(login("alice", "wrong")).await;
    assert!(matches!(by_name, Err(AuthError::Unauthorized)));

    let by_email = app
        .service
        .auth_user(login("alice@example.com", "wrong"))
        .await;
    assert!(matches!(by_email, Err(AuthError::Unauthorized)));
}

#[tokio::test]
async fn test_unknown_user_is_unauthorized() {
    let app = TestApp::spawn();

    let res = app.service.auth_user(login("mallory", "secret")).await;
    assert!(matches!(res, Err(AuthError::Unauthorized)));
}

#[tokio::test]
async fn test_get_token_for_known_user() {
    let app = TestApp::spawn();

    let res = app.service.auth_get_token("u-carol").await.unwrap();

    assert_eq!(res.user, "carol");
    assert_eq!(res.tenant, "t2");
    assert_eq!(
        token_payload(&res.token)["exp"],
        (app.now + Duration::hours(72)).timestamp()
    );
}

#[tokio::test]
async fn test_get_token_for_unknown_user() {
    let app = TestApp::spawn();

    let res = app.service.auth_get_token("u-nobody").await;
    assert!(matches!(res, Err(AuthError::UserNotFound)));
}

#[tokio::test]
async fn test_empty_login_fields_fail_validation() {
    let app = TestApp::spawn();

    let res = app.service.auth_user(login("", "secret")).await;
    assert!(matches!(res, Err(AuthError::Validation(_))));

    let res = app.service.auth_user(login("alice", "")).await;
    assert!(matches!(res, Err(AuthError::Validation(_))));
}
