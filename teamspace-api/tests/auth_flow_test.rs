/// Integration tests for the authentication flows
///
/// Requires a running PostgreSQL (DATABASE_URL) and Redis (REDIS_URL).
/// Each test provisions its own identities, so they can run in parallel.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{entity_counts, post_json, send, unique_email, TestContext};
use serde_json::json;
use teamspace_api::routes::auth::OAuthSession;
use teamspace_shared::auth::jwt;
use teamspace_shared::bootstrap::{self, BootstrapError, ExternalIdentity};
use teamspace_shared::models::account::AuthProvider;
use teamspace_shared::session::SessionData;
use uuid::Uuid;

/// A successful registration leaves exactly one user, account, workspace
/// and member for the email, with current_workspace pointing at the
/// workspace the user owns.
#[tokio::test]
async fn register_provisions_full_account_graph() {
    let ctx = TestContext::new().await.unwrap();
    let email = unique_email("register");

    let (status, _, _) = post_json(
        &ctx.app,
        "/v1/auth/register",
        json!({ "email": email, "name": "Reg User", "password": "sup3r-secret" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let counts = entity_counts(&ctx.db, &email).await.unwrap();
    assert_eq!(counts.users, 1);
    assert_eq!(counts.accounts, 1);
    assert_eq!(counts.workspaces, 1);
    assert_eq!(counts.members, 1);

    // current_workspace must point at the workspace the user owns, and a
    // member row must exist for that exact pair.
    let (user_id, current_workspace): (Uuid, Option<Uuid>) =
        sqlx::query_as("SELECT id, current_workspace FROM users WHERE email = $1")
            .bind(&email)
            .fetch_one(&ctx.db)
            .await
            .unwrap();

    let workspace_id = current_workspace.expect("current_workspace should be set");

    let (owner_id,): (Uuid,) = sqlx::query_as("SELECT owner_id FROM workspaces WHERE id = $1")
        .bind(workspace_id)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(owner_id, user_id);

    let (member_role,): (String,) = sqlx::query_as(
        r#"
        SELECT r.name FROM members m
        JOIN roles r ON m.role_id = r.id
        WHERE m.user_id = $1 AND m.workspace_id = $2
        "#,
    )
    .bind(user_id)
    .bind(workspace_id)
    .fetch_one(&ctx.db)
    .await
    .unwrap();
    assert_eq!(member_role, "owner");
}

/// Registering the same email twice fails with 400 and creates nothing new.
#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let email = unique_email("duplicate");
    let body = json!({ "email": email, "name": "Dup User", "password": "sup3r-secret" });

    let (status, _, _) = post_json(&ctx.app, "/v1/auth/register", body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let before = entity_counts(&ctx.db, &email).await.unwrap();

    let (status, _, response) = post_json(&ctx.app, "/v1/auth/register", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "Email already exists");

    let after = entity_counts(&ctx.db, &email).await.unwrap();
    assert_eq!(before, after);
}

/// A malformed registration body never reaches the database.
#[tokio::test]
async fn register_with_invalid_payload_is_bad_request() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _, _) = post_json(
        &ctx.app,
        "/v1/auth/register",
        json!({ "email": "not-an-email", "name": "X", "password": "short" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Strength check: long enough but no digit
    let (status, _, _) = post_json(
        &ctx.app,
        "/v1/auth/register",
        json!({ "email": unique_email("weakpw"), "name": "X", "password": "lettersonly" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// Login with correct credentials returns a token whose subject claim is
/// the stored user id.
#[tokio::test]
async fn login_returns_token_with_user_claim() {
    let ctx = TestContext::new().await.unwrap();
    let email = unique_email("login");

    post_json(
        &ctx.app,
        "/v1/auth/register",
        json!({ "email": email, "name": "Login User", "password": "sup3r-secret" }),
    )
    .await;

    let (status, _, response) = post_json(
        &ctx.app,
        "/v1/auth/login",
        json!({ "email": email, "password": "sup3r-secret" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let token = response["access_token"].as_str().expect("token in body");
    let claims = jwt::verify(token, &ctx.config.jwt.secret, &ctx.config.jwt.audience).unwrap();

    let (user_id,): (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(claims.sub, user_id);

    // The sanitized user comes back without a password field
    assert_eq!(response["user"]["id"], json!(user_id));
    assert!(response["user"].get("password_hash").is_none());

    // A successful login stamps last_login_at
    let (last_login,): (Option<chrono::DateTime<chrono::Utc>>,) =
        sqlx::query_as("SELECT last_login_at FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_one(&ctx.db)
            .await
            .unwrap();
    assert!(last_login.is_some());
}

/// A wrong password and an unknown email produce the same generic 401.
#[tokio::test]
async fn failed_logins_are_unauthorized_and_generic() {
    let ctx = TestContext::new().await.unwrap();
    let email = unique_email("badlogin");

    post_json(
        &ctx.app,
        "/v1/auth/register",
        json!({ "email": email, "name": "Bad Login", "password": "sup3r-secret" }),
    )
    .await;

    let (status, _, wrong_password) = post_json(
        &ctx.app,
        "/v1/auth/login",
        json!({ "email": email, "password": "wrong-password1" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, unknown_email) = post_json(
        &ctx.app,
        "/v1/auth/login",
        json!({ "email": unique_email("never-registered"), "password": "sup3r-secret" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // No existence leak: both failures read identically
    assert_eq!(wrong_password["message"], "Invalid email or password");
    assert_eq!(unknown_email["message"], wrong_password["message"]);
}

/// A first-seen provider identity is provisioned once; signing in again
/// with the same identity reuses the existing user and workspace.
#[tokio::test]
async fn provider_sign_in_provisions_once_then_reuses() {
    let ctx = TestContext::new().await.unwrap();
    let email = unique_email("provider");

    let identity = ExternalIdentity {
        provider: AuthProvider::Google,
        provider_id: format!("google-{}", Uuid::new_v4()),
        display_name: "Provider User".to_string(),
        email: Some(email.clone()),
        picture: Some("https://example.com/avatar.png".to_string()),
    };

    let first = bootstrap::login_or_create_account(&ctx.db, identity.clone())
        .await
        .unwrap();
    assert!(first.user.password_hash.is_none());
    assert_eq!(first.user.current_workspace, Some(first.workspace.id));
    assert_eq!(first.workspace.owner_id, first.user.id);

    let counts = entity_counts(&ctx.db, &email).await.unwrap();
    assert_eq!(counts.users, 1);
    assert_eq!(counts.accounts, 1);
    assert_eq!(counts.workspaces, 1);
    assert_eq!(counts.members, 1);

    // Second sign-in with the same email creates nothing new
    let second = bootstrap::login_or_create_account(&ctx.db, identity.clone())
        .await
        .unwrap();
    assert_eq!(second.user.id, first.user.id);
    assert_eq!(second.workspace.id, first.workspace.id);
    assert_eq!(entity_counts(&ctx.db, &email).await.unwrap(), counts);

    // An identity with no email cannot be keyed to a user
    let err = bootstrap::login_or_create_account(
        &ctx.db,
        ExternalIdentity {
            email: None,
            ..identity
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BootstrapError::EmailMissing));

    // A provider-only user has no password credential; password login
    // stays a generic 401
    let (status, _, _) = post_json(
        &ctx.app,
        "/v1/auth/login",
        json!({ "email": email, "password": "sup3r-secret" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

/// The callback without an identity context redirects with a failure flag
/// and no token or workspace parameters.
#[tokio::test]
async fn oauth_callback_without_identity_redirects_failure() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/auth/google/callback")
        .body(Body::empty())
        .unwrap();

    let (status, headers, _) = send(&ctx.app, request).await;
    assert_eq!(status, StatusCode::FOUND);

    let location = headers[header::LOCATION].to_str().unwrap();
    assert_eq!(
        location,
        format!("{}?status=failure", ctx.config.frontend_origin)
    );
    assert!(!location.contains("access_token"));
    assert!(!location.contains("current_workspace"));
}

/// The callback with an identity context establishes a server-side
/// session, sets the cookie and redirects with token and workspace.
#[tokio::test]
async fn oauth_callback_with_identity_sets_session_and_redirects() {
    let ctx = TestContext::new().await.unwrap();
    let user_id = Uuid::new_v4();
    let workspace_id = Uuid::new_v4();

    let mut request = Request::builder()
        .method("GET")
        .uri("/v1/auth/google/callback")
        .body(Body::empty())
        .unwrap();
    request.extensions_mut().insert(OAuthSession {
        user_id,
        access_token: "signed.token.value".to_string(),
        current_workspace: Some(workspace_id),
    });

    let (status, headers, _) = send(&ctx.app, request).await;
    assert_eq!(status, StatusCode::FOUND);

    let location = headers[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with(&format!("{}?status=success", ctx.config.frontend_origin)));
    assert!(location.contains("access_token=signed.token.value"));
    assert!(location.contains(&format!("current_workspace={workspace_id}")));

    // The Set-Cookie session id must resolve in the store
    let cookie = headers[header::SET_COOKIE].to_str().unwrap();
    let session_id = cookie
        .strip_prefix("session_id=")
        .and_then(|rest| rest.split(';').next())
        .expect("session cookie should be set");

    let session = ctx.sessions.get(session_id).await.unwrap();
    assert_eq!(session.expect("session should exist").user_id, user_id);
}

/// Logout destroys the store entry and clears the cookie; logging out an
/// already-destroyed session still succeeds.
#[tokio::test]
async fn logout_destroys_session_and_clears_cookie() {
    let ctx = TestContext::new().await.unwrap();

    let session_id = ctx
        .sessions
        .create(&SessionData::new(Uuid::new_v4()))
        .await
        .unwrap();

    let logout_request = || {
        Request::builder()
            .method("POST")
            .uri("/v1/auth/logout")
            .header(header::COOKIE, format!("session_id={session_id}"))
            .body(Body::empty())
            .unwrap()
    };

    let (status, headers, response) = send(&ctx.app, logout_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Logged out successfully");

    let cleared = headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cleared.starts_with("session_id=;"));

    assert!(ctx.sessions.get(&session_id).await.unwrap().is_none());

    // Second logout against the destroyed session is a clean 200
    let (status, _, _) = send(&ctx.app, logout_request()).await;
    assert_eq!(status, StatusCode::OK);
}

/// The authenticated user surface accepts a fresh login token and rejects
/// requests without one.
#[tokio::test]
async fn current_user_requires_and_honors_bearer_token() {
    let ctx = TestContext::new().await.unwrap();
    let email = unique_email("current");

    post_json(
        &ctx.app,
        "/v1/auth/register",
        json!({ "email": email, "name": "Current User", "password": "sup3r-secret" }),
    )
    .await;

    let (_, _, login) = post_json(
        &ctx.app,
        "/v1/auth/login",
        json!({ "email": email, "password": "sup3r-secret" }),
    )
    .await;
    let token = login["access_token"].as_str().unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/user/current")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, _, response) = send(&ctx.app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["user"]["email"], json!(email));

    let request = Request::builder()
        .method("GET")
        .uri("/v1/user/current")
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(&ctx.app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
