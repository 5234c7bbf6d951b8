/// Rollback behavior of the account bootstrap
///
/// Kept in its own test binary: it removes the seeded owner role for the
/// duration of one registration attempt, which must not race the flows in
/// auth_flow_test.rs (test binaries run one at a time). The whole
/// sequence lives in a single test for the same reason.

mod common;

use axum::http::StatusCode;
use common::{entity_counts, post_json, unique_email, TestContext};
use serde_json::json;

/// When the owner role is missing, registration fails with 404 and no
/// part of the entity graph survives the rollback; once the role is
/// restored, the same email registers cleanly.
#[tokio::test]
async fn missing_owner_role_rolls_back_everything() {
    let ctx = TestContext::new().await.unwrap();
    let email = unique_email("rollback");
    let body = json!({ "email": email, "name": "Rollback User", "password": "sup3r-secret" });

    // Capture and remove the seed row
    let (permissions,): (serde_json::Value,) =
        sqlx::query_as("SELECT permissions FROM roles WHERE name = 'owner'")
            .fetch_one(&ctx.db)
            .await
            .unwrap();
    sqlx::query("DELETE FROM roles WHERE name = 'owner'")
        .execute(&ctx.db)
        .await
        .unwrap();

    let (status, _, response) = post_json(&ctx.app, "/v1/auth/register", body.clone()).await;

    // Restore the seed row before asserting, so a failure here cannot
    // poison later runs.
    sqlx::query("INSERT INTO roles (name, permissions) VALUES ('owner', $1)")
        .bind(&permissions)
        .execute(&ctx.db)
        .await
        .unwrap();

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["message"], "Owner role not found");

    let counts = entity_counts(&ctx.db, &email).await.unwrap();
    assert_eq!(counts.users, 0);
    assert_eq!(counts.accounts, 0);
    assert_eq!(counts.workspaces, 0);
    assert_eq!(counts.members, 0);

    // Nothing half-written lingers: the same email now registers fine
    let (status, _, _) = post_json(&ctx.app, "/v1/auth/register", body).await;
    assert_eq!(status, StatusCode::CREATED);

    let counts = entity_counts(&ctx.db, &email).await.unwrap();
    assert_eq!(counts.users, 1);
    assert_eq!(counts.accounts, 1);
    assert_eq!(counts.workspaces, 1);
    assert_eq!(counts.members, 1);
}
