/// Authentication endpoints
///
/// - `POST /v1/auth/register` - Register a new account
/// - `POST /v1/auth/login` - Login with email/password, get a bearer token
/// - `GET  /v1/auth/google/callback` - Provider callback, redirects to the frontend
/// - `POST /v1/auth/logout` - Destroy the server-side session
///
/// Registration and the first provider sign-in both funnel into the
/// transactional account bootstrap in `teamspace_shared::bootstrap`.
/// Password login issues a bearer token; the provider flow establishes a
/// cookie-backed session on top of the token it redirects with.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use teamspace_shared::{
    auth::{credentials, jwt, password},
    bootstrap::{self, LocalRegistration},
    models::{
        account::AuthProvider,
        user::{User, UserProfile},
    },
    session::SessionData,
};
use uuid::Uuid;
use validator::Validate;

/// Name of the session cookie set by the provider callback
const SESSION_COOKIE: &str = "session_id";

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    /// Password (also checked for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Human-readable outcome
    pub message: String,

    /// Signed bearer token carrying the user id
    pub access_token: String,

    /// The authenticated user, password omitted
    pub user: UserProfile,
}

/// Plain message response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Identity context inserted by the upstream identity-provider middleware
///
/// The provider handshake (code exchange, profile mapping, the
/// `login_or_create_account` call for first-seen identities, token
/// signing) happens upstream of the callback handler; this extension is
/// the contract between the two. The handler only consumes it.
#[derive(Debug, Clone)]
pub struct OAuthSession {
    /// User the provider identity resolved to
    pub user_id: Uuid,

    /// Access token already signed for that user
    pub access_token: String,

    /// The user's current workspace, if one is set
    pub current_workspace: Option<Uuid>,
}

/// Register a new account
///
/// Validates the request shape and password strength, hashes the
/// password, and runs the transactional account bootstrap: user, account,
/// default workspace, owner membership, current-workspace pointer.
///
/// # Errors
///
/// - `400 Bad Request`: validation failure or email already registered
/// - `404 Not Found`: the seeded owner role is missing (deployment fault)
/// - `500 Internal Server Error`: server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    req.validate().map_err(validation_error)?;

    password::validate_strength(&req.password).map_err(|message| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message,
        }])
    })?;

    let password_hash = password::hash(&req.password)?;

    bootstrap::register_account(
        &state.db,
        LocalRegistration {
            email: req.email,
            name: req.name,
            password_hash,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created successfully".to_string(),
        }),
    ))
}

/// Login with email/password
///
/// Verifies the credentials against the local email provider, stamps
/// `last_login_at`, and returns a signed bearer token plus the sanitized
/// user.
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email or wrong password, always with the
///   same generic message
/// - `500 Internal Server Error`: server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate().map_err(validation_error)?;

    let user =
        credentials::verify_credentials(&state.db, &req.email, &req.password, AuthProvider::Email)
            .await?;

    User::update_last_login(&state.db, user.id).await?;

    let claims = jwt::Claims::new(
        user.id,
        &state.config.jwt.audience,
        chrono::Duration::seconds(state.config.jwt.expires_in_seconds as i64),
    );
    let access_token = jwt::sign(&claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        message: "Logged in successfully".to_string(),
        access_token,
        user,
    }))
}

/// Provider callback
///
/// Expects the [`OAuthSession`] extension populated by the upstream
/// identity-provider middleware. When present, establishes a server-side
/// session, sets the session cookie and redirects to the frontend with
/// the token and workspace as query parameters; when absent, redirects
/// with a failure flag and nothing else.
pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    oauth: Option<Extension<OAuthSession>>,
) -> ApiResult<Response> {
    let Some(Extension(oauth)) = oauth else {
        tracing::warn!("provider callback reached without an identity context");
        return Ok(redirect(&callback_failure_url(
            &state.config.frontend_origin,
        )));
    };

    let session_id = state
        .sessions
        .create(&SessionData::new(oauth.user_id))
        .await?;

    let jar = jar.add(session_cookie(
        session_id,
        state.config.session.ttl_seconds,
        state.config.api.is_production(),
    ));

    let url = callback_success_url(
        &state.config.frontend_origin,
        &oauth.access_token,
        oauth.current_workspace,
    );

    Ok((jar, redirect(&url)).into_response())
}

/// Logout
///
/// Destroys the server-side session named by the cookie (a no-op when the
/// session is already gone) and clears the cookie either way.
///
/// # Errors
///
/// - `500 Internal Server Error`: the session store failed to destroy the
///   entry
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<MessageResponse>)> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.destroy(cookie.value()).await?;
    }

    let jar = jar.add(clear_session_cookie());

    Ok((
        jar,
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    ))
}

// --- Helpers ---

/// Flattens validator's per-field errors into the 400 response shape.
fn validation_error(e: validator::ValidationErrors) -> ApiError {
    let errors: Vec<ValidationErrorDetail> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();

    ApiError::ValidationError(errors)
}

/// 302 redirect; the callback contract promises Found, which axum's
/// `Redirect` helpers do not produce.
fn redirect(url: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, url.to_string())]).into_response()
}

fn callback_success_url(frontend: &str, access_token: &str, workspace: Option<Uuid>) -> String {
    let mut url = format!(
        "{}?status=success&access_token={}",
        frontend,
        urlencoding::encode(access_token)
    );

    if let Some(workspace) = workspace {
        url.push_str(&format!("&current_workspace={workspace}"));
    }

    url
}

fn callback_failure_url(frontend: &str) -> String {
    format!("{frontend}?status=failure")
}

fn session_cookie(session_id: String, ttl_seconds: u64, secure: bool) -> Cookie<'static> {
    let mut builder = Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .max_age(time::Duration::seconds(ttl_seconds as i64))
        .http_only(true)
        .same_site(SameSite::Lax);

    if secure {
        builder = builder.secure(true);
    }

    builder.build()
}

fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::seconds(0))
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
