/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with
/// all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use teamspace_api::{app::AppState, config::Config};
/// use teamspace_shared::session::SessionStore;
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let sessions = SessionStore::connect(&config.session.redis_url, config.session.ttl_seconds).await?;
/// let state = AppState::new(pool, sessions, config);
/// let app = teamspace_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use teamspace_shared::auth::jwt;
use teamspace_shared::session::SessionStore;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use uuid::Uuid;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; the pool
/// and session store are internally reference-counted.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Redis-backed session store
    pub sessions: SessionStore,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, sessions: SessionStore, config: Config) -> Self {
        Self {
            db,
            sessions,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Identity of the caller, extracted from a validated bearer token
///
/// Inserted into request extensions by [`jwt_auth_layer`] for handlers
/// behind the authenticated route group.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Authenticated user's id
    pub user_id: Uuid,
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// └── /v1/                           # API v1 (versioned)
///     ├── /auth/                     # Authentication endpoints (public)
///     │   ├── POST /register
///     │   ├── POST /login
///     │   ├── GET  /google/callback
///     │   └── POST /logout
///     └── /user/                     # Authenticated user endpoints
///         └── GET /current
/// ```
///
/// Middleware: request tracing (tower-http TraceLayer) and CORS restricted
/// to the configured frontend origin with credentials, since the session
/// cookie crosses origins in the OAuth flow.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/google/callback", get(routes::auth::google_callback))
        .route("/logout", post(routes::auth::logout));

    // User routes (require a valid bearer token)
    let user_routes = Router::new()
        .route("/current", get(routes::user::current_user))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/user", user_routes);

    // Credentialed CORS for the single frontend origin; a wildcard would
    // break cookie-carrying requests.
    let cors = match state.config.frontend_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true),
        Err(_) => {
            tracing::warn!("FRONTEND_ORIGIN is not a valid header value; CORS left closed");
            CorsLayer::new()
        }
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Bearer-token authentication middleware
///
/// Extracts and validates the JWT from the Authorization header, then
/// injects [`AuthContext`] into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        crate::error::ApiError::BadRequest("Expected Bearer token".to_string())
    })?;

    let claims = jwt::verify(token, state.jwt_secret(), &state.config.jwt.audience)?;

    req.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
    });

    Ok(next.run(req).await)
}
