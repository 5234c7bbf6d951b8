/// Configuration management for the API server
///
/// Everything the server needs lands in one typed `Config`, loaded once at
/// startup and handed to `AppState`; nothing reads the environment after
/// that.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `REDIS_URL`: session store connection string (required)
/// - `SESSION_TTL_SECONDS`: session lifetime (default: 86400)
/// - `JWT_SECRET`: token signing secret, at least 32 bytes (required)
/// - `JWT_EXPIRES_IN_SECONDS`: access-token lifetime (default: 86400)
/// - `JWT_AUDIENCE`: audience claim (default: "user")
/// - `FRONTEND_ORIGIN`: origin the OAuth callback redirects to (required)
/// - `API_HOST`: bind host (default: 0.0.0.0)
/// - `API_PORT`: bind port (default: 8080)
/// - `APP_ENV`: "development" or "production" (default: development)

use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Session store configuration
    pub session: SessionConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Origin the OAuth callback redirects back to
    pub frontend_origin: String,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Deployment environment name
    pub environment: String,
}

impl ApiConfig {
    /// Whether this deployment serves production traffic (controls the
    /// Secure flag on session cookies).
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,
}

/// Session store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Redis connection URL
    pub redis_url: String,

    /// Session lifetime in seconds
    pub ttl_seconds: u64,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Signing secret; must be at least 32 bytes
    pub secret: String,

    /// Access-token lifetime in seconds
    pub expires_in_seconds: u64,

    /// Audience claim stamped into and required from every token
    pub audience: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when a required variable is missing, a numeric
    /// variable fails to parse, or the JWT secret is too short.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;
        let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let redis_url = env::var("REDIS_URL")
            .map_err(|_| anyhow::anyhow!("REDIS_URL environment variable is required"))?;
        let session_ttl = env::var("SESSION_TTL_SECONDS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse::<u64>()?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }
        let jwt_expires_in = env::var("JWT_EXPIRES_IN_SECONDS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse::<u64>()?;
        let jwt_audience = env::var("JWT_AUDIENCE").unwrap_or_else(|_| "user".to_string());

        let frontend_origin = env::var("FRONTEND_ORIGIN")
            .map_err(|_| anyhow::anyhow!("FRONTEND_ORIGIN environment variable is required"))?;

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                environment,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            session: SessionConfig {
                redis_url,
                ttl_seconds: session_ttl,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                expires_in_seconds: jwt_expires_in,
                audience: jwt_audience,
            },
            frontend_origin,
        })
    }

    /// Returns the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                environment: "development".to_string(),
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/teamspace_test".to_string(),
                max_connections: 10,
            },
            session: SessionConfig {
                redis_url: "redis://localhost:6379".to_string(),
                ttl_seconds: 86400,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
                expires_in_seconds: 86400,
                audience: "user".to_string(),
            },
            frontend_origin: "http://localhost:5173".to_string(),
        }
    }

    #[test]
    fn test_bind_address() {
        let config = sample_config();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_is_production() {
        let mut config = sample_config();
        assert!(!config.api.is_production());

        config.api.environment = "production".to_string();
        assert!(config.api.is_production());
    }
}
