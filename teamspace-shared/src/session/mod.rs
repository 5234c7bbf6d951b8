/// Server-side sessions backed by Redis
///
/// Sessions are the cookie-based alternative to bearer tokens, used by the
/// provider sign-in flow. Each session is an opaque UUID id mapping to a
/// small JSON payload under `session:{id}`, expiring after the configured
/// TTL. Ids are never derived from user data, so the cookie needs no
/// signing; possession of the id is the credential.
///
/// Destroying a session is idempotent: deleting an id that has already
/// expired or been destroyed succeeds.
///
/// # Example
///
/// ```no_run
/// use teamspace_shared::session::{SessionData, SessionStore};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), teamspace_shared::session::SessionError> {
/// let store = SessionStore::connect("redis://localhost:6379", 86400).await?;
///
/// let session_id = store.create(&SessionData::new(Uuid::new_v4())).await?;
/// assert!(store.get(&session_id).await?.is_some());
///
/// store.destroy(&session_id).await?;
/// store.destroy(&session_id).await?; // second destroy is a no-op
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error type for session-store operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Could not reach the store
    #[error("session store connection error: {0}")]
    Connection(String),

    /// A store command failed
    #[error("session store command error: {0}")]
    Command(String),

    /// Stored payload could not be encoded or decoded
    #[error("session payload error: {0}")]
    Payload(#[from] serde_json::Error),
}

impl From<RedisError> for SessionError {
    fn from(err: RedisError) -> Self {
        match err.kind() {
            redis::ErrorKind::IoError => SessionError::Connection(err.to_string()),
            _ => SessionError::Command(err.to_string()),
        }
    }
}

/// Payload persisted for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    /// Authenticated user
    pub user_id: Uuid,

    /// When the session was established
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            created_at: Utc::now(),
        }
    }
}

/// Redis-backed session store
///
/// Cheap to clone; the underlying connection manager multiplexes and
/// reconnects on its own.
#[derive(Clone)]
pub struct SessionStore {
    conn: ConnectionManager,
    ttl_seconds: u64,
}

impl SessionStore {
    /// Connects to Redis and returns a store issuing sessions with the
    /// given TTL.
    pub async fn connect(url: &str, ttl_seconds: u64) -> Result<Self, SessionError> {
        let client = redis::Client::open(url)
            .map_err(|e| SessionError::Connection(e.to_string()))?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self { conn, ttl_seconds })
    }

    fn key(session_id: &str) -> String {
        format!("session:{session_id}")
    }

    /// Creates a session and returns its freshly generated id.
    pub async fn create(&self, data: &SessionData) -> Result<String, SessionError> {
        let session_id = Uuid::new_v4().to_string();
        let payload = serde_json::to_string(data)?;

        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(Self::key(&session_id), payload, self.ttl_seconds)
            .await?;

        tracing::debug!(user_id = %data.user_id, "session established");
        Ok(session_id)
    }

    /// Fetches a session's payload, or None when it expired or never existed.
    pub async fn get(&self, session_id: &str) -> Result<Option<SessionData>, SessionError> {
        let mut conn = self.conn.clone();
        let payload: Option<String> = conn.get(Self::key(session_id)).await?;

        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Destroys a session. Destroying an absent session succeeds.
    pub async fn destroy(&self, session_id: &str) -> Result<(), SessionError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(Self::key(session_id)).await?;
        Ok(())
    }

    /// Verifies the store is reachable.
    pub async fn ping(&self) -> Result<(), SessionError> {
        let mut conn = self.conn.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;

        if pong == "PONG" {
            Ok(())
        } else {
            Err(SessionError::Command(format!(
                "unexpected PING reply: {pong}"
            )))
        }
    }
}
