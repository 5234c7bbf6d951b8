/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, callback, logout)
/// - `user`: Authenticated user endpoints

pub mod auth;
pub mod health;
pub mod user;
