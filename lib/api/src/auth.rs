//! Shared-password gate
//!
//! A single shared password unlocks the service. A successful check issues
//! a random session token with a fixed lifetime; handlers that need access
//! take an [`Authorized`] extractor built from the `Authorization: Bearer`
//! header.

use actix_web::dev::Payload;
use actix_web::http::{header, StatusCode};
use actix_web::{web, FromRequest, HttpRequest};
use chrono::{DateTime, Duration, Utc};
use futures_util::future::{ready, Ready};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::rest::AppState;

/// Default session lifetime
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 12;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Password is required")]
    MissingPassword,

    #[error("Incorrect password")]
    InvalidPassword,

    #[error("Authorization token is missing")]
    MissingToken,

    #[error("Authorization header must be 'Bearer <token>'")]
    MalformedToken,

    #[error("Session is invalid or expired")]
    InvalidSession,

    #[error("Password hash must be a bcrypt hash")]
    InvalidPasswordHash,

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingPassword => StatusCode::BAD_REQUEST,
            AuthError::InvalidPasswordHash | AuthError::Hashing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

/// An issued session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Checks the shared password and tracks issued sessions
pub struct PasswordGate {
    password_hash: String,
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl PasswordGate {
    /// Create a gate from the bcrypt hash (`$2b$...`) of the password
    pub fn new(password_hash: &str, ttl: Duration) -> Result<Self, AuthError> {
        let password_hash = password_hash.trim().to_string();
        // Only the parse result matters here.
        bcrypt::verify("", &password_hash).map_err(|_| AuthError::InvalidPasswordHash)?;

        Ok(Self {
            password_hash,
            ttl,
            sessions: RwLock::new(HashMap::new()),
        })
    }

    /// bcrypt hash used to configure the gate
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        Self::hash_password_with_cost(password, bcrypt::DEFAULT_COST)
    }

    pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AuthError> {
        bcrypt::hash(password, cost).map_err(|e| AuthError::Hashing(e.to_string()))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn login(&self, password: &str) -> Result<Session, AuthError> {
        self.login_at(password, Utc::now())
    }

    pub fn login_at(&self, password: &str, now: DateTime<Utc>) -> Result<Session, AuthError> {
        if password.is_empty() {
            return Err(AuthError::MissingPassword);
        }

        let valid = bcrypt::verify(password, &self.password_hash)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        if !valid {
            warn!("rejected password attempt");
            return Err(AuthError::InvalidPassword);
        }

        let session = Session {
            token: Uuid::new_v4().to_string(),
            issued_at: now,
            expires_at: now + self.ttl,
        };
        self.sessions.write().insert(session.token.clone(), session.clone());
        info!(expires_at = %session.expires_at, "session issued");
        Ok(session)
    }

    pub fn authorize(&self, token: &str) -> Result<Session, AuthError> {
        self.authorize_at(token, Utc::now())
    }

    /// Resolve a token to its live session; expired sessions are dropped
    pub fn authorize_at(&self, token: &str, now: DateTime<Utc>) -> Result<Session, AuthError> {
        let session = self
            .sessions
            .read()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidSession)?;

        if session.is_expired_at(now) {
            self.sessions.write().remove(token);
            debug!("expired session rejected");
            return Err(AuthError::InvalidSession);
        }
        Ok(session)
    }

    /// Revoke a session; returns whether it existed
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.write().remove(token).is_some()
    }

    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        before - sessions.len()
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.read().len()
    }
}

/// Proof that the request carried a live session token
#[derive(Debug, Clone)]
pub struct Authorized {
    pub session: Session,
}

impl Authorized {
    fn extract(req: &HttpRequest) -> Result<Self, ApiError> {
        let state = req
            .app_data::<web::Data<AppState>>()
            .ok_or_else(|| ApiError::Internal("application state is not configured".to_string()))?;

        let value = req
            .headers()
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::MalformedToken)?;

        let token = value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MalformedToken)?;

        let session = state.gate.authorize(token)?;
        Ok(Self { session })
    }
}

impl FromRequest for Authorized {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::extract(req))
    }
}
