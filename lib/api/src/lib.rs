//! # facdoc API
//!
//! REST surface of the listing service, built on actix-web.
//!
//! All `/api/listings*` routes require a bearer token obtained from
//! `POST /api/auth/password`; see [`auth`] for the session model.

pub mod auth;
pub mod error;
pub mod rest;

pub use auth::{AuthError, Authorized, PasswordGate, Session, DEFAULT_SESSION_TTL_HOURS};
pub use error::ApiError;
pub use rest::{routes, ApiConfig, AppState, RestApi};
