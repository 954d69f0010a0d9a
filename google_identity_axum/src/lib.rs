//! Axum integration for the google-identity reconciliation library
//!
//! Provides the user-facing router, request/response types, the
//! bearer-authentication extractor and the error-to-status mapping.

mod config;
mod error;
mod state;
mod user;

pub use config::AUTH_ROUTE_PREFIX;
pub use state::{AppState, AuthUser};
pub use user::router as user_router;
