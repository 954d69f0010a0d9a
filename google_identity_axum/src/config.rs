//! Central configuration for the google-identity-axum crate

use std::sync::LazyLock;

/// Route prefix for all user endpoints
///
/// This is the prefix under which the user router is expected to be
/// mounted. Default: "/user"
pub static AUTH_ROUTE_PREFIX: LazyLock<String> =
    LazyLock::new(|| std::env::var("AUTH_ROUTE_PREFIX").unwrap_or_else(|_| "/user".to_string()));
