//! Shared test initialization
//!
//! Loads the test environment and initializes the database stores so that
//! tests across the crate run against the same configuration.

use std::sync::Once;

/// Centralized test initialization for all tests across the entire crate
///
/// Environment variables are loaded from `.env_test` (with fallback to
/// `.env`) exactly once; store initialization is idempotent and runs per
/// call.
pub async fn init_test_environment() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }
    });

    if let Err(e) = crate::userdb::init().await {
        eprintln!("Warning: Failed to initialize UserStore: {e}");
    }
}
