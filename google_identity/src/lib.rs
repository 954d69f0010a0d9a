//! google-identity - Identity reconciliation library for Google-federated backends
//!
//! This crate verifies identity-provider ID tokens and maps the verified
//! claims to exactly one local user record, creating one on first login and
//! resolving username collisions deterministically.

mod coordination;
mod storage;
mod userdb;
mod verifier;

#[cfg(test)]
mod test_utils;

// Re-export the main coordination components
pub use coordination::{
    CoordinationError, ProfileUpdate, authenticate_request, federated_login,
    lookup_email_by_username, register, resolve_or_create, update_profile, verify_bearer,
};

pub use userdb::{User, UserError, UserSearchField, UserStore};

pub use verifier::{GoogleTokenVerifier, IdClaims, IdTokenVerifier, TokenVerificationError};

/// Initialize the persistence layer
///
/// Connects the configured store and creates the user tables. Must complete
/// before any coordination function is called.
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    storage::init().await?;
    userdb::init().await?;
    Ok(())
}
