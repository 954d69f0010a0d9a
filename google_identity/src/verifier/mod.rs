mod errors;
mod idtoken;
mod types;

pub use errors::TokenVerificationError;
pub use idtoken::{GoogleTokenVerifier, IdTokenVerifier};
pub use types::IdClaims;
