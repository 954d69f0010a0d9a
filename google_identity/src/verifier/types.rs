use serde::Deserialize;

/// Claims decoded from a verified identity token
///
/// Only ever produced by an [`IdTokenVerifier`](super::IdTokenVerifier);
/// callers never inspect claims from an unverified token.
#[derive(Debug, Clone, Deserialize)]
pub struct IdClaims {
    pub iss: String,
    pub aud: String,
    /// Stable subject identifier assigned by the identity provider
    pub sub: String,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub iat: i64,
    pub exp: i64,
}
