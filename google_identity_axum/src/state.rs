use std::sync::Arc;

use axum::extract::FromRequestParts;
use http::{StatusCode, header::AUTHORIZATION, request::Parts};

use google_identity::{IdTokenVerifier, User, authenticate_request};

use super::error::IntoResponseError;

/// Shared application state: the verifier handle constructed at startup
#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<dyn IdTokenVerifier>,
}

impl AppState {
    pub fn new(verifier: Arc<dyn IdTokenVerifier>) -> Self {
        Self { verifier }
    }
}

/// Bearer-authenticated user, available as an Axum extractor
///
/// Extraction verifies the `Authorization: Bearer <token>` header against
/// the identity provider and resolves the subject to an existing local
/// user. Requests without a registered user are rejected with 404; token
/// problems with 401.
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let authorization = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let user = authenticate_request(state.verifier.as_ref(), authorization)
            .await
            .into_response_error()?;

        Ok(AuthUser(user))
    }
}
