use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use google_identity::{
    ProfileUpdate, User, federated_login, lookup_email_by_username, register, update_profile,
    verify_bearer,
};

use super::error::IntoResponseError;
use super::state::{AppState, AuthUser};

/// Create a router for the user endpoints
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(register_user))
        .route("/google-login", post(google_login))
        .route("/profile", get(get_user_profile).post(update_user_profile))
        .route("/lookup", post(lookup_user))
        .with_state(state)
}

#[derive(Deserialize)]
struct RegisterRequest {
    username: String,
    email: String,
    display_name: Option<String>,
}

#[derive(Deserialize)]
struct GoogleLoginRequest {
    id_token: String,
}

#[derive(Deserialize)]
struct LookupRequest {
    username: String,
}

/// Profile payload returned by every endpoint that yields a user
#[derive(Serialize)]
struct ProfileResponse {
    subject_id: Option<String>,
    username: String,
    email: Option<String>,
    created_at: DateTime<Utc>,
    display_name: Option<String>,
    photo_url: Option<String>,
    profile_region: Option<String>,
    preferred_language: Option<String>,
    bio: Option<String>,
}

impl From<&User> for ProfileResponse {
    fn from(user: &User) -> Self {
        Self {
            subject_id: user.subject_id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
            display_name: user.display_name.clone(),
            photo_url: user.photo_url.clone(),
            profile_region: user.profile_region.clone(),
            preferred_language: user.preferred_language.clone(),
            bio: user.bio.clone(),
        }
    }
}

/// Explicit signup with a caller-chosen username
///
/// The token is verified directly rather than through `AuthUser`: the
/// subject is authenticated with the provider but has no local record yet.
async fn register_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let claims = verify_bearer(state.verifier.as_ref(), authorization)
        .await
        .into_response_error()?;

    let user = register(
        &claims.sub,
        &payload.username,
        &payload.email,
        payload.display_name,
    )
    .await
    .into_response_error()?;

    Ok(Json(json!({
        "status": "User registered successfully",
        "user": ProfileResponse::from(&user),
    })))
}

async fn google_login(
    State(state): State<AppState>,
    Json(payload): Json<GoogleLoginRequest>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let (user, created) = federated_login(state.verifier.as_ref(), &payload.id_token)
        .await
        .into_response_error()?;

    Ok(Json(json!({
        "new_user": created,
        "profile": ProfileResponse::from(&user),
    })))
}

async fn get_user_profile(AuthUser(user): AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse::from(&user))
}

async fn update_user_profile(
    AuthUser(user): AuthUser,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let user = update_profile(user, payload).await.into_response_error()?;

    Ok(Json(json!({
        "status": "Profile updated successfully",
        "profile": ProfileResponse::from(&user),
    })))
}

async fn lookup_user(
    Json(payload): Json<LookupRequest>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let email = lookup_email_by_username(&payload.username)
        .await
        .into_response_error()?;

    Ok(Json(json!({ "email": email })))
}
