use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A local user account, possibly linked to an identity-provider subject
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    /// Unique user identifier
    pub id: String,
    /// Identity-provider subject identifier; absent for non-federated accounts
    pub subject_id: Option<String>,
    /// Login handle, unique across all users
    pub username: String,
    /// Unique when present; claims without an email leave it unset
    pub email: Option<String>,
    /// Never populated by federated flows
    pub hashed_password: Option<String>,
    /// Display name or user-friendly label
    pub display_name: Option<String>,
    /// Region or state the user reports living in
    pub profile_region: Option<String>,
    /// Preferred UI language
    pub preferred_language: Option<String>,
    /// Avatar URL
    pub photo_url: Option<String>,
    /// Free-form self description
    pub bio: Option<String>,
    /// When the user account was created
    pub created_at: DateTime<Utc>,
    /// When the user account was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh id and current timestamps
    pub fn new(subject_id: Option<String>, username: String, email: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            subject_id,
            username,
            email,
            hashed_password: None,
            display_name: None,
            profile_region: None,
            preferred_language: None,
            photo_url: None,
            bio: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Search field options for user lookup
#[derive(Debug)]
pub enum UserSearchField {
    /// Search by ID
    Id(String),
    /// Search by identity-provider subject identifier
    SubjectId(String),
    /// Search by username
    Username(String),
    /// Search by email
    Email(String),
}

impl UserSearchField {
    pub(crate) fn as_column_value(&self) -> (&'static str, &str) {
        match self {
            Self::Id(value) => ("id", value),
            Self::SubjectId(value) => ("subject_id", value),
            Self::Username(value) => ("username", value),
            Self::Email(value) => ("email", value),
        }
    }
}
