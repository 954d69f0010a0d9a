use sqlx::{Pool, Postgres};

use crate::storage::validate_postgres_table_schema;
use crate::userdb::errors::UserError;
use crate::userdb::types::{User, UserSearchField};

use super::DB_TABLE_USERS;
use super::map_db_error;

// PostgreSQL implementations
pub(super) async fn create_tables_postgres(pool: &Pool<Postgres>) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    // Create users table; uniqueness of subject_id, username and email is
    // enforced here rather than by application-level checks
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id TEXT PRIMARY KEY NOT NULL,
            subject_id TEXT UNIQUE,
            username TEXT NOT NULL UNIQUE,
            email TEXT UNIQUE,
            hashed_password TEXT,
            display_name TEXT,
            profile_region TEXT,
            preferred_language TEXT,
            photo_url TEXT,
            bio TEXT,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
        table_name
    ))
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(())
}

/// Validates that the User table schema matches what we expect
pub(super) async fn validate_user_tables_postgres(pool: &Pool<Postgres>) -> Result<(), UserError> {
    let users_table = DB_TABLE_USERS.as_str();

    // Define expected schema (column name, data type)
    let expected_columns = vec![
        ("id", "text"),
        ("subject_id", "text"),
        ("username", "text"),
        ("email", "text"),
        ("hashed_password", "text"),
        ("display_name", "text"),
        ("profile_region", "text"),
        ("preferred_language", "text"),
        ("photo_url", "text"),
        ("bio", "text"),
        ("created_at", "timestamp with time zone"),
        ("updated_at", "timestamp with time zone"),
    ];

    validate_postgres_table_schema(pool, users_table, &expected_columns, UserError::Storage).await
}

pub(super) async fn get_user_by_field_postgres(
    pool: &Pool<Postgres>,
    field: &UserSearchField,
) -> Result<Option<User>, UserError> {
    let table_name = DB_TABLE_USERS.as_str();
    let (column, value) = field.as_column_value();

    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT * FROM {} WHERE {} = $1
        "#,
        table_name, column
    ))
    .bind(value)
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn insert_user_postgres(
    pool: &Pool<Postgres>,
    user: User,
) -> Result<User, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        INSERT INTO {} (
            id, subject_id, username, email, hashed_password,
            display_name, profile_region, preferred_language, photo_url, bio,
            created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
        table_name
    ))
    .bind(&user.id)
    .bind(&user.subject_id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.hashed_password)
    .bind(&user.display_name)
    .bind(&user.profile_region)
    .bind(&user.preferred_language)
    .bind(&user.photo_url)
    .bind(&user.bio)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(pool)
    .await
    .map_err(map_db_error)?;

    Ok(user)
}

pub(super) async fn update_user_postgres(
    pool: &Pool<Postgres>,
    user: User,
) -> Result<User, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    // id and created_at never change after insert
    sqlx::query(&format!(
        r#"
        UPDATE {} SET
            subject_id = $1,
            username = $2,
            email = $3,
            hashed_password = $4,
            display_name = $5,
            profile_region = $6,
            preferred_language = $7,
            photo_url = $8,
            bio = $9,
            updated_at = $10
        WHERE id = $11
        "#,
        table_name
    ))
    .bind(&user.subject_id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.hashed_password)
    .bind(&user.display_name)
    .bind(&user.profile_region)
    .bind(&user.preferred_language)
    .bind(&user.photo_url)
    .bind(&user.bio)
    .bind(user.updated_at)
    .bind(&user.id)
    .execute(pool)
    .await
    .map_err(map_db_error)?;

    Ok(user)
}
