//! Credential store queries.
//!
//! Callers pass emails already normalized (see `api::validation`); the
//! store compares byte-for-byte. The `UNIQUE` constraint on `users.email`
//! is the backstop for concurrent registrations that both pass the
//! pre-insert duplicate check.

use sqlx::SqlitePool;

use super::models::{NewUser, User};

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Insert a new user and return the assigned id. A duplicate email
/// surfaces as a database error carrying a UNIQUE constraint violation.
pub async fn insert(pool: &SqlitePool, user: &NewUser) -> sqlx::Result<i64> {
    let result = sqlx::query("INSERT INTO users (name, email, password_hash) VALUES (?, ?, ?)")
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn count(pool: &SqlitePool) -> sqlx::Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}
