/// User model
///
/// The User record and the input types used to create and update it.
/// Persistence lives behind [`crate::repository::UserRepository`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(50) NOT NULL,
///     surname VARCHAR(50) NOT NULL,
///     email CITEXT NOT NULL UNIQUE,
///     phone VARCHAR(20),
///     password_hash VARCHAR(255) NOT NULL,
///     status TEXT NOT NULL DEFAULT 'active',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User account status
///
/// Users are never deleted; they move between these states instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Normal, usable account
    Active,

    /// Temporarily blocked; can be reactivated
    Suspended,

    /// Closed by an operator; can be reactivated
    Deactivated,
}

impl UserStatus {
    /// Converts status to its storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Suspended => "suspended",
            UserStatus::Deactivated => "deactivated",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User model representing a user account
///
/// Passwords are stored as Argon2id hashes and are never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID, assigned by storage (always >= 1)
    pub id: i64,

    /// Given name
    pub name: String,

    /// Family name
    pub surname: String,

    /// Email address, unique across all users (case-insensitive)
    pub email: String,

    /// Optional phone number
    pub phone: Option<String>,

    /// Argon2id password hash
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Lifecycle status
    pub status: UserStatus,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last modified
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
///
/// New users always start out [`UserStatus::Active`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub surname: String,

    /// Email address (normalized to lowercase before storage)
    pub email: String,

    pub phone: Option<String>,

    /// Argon2id password hash (NOT a plaintext password!)
    pub password_hash: String,
}

/// Input for updating an existing user's profile
///
/// This is a full replacement of the profile fields; status and password
/// have dedicated operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUser {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Normalizes an email address for storage and lookups
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
