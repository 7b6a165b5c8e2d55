/// User repository contract
///
/// This module defines the storage operations available on users. Business
/// logic talks to storage only through [`UserRepository`], so the backend can
/// be swapped without touching the service or HTTP layers.
///
/// # Backends
///
/// - [`PgUserRepository`]: PostgreSQL via sqlx (production)
/// - [`InMemoryUserRepository`]: process-local map (tests, demos)
///
/// # Example
///
/// ```
/// use userdesk_shared::models::user::CreateUser;
/// use userdesk_shared::repository::{InMemoryUserRepository, UserRepository};
///
/// # async fn example() -> Result<(), userdesk_shared::repository::RepositoryError> {
/// let repo = InMemoryUserRepository::new();
/// let user = repo
///     .create_user(CreateUser {
///         name: "Ada".to_string(),
///         surname: "Lovelace".to_string(),
///         email: "ada@example.com".to_string(),
///         phone: None,
///         password_hash: "$argon2id$...".to_string(),
///     })
///     .await?;
///
/// let (users, total) = repo.get_user_list(1, 10).await?;
/// assert_eq!(total, 1);
/// assert_eq!(users[0].id, user.id);
/// # Ok(())
/// # }
/// ```

mod memory;
mod postgres;

pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;

use crate::models::user::{CreateUser, UpdateUser, User, UserStatus};
use async_trait::async_trait;

/// Repository error types
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// No user with the given ID
    #[error("User {0} not found")]
    NotFound(i64),

    /// Email is already held by another user
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Status write refused because the user's current status is not one of
    /// the expected source statuses
    #[error("User {id} is {status}")]
    StatusConflict { id: i64, status: UserStatus },

    /// Underlying storage failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Repository result type alias
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage operations on the User entity
///
/// Implementations must enforce email uniqueness (case-insensitive) on
/// create and update, and must never hard-delete records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns one page of users ordered by ID, plus the total user count
    ///
    /// `page` is 1-based; the offset is `(page - 1) * limit`.
    async fn get_user_list(&self, page: u32, limit: u32) -> RepositoryResult<(Vec<User>, i64)>;

    async fn get_user_by_id(&self, id: i64) -> RepositoryResult<Option<User>>;

    /// Inserts a new, active user
    async fn create_user(&self, data: CreateUser) -> RepositoryResult<User>;

    /// Sets the status to Suspended if the current status is in `from`
    ///
    /// The check and the write are a single atomic step. A user whose status
    /// is not in `from` yields [`RepositoryError::StatusConflict`].
    async fn suspend_user_by_id(&self, id: i64, from: &[UserStatus]) -> RepositoryResult<User>;

    /// Sets the status to Deactivated if the current status is in `from`
    async fn deactivate_user_by_id(&self, id: i64, from: &[UserStatus])
        -> RepositoryResult<User>;

    /// Sets the status to Active if the current status is in `from`
    async fn activate_user_by_id(&self, id: i64, from: &[UserStatus]) -> RepositoryResult<User>;

    /// Replaces the user's profile fields
    async fn update_user(&self, id: i64, data: UpdateUser) -> RepositoryResult<User>;

    /// Stores a new password hash
    async fn update_password(&self, id: i64, password_hash: &str) -> RepositoryResult<()>;

    /// Looks up a user by email (case-insensitive)
    async fn check_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;

    /// Verifies the backend is reachable
    async fn ping(&self) -> RepositoryResult<()>;
}

/// Computes the row offset for a 1-based page
pub(crate) fn page_offset(page: u32, limit: u32) -> i64 {
    i64::from(page.saturating_sub(1)) * i64::from(limit)
}
