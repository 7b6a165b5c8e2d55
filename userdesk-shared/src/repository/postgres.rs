/// PostgreSQL user repository
///
/// Stores users in the `users` table (see `migrations/`). Email uniqueness is
/// enforced by the `users_email_key` constraint on a CITEXT column, and
/// violations surface as [`RepositoryError::DuplicateEmail`].
///
/// # Example
///
/// ```no_run
/// use userdesk_shared::db::pool::{create_pool, PoolConfig};
/// use userdesk_shared::repository::{PgUserRepository, UserRepository};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(&PoolConfig::new(std::env::var("DATABASE_URL")?)).await?;
///
/// let repo = PgUserRepository::new(pool);
/// if let Some(user) = repo.check_user_by_email("user@example.com").await? {
///     println!("Found user {}", user.id);
/// }
/// # Ok(())
/// # }
/// ```

use super::{page_offset, RepositoryError, RepositoryResult, UserRepository};
use crate::models::user::{normalize_email, CreateUser, UpdateUser, User, UserStatus};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

const USER_COLUMNS: &str =
    "id, name, surname, email, phone, password_hash, status, created_at, updated_at";

/// sqlx-backed [`UserRepository`]
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Creates a repository over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn set_status(
        &self,
        id: i64,
        status: UserStatus,
        from: &[UserStatus],
    ) -> RepositoryResult<User> {
        debug!(user_id = id, status = %status, "Persisting user status");

        let query = format!(
            r#"
            UPDATE users
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status = ANY($3)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let from: Vec<&'static str> = from.iter().map(UserStatus::as_str).collect();

        let updated = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(status)
            .bind(from)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(user) = updated {
            return Ok(user);
        }

        // Nothing matched: either the user is gone or its status moved on
        let current: Option<UserStatus> =
            sqlx::query_scalar("SELECT status FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        match current {
            Some(status) => Err(RepositoryError::StatusConflict { id, status }),
            None => Err(RepositoryError::NotFound(id)),
        }
    }
}

/// Maps unique-constraint violations on the email column to `DuplicateEmail`
fn map_write_error(err: sqlx::Error, email: &str) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation()
            && db_err.constraint().map_or(false, |c| c.contains("email"))
        {
            return RepositoryError::DuplicateEmail(email.to_string());
        }
    }
    RepositoryError::Database(err)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_user_list(&self, page: u32, limit: u32) -> RepositoryResult<(Vec<User>, i64)> {
        let query = format!(
            "SELECT {} FROM users ORDER BY id ASC LIMIT $1 OFFSET $2",
            USER_COLUMNS
        );

        let users = sqlx::query_as::<_, User>(&query)
            .bind(i64::from(limit))
            .bind(page_offset(page, limit))
            .fetch_all(&self.pool)
            .await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok((users, total))
    }

    async fn get_user_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn create_user(&self, data: CreateUser) -> RepositoryResult<User> {
        let email = normalize_email(&data.email);
        let query = format!(
            r#"
            INSERT INTO users (name, surname, email, phone, password_hash, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(data.name)
            .bind(data.surname)
            .bind(&email)
            .bind(data.phone)
            .bind(data.password_hash)
            .bind(UserStatus::Active)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &email))
    }

    async fn suspend_user_by_id(&self, id: i64, from: &[UserStatus]) -> RepositoryResult<User> {
        self.set_status(id, UserStatus::Suspended, from).await
    }

    async fn deactivate_user_by_id(
        &self,
        id: i64,
        from: &[UserStatus],
    ) -> RepositoryResult<User> {
        self.set_status(id, UserStatus::Deactivated, from).await
    }

    async fn activate_user_by_id(&self, id: i64, from: &[UserStatus]) -> RepositoryResult<User> {
        self.set_status(id, UserStatus::Active, from).await
    }

    async fn update_user(&self, id: i64, data: UpdateUser) -> RepositoryResult<User> {
        let email = normalize_email(&data.email);
        let query = format!(
            r#"
            UPDATE users
            SET name = $2, surname = $3, email = $4, phone = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(data.name)
            .bind(data.surname)
            .bind(&email)
            .bind(data.phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &email))?
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }

    async fn check_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

        let user = sqlx::query_as::<_, User>(&query)
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn ping(&self) -> RepositoryResult<()> {
        crate::db::pool::ping(&self.pool).await?;
        Ok(())
    }
}
