/// User management service
///
/// Business rules on top of [`UserRepository`]:
/// - Email uniqueness on create and update
/// - Credential generation for new accounts
/// - Status lifecycle checks (see [`UserAction::allowed_from`])
/// - Current-password verification before a password change
///
/// # Lifecycle
///
/// ```text
///            suspend              deactivate
///   Active ───────────> Suspended ──────────> Deactivated
///     │  ^                  │                     │
///     │  └──── activate ────┘                     │
///     │  ^                                        │
///     │  └─────────────── activate ───────────────┘
///     └──────────────── deactivate ──────────────>┘
/// ```
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use userdesk_shared::repository::InMemoryUserRepository;
/// use userdesk_shared::services::{NewUser, UserService};
///
/// # async fn example() -> Result<(), userdesk_shared::services::ServiceError> {
/// let service = UserService::new(Arc::new(InMemoryUserRepository::new()));
///
/// let (user, password) = service
///     .create_user(NewUser {
///         name: "Ada".to_string(),
///         surname: "Lovelace".to_string(),
///         email: "ada@example.com".to_string(),
///         phone: None,
///     })
///     .await?;
///
/// println!("Created user {} with password {}", user.id, password);
/// service.suspend_user_by_id(user.id).await?;
/// # Ok(())
/// # }
/// ```

use crate::auth::password::{self, PasswordError, GENERATED_PASSWORD_LENGTH};
use crate::models::user::{normalize_email, CreateUser, UpdateUser, User, UserStatus};
use crate::repository::{RepositoryError, UserRepository};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Page used when the caller asks for page < 1
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the caller asks for limit < 1
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest page size served
pub const MAX_LIMIT: u32 = 100;

/// Operations that are gated on the user's current status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Suspend,
    Deactivate,
    Activate,
    Update,
    ChangePassword,
}

impl UserAction {
    /// Statuses this action may be applied from
    pub fn allowed_statuses(&self) -> &'static [UserStatus] {
        use UserStatus::*;
        match self {
            UserAction::Suspend => &[Active],
            UserAction::Deactivate | UserAction::Update | UserAction::ChangePassword => {
                &[Active, Suspended]
            }
            UserAction::Activate => &[Suspended, Deactivated],
        }
    }

    /// Whether this action may be applied to a user in `status`
    pub fn allowed_from(&self, status: UserStatus) -> bool {
        self.allowed_statuses().contains(&status)
    }
}

impl fmt::Display for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UserAction::Suspend => "suspend",
            UserAction::Deactivate => "deactivate",
            UserAction::Activate => "activate",
            UserAction::Update => "update",
            UserAction::ChangePassword => "change the password of",
        })
    }
}

/// Service error types
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("User with ID: {0} not found")]
    NotFound(i64),

    #[error("Email {0} is already in use")]
    EmailTaken(String),

    #[error("Cannot {action} user with ID: {id} while it is {status}")]
    InvalidStatusTransition {
        id: i64,
        status: UserStatus,
        action: UserAction,
    },

    #[error("Current password is incorrect")]
    IncorrectPassword,

    #[error("New password must differ from the current password")]
    PasswordReused,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => ServiceError::NotFound(id),
            RepositoryError::DuplicateEmail(email) => ServiceError::EmailTaken(email),
            other => ServiceError::Repository(other),
        }
    }
}

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Profile data for creating or updating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: Option<String>,
}

/// A password change request
#[derive(Debug, Clone)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

/// One page of users
#[derive(Debug, Clone)]
pub struct UserPage {
    pub users: Vec<User>,

    /// Total number of users across all pages
    pub total: i64,

    /// Effective page after clamping
    pub page: u32,

    /// Effective page size after clamping
    pub limit: u32,
}

/// Clamps caller-supplied pagination to the served range
///
/// `page < 1` becomes [`DEFAULT_PAGE`], `limit < 1` becomes
/// [`DEFAULT_LIMIT`], and `limit > MAX_LIMIT` becomes [`MAX_LIMIT`].
pub fn clamp_pagination(page: i64, limit: i64) -> (u32, u32) {
    let page = if page < 1 {
        DEFAULT_PAGE
    } else {
        u32::try_from(page).unwrap_or(u32::MAX)
    };

    let limit = if limit < 1 {
        DEFAULT_LIMIT
    } else {
        limit.min(i64::from(MAX_LIMIT)) as u32
    };

    (page, limit)
}

/// Converts a refused status write into the transition error for `action`
fn transition_error(err: RepositoryError, action: UserAction) -> ServiceError {
    match err {
        RepositoryError::StatusConflict { id, status } => {
            debug!(user_id = id, status = %status, %action, "Rejected status transition");
            ServiceError::InvalidStatusTransition { id, status, action }
        }
        other => other.into(),
    }
}

/// User management service
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Returns one page of users ordered by ID
    pub async fn get_user_list(&self, page: i64, limit: i64) -> ServiceResult<UserPage> {
        let (page, limit) = clamp_pagination(page, limit);
        let (users, total) = self.repository.get_user_list(page, limit).await?;

        debug!(page, limit, returned = users.len(), total, "Listed users");
        Ok(UserPage {
            users,
            total,
            page,
            limit,
        })
    }

    pub async fn get_user_by_id(&self, id: i64) -> ServiceResult<User> {
        self.repository
            .get_user_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Creates an active user with a freshly generated password
    ///
    /// Returns the stored user and the plaintext password. The plaintext is
    /// not retrievable afterwards.
    pub async fn create_user(&self, data: NewUser) -> ServiceResult<(User, String)> {
        let email = normalize_email(&data.email);

        if self.repository.check_user_by_email(&email).await?.is_some() {
            return Err(ServiceError::EmailTaken(email));
        }

        let generated = password::generate_password(GENERATED_PASSWORD_LENGTH);
        let password_hash = password::hash_password(&generated)?;

        let user = self
            .repository
            .create_user(CreateUser {
                name: data.name,
                surname: data.surname,
                email,
                phone: data.phone,
                password_hash,
            })
            .await?;

        info!(user_id = user.id, "User created");
        Ok((user, generated))
    }

    /// Status changes are checked and written by the repository in one step,
    /// so concurrent changes cannot land a transition the lifecycle forbids.
    pub async fn suspend_user_by_id(&self, id: i64) -> ServiceResult<User> {
        let action = UserAction::Suspend;
        let user = self
            .repository
            .suspend_user_by_id(id, action.allowed_statuses())
            .await
            .map_err(|e| transition_error(e, action))?;

        info!(user_id = id, "User suspended");
        Ok(user)
    }

    pub async fn deactivate_user_by_id(&self, id: i64) -> ServiceResult<User> {
        let action = UserAction::Deactivate;
        let user = self
            .repository
            .deactivate_user_by_id(id, action.allowed_statuses())
            .await
            .map_err(|e| transition_error(e, action))?;

        info!(user_id = id, "User deactivated");
        Ok(user)
    }

    pub async fn activate_user_by_id(&self, id: i64) -> ServiceResult<User> {
        let action = UserAction::Activate;
        let user = self
            .repository
            .activate_user_by_id(id, action.allowed_statuses())
            .await
            .map_err(|e| transition_error(e, action))?;

        info!(user_id = id, "User activated");
        Ok(user)
    }

    /// Replaces a user's profile fields
    ///
    /// The new email may equal the user's current one, but not another user's.
    pub async fn update_user(&self, id: i64, data: NewUser) -> ServiceResult<User> {
        self.ensure_allowed(id, UserAction::Update).await?;

        let email = normalize_email(&data.email);
        if let Some(owner) = self.repository.check_user_by_email(&email).await? {
            if owner.id != id {
                return Err(ServiceError::EmailTaken(email));
            }
        }

        let user = self
            .repository
            .update_user(
                id,
                UpdateUser {
                    name: data.name,
                    surname: data.surname,
                    email,
                    phone: data.phone,
                },
            )
            .await?;

        info!(user_id = id, "User updated");
        Ok(user)
    }

    /// Changes a user's password after verifying the current one
    pub async fn update_password(&self, id: i64, change: PasswordChange) -> ServiceResult<()> {
        let user = self.ensure_allowed(id, UserAction::ChangePassword).await?;

        if !password::verify_password(&change.current_password, &user.password_hash)? {
            warn!(user_id = id, "Password change rejected: current password mismatch");
            return Err(ServiceError::IncorrectPassword);
        }
        if change.current_password == change.new_password {
            return Err(ServiceError::PasswordReused);
        }

        let password_hash = password::hash_password(&change.new_password)?;
        self.repository.update_password(id, &password_hash).await?;

        info!(user_id = id, "User password updated");
        Ok(())
    }

    /// Checks that the storage backend is reachable
    pub async fn ping(&self) -> ServiceResult<()> {
        self.repository.ping().await?;
        Ok(())
    }

    async fn ensure_allowed(&self, id: i64, action: UserAction) -> ServiceResult<User> {
        let user = self.get_user_by_id(id).await?;

        if !action.allowed_from(user.status) {
            debug!(user_id = id, status = %user.status, %action, "Rejected status transition");
            return Err(ServiceError::InvalidStatusTransition {
                id,
                status: user.status,
                action,
            });
        }

        Ok(user)
    }
}
