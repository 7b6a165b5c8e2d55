/// Domain models for Userdesk
///
/// # Models
///
/// - `user`: User accounts, their lifecycle status, and input types
///
/// # Example
///
/// ```
/// use userdesk_shared::models::user::{CreateUser, UserStatus};
///
/// let new_user = CreateUser {
///     name: "Ada".to_string(),
///     surname: "Lovelace".to_string(),
///     email: "ada@example.com".to_string(),
///     phone: None,
///     password_hash: "$argon2id$...".to_string(),
/// };
///
/// assert_eq!(UserStatus::Active.as_str(), "active");
/// # let _ = new_user;
/// ```

pub mod user;
