/// Business services
///
/// - `user`: User lifecycle rules on top of [`crate::repository::UserRepository`]

pub mod user;

pub use user::{NewUser, PasswordChange, ServiceError, UserPage, UserService};
