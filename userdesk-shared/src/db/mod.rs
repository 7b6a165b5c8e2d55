/// Database layer for Userdesk
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: Embedded schema migrations (`migrations/` at the workspace root)
///
/// The `users` table itself is accessed through
/// [`crate::repository::PgUserRepository`].

pub mod migrations;
pub mod pool;
