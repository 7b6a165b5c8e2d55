/// API route handlers
///
/// - `health`: Health check endpoint
/// - `users`: User management endpoints

pub mod health;
pub mod users;
