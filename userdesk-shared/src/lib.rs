//! # Userdesk Shared Library
//!
//! Domain types, storage access, and business rules used by the Userdesk
//! API server.
//!
//! ## Module Organization
//!
//! - `models`: The User entity and its input types
//! - `repository`: Storage contract plus PostgreSQL and in-memory backends
//! - `services`: Business rules on top of the repository
//! - `auth`: Password hashing and credential generation
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod repository;
pub mod services;

/// Current version of the Userdesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
