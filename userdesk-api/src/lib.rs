//! # Userdesk API Server Library
//!
//! HTTP layer of the Userdesk user-management service.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Request extractors (JSON body, user ID, locale)
//! - `routes`: API route handlers
//! - `validation`: Request DTOs and translated validation messages

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod validation;
