/// Request extractors
///
/// - [`JsonBody`]: `axum::Json` with rejections mapped to
///   `400 "Invalid request payload"`
/// - [`UserId`]: positive integer path parameter, `400 "Invalid user id parameter"` otherwise
/// - [`RequestLocale`]: language for validation messages, from `Accept-Language`
///   with the configured default as fallback

use crate::{app::AppState, error::ApiError, validation::Locale};
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path},
    http::{header::ACCEPT_LANGUAGE, request::Parts},
};
use std::convert::Infallible;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// A user ID taken from the `:id` path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub i64);

/// Parses a user ID, accepting only integers >= 1
pub fn parse_user_id(raw: &str) -> Result<i64, ApiError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(ApiError::invalid_user_id()),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::invalid_user_id())?;

        parse_user_id(&raw).map(UserId)
    }
}

/// Locale negotiated for the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLocale(pub Locale);

#[async_trait]
impl FromRequestParts<AppState> for RequestLocale {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .and_then(Locale::from_accept_language)
            .unwrap_or(state.config.api.default_locale);

        Ok(RequestLocale(locale))
    }
}
