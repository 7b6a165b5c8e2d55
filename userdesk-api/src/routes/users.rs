/// User management endpoints
///
/// # Endpoints
///
/// - `GET  /v1/users` - List users (`?page=1&limit=10`)
/// - `GET  /v1/users/:id` - Fetch a user
/// - `POST /v1/users` - Create a user with a generated password
/// - `PUT  /v1/users/:id` - Update a user's profile
/// - `PUT  /v1/users/:id/password` - Change a user's password
/// - `POST /v1/users/:id/suspend` - Suspend an active user
/// - `POST /v1/users/:id/deactivate` - Deactivate a user
/// - `POST /v1/users/:id/activate` - Reactivate a suspended or deactivated user
///
/// # Errors
///
/// - `400 Bad Request`: Invalid user id, malformed JSON, or validation failure
/// - `404 Not Found`: No user with that id
/// - `409 Conflict`: Email already in use, or status change not allowed
/// - `500 Internal Server Error`: Server error

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{JsonBody, RequestLocale, UserId},
    validation::{validate_request, PasswordUpdateDto, UserDto},
};
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use userdesk_shared::{
    models::user::{User, UserStatus},
    services::user::{DEFAULT_LIMIT, DEFAULT_PAGE},
};

/// User as returned by the API (never includes the password hash)
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            surname: user.surname,
            email: user.email,
            phone: user.phone,
            status: user.status,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// List query parameters
///
/// Values that are not integers are ignored and the defaults apply. When a
/// parameter is repeated, the first occurrence wins.
#[derive(Debug, Default)]
pub struct ListUsersQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListUsersQuery {
    /// Picks `page` and `limit` out of raw query pairs
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    fn page(&self) -> i64 {
        parse_or(self.page.as_deref(), i64::from(DEFAULT_PAGE))
    }

    fn limit(&self) -> i64 {
        parse_or(self.limit.as_deref(), i64::from(DEFAULT_LIMIT))
    }
}

fn parse_or(value: Option<&str>, default: i64) -> i64 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

/// List users response
#[derive(Debug, Serialize, Deserialize)]
pub struct ListUsersResponse {
    /// Total number of users across all pages
    pub total_users: i64,

    /// Effective page
    pub page: u32,

    /// Effective page size
    pub limit: u32,

    pub users: Vec<UserResponse>,
}

/// Create user response
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserResponse {
    /// New user ID
    pub id: i64,

    /// The generated plaintext password
    ///
    /// IMPORTANT: This is the only time the password is shown.
    pub password: String,
}

/// Confirmation message for state-changing operations
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: String) -> Json<Self> {
        Json(Self { message })
    }
}

/// List users
///
/// # Endpoint
///
/// ```text
/// GET /v1/users?page=2&limit=20
/// ```
///
/// # Response
///
/// ```json
/// {
///   "total_users": 42,
///   "page": 2,
///   "limit": 20,
///   "users": [{ "id": 21, "name": "Ada", "status": "active", ... }]
/// }
/// ```
pub async fn list_users(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Json<ListUsersResponse>> {
    let query = ListUsersQuery::from_pairs(pairs);
    let page = state
        .users
        .get_user_list(query.page(), query.limit())
        .await?;

    Ok(Json(ListUsersResponse {
        total_users: page.total,
        page: page.page,
        limit: page.limit,
        users: page.users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// Fetch a single user
pub async fn get_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> ApiResult<Json<UserResponse>> {
    let user = state.users.get_user_by_id(id).await?;
    Ok(Json(user.into()))
}

/// Create a user
///
/// The account starts out active with a randomly generated password, which
/// is returned once in the response.
///
/// # Endpoint
///
/// ```text
/// POST /v1/users
/// Content-Type: application/json
///
/// {
///   "name": "Ada",
///   "surname": "Lovelace",
///   "email": "ada@example.com",
///   "phone": "+44 20 7946 0000"
/// }
/// ```
///
/// # Response
///
/// ```json
/// { "id": 1, "password": "k7#Qm..." }
/// ```
pub async fn create_user(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    JsonBody(req): JsonBody<UserDto>,
) -> ApiResult<Json<CreateUserResponse>> {
    let req = req.trimmed();
    validate_request(&req, locale)?;

    let (user, password) = state
        .users
        .create_user(req.into())
        .await
        .map_err(|e| ApiError::from_service(e, locale))?;

    Ok(Json(CreateUserResponse {
        id: user.id,
        password,
    }))
}

/// Suspend an active user
pub async fn suspend_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> ApiResult<Json<MessageResponse>> {
    state.users.suspend_user_by_id(id).await?;
    Ok(MessageResponse::new(format!(
        "User with ID: {} successfully suspended",
        id
    )))
}

/// Deactivate an active or suspended user
pub async fn deactivate_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> ApiResult<Json<MessageResponse>> {
    state.users.deactivate_user_by_id(id).await?;
    Ok(MessageResponse::new(format!(
        "User with ID: {} successfully deactivated",
        id
    )))
}

/// Reactivate a suspended or deactivated user
pub async fn activate_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> ApiResult<Json<MessageResponse>> {
    state.users.activate_user_by_id(id).await?;
    Ok(MessageResponse::new(format!(
        "User with ID: {} successfully reactivated",
        id
    )))
}

/// Replace a user's profile fields
///
/// Takes the same body as `POST /v1/users`.
pub async fn update_user(
    State(state): State<AppState>,
    UserId(id): UserId,
    RequestLocale(locale): RequestLocale,
    JsonBody(req): JsonBody<UserDto>,
) -> ApiResult<Json<MessageResponse>> {
    let req = req.trimmed();
    validate_request(&req, locale)?;

    state
        .users
        .update_user(id, req.into())
        .await
        .map_err(|e| ApiError::from_service(e, locale))?;

    Ok(MessageResponse::new(format!(
        "User with ID: {} successfully updated with the given data",
        id
    )))
}

/// Change a user's password
///
/// # Endpoint
///
/// ```text
/// PUT /v1/users/:id/password
/// Content-Type: application/json
///
/// {
///   "current_password": "k7#Qm...",
///   "new_password": "N3w!Password",
///   "confirm_password": "N3w!Password"
/// }
/// ```
pub async fn update_password(
    State(state): State<AppState>,
    UserId(id): UserId,
    RequestLocale(locale): RequestLocale,
    JsonBody(req): JsonBody<PasswordUpdateDto>,
) -> ApiResult<Json<MessageResponse>> {
    validate_request(&req, locale)?;

    state
        .users
        .update_password(id, req.into())
        .await
        .map_err(|e| ApiError::from_service(e, locale))?;

    Ok(MessageResponse::new(format!(
        "Password of user with ID: {} successfully updated",
        id
    )))
}
