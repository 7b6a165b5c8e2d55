/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use userdesk_api::{app::{build_router, AppState}, config::Config};
/// use userdesk_shared::repository::PgUserRepository;
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(Arc::new(PgUserRepository::new(pool)), config);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, build_router(state)).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, routes};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use userdesk_shared::{repository::UserRepository, services::UserService};

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the user service over a storage backend
    pub fn new(repository: Arc<dyn UserRepository>, config: Config) -> Self {
        Self {
            users: UserService::new(repository),
            config: Arc::new(config),
        }
    }
}

/// Builds the router
///
/// ```text
/// GET  /health
/// GET  /v1/users                 ?page=&limit=
/// POST /v1/users
/// GET  /v1/users/:id
/// PUT  /v1/users/:id
/// PUT  /v1/users/:id/password
/// POST /v1/users/:id/suspend
/// POST /v1/users/:id/deactivate
/// POST /v1/users/:id/activate
/// ```
///
/// Requests are traced at INFO, then pass through CORS.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/v1/users", user_routes())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

fn user_routes() -> Router<AppState> {
    use routes::users;

    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/:id", get(users::get_user).put(users::update_user))
        .route("/:id/password", put(users::update_password))
        .route("/:id/suspend", post(users::suspend_user))
        .route("/:id/deactivate", post(users::deactivate_user))
        .route("/:id/activate", post(users::activate_user))
}

/// `*` in `CORS_ORIGINS` allows any origin; otherwise only the listed ones
/// (unparsable entries are skipped).
fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT_LANGUAGE])
        .max_age(Duration::from_secs(3600))
}
