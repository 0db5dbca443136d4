use std::sync::Arc;
use std::time::Duration;

use auth::AuthConfig;
use auth::AuthorizationGate;
use auth::BearerResolver;
use auth::ConfigError;
use auth::Policy;
use auth::SessionAuthenticator;
use auth::SessionResolver;
use auth::TokenService;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::login::login;
use super::handlers::me::me;
use super::handlers::register::register;
use super::handlers::users::create_user::create_user;
use super::handlers::users::delete_user::delete_user;
use super::handlers::users::get_user::get_user;
use super::handlers::users::list_users::list_users;
use super::handlers::users::update_user::update_user;
use super::middleware::enforce;
use super::middleware::ApiGuard;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::service::AuthService;
use crate::domain::passwords::BlockingHasher;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::domain::user::service::UserService;
use crate::inbound::web;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub auth_service: Arc<dyn AuthServicePort>,
    pub tokens: Arc<TokenService>,
    pub sessions: Arc<SessionAuthenticator>,
    /// Bearer tokens only
    pub api_gate: AuthorizationGate,
    /// Session cookies only
    pub web_gate: AuthorizationGate,
}

impl AppState {
    /// Wire services and credential machinery.
    ///
    /// # Errors
    /// * `ConfigError` - Authentication settings are unusable (missing secret,
    ///   inconsistent session lifetimes)
    pub fn new(
        user_service: Arc<dyn UserServicePort>,
        auth_service: Arc<dyn AuthServicePort>,
        auth_config: &AuthConfig,
    ) -> Result<Self, ConfigError> {
        auth_config.validate()?;

        let tokens = Arc::new(TokenService::new(auth_config)?);
        let sessions = Arc::new(SessionAuthenticator::new(auth_config)?);

        let api_gate =
            AuthorizationGate::new(vec![Arc::new(BearerResolver::new(Arc::clone(&tokens)))]);
        let web_gate =
            AuthorizationGate::new(vec![Arc::new(SessionResolver::new(Arc::clone(&sessions)))]);

        Ok(Self {
            user_service,
            auth_service,
            tokens,
            sessions,
            api_gate,
            web_gate,
        })
    }

    /// Build both domain services over one credential store.
    ///
    /// # Errors
    /// * `ConfigError` - Authentication settings are unusable
    pub fn with_repository<UR>(
        repository: Arc<UR>,
        auth_config: &AuthConfig,
    ) -> Result<Self, ConfigError>
    where
        UR: UserRepository,
    {
        let hasher = BlockingHasher::default();
        let user_service = Arc::new(UserService::new(Arc::clone(&repository), hasher.clone()));
        let auth_service = Arc::new(AuthService::new(repository, hasher));

        Self::new(user_service, auth_service, auth_config)
    }
}

/// JSON API routes, grouped by the policy they require.
fn api_routes(state: &AppState) -> Router<AppState> {
    let public_routes = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register));

    let authenticated_routes = Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/users", get(list_users))
        .route("/api/users/:user_id", get(get_user))
        .route_layer(middleware::from_fn_with_state(
            ApiGuard::new(state.api_gate.clone(), Policy::Authenticated),
            enforce,
        ));

    let admin_routes = Router::new()
        .route("/api/users", post(create_user))
        .route("/api/users/:user_id", put(update_user))
        .route("/api/users/:user_id", delete(delete_user))
        .route_layer(middleware::from_fn_with_state(
            ApiGuard::new(state.api_gate.clone(), Policy::ADMIN),
            enforce,
        ));

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .merge(admin_routes)
}

pub fn create_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(api_routes(&state))
        .merge(web::routes(&state))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
