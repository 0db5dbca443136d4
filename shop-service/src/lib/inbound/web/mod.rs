//! Server-rendered pages authenticated with the session cookie.

use std::sync::Arc;

use auth::Policy;
use axum::routing::get;
use axum::routing::post;
use axum::Router;

use crate::inbound::http::router::AppState;

pub mod handlers;
pub mod middleware;
pub mod pages;
pub mod redirect;

use self::middleware::enforce;
use self::middleware::WebGuard;

/// Page routes, grouped by the policy they require.
pub fn routes(state: &AppState) -> Router<AppState> {
    let guard = |policy: Policy| {
        WebGuard::new(state.web_gate.clone(), Arc::clone(&state.sessions), policy)
    };

    let public_routes = Router::new()
        .route("/", get(handlers::home))
        .route(
            "/account/login",
            get(handlers::login_page).post(handlers::login_submit),
        )
        .route(
            "/account/logout",
            get(handlers::logout).post(handlers::logout),
        )
        .route("/account/access-denied", get(handlers::access_denied))
        .route_layer(::axum::middleware::from_fn_with_state(
            guard(Policy::Anonymous),
            enforce,
        ));

    let authenticated_routes = Router::new()
        .route("/users", get(handlers::users_page))
        .route_layer(::axum::middleware::from_fn_with_state(
            guard(Policy::Authenticated),
            enforce,
        ));

    let admin_routes = Router::new()
        .route("/users/:user_id/delete", post(handlers::delete_user))
        .route_layer(::axum::middleware::from_fn_with_state(
            guard(Policy::ADMIN),
            enforce,
        ));

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .merge(admin_routes)
}
