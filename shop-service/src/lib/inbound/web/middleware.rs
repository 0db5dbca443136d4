use std::sync::Arc;

use auth::AuthorizationGate;
use auth::GateOutcome;
use auth::Identity;
use auth::Policy;
use auth::ResolvedIdentity;
use auth::SessionAuthenticator;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use axum_extra::extract::cookie::Cookie;

use super::redirect::login_url;

pub const ACCESS_DENIED_PATH: &str = "/account/access-denied";

/// Route-layer state for pages: session gate, cookie settings and policy.
#[derive(Clone)]
pub struct WebGuard {
    gate: AuthorizationGate,
    sessions: Arc<SessionAuthenticator>,
    policy: Policy,
}

impl WebGuard {
    pub fn new(gate: AuthorizationGate, sessions: Arc<SessionAuthenticator>, policy: Policy) -> Self {
        Self {
            gate,
            sessions,
            policy,
        }
    }
}

/// Middleware that enforces the guard's policy on pages.
///
/// Signed-in callers get their claims inserted into the request extensions
/// and, when the session slid forward, a refreshed cookie on the response.
/// Anonymous callers are sent to the login page, under-privileged ones to
/// the access-denied page.
pub async fn enforce(State(guard): State<WebGuard>, mut req: Request, next: Next) -> Response {
    let decision = guard.gate.check(guard.policy, req.headers());

    match decision.outcome {
        GateOutcome::Allow => {
            let ResolvedIdentity {
                identity,
                renewed_session,
            } = decision.resolved;

            if let Identity::Authenticated(claims) = identity {
                req.extensions_mut().insert(claims);
            }

            let mut response = next.run(req).await;

            if let Some(session) = renewed_session {
                let cookie_name = guard.sessions.cookie_name();
                // Sign-in and sign-out set their own cookie
                if !sets_cookie(&response, cookie_name) {
                    let cookie = guard.sessions.session_cookie(&session);
                    match HeaderValue::from_str(&cookie.to_string()) {
                        Ok(value) => {
                            response.headers_mut().append(SET_COOKIE, value);
                            tracing::debug!(expires_at = %session.expires_at, "Session renewed");
                        }
                        Err(e) => tracing::warn!(error = %e, "Renewed session cookie rejected"),
                    }
                }
            }

            response
        }
        GateOutcome::Unauthenticated => {
            let original = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/");
            Redirect::to(&login_url(original)).into_response()
        }
        GateOutcome::Forbidden => Redirect::to(ACCESS_DENIED_PATH).into_response(),
    }
}

fn sets_cookie(response: &Response, name: &str) -> bool {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| Cookie::parse(value).ok())
        .any(|cookie| cookie.name() == name)
}
