use auth::AuthorizationGate;
use auth::GateOutcome;
use auth::Identity;
use auth::Policy;
use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;

/// Route-layer state: the gate plus the policy a route group requires.
#[derive(Clone)]
pub struct ApiGuard {
    gate: AuthorizationGate,
    policy: Policy,
}

impl ApiGuard {
    pub fn new(gate: AuthorizationGate, policy: Policy) -> Self {
        Self { gate, policy }
    }
}

/// Middleware that enforces the guard's policy on API routes.
///
/// Allowed callers get their [`AuthClaims`](auth::AuthClaims) inserted into
/// the request extensions. Rejections are JSON error bodies: 401 without a
/// valid credential, 403 with one that lacks the required role.
pub async fn enforce(State(guard): State<ApiGuard>, mut req: Request, next: Next) -> Response {
    let decision = guard.gate.check(guard.policy, req.headers());

    match decision.outcome {
        GateOutcome::Allow => {
            if let Identity::Authenticated(claims) = decision.resolved.identity {
                req.extensions_mut().insert(claims);
            }
            next.run(req).await
        }
        GateOutcome::Unauthenticated => {
            ApiError::Unauthorized("Authentication required".to_string()).into_response()
        }
        GateOutcome::Forbidden => {
            ApiError::Forbidden("Insufficient permissions".to_string()).into_response()
        }
    }
}
