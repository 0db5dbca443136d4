use std::sync::Arc;

use http::HeaderMap;

use crate::claims::Role;
use crate::identity::Identity;
use crate::identity::IdentityResolver;
use crate::identity::ResolvedIdentity;

/// Route-level access requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Anyone, signed in or not
    Anonymous,
    /// Any signed-in caller
    Authenticated,
    /// Signed-in caller holding the given role
    Role(Role),
}

impl Policy {
    pub const ADMIN: Policy = Policy::Role(Role::Admin);

    /// Check `identity` against this policy.
    pub fn evaluate(&self, identity: &Identity) -> GateOutcome {
        match (self, identity) {
            (Policy::Anonymous, _) => GateOutcome::Allow,
            (Policy::Authenticated | Policy::Role(_), Identity::Anonymous) => {
                GateOutcome::Unauthenticated
            }
            (Policy::Authenticated, Identity::Authenticated(_)) => GateOutcome::Allow,
            (Policy::Role(required), Identity::Authenticated(claims)) => {
                if claims.role == *required {
                    GateOutcome::Allow
                } else {
                    GateOutcome::Forbidden
                }
            }
        }
    }
}

/// Result of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Allow,
    /// No valid credential (401)
    Unauthenticated,
    /// Valid credential, insufficient role (403)
    Forbidden,
}

/// Outcome plus the identity it was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateDecision {
    pub outcome: GateOutcome,
    pub resolved: ResolvedIdentity,
}

/// Per-request identity resolution and policy enforcement.
///
/// Knows nothing about concrete credential forms: resolvers are asked in
/// order and the first one whose credential is present decides the identity.
#[derive(Clone)]
pub struct AuthorizationGate {
    resolvers: Vec<Arc<dyn IdentityResolver>>,
}

impl AuthorizationGate {
    pub fn new(resolvers: Vec<Arc<dyn IdentityResolver>>) -> Self {
        Self { resolvers }
    }

    /// Resolve the caller, anonymous when no credential is present.
    pub fn identify(&self, headers: &HeaderMap) -> ResolvedIdentity {
        for resolver in &self.resolvers {
            if let Some(resolved) = resolver.resolve(headers) {
                if !resolved.identity.is_authenticated() {
                    tracing::debug!(scheme = resolver.scheme(), "Credential rejected");
                }
                return resolved;
            }
        }

        ResolvedIdentity::anonymous()
    }

    /// Resolve the caller and check `policy`.
    pub fn check(&self, policy: Policy, headers: &HeaderMap) -> GateDecision {
        let resolved = self.identify(headers);
        let outcome = policy.evaluate(&resolved.identity);

        if outcome != GateOutcome::Allow {
            tracing::debug!(
                ?policy,
                ?outcome,
                username = resolved.identity.claims().map(|c| c.username.as_str()),
                "Access denied"
            );
        }

        GateDecision { outcome, resolved }
    }
}
