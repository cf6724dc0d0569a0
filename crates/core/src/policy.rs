//! Route access policy.
//!
//! A single table maps route prefixes to the credential kind they require.
//! [`AccessPolicy::decide`] is a pure function of the path and the held
//! credentials; the HTTP layer turns a [`GateDecision::Redirect`] into an
//! absolute redirect on the request's origin.
//!
//! Prefixes match on segment boundaries: `/cart` covers `/cart` and
//! `/cart/items` but not `/cartography`.

use serde::Serialize;

use crate::types::{CredentialKind, HeldCredentials};

/// Classification of a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteClass {
    AdminProtected,
    UserProtected,
    Unprotected,
}

impl RouteClass {
    /// The credential kind required by this class, if any.
    #[must_use]
    pub const fn required_kind(self) -> Option<CredentialKind> {
        match self {
            Self::AdminProtected => Some(CredentialKind::Admin),
            Self::UserProtected => Some(CredentialKind::User),
            Self::Unprotected => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AdminProtected => "admin-protected",
            Self::UserProtected => "user-protected",
            Self::Unprotected => "unprotected",
        }
    }
}

/// Outcome of the gate for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Pass the request through unchanged.
    Forward,
    /// Send the client to a login page.
    Redirect {
        kind: CredentialKind,
        login_path: &'static str,
    },
}

/// One row of the policy table.
#[derive(Debug, Clone, Copy)]
pub struct RouteRule {
    /// Path prefix the rule covers.
    pub prefix: &'static str,
    /// Prefixes under `prefix` that stay reachable without a credential.
    pub exempt: &'static [&'static str],
    /// Credential required for covered paths.
    pub kind: CredentialKind,
}

impl RouteRule {
    fn covers(&self, path: &str) -> bool {
        matches_prefix(path, self.prefix) && !self.exempt.iter().any(|e| matches_prefix(path, e))
    }
}

/// The access policy table.
///
/// Rules are evaluated in order; the first covering rule wins. Admin rules
/// come first so an overlapping configuration always errs on the stricter
/// credential.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<RouteRule>,
}

/// The canonical Orchard policy.
const STANDARD_RULES: &[RouteRule] = &[
    RouteRule {
        prefix: "/admin",
        exempt: &["/admin/login"],
        kind: CredentialKind::Admin,
    },
    RouteRule {
        prefix: "/cart",
        exempt: &[],
        kind: CredentialKind::User,
    },
    RouteRule {
        prefix: "/account",
        exempt: &[],
        kind: CredentialKind::User,
    },
];

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl AccessPolicy {
    /// The storefront's policy: `/admin` (except its login page) needs an
    /// admin credential; `/cart` and `/account` need a user credential;
    /// everything else, including `/`, is public.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(STANDARD_RULES.to_vec())
    }

    /// Build a policy from rules, with admin rules ordered first.
    #[must_use]
    pub fn new(mut rules: Vec<RouteRule>) -> Self {
        rules.sort_by_key(|rule| match rule.kind {
            CredentialKind::Admin => 0,
            CredentialKind::User => 1,
        });
        Self { rules }
    }

    #[must_use]
    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// Whether the gate needs to look at this path at all.
    ///
    /// Paths outside every rule prefix bypass credential checks entirely.
    #[must_use]
    pub fn applies_to(&self, path: &str) -> bool {
        self.rules
            .iter()
            .any(|rule| matches_prefix(path, rule.prefix))
    }

    /// Classify a path.
    #[must_use]
    pub fn classify(&self, path: &str) -> RouteClass {
        match self.rules.iter().find(|rule| rule.covers(path)) {
            Some(rule) => match rule.kind {
                CredentialKind::Admin => RouteClass::AdminProtected,
                CredentialKind::User => RouteClass::UserProtected,
            },
            None => RouteClass::Unprotected,
        }
    }

    /// Decide whether to forward the request or redirect it to a login page.
    #[must_use]
    pub fn decide(&self, path: &str, held: &HeldCredentials) -> GateDecision {
        match self.classify(path).required_kind() {
            Some(kind) if !held.holds(kind) => GateDecision::Redirect {
                kind,
                login_path: kind.login_path(),
            },
            _ => GateDecision::Forward,
        }
    }
}

/// Segment-aware prefix match.
fn matches_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN_PATHS: &[&str] = &["/admin", "/admin/", "/admin/products", "/admin/discounts/7"];
    const USER_PATHS: &[&str] = &[
        "/cart",
        "/cart/items",
        "/cart/checkout",
        "/account",
        "/account/orders",
    ];
    const PUBLIC_PATHS: &[&str] = &[
        "/",
        "/products",
        "/products/pineapple",
        "/login",
        "/cartography",
        "/administrator",
        "/api/selections/delivery",
    ];

    fn admin() -> HeldCredentials {
        HeldCredentials::none().with(CredentialKind::Admin)
    }

    fn user() -> HeldCredentials {
        HeldCredentials::none().with(CredentialKind::User)
    }

    #[test]
    fn test_admin_paths_redirect_without_admin_token() {
        let policy = AccessPolicy::standard();
        for path in ADMIN_PATHS {
            assert_eq!(
                policy.decide(path, &HeldCredentials::none()),
                GateDecision::Redirect {
                    kind: CredentialKind::Admin,
                    login_path: "/admin/login"
                },
                "{path}"
            );
            assert_eq!(policy.decide(path, &admin()), GateDecision::Forward, "{path}");
        }
    }

    #[test]
    fn test_user_paths_redirect_without_user_token() {
        let policy = AccessPolicy::standard();
        for path in USER_PATHS {
            assert_eq!(
                policy.decide(path, &HeldCredentials::none()),
                GateDecision::Redirect {
                    kind: CredentialKind::User,
                    login_path: "/login"
                },
                "{path}"
            );
            assert_eq!(policy.decide(path, &user()), GateDecision::Forward, "{path}");
        }
    }

    #[test]
    fn test_one_kind_does_not_authorize_the_other() {
        let policy = AccessPolicy::standard();
        assert!(matches!(
            policy.decide("/admin", &user()),
            GateDecision::Redirect { .. }
        ));
        assert!(matches!(
            policy.decide("/cart", &admin()),
            GateDecision::Redirect { .. }
        ));
    }

    #[test]
    fn test_public_paths_always_forward() {
        let policy = AccessPolicy::standard();
        for held in [HeldCredentials::none(), admin(), user(), admin().with(CredentialKind::User)] {
            for path in PUBLIC_PATHS {
                assert_eq!(policy.decide(path, &held), GateDecision::Forward, "{path}");
            }
        }
    }

    #[test]
    fn test_admin_login_is_never_redirected() {
        let policy = AccessPolicy::standard();
        assert_eq!(policy.classify("/admin/login"), RouteClass::Unprotected);
        assert_eq!(
            policy.decide("/admin/login", &HeldCredentials::none()),
            GateDecision::Forward
        );
    }

    #[test]
    fn test_applies_to_matches_rule_prefixes_only() {
        let policy = AccessPolicy::standard();
        assert!(policy.applies_to("/admin/login"));
        assert!(policy.applies_to("/cart/items"));
        assert!(!policy.applies_to("/"));
        assert!(!policy.applies_to("/cartography"));
    }

    #[test]
    fn test_admin_rules_sorted_first() {
        let policy = AccessPolicy::new(vec![
            RouteRule {
                prefix: "/shared",
                exempt: &[],
                kind: CredentialKind::User,
            },
            RouteRule {
                prefix: "/shared/ops",
                exempt: &[],
                kind: CredentialKind::Admin,
            },
        ]);
        assert_eq!(policy.classify("/shared/ops/x"), RouteClass::AdminProtected);
        assert_eq!(policy.classify("/shared/cart"), RouteClass::UserProtected);
    }

    #[test]
    fn test_trailing_slash_prefix() {
        assert!(matches_prefix("/cart/x", "/cart/"));
        assert!(matches_prefix("/cart", "/cart/"));
        assert!(!matches_prefix("/carts", "/cart/"));
    }
}
