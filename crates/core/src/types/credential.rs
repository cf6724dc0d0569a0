//! Credential kinds and the principals they identify.
//!
//! Two independent credential kinds exist. Holding one never authorizes the
//! other's routes: each kind has its own cookie and its own login path.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kind of credential a route requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
    /// Back-office access.
    Admin,
    /// Shopper account access (cart, account pages).
    User,
}

impl CredentialKind {
    /// All credential kinds.
    pub const ALL: [Self; 2] = [Self::Admin, Self::User];

    /// Name of the cookie carrying this kind's token.
    ///
    /// The gate and the issuing/revoking handlers must agree on these names.
    #[must_use]
    pub const fn cookie_name(self) -> &'static str {
        match self {
            Self::Admin => "orchard_admin",
            Self::User => "orchard_user",
        }
    }

    /// Path of the login page for this kind.
    #[must_use]
    pub const fn login_path(self) -> &'static str {
        match self {
            Self::Admin => "/admin/login",
            Self::User => "/login",
        }
    }

    /// Path of the API endpoint that issues this kind's credential.
    #[must_use]
    pub const fn login_endpoint(self) -> &'static str {
        match self {
            Self::Admin => "/api/admin/login",
            Self::User => "/api/login",
        }
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`CredentialKind`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown credential kind: {0}")]
pub struct UnknownCredentialKind(String);

impl FromStr for CredentialKind {
    type Err = UnknownCredentialKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(UnknownCredentialKind(s.to_owned())),
        }
    }
}

/// An authenticated identity of a given kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub kind: CredentialKind,
    /// Account name the credential was issued to.
    pub subject: String,
}

impl Principal {
    #[must_use]
    pub fn new(kind: CredentialKind, subject: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
        }
    }
}

/// Which valid credentials a request carries.
///
/// Built fresh per request from verified tokens; this is the only input the
/// access policy sees besides the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeldCredentials {
    admin: bool,
    user: bool,
}

impl HeldCredentials {
    /// No credentials held.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            admin: false,
            user: false,
        }
    }

    /// Return a copy that also holds `kind`.
    #[must_use]
    pub const fn with(mut self, kind: CredentialKind) -> Self {
        match kind {
            CredentialKind::Admin => self.admin = true,
            CredentialKind::User => self.user = true,
        }
        self
    }

    /// Whether a valid credential of `kind` is held.
    #[must_use]
    pub const fn holds(&self, kind: CredentialKind) -> bool {
        match kind {
            CredentialKind::Admin => self.admin,
            CredentialKind::User => self.user,
        }
    }
}
