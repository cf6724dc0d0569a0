//! Credential cookies.
//!
//! Both credential kinds use the same cookie shape: `HttpOnly`,
//! `SameSite=Lax`, `Path=/`, `Secure` behind https. Issuing sets a
//! multi-day `Max-Age`; revoking overwrites the cookie with an empty value
//! that expires immediately.

use axum::http::{HeaderMap, header::COOKIE};
use orchard_core::CredentialKind;
use tower_sessions::cookie::time::{Duration, OffsetDateTime};
use tower_sessions::cookie::{Cookie, SameSite};

/// Build the cookie that carries a freshly issued token.
#[must_use]
pub fn credential_cookie(
    kind: CredentialKind,
    token: String,
    max_age: Duration,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((kind.cookie_name(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age)
        .build()
}

/// Build the cookie that overwrites and expires a kind's credential.
#[must_use]
pub fn revocation_cookie(kind: CredentialKind, secure: bool) -> Cookie<'static> {
    Cookie::build((kind.cookie_name(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}

/// Read a cookie value from the request headers.
///
/// Looks through every `Cookie` header; unparsable pairs are skipped. Empty
/// values count as absent.
#[must_use]
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name && !cookie.value().is_empty())
        .map(|cookie| cookie.value().to_owned())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_credential_cookie_attributes() {
        let cookie = credential_cookie(
            CredentialKind::User,
            "tok".to_string(),
            Duration::days(7),
            false,
        );
        let rendered = cookie.to_string();

        assert!(rendered.starts_with("orchard_user=tok"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("SameSite=Lax"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("Max-Age=604800"));
        assert!(!rendered.contains("Secure"));
    }

    #[test]
    fn test_revocation_cookie_expires_immediately() {
        let cookie = revocation_cookie(CredentialKind::Admin, true);
        let rendered = cookie.to_string();

        assert!(rendered.starts_with("orchard_admin=;"));
        assert!(rendered.contains("Max-Age=0"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("1970"));
    }

    #[test]
    fn test_read_cookie_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("orchard_session=abc; theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("orchard_user=tok"));

        assert_eq!(read_cookie(&headers, "orchard_user").as_deref(), Some("tok"));
        assert_eq!(read_cookie(&headers, "theme").as_deref(), Some("dark"));
        assert_eq!(read_cookie(&headers, "orchard_admin"), None);
    }

    #[test]
    fn test_read_cookie_ignores_empty_value() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("orchard_admin="));
        assert_eq!(read_cookie(&headers, "orchard_admin"), None);
    }
}
