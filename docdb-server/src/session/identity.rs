//! Session identity taken from the `connected` cookie.

use axum::http::{header::COOKIE, HeaderMap};
use uuid::Uuid;

/// Name of the cookie carrying a returning client's identity.
pub const IDENTITY_COOKIE: &str = "connected";

/// Value of the `connected` cookie, if the handshake carried a non-empty one.
pub fn identity_from_cookies(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| name.trim() == IDENTITY_COOKIE)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// Identity for a new session: the cookie value or a fresh UUID.
pub fn session_identity(headers: &HeaderMap) -> String {
    identity_from_cookies(headers).unwrap_or_else(|| Uuid::new_v4().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_identity_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; connected=alice; lang=en"),
        );

        assert_eq!(identity_from_cookies(&headers), Some("alice".to_string()));
        assert_eq!(session_identity(&headers), "alice");
    }

    #[test]
    fn test_identity_across_cookie_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("connected=\"bob\""));

        assert_eq!(identity_from_cookies(&headers), Some("bob".to_string()));
    }

    #[test]
    fn test_missing_or_empty_cookie_gets_fresh_identity() {
        let mut headers = HeaderMap::new();
        assert_eq!(identity_from_cookies(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("connected="));
        assert_eq!(identity_from_cookies(&headers), None);

        let first = session_identity(&headers);
        let second = session_identity(&headers);
        assert!(Uuid::parse_str(&first).is_ok());
        assert_ne!(first, second);
    }
}
