use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::HttpRequest;
use base64::{engine::general_purpose, Engine as _};

use crate::models::IdentitySession;

/// Marker the web client expects in front of base64-encoded cookie values
pub const BASE64_COOKIE_PREFIX: &str = "base64-";

/// Encode a backend session into the auth cookie value
///
/// # Errors
///
/// Returns an error if the session cannot be serialized
pub fn encode_session_cookie_value(session: &IdentitySession) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(session)?;
    Ok(format!(
        "{BASE64_COOKIE_PREFIX}{}",
        general_purpose::STANDARD.encode(json)
    ))
}

/// Decode an auth cookie value back into the session, if well formed
#[cfg(any(test, feature = "testing"))]
#[must_use]
pub fn decode_session_cookie_value(value: &str) -> Option<IdentitySession> {
    let encoded = value.strip_prefix(BASE64_COOKIE_PREFIX)?;
    let json = general_purpose::STANDARD.decode(encoded).ok()?;
    serde_json::from_slice(&json).ok()
}

/// Build the cookie carrying the backend session
///
/// # Errors
///
/// Returns an error if the session cannot be serialized
pub fn create_session_cookie(
    name: &str,
    session: &IdentitySession,
    secure: bool,
) -> Result<Cookie<'static>, serde_json::Error> {
    let value = encode_session_cookie_value(session)?;
    Ok(Cookie::build(name.to_owned(), value)
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(session.expires_in))
        .finish())
}

/// Create an expired cookie to clear a specific cookie
#[must_use]
pub fn create_expired_cookie(name: &str, secure: bool) -> Cookie<'static> {
    Cookie::build(name.to_owned(), "")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(-1))
        .finish()
}

/// Read a non-empty cookie value from the request
#[must_use]
pub fn extract_cookie_value(req: &HttpRequest, cookie_name: &str) -> Option<String> {
    req.cookie(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_helpers::create_test_session;
    use actix_web::test as actix_test;

    #[test]
    fn test_session_cookie_attributes() {
        let session = create_test_session();
        let cookie = create_session_cookie("sb-test-auth-token", &session, true).unwrap();

        assert_eq!(cookie.name(), "sb-test-auth-token");
        assert!(cookie.value().starts_with(BASE64_COOKIE_PREFIX));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(session.expires_in)));
    }

    #[test]
    fn test_session_cookie_value_decodes() {
        let session = create_test_session();
        let value = encode_session_cookie_value(&session).unwrap();
        assert_eq!(decode_session_cookie_value(&value), Some(session));
        assert_eq!(decode_session_cookie_value("not-base64"), None);
        assert_eq!(decode_session_cookie_value("base64-!!!"), None);
    }

    #[test]
    fn test_expired_cookie() {
        let cookie = create_expired_cookie("verifier", false);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::seconds(-1)));
        assert_eq!(cookie.secure(), Some(false));
    }

    #[test]
    fn test_extract_cookie_value() {
        let req = actix_test::TestRequest::default()
            .cookie(Cookie::new("verifier", "abc"))
            .cookie(Cookie::new("empty", ""))
            .to_http_request();

        assert_eq!(extract_cookie_value(&req, "verifier").as_deref(), Some("abc"));
        assert_eq!(extract_cookie_value(&req, "empty"), None);
        assert_eq!(extract_cookie_value(&req, "missing"), None);
    }
}
