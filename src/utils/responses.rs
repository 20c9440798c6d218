//! HTTP response helpers
//!
//! Fluent builders for the handful of response shapes the service produces:
//! redirects (optionally carrying cookies and an `error` query parameter) and
//! JSON bodies.

use actix_web::{
    cookie::Cookie,
    http::{header, StatusCode},
    HttpResponse,
};

/// Unified response builder
pub struct ResponseBuilder;

impl ResponseBuilder {
    /// Create a redirect response (302 Found)
    #[must_use]
    pub fn redirect(location: &str) -> RedirectBuilder {
        RedirectBuilder::new(location)
    }

    /// Create an OK response (200) with JSON content
    #[must_use]
    pub fn ok() -> JsonResponseBuilder {
        JsonResponseBuilder::new(StatusCode::OK)
    }
}

/// Builder for redirect responses
pub struct RedirectBuilder {
    location: String,
    cookies: Vec<Cookie<'static>>,
}

impl RedirectBuilder {
    fn new(location: &str) -> Self {
        Self {
            location: location.to_string(),
            cookies: Vec::new(),
        }
    }

    /// Add a cookie to the redirect response
    #[must_use]
    pub fn with_cookie(mut self, cookie: Cookie<'static>) -> Self {
        self.cookies.push(cookie);
        self
    }

    /// Add an error parameter to the redirect URL
    #[must_use]
    pub fn with_error(mut self, error_param: &str) -> Self {
        let error_param = urlencoding::encode(error_param);
        self.location = if self.location.contains('?') {
            format!("{}&error={error_param}", self.location)
        } else {
            format!("{}?error={error_param}", self.location)
        };
        self
    }

    /// Build the final redirect response
    #[must_use]
    pub fn build(self) -> HttpResponse {
        let mut builder = HttpResponse::Found();

        for cookie in self.cookies {
            builder.cookie(cookie);
        }

        // Responses that set auth cookies must not be cached by intermediaries
        builder
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .append_header((header::LOCATION, self.location))
            .finish()
    }
}

/// Builder for JSON responses
pub struct JsonResponseBuilder {
    status_code: StatusCode,
}

impl JsonResponseBuilder {
    const fn new(status_code: StatusCode) -> Self {
        Self { status_code }
    }

    /// Build the response with JSON content
    #[must_use]
    pub fn json<T: serde::Serialize>(self, data: &T) -> HttpResponse {
        HttpResponse::build(self.status_code).json(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(response: &HttpResponse) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    #[test]
    fn test_redirect_builder() {
        let response = ResponseBuilder::redirect("https://app.example.com/login")
            .with_error("auth_callback_error")
            .build();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            location(&response),
            "https://app.example.com/login?error=auth_callback_error"
        );
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );
    }

    #[test]
    fn test_redirect_error_appends_to_existing_query() {
        let response = ResponseBuilder::redirect("/login?tab=email")
            .with_error("bad value")
            .build();
        assert_eq!(location(&response), "/login?tab=email&error=bad%20value");
    }

    #[test]
    fn test_redirect_with_cookies() {
        let response = ResponseBuilder::redirect("/dashboard")
            .with_cookie(Cookie::new("a", "1"))
            .with_cookie(Cookie::new("b", "2"))
            .build();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.cookies().count(), 2);
        assert_eq!(location(&response), "/dashboard");
    }

    #[test]
    fn test_json_response_builder() {
        let data = serde_json::json!({"message": "success"});
        let response = ResponseBuilder::ok().json(&data);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}
