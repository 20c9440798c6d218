//! Application route table
//!
//! Page routes served by the web front end. The callback service does not
//! render any of these; the table exists so the redirect allow-list can be
//! checked against what the application actually serves.

/// Route templates served by the application. `{name}` matches one path segment.
pub const APP_ROUTES: &[&str] = &[
    "/",
    "/login",
    "/signup",
    "/forgot-password",
    "/reset-password",
    "/dashboard",
    "/calculator",
    "/calculations",
    "/calculations/{id}",
    "/settings",
    "/auth/callback",
    "/auth/signout",
];

/// Route prefixes that require a signed-in user
pub const PROTECTED_ROUTES: &[&str] = &["/dashboard", "/calculator", "/calculations", "/settings"];

/// Login page the callback sends users back to on failure
pub const LOGIN_ROUTE: &str = "/login";

/// Path of the auth callback endpoint
pub const AUTH_CALLBACK_ROUTE: &str = "/auth/callback";

/// Query error code appended to [`LOGIN_ROUTE`] when the callback fails
pub const AUTH_CALLBACK_ERROR: &str = "auth_callback_error";

/// Whether a concrete path (no query string) matches one of [`APP_ROUTES`]
#[must_use]
pub fn is_known_route(path: &str) -> bool {
    APP_ROUTES
        .iter()
        .any(|template| matches_template(template, path))
}

fn matches_template(template: &str, path: &str) -> bool {
    if template == "/" || path == "/" {
        return template == path;
    }

    let mut template_segments = template.trim_start_matches('/').split('/');
    let mut path_segments = path.trim_start_matches('/').trim_end_matches('/').split('/');

    loop {
        match (template_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some(t), Some(p)) if t.starts_with('{') && t.ends_with('}') => {
                if p.is_empty() {
                    return false;
                }
            }
            (Some(t), Some(p)) if t == p => {}
            _ => return false,
        }
    }
}
