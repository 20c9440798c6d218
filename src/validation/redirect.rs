//! Post-authentication redirect validation
//!
//! The `next` parameter on the auth callback is client supplied. Before a
//! freshly signed-in user is sent anywhere, the candidate is checked with
//! plain string rules and anything that fails is replaced by a trusted
//! fallback. No error ever reaches the client: an unsafe value simply means
//! "go to the dashboard".

use log::debug;
use thiserror::Error;

/// Path used when the candidate is missing or unsafe
pub const DEFAULT_REDIRECT_PATH: &str = "/dashboard";

/// Application route prefixes a user may be sent to after signing in.
///
/// Kept in sync with [`crate::routes::APP_ROUTES`] by a unit test in that module.
pub const ALLOWED_REDIRECT_PREFIXES: &[&str] = &[
    "/dashboard",
    "/calculator",
    "/calculations",
    "/settings",
    "/reset-password",
];

/// Reason a candidate redirect was replaced with the fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RedirectRejection {
    #[error("no redirect target supplied")]
    Missing,
    #[error("target is not a root-relative path")]
    NotRootRelative,
    #[error("target is protocol-relative")]
    ProtocolRelative,
    #[error("target contains userinfo separator '@'")]
    ContainsAt,
    #[error("target contains a backslash")]
    ContainsBackslash,
    #[error("target path is not an allowed application route")]
    NotAllowed,
}

/// Redirect validator bound to an allow-list and a fallback path
#[derive(Debug, Clone, Copy)]
pub struct RedirectValidator<'a> {
    allowed_prefixes: &'a [&'a str],
    fallback: &'a str,
}

impl Default for RedirectValidator<'static> {
    fn default() -> Self {
        Self::new(ALLOWED_REDIRECT_PREFIXES, DEFAULT_REDIRECT_PATH)
    }
}

impl<'a> RedirectValidator<'a> {
    #[must_use]
    pub const fn new(allowed_prefixes: &'a [&'a str], fallback: &'a str) -> Self {
        Self {
            allowed_prefixes,
            fallback,
        }
    }

    /// Check a candidate without substituting the fallback.
    ///
    /// Returns the candidate untouched (query string included) when every
    /// rule passes.
    ///
    /// # Errors
    ///
    /// Returns the first rule the candidate breaks.
    pub fn check<'c>(&self, candidate: Option<&'c str>) -> Result<&'c str, RedirectRejection> {
        let candidate = match candidate {
            Some(c) if !c.is_empty() => c,
            _ => return Err(RedirectRejection::Missing),
        };

        // Absolute URLs and bare schemes like `javascript:` never start with '/'
        if !candidate.starts_with('/') {
            return Err(RedirectRejection::NotRootRelative);
        }
        if candidate.starts_with("//") {
            return Err(RedirectRejection::ProtocolRelative);
        }
        if candidate.contains('@') {
            return Err(RedirectRejection::ContainsAt);
        }
        // Some parsers normalise '\' to '/', turning "/\evil.com" into "//evil.com"
        if candidate.contains('\\') {
            return Err(RedirectRejection::ContainsBackslash);
        }

        let path = candidate
            .split_once('?')
            .map_or(candidate, |(path, _query)| path);

        if self.is_allowed_path(path) {
            Ok(candidate)
        } else {
            Err(RedirectRejection::NotAllowed)
        }
    }

    /// Resolve a candidate to a safe root-relative path, falling back on any failure
    #[must_use]
    pub fn safe_path<'r>(&self, candidate: Option<&'r str>) -> &'r str
    where
        'a: 'r,
    {
        match self.check(candidate) {
            Ok(path) => path,
            Err(reason) => {
                debug!(
                    "Rejected redirect target {:?}: {reason}; using {}",
                    candidate.unwrap_or_default(),
                    self.fallback
                );
                self.fallback
            }
        }
    }

    /// Resolve a candidate and prefix it with a trusted origin
    #[must_use]
    pub fn safe_url(&self, candidate: Option<&str>, origin: &str) -> String {
        format!("{origin}{}", self.safe_path(candidate))
    }

    fn is_allowed_path(&self, path: &str) -> bool {
        if path == "/" {
            return true;
        }
        self.allowed_prefixes.iter().any(|prefix| {
            path.strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }
}

/// Resolve an untrusted post-login target to a safe application path.
///
/// Returns `candidate` unchanged when it is a root-relative path under one of
/// [`ALLOWED_REDIRECT_PREFIXES`] (or `/` itself), otherwise `fallback`.
#[must_use]
pub fn safe_redirect_path<'a>(candidate: Option<&'a str>, fallback: &'a str) -> &'a str {
    RedirectValidator::new(ALLOWED_REDIRECT_PREFIXES, fallback).safe_path(candidate)
}

/// Same as [`safe_redirect_path`] with the result appended to `origin`.
///
/// `origin` must come from trusted server configuration; it is not checked here.
#[must_use]
pub fn safe_redirect_url(candidate: Option<&str>, origin: &str, fallback: &str) -> String {
    RedirectValidator::new(ALLOWED_REDIRECT_PREFIXES, fallback).safe_url(candidate, origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(candidate: &str) -> &str {
        safe_redirect_path(Some(candidate), DEFAULT_REDIRECT_PATH)
    }

    #[test]
    fn test_missing_candidate_uses_fallback() {
        assert_eq!(safe_redirect_path(None, "/dashboard"), "/dashboard");
        assert_eq!(safe_redirect_path(Some(""), "/dashboard"), "/dashboard");
        assert_eq!(safe_redirect_path(None, "/settings"), "/settings");
    }

    #[test]
    fn test_absolute_urls_rejected() {
        for candidate in [
            "http://evil.com",
            "https://evil.com/dashboard",
            "javascript:alert(1)",
            "data:text/html,<script>alert(1)</script>",
            "dashboard",
            " /dashboard",
        ] {
            assert_eq!(resolve(candidate), "/dashboard", "should reject {candidate}");
        }
    }

    #[test]
    fn test_protocol_relative_rejected() {
        assert_eq!(resolve("//evil.com/x"), "/dashboard");
        assert_eq!(resolve("//evil.com"), "/dashboard");
        assert_eq!(resolve("///evil.com"), "/dashboard");
    }

    #[test]
    fn test_userinfo_rejected() {
        assert_eq!(resolve("/dashboard@evil.com"), "/dashboard");
        assert_eq!(resolve("/@evil.com"), "/dashboard");
        assert_eq!(resolve("/calculations?owner=a@b.com"), "/dashboard");
    }

    #[test]
    fn test_backslash_rejected() {
        assert_eq!(resolve("/\\evil.com"), "/dashboard");
        assert_eq!(resolve("/dashboard\\..\\admin"), "/dashboard");
    }

    #[test]
    fn test_allow_listed_paths_pass_through() {
        assert_eq!(resolve("/calculations"), "/calculations");
        assert_eq!(
            resolve("/calculations/123?tab=notes"),
            "/calculations/123?tab=notes"
        );
        assert_eq!(resolve("/calculator"), "/calculator");
        assert_eq!(resolve("/settings?section=profile"), "/settings?section=profile");
        assert_eq!(resolve("/reset-password"), "/reset-password");
        assert_eq!(resolve("/dashboard/"), "/dashboard/");
    }

    #[test]
    fn test_root_passes_through() {
        assert_eq!(resolve("/"), "/");
        assert_eq!(resolve("/?welcome=1"), "/?welcome=1");
    }

    #[test]
    fn test_unlisted_paths_rejected() {
        assert_eq!(resolve("/admin/secret"), "/dashboard");
        assert_eq!(resolve("/login"), "/dashboard");
        // Prefix must end on a segment boundary
        assert_eq!(resolve("/dashboardevil"), "/dashboard");
        assert_eq!(resolve("/calculations-export"), "/dashboard");
        assert_eq!(resolve("/Dashboard"), "/dashboard");
    }

    #[test]
    fn test_query_string_not_inspected() {
        assert_eq!(
            resolve("/dashboard?next=https://evil.com"),
            "/dashboard?next=https://evil.com"
        );
        assert_eq!(resolve("/admin?x=/dashboard"), "/dashboard");
    }

    #[test]
    fn test_safe_url_concatenates_origin() {
        assert_eq!(
            safe_redirect_url(Some("/settings"), "https://app.example.com", "/dashboard"),
            "https://app.example.com/settings"
        );
        assert_eq!(
            safe_redirect_url(Some("//evil.com"), "https://app.example.com", "/dashboard"),
            "https://app.example.com/dashboard"
        );
        assert_eq!(
            safe_redirect_url(None, "http://localhost:3000", "/dashboard"),
            "http://localhost:3000/dashboard"
        );
    }

    #[test]
    fn test_result_always_root_relative_and_idempotent() {
        let candidates = [
            "",
            "/",
            "/dashboard",
            "/calculations/42?tab=notes",
            "http://evil.com",
            "//evil.com",
            "/@evil.com",
            "/\\evil.com",
            "/admin",
            "?next=/dashboard",
            "#/dashboard",
            "/settings/../admin",
        ];

        for candidate in candidates {
            let once = resolve(candidate);
            assert!(once.starts_with('/'), "{candidate:?} -> {once:?}");
            assert!(!once.starts_with("//"), "{candidate:?} -> {once:?}");
            assert_eq!(resolve(once), once, "not idempotent for {candidate:?}");
        }
    }

    #[test]
    fn test_check_reports_reason() {
        let validator = RedirectValidator::default();
        assert_eq!(validator.check(None), Err(RedirectRejection::Missing));
        assert_eq!(
            validator.check(Some("https://evil.com")),
            Err(RedirectRejection::NotRootRelative)
        );
        assert_eq!(
            validator.check(Some("//evil.com")),
            Err(RedirectRejection::ProtocolRelative)
        );
        assert_eq!(
            validator.check(Some("/x@evil.com")),
            Err(RedirectRejection::ContainsAt)
        );
        assert_eq!(
            validator.check(Some("/\\evil.com")),
            Err(RedirectRejection::ContainsBackslash)
        );
        assert_eq!(
            validator.check(Some("/admin")),
            Err(RedirectRejection::NotAllowed)
        );
        assert_eq!(validator.check(Some("/settings")), Ok("/settings"));
    }

    #[test]
    fn test_custom_allow_list() {
        let validator = RedirectValidator::new(&["/reports"], "/home");
        assert_eq!(validator.safe_path(Some("/reports/2024")), "/reports/2024");
        assert_eq!(validator.safe_path(Some("/dashboard")), "/home");
        assert_eq!(validator.safe_path(None), "/home");
    }

    /// Every payload in the open-redirect corpus must resolve to the fallback
    #[test]
    fn test_open_redirect_corpus_blocked() {
        let test_file_path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("openredirects.txt");

        let file_content = std::fs::read_to_string(&test_file_path)
            .expect("Failed to read openredirects.txt test file");

        let payloads: Vec<&str> = file_content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter(|line| !line.trim().starts_with('#'))
            .collect();

        assert!(!payloads.is_empty());

        let failed: Vec<&str> = payloads
            .iter()
            .copied()
            .filter(|payload| resolve(payload) != DEFAULT_REDIRECT_PATH)
            .collect();

        assert!(
            failed.is_empty(),
            "{} open redirect payloads were not blocked: {:?}",
            failed.len(),
            failed.iter().take(20).collect::<Vec<_>>()
        );
    }
}
