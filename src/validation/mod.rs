//! Validation Module
//!
//! Validation of untrusted request input before it influences a response.
//!
//! # Modules
//!
//! - [`redirect`] - Post-login redirect target validation (open redirect protection)
//! - [`callback`] - Auth callback query validation and code extraction
//!
//! # Usage
//!
//! ```
//! use homebase_auth::validation::{safe_redirect_path, DEFAULT_REDIRECT_PATH};
//!
//! assert_eq!(safe_redirect_path(Some("/settings"), DEFAULT_REDIRECT_PATH), "/settings");
//! assert_eq!(safe_redirect_path(Some("//evil.com"), DEFAULT_REDIRECT_PATH), "/dashboard");
//! ```

pub mod callback;
pub mod redirect;

pub use callback::{CallbackRejection, CallbackValidator, ValidatedCallback};
pub use redirect::{
    safe_redirect_path, safe_redirect_url, RedirectRejection, RedirectValidator,
    ALLOWED_REDIRECT_PREFIXES, DEFAULT_REDIRECT_PATH,
};
