// Centralized logging for the auth callback flow
use log::{debug, error, info, warn};

use crate::exchange::ExchangeError;
use crate::models::IdentitySession;
use crate::validation::CallbackRejection;

pub struct LoggingHelper;

impl LoggingHelper {
    /// Log the callback request in debug mode. Never logs the code itself.
    pub fn log_callback_debug(req: &actix_web::HttpRequest, has_code: bool, next: Option<&str>) {
        debug!(
            "Auth callback received via {}: code={}, next={:?}",
            req.method(),
            if has_code { "present" } else { "missing" },
            next
        );
        debug!("Callback request connection info: {:?}", req.connection_info());
    }

    /// Log token exchange start
    pub fn log_exchange_start(has_verifier: bool) {
        info!(
            "🔄 Exchanging authorization code for session (code_verifier: {})",
            if has_verifier { "present" } else { "missing" }
        );
    }

    /// Log session exchange success
    pub fn log_session_established(session: &IdentitySession, redirect_to: &str) {
        info!(
            "Session established for user {} ({}), redirecting to {}",
            session.user.id,
            session.user.email.as_deref().unwrap_or("no email"),
            redirect_to
        );
    }

    pub fn log_callback_rejected(reason: &CallbackRejection) {
        warn!("Auth callback rejected before exchange: {reason}");
    }

    pub fn log_exchange_failed(err: &ExchangeError) {
        error!("Failed to exchange code for session: {err}");
    }

    pub fn log_cookie_failed(err: &serde_json::Error) {
        error!("Failed to encode session cookie: {err}");
    }
}
