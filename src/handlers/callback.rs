// Auth callback handler
use actix_web::{web, HttpRequest, HttpResponse, Result};
use log::warn;

use crate::exchange::SessionExchange;
use crate::models::AuthCallbackQuery;
use crate::routes::{AUTH_CALLBACK_ERROR, LOGIN_ROUTE};
use crate::settings::HomebaseSettings;
use crate::utils::cookies::{create_expired_cookie, create_session_cookie, extract_cookie_value};
use crate::utils::logging::LoggingHelper;
use crate::utils::responses::ResponseBuilder;
use crate::validation::{safe_redirect_url, CallbackValidator, DEFAULT_REDIRECT_PATH};

/// `GET /auth/callback?code=...&next=...`
///
/// Exchanges the authorization code for a backend session and sends the user
/// on to `next` if it is a safe application path, `/dashboard` otherwise.
/// Any failure before or during the exchange lands on
/// `/login?error=auth_callback_error` without looking at `next`.
///
/// # Errors
///
/// Never returns an error; every failure is turned into a redirect.
pub async fn auth_callback(
    req: HttpRequest,
    settings: web::Data<HomebaseSettings>,
    exchange: web::Data<dyn SessionExchange>,
) -> Result<HttpResponse> {
    let query = match web::Query::<AuthCallbackQuery>::from_query(req.query_string()) {
        Ok(query) => query.into_inner(),
        Err(e) => {
            warn!("Malformed auth callback query: {e}");
            return Ok(error_redirect(&settings));
        }
    };
    LoggingHelper::log_callback_debug(&req, query.code.is_some(), query.next.as_deref());

    let validated = match CallbackValidator::validate_and_extract(&query) {
        Ok(validated) => validated,
        Err(reason) => {
            LoggingHelper::log_callback_rejected(&reason);
            return Ok(error_redirect(&settings));
        }
    };

    let code_verifier = extract_cookie_value(&req, &settings.code_verifier_cookie_name());
    let session = match exchange
        .exchange_code_for_session(&validated.code, code_verifier.as_deref())
        .await
    {
        Ok(session) => session,
        Err(e) => {
            LoggingHelper::log_exchange_failed(&e);
            return Ok(error_redirect(&settings));
        }
    };

    let session_cookie = match create_session_cookie(
        &settings.auth_cookie_name(),
        &session,
        settings.cookies.secure,
    ) {
        Ok(cookie) => cookie,
        Err(e) => {
            LoggingHelper::log_cookie_failed(&e);
            return Ok(error_redirect(&settings));
        }
    };

    let redirect_to = safe_redirect_url(
        validated.next.as_deref(),
        settings.origin(),
        DEFAULT_REDIRECT_PATH,
    );
    LoggingHelper::log_session_established(&session, &redirect_to);

    Ok(ResponseBuilder::redirect(&redirect_to)
        .with_cookie(session_cookie)
        .with_cookie(clear_verifier_cookie(&settings))
        .build())
}

/// Fixed failure redirect; the `next` parameter is never consulted here
fn error_redirect(settings: &HomebaseSettings) -> HttpResponse {
    ResponseBuilder::redirect(&format!("{}{LOGIN_ROUTE}", settings.origin()))
        .with_error(AUTH_CALLBACK_ERROR)
        .with_cookie(clear_verifier_cookie(settings))
        .build()
}

fn clear_verifier_cookie(settings: &HomebaseSettings) -> actix_web::cookie::Cookie<'static> {
    create_expired_cookie(
        &settings.code_verifier_cookie_name(),
        settings.cookies.secure,
    )
}
